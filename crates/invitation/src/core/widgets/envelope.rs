//! Envelope open/close toggle.

pub const OPEN_CLASS: &str = "open";
pub const CLOSE_CLASS: &str = "close";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Envelope {
    #[default]
    Closed,
    Open,
}

impl Envelope {
    /// State implied by the container's current classes.
    pub fn from_open_class(has_open_class: bool) -> Self {
        if has_open_class { Self::Open } else { Self::Closed }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }

    /// (class to add, class to remove) to show this state.
    pub fn classes(self) -> (&'static str, &'static str) {
        match self {
            Self::Open => (OPEN_CLASS, CLOSE_CLASS),
            Self::Closed => (CLOSE_CLASS, OPEN_CLASS),
        }
    }
}
