//! Scroll reveal: elements tagged with `data-aos` start hidden and animate
//! in the first time they intersect the viewport.

use std::collections::HashSet;

pub const ANIMATION_ATTR: &str = "data-aos";
pub const DELAY_ATTR: &str = "data-aos-delay";
pub const REVEALED_CLASS: &str = "aos-animate";
pub const TRANSITION: &str = "opacity 0.8s ease-out, transform 0.8s ease-out";
pub const REVEALED_TRANSFORM: &str = "translateX(0) translateY(0) scale(1)";
/// Fraction of the element that must be visible.
pub const VISIBILITY_THRESHOLD: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealAnimation {
    FadeLeft,
    FadeRight,
    FadeUp,
    FadeDown,
    ZoomIn,
    Other,
}

impl RevealAnimation {
    pub fn from_attr(value: &str) -> Self {
        match value {
            "fade-left" => Self::FadeLeft,
            "fade-right" => Self::FadeRight,
            "fade-up" => Self::FadeUp,
            "fade-down" => Self::FadeDown,
            "zoom-in" => Self::ZoomIn,
            _ => Self::Other,
        }
    }

    pub fn hidden_transform(self) -> &'static str {
        match self {
            Self::FadeLeft => "translateX(50px)",
            Self::FadeRight => "translateX(-50px)",
            Self::FadeUp => "translateY(50px)",
            Self::FadeDown => "translateY(-50px)",
            Self::ZoomIn => "scale(0.8)",
            Self::Other => "translateY(30px)",
        }
    }
}

/// `data-aos-delay` as a CSS transition delay; unparsable values mean none.
pub fn transition_delay(attr: Option<&str>) -> String {
    let ms = attr
        .and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(0);
    format!("{ms}ms")
}

/// Remembers which elements have been revealed, so each animates once.
#[derive(Debug, Default)]
pub struct RevealTracker {
    revealed: HashSet<usize>,
}

impl RevealTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` the first time `element` is reported visible.
    pub fn reveal(&mut self, element: usize) -> bool {
        self.revealed.insert(element)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }
}
