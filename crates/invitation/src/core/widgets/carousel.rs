//! Auto-advancing album carousel.
//!
//! A cyclic index over a fixed number of slides. A single repeating timer
//! calls [`Carousel::on_timer`]; pointer and touch presence pause it
//! instead of tearing the timer down, so there is never more than one
//! timer per carousel.

pub const SLIDE_TRANSITION: &str = "450ms ease-out";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideClass {
    Center,
    Left,
    Right,
}

impl SlideClass {
    pub const ALL: [SlideClass; 3] = [Self::Center, Self::Left, Self::Right];

    pub fn class_name(self) -> &'static str {
        match self {
            Self::Center => "image-gallery-center",
            Self::Left => "image-gallery-left",
            Self::Right => "image-gallery-right",
        }
    }
}

/// Where one slide sits relative to the current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlidePosition {
    /// Horizontal offset in percent of the slide width.
    pub offset_percent: i64,
    pub class: Option<SlideClass>,
}

impl SlidePosition {
    pub fn transform(&self) -> String {
        format!("translate3d({}%, 0px, 0px)", self.offset_percent)
    }
}

/// Token of a pending touch-end resume; stale once pointer or touch
/// activity pauses the carousel again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResumeToken(u64);

#[derive(Debug)]
pub struct Carousel {
    len: usize,
    current: usize,
    paused: bool,
    pauses: u64,
}

impl Carousel {
    /// `None` for an empty slide list.
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self {
            len,
            current: 0,
            paused: false,
            pauses: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Move to the next slide, wrapping after the last.
    pub fn advance(&mut self) -> usize {
        self.current = (self.current + 1) % self.len;
        self.current
    }

    /// Timer tick: advances unless paused.
    pub fn on_timer(&mut self) -> Option<usize> {
        (!self.paused).then(|| self.advance())
    }

    pub fn pointer_entered(&mut self) {
        self.pause();
    }

    pub fn pointer_left(&mut self) {
        self.paused = false;
    }

    pub fn touch_started(&mut self) {
        self.pause();
    }

    /// Touch lifted; the caller resumes with the token after a delay.
    pub fn touch_ended(&mut self) -> ResumeToken {
        ResumeToken(self.pauses)
    }

    /// Resume unless the carousel was paused again since `token` was issued.
    pub fn resume(&mut self, token: ResumeToken) -> bool {
        if token.0 != self.pauses {
            return false;
        }
        self.paused = false;
        true
    }

    fn pause(&mut self) {
        self.paused = true;
        self.pauses += 1;
    }

    pub fn position(&self, index: usize) -> SlidePosition {
        let last = self.len - 1;
        let diff = index as i64 - self.current as i64;
        let (offset_percent, class) = if diff == 0 {
            (0, Some(SlideClass::Center))
        } else if diff == -1 || (self.current == 0 && index == last) {
            (-100, Some(SlideClass::Left))
        } else if diff == 1 || (self.current == last && index == 0) {
            (100, Some(SlideClass::Right))
        } else {
            (diff * 100, None)
        };
        SlidePosition {
            offset_percent,
            class,
        }
    }

    pub fn positions(&self) -> Vec<SlidePosition> {
        (0..self.len).map(|index| self.position(index)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_slides_wrap_after_the_last() {
        let mut carousel = Carousel::new(4).unwrap();
        assert_eq!(carousel.current(), 0);
        carousel.advance();
        carousel.advance();
        assert_eq!(carousel.advance(), 3);
        assert_eq!(carousel.advance(), 0);
    }

    #[test]
    fn empty_carousel_is_not_built() {
        assert!(Carousel::new(0).is_none());
    }

    #[test]
    fn neighbours_wrap_around() {
        let carousel = Carousel::new(4).unwrap();
        let positions = carousel.positions();
        assert_eq!(positions[0], SlidePosition { offset_percent: 0, class: Some(SlideClass::Center) });
        assert_eq!(positions[1], SlidePosition { offset_percent: 100, class: Some(SlideClass::Right) });
        assert_eq!(positions[2], SlidePosition { offset_percent: 200, class: None });
        assert_eq!(positions[3], SlidePosition { offset_percent: -100, class: Some(SlideClass::Left) });
        assert_eq!(positions[2].transform(), "translate3d(200%, 0px, 0px)");
    }

    #[test]
    fn last_slide_sees_first_on_the_right() {
        let mut carousel = Carousel::new(3).unwrap();
        carousel.advance();
        carousel.advance();
        assert_eq!(carousel.position(0).class, Some(SlideClass::Right));
        assert_eq!(carousel.position(1).class, Some(SlideClass::Left));
    }

    #[test]
    fn hover_pauses_timer_ticks() {
        let mut carousel = Carousel::new(3).unwrap();
        carousel.pointer_entered();
        assert_eq!(carousel.on_timer(), None);
        carousel.pointer_left();
        assert_eq!(carousel.on_timer(), Some(1));
    }

    #[test]
    fn stale_touch_resume_is_ignored() {
        let mut carousel = Carousel::new(3).unwrap();
        carousel.touch_started();
        let first = carousel.touch_ended();
        carousel.touch_started();
        let second = carousel.touch_ended();

        assert!(!carousel.resume(first));
        assert!(carousel.is_paused());
        assert!(carousel.resume(second));
        assert!(!carousel.is_paused());
    }
}
