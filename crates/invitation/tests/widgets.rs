//! Countdown and carousel behavior.

use invitation::core::widgets::carousel::{Carousel, SlideClass};
use invitation::core::widgets::countdown::{Countdown, Remaining};

const TARGET_MS: i64 = 1_766_912_400_000;

#[test]
fn countdown_shows_days_hours_minutes_seconds() {
    let countdown = Countdown::new(TARGET_MS);
    let remaining = countdown.tick(TARGET_MS - 90_125_000);
    assert_eq!(
        remaining,
        Remaining {
            days: 1,
            hours: 1,
            minutes: 2,
            seconds: 5
        }
    );
    assert_eq!(remaining.labels(), ["1", "01", "02", "05"].map(str::to_string));
}

#[test]
fn countdown_is_zero_from_the_target_on() {
    let countdown = Countdown::new(TARGET_MS);
    for now in [TARGET_MS, TARGET_MS + 1, TARGET_MS + 86_400_000] {
        let remaining = countdown.tick(now);
        assert_eq!(remaining, Remaining::ZERO);
        assert_eq!(remaining.labels(), ["0", "0", "0", "0"].map(str::to_string));
    }
}

#[test]
fn carousel_advances_and_wraps() {
    let mut carousel = Carousel::new(4).unwrap();
    for _ in 0..3 {
        carousel.advance();
    }
    assert_eq!(carousel.current(), 3);
    assert_eq!(carousel.advance(), 0);
}

#[test]
fn carousel_neighbours_wrap_around() {
    let mut carousel = Carousel::new(4).unwrap();
    carousel.advance();
    carousel.advance();
    carousel.advance();
    let classes: Vec<_> = carousel.positions().iter().map(|p| p.class).collect();
    assert_eq!(
        classes,
        vec![
            Some(SlideClass::Right),
            None,
            Some(SlideClass::Left),
            Some(SlideClass::Center),
        ]
    );
}

#[test]
fn touch_pauses_until_the_latest_resume() {
    let mut carousel = Carousel::new(3).unwrap();
    carousel.touch_started();
    let stale = carousel.touch_ended();
    carousel.touch_started();
    let fresh = carousel.touch_ended();

    assert_eq!(carousel.on_timer(), None);
    assert!(!carousel.resume(stale));
    assert!(carousel.is_paused());
    assert!(carousel.resume(fresh));
    assert_eq!(carousel.on_timer(), Some(1));
}
