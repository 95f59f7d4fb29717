//! Peripheral widgets: small state machines driven by timers and clicks.

pub mod audio;
pub mod carousel;
pub mod countdown;
pub mod envelope;
pub mod payment;
pub mod reveal;
