//! Browser bridge: everything that touches `web_sys` or JS globals.
//!
//! Component state lives in the pure `core`; modules here only read the
//! page, forward events to that state and write its decisions back.

pub mod console;
pub mod dom;
pub mod fetch;
pub mod lightbox;
pub mod page;
pub mod popup;
pub mod timers;
pub mod widgets;

pub use page::start;
