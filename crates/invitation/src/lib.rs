//! Personalized wedding invitation page.
//!
//! # Architecture
//!
//! - `core/` - Pure page logic (variant resolution, field binding, gallery
//!   indexing, viewer state, widget state machines). NO web_sys here.
//! - `dom` - Adapter traits the core reads the page through, plus an
//!   in-memory page for tests.
//! - `io/` - Browser bridge (DOM adapter, fetch, timers, PhotoSwipe and
//!   SweetAlert2 bindings, console logging). wasm32 only.

pub mod config;
pub mod core;
pub mod dom;
pub mod error;
#[cfg(target_arch = "wasm32")]
pub mod io;

pub use zoon;

pub use config::{ConfigSource, InvitationConfig, LoadedConfig};
pub use error::{InvitationError, Result};
