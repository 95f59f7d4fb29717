//! Pure page logic. NO web_sys, closures or timers here; everything is
//! driven by the `io` layer or by tests.

pub mod binding;
pub mod data;
pub mod gallery;
pub mod init;
pub mod viewer;
pub mod widgets;

pub use binding::{FieldBinding, FieldPath};
pub use data::{BankAccount, SelectedVariant, Venue, WeddingDocument, WeddingVariant};
pub use gallery::{Gallery, GalleryImage, GalleryIndexer, IndexBinding};
pub use init::{InitGate, InitOutcome, Lifecycle};
pub use viewer::{Lightbox, ViewerController, ViewerOptions};
