//! sg-core: shared errors, configuration, and the gallery data model.
//!
//! This crate is the foundational dependency for all other sg-* crates,
//! providing the unified error type, application configuration, the
//! [`GallerySnapshot`] entity, and the [`SnapshotFetcher`] seam between the
//! cache gate and the upstream client.

pub mod config;
pub mod error;
pub mod gallery;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use gallery::*;
