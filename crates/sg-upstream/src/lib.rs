//! sg-upstream: the upstream fetcher.
//!
//! Lists image resources from a Cloudinary-compatible media host and maps
//! them into display-ready [`sg_core::ImageDescriptor`]s. There is no retry;
//! any failure surfaces as [`sg_core::Error::Upstream`].

pub mod client;
pub mod types;

pub use client::MediaHostClient;
