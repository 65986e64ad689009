//! Gallery data model.
//!
//! A [`GallerySnapshot`] is the single cached entity: an ordered, immutable
//! list of at most [`MAX_GALLERY_IMAGES`] image descriptors. Snapshots are
//! replaced wholesale on refresh, never edited in place.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Upper bound on the number of images in a snapshot.
pub const MAX_GALLERY_IMAGES: usize = 20;

/// Cache key under which the gallery snapshot is stored.
pub const GALLERY_CACHE_KEY: &str = "gallery:images";

/// Expiry applied when the gallery snapshot is written to the cache.
pub const GALLERY_CACHE_TTL: Duration = Duration::from_secs(3600);

/// A display-ready image record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ImageDescriptor {
    /// Upstream identifier.
    pub id: String,
    /// URL of a display-sized rendition.
    pub display_url: String,
    /// URL of the original asset.
    pub original_url: String,
    /// Human readable title.
    pub title: String,
}

/// Ordered, immutable sequence of image descriptors.
///
/// Serializes as a bare JSON array so the cached value and the API `data`
/// field share one representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GallerySnapshot {
    images: Vec<ImageDescriptor>,
}

impl GallerySnapshot {
    /// Build a snapshot, keeping at most [`MAX_GALLERY_IMAGES`] entries in
    /// their original order.
    pub fn new(mut images: Vec<ImageDescriptor>) -> Self {
        images.truncate(MAX_GALLERY_IMAGES);
        Self { images }
    }

    pub fn images(&self) -> &[ImageDescriptor] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageDescriptor> {
        self.images.iter()
    }

    /// Encode as the JSON string stored in the cache.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a cached JSON string. Oversized arrays are truncated.
    pub fn from_json(json: &str) -> Result<Self> {
        let images: Vec<ImageDescriptor> = serde_json::from_str(json)?;
        Ok(Self::new(images))
    }
}

impl<'a> IntoIterator for &'a GallerySnapshot {
    type Item = &'a ImageDescriptor;
    type IntoIter = std::slice::Iter<'a, ImageDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}

/// Source of fresh gallery snapshots.
///
/// Implemented by the media host client; the cache gate only sees this trait.
#[async_trait::async_trait]
pub trait SnapshotFetcher: Send + Sync {
    /// Fetch a fresh snapshot. Failures surface as [`crate::Error::Upstream`].
    async fn fetch_snapshot(&self) -> Result<GallerySnapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(n: usize) -> ImageDescriptor {
        ImageDescriptor {
            id: format!("gallery/photo_{n}"),
            display_url: format!("https://cdn.example.com/w_400/photo_{n}.jpg"),
            original_url: format!("https://cdn.example.com/photo_{n}.jpg"),
            title: format!("photo {n}"),
        }
    }

    #[test]
    fn new_truncates_to_max() {
        let images: Vec<_> = (0..25).map(descriptor).collect();
        let snapshot = GallerySnapshot::new(images);
        assert_eq!(snapshot.len(), MAX_GALLERY_IMAGES);
        assert_eq!(snapshot.images()[0].id, "gallery/photo_0");
        assert_eq!(snapshot.images()[19].id, "gallery/photo_19");
    }

    #[test]
    fn json_round_trip_preserves_fields() {
        let snapshot = GallerySnapshot::new((0..3).map(descriptor).collect());
        let json = snapshot.to_json().unwrap();
        let decoded = GallerySnapshot::from_json(&json).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn serializes_as_bare_array() {
        let snapshot = GallerySnapshot::new(vec![descriptor(1)]);
        let value = serde_json::to_value(&snapshot).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["display_url"], "https://cdn.example.com/w_400/photo_1.jpg");
        assert_eq!(value[0]["original_url"], "https://cdn.example.com/photo_1.jpg");
    }

    #[test]
    fn from_json_rejects_malformed() {
        assert!(GallerySnapshot::from_json("{\"not\": \"an array\"}").is_err());
        assert!(GallerySnapshot::from_json("[{\"id\": \"x\"}]").is_err());
    }

    #[test]
    fn empty_snapshot() {
        let snapshot = GallerySnapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.to_json().unwrap(), "[]");
    }
}
