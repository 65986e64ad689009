//! Media host response types and the mapping into gallery descriptors.

use serde::Deserialize;

use sg_core::ImageDescriptor;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Body of `GET /v1_1/{cloud}/resources/image`.
#[derive(Debug, Deserialize)]
pub struct ResourceList {
    pub resources: Vec<Resource>,
    /// Present when more pages exist; never followed.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A single uploaded asset as reported by the media host.
#[derive(Debug, Clone, Deserialize)]
pub struct Resource {
    pub public_id: String,
    pub secure_url: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// How delivery URLs for display renditions are built.
#[derive(Debug, Clone)]
pub struct DeliveryUrls {
    pub base_url: String,
    pub cloud_name: String,
    pub transform: String,
}

impl DeliveryUrls {
    /// `{base}/{cloud}/image/upload/{transform}/{public_id}[.{format}]`
    pub fn display_url(&self, resource: &Resource) -> String {
        let mut url = format!(
            "{}/{}/image/upload/",
            self.base_url.trim_end_matches('/'),
            self.cloud_name
        );
        let transform = self.transform.trim_matches('/');
        if !transform.is_empty() {
            url.push_str(transform);
            url.push('/');
        }
        url.push_str(&resource.public_id);
        if let Some(format) = resource.format.as_deref().filter(|f| !f.is_empty()) {
            url.push('.');
            url.push_str(format);
        }
        url
    }

    pub fn to_descriptor(&self, resource: &Resource) -> ImageDescriptor {
        ImageDescriptor {
            id: resource.public_id.clone(),
            display_url: self.display_url(resource),
            original_url: resource.secure_url.clone(),
            title: title_from_public_id(&resource.public_id),
        }
    }
}

/// Derive a readable title from the last path segment of a public id.
pub fn title_from_public_id(public_id: &str) -> String {
    let segment = public_id.rsplit('/').next().unwrap_or(public_id);
    let title = segment
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if title.is_empty() {
        public_id.to_string()
    } else {
        title
    }
}
