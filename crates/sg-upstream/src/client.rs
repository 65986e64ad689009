//! Media host API client.
//!
//! Speaks the Cloudinary Admin API resource listing endpoint and implements
//! [`SnapshotFetcher`] so the cache gate can call it on a miss.

use std::time::Duration;

use reqwest::Client;

use sg_core::config::UpstreamConfig;
use sg_core::{Error, GallerySnapshot, SnapshotFetcher, MAX_GALLERY_IMAGES};

use crate::types::{DeliveryUrls, ResourceList};

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct MediaHostClient {
    http: Client,
    api_base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    prefix: Option<String>,
    max_results: usize,
    urls: DeliveryUrls,
}

impl MediaHostClient {
    pub fn new(config: &UpstreamConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {e}");
                Client::new()
            });

        Self {
            http,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            prefix: config.prefix.clone().filter(|p| !p.is_empty()),
            max_results: config.max_results.clamp(1, MAX_GALLERY_IMAGES),
            urls: DeliveryUrls {
                base_url: config.delivery_base_url.clone(),
                cloud_name: config.cloud_name.clone(),
                transform: config.display_transform.clone(),
            },
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1_1/{}{}", self.api_base_url, self.cloud_name, path)
    }

    /// List uploaded image resources, at most `max_results` of them.
    pub async fn list_resources(&self) -> sg_core::Result<ResourceList> {
        let max_results = self.max_results.to_string();
        let mut params: Vec<(&str, &str)> =
            vec![("max_results", max_results.as_str()), ("type", "upload")];
        if let Some(ref prefix) = self.prefix {
            params.push(("prefix", prefix.as_str()));
        }

        let resp = self
            .http
            .get(self.url("/resources/image"))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::upstream(format!("media host request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::upstream(format!("media host {status}: {body}")));
        }

        resp.json::<ResourceList>()
            .await
            .map_err(|e| Error::upstream(format!("media host parse error: {e}")))
    }

    /// Fetch and map a fresh gallery snapshot.
    pub async fn fetch(&self) -> sg_core::Result<GallerySnapshot> {
        let list = self.list_resources().await?;
        let images = list
            .resources
            .iter()
            .take(MAX_GALLERY_IMAGES)
            .map(|r| self.urls.to_descriptor(r))
            .collect();
        let snapshot = GallerySnapshot::new(images);
        tracing::debug!(count = snapshot.len(), "Fetched gallery from media host");
        Ok(snapshot)
    }
}

#[async_trait::async_trait]
impl SnapshotFetcher for MediaHostClient {
    async fn fetch_snapshot(&self) -> sg_core::Result<GallerySnapshot> {
        self.fetch().await
    }
}
