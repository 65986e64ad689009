//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which wires a `wiremock` media host, an
//! in-memory cache store, and a full [`AppContext`]. The [`TestHarness::with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sg_cache::{CacheHandle, MemoryStore};
use sg_core::config::{Config, UpstreamConfig};
use sg_server::context::AppContext;
use sg_server::router::build_router;
use sg_upstream::MediaHostClient;

pub const CLOUD: &str = "demo";
pub const RESOURCES_PATH: &str = "/v1_1/demo/resources/image";

/// Test harness wrapping a fully-constructed [`AppContext`].
pub struct TestHarness {
    pub ctx: AppContext,
    pub store: Arc<MemoryStore>,
    pub media_host: MockServer,
}

impl TestHarness {
    /// Harness with a reachable in-memory cache.
    pub async fn new() -> Self {
        Self::build(true).await
    }

    /// Harness whose cache store is unreachable from the start.
    pub async fn without_cache() -> Self {
        Self::build(false).await
    }

    async fn build(cache_online: bool) -> Self {
        let media_host = MockServer::start().await;
        let config = config_for(&media_host);

        let store = Arc::new(MemoryStore::new());
        store.set_online(cache_online);
        let cache = CacheHandle::connect(store.clone()).await;

        let fetcher = Arc::new(MediaHostClient::new(&config.upstream));
        let ctx = AppContext::new(config, cache, fetcher);

        Self {
            ctx,
            store,
            media_host,
        }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::new().await.serve().await
    }

    /// Same as [`with_server`](Self::with_server) with the cache store down.
    pub async fn with_server_without_cache() -> (Self, SocketAddr) {
        Self::without_cache().await.serve().await
    }

    async fn serve(self) -> (Self, SocketAddr) {
        let app = build_router(self.ctx.clone(), None);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (self, addr)
    }

    /// Serve `count` resources from the mock media host, expecting exactly
    /// `expected_calls` listing requests.
    pub async fn mock_resources(&self, count: usize, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path(RESOURCES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(resources(count)))
            .expect(expected_calls)
            .mount(&self.media_host)
            .await;
    }

    /// Make the mock media host fail every listing request.
    pub async fn mock_failure(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path(RESOURCES_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream exploded"))
            .mount(&self.media_host)
            .await;
    }

    /// Number of requests the media host has received.
    pub async fn upstream_calls(&self) -> usize {
        self.media_host
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or(0)
    }
}

pub fn config_for(media_host: &MockServer) -> Config {
    let mut config = Config::default();
    config.upstream = UpstreamConfig {
        api_base_url: media_host.uri(),
        delivery_base_url: "https://res.example.com".into(),
        cloud_name: CLOUD.into(),
        api_key: "key".into(),
        api_secret: "secret".into(),
        timeout_secs: 5,
        ..UpstreamConfig::default()
    };
    config
}

pub fn resources(count: usize) -> serde_json::Value {
    let items: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "public_id": format!("gallery/photo_{i}"),
                "secure_url": format!("https://res.example.com/{CLOUD}/image/upload/v1/gallery/photo_{i}.jpg"),
                "format": "jpg",
                "width": 1600,
                "height": 1200
            })
        })
        .collect();
    json!({ "resources": items })
}
