//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! server, upstream media host, and cache sections. Every section defaults
//! sensibly so a completely empty `{}` file is valid. Environment variables
//! are layered on top with [`Config::apply_env`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::gallery::MAX_GALLERY_IMAGES;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Load configuration strictly: a missing or unparsable file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Override fields from process environment variables.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Override fields using `lookup` as the variable source.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SNAPGRID_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SNAPGRID_PORT").or_else(|| lookup("PORT")) {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!("Ignoring invalid port from environment: {port}"),
            }
        }

        if let Some(name) = lookup("CLOUDINARY_CLOUD_NAME") {
            self.upstream.cloud_name = name;
        }
        if let Some(key) = lookup("CLOUDINARY_API_KEY") {
            self.upstream.api_key = key;
        }
        if let Some(secret) = lookup("CLOUDINARY_API_SECRET") {
            self.upstream.api_secret = secret;
        }

        if let Some(url) = lookup("REDIS_URL") {
            self.cache.url = url;
        }
        if let Some(backend) = lookup("SNAPGRID_CACHE_BACKEND") {
            match backend.parse() {
                Ok(b) => self.cache.backend = b,
                Err(e) => tracing::warn!("Ignoring SNAPGRID_CACHE_BACKEND: {e}"),
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.upstream.cloud_name.is_empty() {
            warnings.push("upstream.cloud_name is empty; gallery fetches will fail".into());
        }
        if self.upstream.api_key.is_empty() || self.upstream.api_secret.is_empty() {
            warnings.push("upstream.api_key or upstream.api_secret is empty".into());
        }
        if self.upstream.max_results == 0 || self.upstream.max_results > MAX_GALLERY_IMAGES {
            warnings.push(format!(
                "upstream.max_results {} is outside 1..={MAX_GALLERY_IMAGES}; it will be clamped",
                self.upstream.max_results
            ));
        }

        if self.cache.backend == CacheBackend::Redis && self.cache.url.is_empty() {
            warnings.push("cache.backend is redis but cache.url is empty".into());
        }
        if self.cache.probe_interval_secs == 0 {
            warnings.push(
                "cache.probe_interval_secs is 0; cache reconnection probing is disabled".into(),
            );
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the built grid UI; served with SPA fallback.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            static_dir: None,
        }
    }
}

/// Media host (Cloudinary-compatible Admin API) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub api_base_url: String,
    pub delivery_base_url: String,
    pub cloud_name: String,
    pub api_key: String,
    #[serde(skip_serializing)]
    pub api_secret: String,
    /// Restrict listing to public ids starting with this folder prefix.
    pub prefix: Option<String>,
    pub max_results: usize,
    /// Transformation segment inserted into display URLs.
    pub display_transform: String,
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.cloudinary.com".into(),
            delivery_base_url: "https://res.cloudinary.com".into(),
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            prefix: None,
            max_results: MAX_GALLERY_IMAGES,
            display_transform: "c_fill,w_400,h_300,q_auto,f_auto".into(),
            timeout_secs: 10,
        }
    }
}

/// Which cache store backs the gallery cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Redis,
    Memory,
    None,
}

impl std::str::FromStr for CacheBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            "none" | "off" | "disabled" => Ok(Self::None),
            other => Err(Error::Validation(format!("unknown cache backend '{other}'"))),
        }
    }
}

/// Cache store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub url: String,
    /// Upper bound on a single store round-trip.
    pub op_timeout_ms: u64,
    /// Interval between liveness probes; 0 disables probing.
    pub probe_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Redis,
            url: "redis://127.0.0.1:6379".into(),
            op_timeout_ms: 2000,
            probe_interval_secs: 15,
        }
    }
}
