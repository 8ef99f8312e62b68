//! Data source backed by the rover proxy server.
//!
//! The dashboard never talks to the upstream photo API directly; it calls
//! the proxy's two read-only endpoints, which add the API key server-side.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{Manifest, Photo, RoverSource};

/// A [`RoverSource`] that fetches from a running proxy over HTTP.
pub struct ProxySource {
    /// Proxy base URL without a trailing slash, e.g. `http://localhost:3000`.
    pub base_url: String,
    client: reqwest::Client,
}

impl ProxySource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn manifest_url(&self, rover: &str) -> String {
        format!("{}/rover-manifest/{rover}", self.base_url)
    }

    pub fn photos_url(&self, rover: &str, sol: u64) -> String {
        format!("{}/rover-photos/{rover}?sol={sol}", self.base_url)
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let value = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("decoding body of {url}"))?;
        Ok(value)
    }
}

#[async_trait]
impl RoverSource for ProxySource {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn fetch_manifest(&self, rover: &str) -> Result<Manifest> {
        let url = self.manifest_url(rover);
        debug!(%url, "fetching rover manifest");
        Manifest::from_json(self.get_json(&url).await?)
    }

    async fn fetch_photos(&self, rover: &str, sol: u64) -> Result<Vec<Photo>> {
        let url = self.photos_url(rover, sol);
        debug!(%url, "fetching rover photos");
        let photos = serde_json::from_value(self.get_json(&url).await?)
            .with_context(|| format!("photo list from {url}"))?;
        Ok(photos)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
