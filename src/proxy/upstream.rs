//! Client for the upstream Mars photo API.
//!
//! Adds the server-held API key to every request and trims responses down
//! to what the dashboard uses.  URLs are logged without the key.

use anyhow::Context;
use reqwest::Url;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ProxyError;

/// How many photos a `/rover-photos` response carries at most.
pub const PHOTO_WINDOW: usize = 9;

/// The last `n` photos, in their original order.
pub fn last_photos(mut photos: Vec<Value>, n: usize) -> Vec<Value> {
    let start = photos.len().saturating_sub(n);
    photos.split_off(start)
}

pub struct Upstream {
    client: reqwest::Client,
    base: Url,
    api_key: String,
}

impl Upstream {
    pub fn new(base: &str, api_key: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            base: Url::parse(base).with_context(|| format!("invalid upstream base URL {base:?}"))?,
            api_key: api_key.into(),
        })
    }

    /// `base` plus the given path segments, each percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, ProxyError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ProxyError::MalformedUpstream(format!("unusable base URL {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json(&self, url: Url, query: &[(&str, &str)]) -> Result<Value, ProxyError> {
        debug!(%url, ?query, "upstream request");
        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::UpstreamStatus(status));
        }
        Ok(response.json().await?)
    }

    /// The `photo_manifest` object for `rover`, verbatim.
    pub async fn manifest(&self, rover: &str) -> Result<Value, ProxyError> {
        let url = self.url(&["mars-photos", "api", "v1", "manifests", rover])?;
        let mut body = self.get_json(url, &[]).await?;
        match body.get_mut("photo_manifest").map(Value::take) {
            Some(manifest @ Value::Object(_)) => Ok(manifest),
            _ => Err(ProxyError::MalformedUpstream(
                "response has no photo_manifest object".into(),
            )),
        }
    }

    /// The last [`PHOTO_WINDOW`] photos `rover` took on `sol`.
    ///
    /// `sol` is passed through untouched; the upstream API validates it.
    pub async fn photos(&self, rover: &str, sol: Option<&str>) -> Result<Vec<Value>, ProxyError> {
        let url = self.url(&["mars-photos", "api", "v1", "rovers", rover, "photos"])?;
        let query: Vec<(&str, &str)> = sol.map(|s| ("sol", s)).into_iter().collect();
        let mut body = self.get_json(url, &query).await?;
        match body.get_mut("photos").map(Value::take) {
            Some(Value::Array(photos)) => Ok(last_photos(photos, PHOTO_WINDOW)),
            _ => Err(ProxyError::MalformedUpstream(
                "response has no photos array".into(),
            )),
        }
    }

    /// Astronomy picture of the day, wrapped as `{ "image": ... }`.
    pub async fn apod(&self) -> Result<Value, ProxyError> {
        let url = self.url(&["planetary", "apod"])?;
        let image = self.get_json(url, &[]).await?;
        Ok(json!({ "image": image }))
    }
}
