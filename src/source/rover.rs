//! The rover data types shared by the proxy client, the store and the
//! renderer.
//!
//! Upstream manifests carry a lot of mission metadata whose exact shape
//! varies per rover, so [`Manifest`] keeps the JSON object as-is (in its
//! original field order) rather than mapping it onto a fixed struct.
//! Photos are only ever used for four fields, so [`Photo`] is typed.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field dropped from every manifest before it is stored.
const PHOTOS_FIELD: &str = "photos";

/// A rover's mission manifest, minus the per-sol `photos` listing.
///
/// Field order is whatever the upstream object used; the details table is
/// rendered in that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(Map<String, Value>);

impl Manifest {
    /// Build a manifest from a JSON payload.
    ///
    /// Fails on anything that is not a JSON object. A `photos` field is
    /// removed if present.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self(
                fields
                    .into_iter()
                    .filter(|(key, _)| key != PHOTOS_FIELD)
                    .collect(),
            )),
            other => Err(anyhow!("manifest is not a JSON object: {other}")),
        }
    }

    /// The most recent sol with photos, used to request the photo batch.
    pub fn max_sol(&self) -> Option<u64> {
        self.0.get("max_sol").and_then(Value::as_u64)
    }

    /// Iterate fields in their original order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
impl Manifest {
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    pub full_name: String,
}

/// A single rover photo.  Unknown upstream fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: u64,
    pub camera: Camera,
    pub earth_date: String,
    pub img_src: String,
}

impl Photo {
    /// Caption used for the photo tile: `"{id}-{camera}-{earth_date}"`.
    pub fn tile_label(&self) -> String {
        format!("{}-{}-{}", self.id, self.camera.full_name, self.earth_date)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
