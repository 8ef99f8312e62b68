//! Rover data source abstraction.
//!
//! This module defines the [`RoverSource`] trait together with the
//! [`Manifest`] and [`Photo`] types it returns.  The dashboard talks to the
//! proxy through [`ProxySource`]; tests substitute an in-memory source.
//!
//! ## For contributors
//!
//! A source only has to answer two questions: "what is this rover's
//! manifest?" and "which photos were taken on this sol?".  Freshness,
//! ordering and error handling live in [`crate::sequencer`], so an
//! implementation should just do its I/O and return parsed values.

mod proxy;
pub(crate) mod rover;

pub use proxy::ProxySource;
pub use rover::{Manifest, Photo};

use anyhow::Result;
use async_trait::async_trait;

/// Trait that every rover data source must implement.
#[async_trait]
pub trait RoverSource: Send + Sync {
    /// Human-readable label used in logs.
    fn name(&self) -> &str;

    /// Fetch the mission manifest for `rover`.
    ///
    /// The returned manifest never carries a `photos` field.
    async fn fetch_manifest(&self, rover: &str) -> Result<Manifest>;

    /// Fetch the photo batch `rover` took on `sol`.
    async fn fetch_photos(&self, rover: &str, sol: u64) -> Result<Vec<Photo>>;
}
