//! Rover data loading.
//!
//! Walks the store's rovers in menu order and, for each one whose manifest
//! is missing or was fetched on an earlier day, fetches the manifest and
//! then (if the photo cache is also stale) the photos for the manifest's
//! `max_sol`.  Everything is awaited in sequence: one rover at a time,
//! manifest before photos.  This keeps the order in which the store is
//! populated deterministic.
//!
//! Failures are logged and otherwise ignored.  The affected cache entry
//! stays absent or stale and the page simply shows less.

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use crate::app::App;
use crate::source::RoverSource;
use crate::store::{self, Stamped, StoreUpdate};

/// What one pass of [`Sequencer::load_all`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub manifests: usize,
    pub photo_batches: usize,
    pub failures: usize,
}

impl LoadReport {
    pub fn is_noop(&self) -> bool {
        self.manifests == 0 && self.photo_batches == 0 && self.failures == 0
    }

    /// Status-bar text.  Details of failures are in the log.
    pub fn summary(&self) -> String {
        if self.is_noop() {
            return "No new rover data".to_string();
        }
        let mut text = format!(
            "Fetched {} manifests, {} photo batches",
            self.manifests, self.photo_batches
        );
        if self.failures > 0 {
            text.push_str(&format!(" ({} failed, see log)", self.failures));
        }
        text
    }
}

pub struct Sequencer<S> {
    source: S,
    clock: fn() -> NaiveDate,
}

impl<S: RoverSource> Sequencer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            clock: store::today,
        }
    }

    /// Replace the calendar used for freshness checks.
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    #[cfg(test)]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Bring every rover's manifest (and, through it, photos) up to date.
    pub async fn load_all(&self, app: &mut App) -> LoadReport {
        let today = (self.clock)();
        let mut report = LoadReport::default();
        let rovers = app.store.rover_names().to_vec();

        for rover in &rovers {
            if app.store.is_manifest_stale(rover, today) {
                self.load_manifest(app, rover, today, &mut report).await;
            } else {
                debug!(%rover, "manifest is fresh, skipping");
            }
        }

        info!(source = self.source.name(), ?report, "rover data load finished");
        report
    }

    /// Fetch and store one manifest, then fetch photos if they are stale.
    pub async fn load_manifest(
        &self,
        app: &mut App,
        rover: &str,
        today: NaiveDate,
        report: &mut LoadReport,
    ) {
        let manifest = match self.source.fetch_manifest(rover).await {
            Ok(manifest) => manifest,
            Err(e) => {
                error!(%rover, error = %e, "manifest fetch failed");
                report.failures += 1;
                return;
            }
        };

        let max_sol = manifest.max_sol();
        app.update(
            StoreUpdate::Manifest {
                rover: rover.to_string(),
                manifest: Stamped::new(manifest, today),
            },
            false,
        );
        report.manifests += 1;

        if !app.store.is_photos_stale(rover, today) {
            return;
        }
        match max_sol {
            Some(sol) => self.load_photos(app, rover, sol, today, report).await,
            None => warn!(%rover, "manifest has no max_sol, cannot request photos"),
        }
    }

    /// Fetch and store the photo batch for `sol`.
    pub async fn load_photos(
        &self,
        app: &mut App,
        rover: &str,
        sol: u64,
        today: NaiveDate,
        report: &mut LoadReport,
    ) {
        match self.source.fetch_photos(rover, sol).await {
            Ok(photos) => {
                app.update(
                    StoreUpdate::Photos {
                        rover: rover.to_string(),
                        photos: Stamped::new(photos, today),
                    },
                    false,
                );
                report.photo_batches += 1;
            }
            Err(e) => {
                error!(%rover, sol, error = %e, "photo fetch failed");
                report.failures += 1;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
