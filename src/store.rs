//! In-memory rover data store.
//!
//! Holds the menu configuration (rover names and their thumbnails), the
//! current selection, and a per-rover cache of the manifest and the latest
//! photo batch.  Cache entries carry the calendar day they were fetched on;
//! an entry is valid until the end of that day and is never invalidated
//! explicitly, only overwritten by a newer fetch.
//!
//! All mutation goes through [`Store::apply`], which [`crate::app::App`]
//! wraps with the optional re-render.

use std::collections::HashMap;

use chrono::{Local, NaiveDate};

use crate::page::WeatherEmbed;
use crate::source::{Manifest, Photo};

/// Menu thumbnails (Wikimedia Commons).
const DEFAULT_ROVERS: [(&str, &str); 3] = [
    (
        "Curiosity",
        "https://upload.wikimedia.org/wikipedia/commons/thumb/2/21/NASA%27s_Curiousity_Mars_Rover.jpg/256px-NASA%27s_Curiousity_Mars_Rover.jpg",
    ),
    (
        "Opportunity",
        "https://upload.wikimedia.org/wikipedia/commons/thumb/d/d8/NASA_Mars_Rover.jpg/256px-NASA_Mars_Rover.jpg",
    ),
    (
        "Spirit",
        "https://upload.wikimedia.org/wikipedia/commons/4/46/Spirit-dettagli.jpg",
    ),
];

/// Today's date on the local calendar; the cache validity boundary.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A cached value together with the day it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<T> {
    pub value: T,
    pub date_stamp: NaiveDate,
}

impl<T> Stamped<T> {
    pub fn new(value: T, date_stamp: NaiveDate) -> Self {
        Self { value, date_stamp }
    }

    pub fn is_fresh(&self, today: NaiveDate) -> bool {
        self.date_stamp == today
    }
}

/// Absent entries are stale, as are entries stamped on any other day.
fn is_stale<T>(entry: Option<&Stamped<T>>, today: NaiveDate) -> bool {
    !matches!(entry, Some(e) if e.is_fresh(today))
}

/// Both caches for one rover.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoverCache {
    pub manifest: Option<Stamped<Manifest>>,
    pub photos: Option<Stamped<Vec<Photo>>>,
}

/// A single change to the store.  Each variant overwrites, never merges.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreUpdate {
    /// Select a rover by name (menu click).
    SelectRover(String),
    /// Go back to the greeting.
    ClearSelection,
    Manifest {
        rover: String,
        manifest: Stamped<Manifest>,
    },
    Photos {
        rover: String,
        photos: Stamped<Vec<Photo>>,
    },
}

#[derive(Debug, Clone)]
pub struct Store {
    /// Known rovers, in menu order.
    rover_names: Vec<String>,
    /// Menu thumbnails, positionally aligned with `rover_names`.
    rover_images: Vec<String>,
    /// Currently selected rover; `None` shows the greeting.
    rover_name: Option<String>,
    rovers: HashMap<String, RoverCache>,
    pub weather: WeatherEmbed,
}

impl Default for Store {
    fn default() -> Self {
        Self::with_rovers(
            DEFAULT_ROVERS
                .iter()
                .map(|(name, img)| (name.to_string(), img.to_string())),
        )
    }
}

impl Store {
    /// Build a store from `(name, thumbnail)` pairs, so names and images
    /// cannot drift out of alignment.
    pub fn with_rovers(rovers: impl IntoIterator<Item = (String, String)>) -> Self {
        let (rover_names, rover_images) = rovers.into_iter().unzip();
        Self {
            rover_names,
            rover_images,
            rover_name: None,
            rovers: HashMap::new(),
            weather: WeatherEmbed::default(),
        }
    }

    pub fn rover_names(&self) -> &[String] {
        &self.rover_names
    }

    #[cfg(test)]
    pub fn rover_images(&self) -> &[String] {
        &self.rover_images
    }

    /// `(name, thumbnail)` pairs in menu order.
    pub fn menu_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rover_names
            .iter()
            .zip(&self.rover_images)
            .map(|(n, i)| (n.as_str(), i.as_str()))
    }

    pub fn selected(&self) -> Option<&str> {
        self.rover_name.as_deref()
    }

    pub fn manifest(&self, rover: &str) -> Option<&Stamped<Manifest>> {
        self.rovers.get(rover)?.manifest.as_ref()
    }

    pub fn photos(&self, rover: &str) -> Option<&Stamped<Vec<Photo>>> {
        self.rovers.get(rover)?.photos.as_ref()
    }

    pub fn is_manifest_stale(&self, rover: &str, today: NaiveDate) -> bool {
        is_stale(self.manifest(rover), today)
    }

    pub fn is_photos_stale(&self, rover: &str, today: NaiveDate) -> bool {
        is_stale(self.photos(rover), today)
    }

    /// Apply one change.
    pub fn apply(&mut self, change: StoreUpdate) {
        match change {
            StoreUpdate::SelectRover(name) => self.rover_name = Some(name),
            StoreUpdate::ClearSelection => self.rover_name = None,
            StoreUpdate::Manifest { rover, manifest } => {
                self.rovers.entry(rover).or_default().manifest = Some(manifest);
            }
            StoreUpdate::Photos { rover, photos } => {
                self.rovers.entry(rover).or_default().photos = Some(photos);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
