//! Projection of the [`Store`] onto the [`Page`].
//!
//! [`render`] is pure: it maps the store to a [`Fragment`], which displays
//! as the HTML mounted in the page's `app` slot.  [`render_app`] mounts the
//! fragment and then refreshes the photo grid, and [`add_menu_tiles`] fills
//! the one-off menu and weather slots on load.

use serde_json::Value;

use crate::page::{Fragment, Page, Tile};
use crate::store::Store;

pub const TITLE: &str = "Mars Rover Dashboard";

/// Map the store to the `app` fragment.
pub fn render(state: &Store) -> Fragment {
    let Some(rover) = state.selected() else {
        return Fragment::Greeting;
    };

    // The date stamp lives beside the manifest, not in it, so it never
    // shows up as a row.
    let rows = state.manifest(rover).map(|entry| {
        entry
            .value
            .fields()
            .map(|(key, value)| (key.to_string(), display_value(value)))
            .collect()
    });

    Fragment::Details {
        rover: rover.to_string(),
        rows,
    }
}

/// Mount the fragment, then repopulate the photo grid when a rover is
/// selected.  Missing photos leave the grid empty.
pub fn render_app(page: &mut Page, state: &Store) {
    page.title = TITLE.to_string();
    page.app = render(state);

    if let Some(rover) = state.selected() {
        page.img_grid = photo_tiles(state, rover);
    }
}

/// Populate the menu grid and the weather widget.  Called once on load.
pub fn add_menu_tiles(page: &mut Page, state: &Store) {
    page.menu_grid.extend(
        state
            .menu_entries()
            .map(|(name, image)| Tile::menu(name, image)),
    );
    page.weather = Some(state.weather.clone());
}

fn photo_tiles(state: &Store, rover: &str) -> Vec<Tile> {
    state
        .photos(rover)
        .map(|entry| {
            entry
                .value
                .iter()
                .map(|photo| Tile::image(photo.tile_label(), &photo.img_src))
                .collect()
        })
        .unwrap_or_default()
}

/// Strings print bare, everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
