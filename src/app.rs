use ratatui::widgets::ListState;
use tracing::info;

use crate::page::{Page, TileAction};
use crate::render::{add_menu_tiles, render_app};
use crate::store::{Store, StoreUpdate};

/// Which tile grid keyboard navigation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Menu,
    Photos,
}

pub struct App {
    /// Rover data and selection.
    pub store: Store,
    /// What the renderer last produced.
    pub page: Page,
    pub focus: Pane,
    pub menu_state: ListState,
    pub photo_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Whether the user asked for an immediate data reload.
    pub reload_requested: bool,
    /// Last load status message.
    pub status: String,
}

impl App {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            page: Page::default(),
            focus: Pane::Menu,
            menu_state: ListState::default(),
            photo_state: ListState::default(),
            quit: false,
            reload_requested: false,
            status: "Starting…".into(),
        }
    }

    /// First paint after the initial data load: the app slot, then the
    /// menu and weather widget.
    pub fn mount(&mut self) {
        render_app(&mut self.page, &self.store);
        add_menu_tiles(&mut self.page, &self.store);
        if !self.page.menu_grid.is_empty() {
            self.menu_state.select(Some(0));
        }
    }

    /// The single store mutation point.  With `render` the page is
    /// re-rendered from the updated store before returning.
    pub fn update(&mut self, change: StoreUpdate, render: bool) {
        if render {
            info!(?change, "store update");
        }
        self.store.apply(change);
        if render {
            self.render();
        }
    }

    /// Re-render the page from the current store.
    pub fn render(&mut self) {
        render_app(&mut self.page, &self.store);
        self.clamp_photo_selection();
    }

    /// Click the focused tile.  Menu tiles select their rover; photo tiles
    /// return the image URL for the caller to open.
    pub fn activate(&mut self) -> Option<String> {
        let tile = match self.focus {
            Pane::Menu => self.page.menu_grid.get(self.menu_state.selected()?),
            Pane::Photos => self.page.img_grid.get(self.photo_state.selected()?),
        }?;

        match tile.action.clone() {
            TileAction::SelectRover(name) => {
                self.update(StoreUpdate::SelectRover(name), true);
                None
            }
            TileAction::OpenImage(url) => Some(url),
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Pane::Menu if !self.page.img_grid.is_empty() => {
                if self.photo_state.selected().is_none() {
                    self.photo_state.select(Some(0));
                }
                Pane::Photos
            }
            _ => Pane::Menu,
        };
    }

    fn clamp_photo_selection(&mut self) {
        let len = self.page.img_grid.len();
        match self.photo_state.selected() {
            _ if len == 0 => {
                self.photo_state.select(None);
                self.focus = Pane::Menu;
            }
            Some(i) if i >= len => self.photo_state.select(Some(len - 1)),
            _ => {}
        }
    }

    fn focused(&mut self) -> (&mut ListState, usize) {
        match self.focus {
            Pane::Menu => (&mut self.menu_state, self.page.menu_grid.len()),
            Pane::Photos => (&mut self.photo_state, self.page.img_grid.len()),
        }
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        let (state, len) = self.focused();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        let (state, len) = self.focused();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        let (state, len) = self.focused();
        if len > 0 {
            state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let (state, len) = self.focused();
        if len > 0 {
            state.select(Some(len - 1));
        }
    }
}
