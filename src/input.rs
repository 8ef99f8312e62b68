//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  `Enter` is the tile
//! "click"; anything that needs the outside world (opening a browser,
//! reloading data) is returned to the event loop instead of done here.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;
use crate::store::StoreUpdate;

/// Side effects requested by a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open this image URL in a browser.
    Open(String),
}

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
        KeyCode::Char('r') => app.reload_requested = true,
        KeyCode::Backspace => app.update(StoreUpdate::ClearSelection, true),
        KeyCode::Enter => return app.activate().map(Command::Open),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Pane;
    use crate::source::rover::Camera;
    use crate::source::Photo;
    use crate::page::Fragment;
    use crate::store::{Stamped, Store};
    use chrono::NaiveDate;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mounted_app() -> App {
        let mut app = App::new(Store::default());
        app.update(
            StoreUpdate::Photos {
                rover: "Curiosity".into(),
                photos: Stamped::new(
                    vec![Photo {
                        id: 7,
                        camera: Camera {
                            full_name: "Mast Camera".into(),
                        },
                        earth_date: "2024-01-01".into(),
                        img_src: "http://img/7.jpg".into(),
                    }],
                    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                ),
            },
            false,
        );
        app.mount();
        app
    }

    #[test]
    fn q_and_esc_quit() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut app = mounted_app();
            handle_key_event(&mut app, press(code));
            assert!(app.quit);
        }
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = mounted_app();
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        key.state = KeyEventState::NONE;
        handle_key_event(&mut app, key);
        assert!(!app.quit);
    }

    #[test]
    fn arrows_move_menu_selection() {
        let mut app = mounted_app();
        handle_key_event(&mut app, press(KeyCode::Down));
        handle_key_event(&mut app, press(KeyCode::Down));
        assert_eq!(app.menu_state.selected(), Some(2));

        handle_key_event(&mut app, press(KeyCode::Char('k')));
        assert_eq!(app.menu_state.selected(), Some(1));
    }

    #[test]
    fn enter_selects_rover_then_opens_photo() {
        let mut app = mounted_app();

        assert_eq!(handle_key_event(&mut app, press(KeyCode::Enter)), None);
        assert_eq!(app.store.selected(), Some("Curiosity"));

        handle_key_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.focus, Pane::Photos);
        assert_eq!(
            handle_key_event(&mut app, press(KeyCode::Enter)),
            Some(Command::Open("http://img/7.jpg".into()))
        );
    }

    #[test]
    fn r_requests_reload() {
        let mut app = mounted_app();
        handle_key_event(&mut app, press(KeyCode::Char('r')));
        assert!(app.reload_requested);
    }

    #[test]
    fn backspace_returns_to_greeting() {
        let mut app = mounted_app();
        handle_key_event(&mut app, press(KeyCode::Enter));
        assert!(matches!(app.page.app, Fragment::Details { .. }));

        handle_key_event(&mut app, press(KeyCode::Backspace));
        assert!(app.store.selected().is_none());
        assert_eq!(app.page.app, Fragment::Greeting);
    }
}
