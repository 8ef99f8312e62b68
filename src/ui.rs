//! Terminal UI rendering.
//!
//! Draws the [`Page`](crate::page::Page) held by [`App`]: the rover menu on
//! the left, the app slot (greeting or rover details table) and the photo
//! tiles on the right, the weather widget and a status bar at the bottom.
//! Nothing here touches the store; the page is already rendered.
//!
//! ## For contributors
//!
//! * The layout is a title row, a two-column body, a weather row and a
//!   one-line status bar.
//! * The focused tile grid gets a yellow border; keyboard navigation in
//!   [`crate::input`] moves its selection.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, Pane};
use crate::page::{Fragment, Tile, GREETING};

const MENU_WIDTH: u16 = 24;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [title_area, body_area, weather_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(6),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [menu_area, right_area] =
        Layout::horizontal([Constraint::Length(MENU_WIDTH), Constraint::Min(20)])
            .areas(body_area);

    let [details_area, photos_area] =
        Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)])
            .areas(right_area);

    draw_title(app, frame, title_area);
    draw_menu(app, frame, menu_area);
    draw_details(app, frame, details_area);
    draw_photos(app, frame, photos_area);
    draw_weather(app, frame, weather_area);
    draw_status_bar(app, frame, status_area);
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border)
}

fn tile_list(tiles: &[Tile], block: Block<'static>) -> List<'static> {
    let items: Vec<ListItem> = tiles
        .iter()
        .map(|tile| ListItem::new(Line::from(tile.name.clone())))
        .collect();

    List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ")
}

fn draw_title(app: &App, frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        format!(" {}", app.page.title),
        Style::default()
            .fg(Color::LightRed)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, area);
}

/// One row per rover tile.
fn draw_menu(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = pane_block(" Rovers ".into(), app.focus == Pane::Menu);
    let list = tile_list(&app.page.menu_grid, block);
    frame.render_stateful_widget(list, area, &mut app.menu_state);
}

/// The app slot: greeting text or the manifest table.
fn draw_details(app: &App, frame: &mut Frame, area: Rect) {
    match &app.page.app {
        Fragment::Greeting => {
            let lines: Vec<Line> = GREETING.iter().map(|l| Line::from(*l)).collect();
            let greeting = Paragraph::new(lines).block(pane_block(" Welcome ".into(), false));
            frame.render_widget(greeting, area);
        }
        Fragment::Details { rover, rows } => {
            let block = pane_block(format!(" Rover Details: {rover} "), false);
            match rows {
                Some(rows) => {
                    let rows = rows.iter().map(|(key, value)| {
                        Row::new([
                            Cell::from(key.clone()).style(Style::default().fg(Color::Cyan)),
                            Cell::from(value.clone()),
                        ])
                    });
                    let table = Table::new(rows, [Constraint::Length(20), Constraint::Min(10)])
                        .block(block);
                    frame.render_widget(table, area);
                }
                None => {
                    frame.render_widget(Paragraph::new("").block(block), area);
                }
            }
        }
    }
}

/// Photo tiles of the selected rover, captioned `id-camera-date`.
fn draw_photos(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = pane_block(
        format!(" Photos ({}) ", app.page.img_grid.len()),
        app.focus == Pane::Photos,
    );
    let list = tile_list(&app.page.img_grid, block);
    frame.render_stateful_widget(list, area, &mut app.photo_state);
}

fn draw_weather(app: &App, frame: &mut Frame, area: Rect) {
    let line = match &app.page.weather {
        Some(embed) => Line::from(vec![
            Span::styled(format!(" {}: ", embed.title), Style::default().fg(Color::Magenta)),
            Span::raw(embed.src.clone()),
        ]),
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  q: quit  ↑/↓: move  Tab: pane  Enter: open  Bksp: back  r: reload"),
    ]));
    frame.render_widget(status, area);
}
