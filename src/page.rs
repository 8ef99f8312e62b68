//! The dashboard's document model.
//!
//! A browser page would hold these as DOM elements; here they are plain
//! slots that the renderer fills and the terminal UI draws.  Every slot can
//! also be serialised back to HTML.

use std::fmt;

/// Lines of the instructions shown while no rover is selected.
pub const GREETING: [&str; 3] = [
    "Greetings Earthling!",
    "Welcome to the Mars Rover dashboard. ",
    "Please select a rover.",
];

const TABLE_CLASS: &str = "roverTable";

/// Content of the page's `app` slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Fragment {
    #[default]
    Greeting,
    /// Manifest rows for the selected rover, in manifest field order.
    /// `None` when the manifest has not been fetched.
    Details {
        rover: String,
        rows: Option<Vec<(String, String)>>,
    },
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Greeting => {
                writeln!(f, "<br>")?;
                for line in GREETING {
                    writeln!(f, "<p>{line}</p>")?;
                }
                Ok(())
            }
            Fragment::Details { rows, .. } => {
                writeln!(f, "<p>Rover Details</p>")?;
                if let Some(rows) = rows {
                    write!(f, r#"<table class="{TABLE_CLASS}">"#)?;
                    for (key, value) in rows {
                        write!(
                            f,
                            "\n<tr><td>{}</td><td>{}</td></tr>",
                            escape(key),
                            escape(value)
                        )?;
                    }
                    writeln!(f, "\n</table>")?;
                }
                Ok(())
            }
        }
    }
}

/// What clicking a tile does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileAction {
    /// Menu tile: make this rover the selection and re-render.
    SelectRover(String),
    /// Photo tile: open the image in a new browsing context.
    OpenImage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileClass {
    Menu,
    Image,
}

impl TileClass {
    pub fn css(self) -> &'static str {
        match self {
            TileClass::Menu => "menuTile",
            TileClass::Image => "imgTile",
        }
    }
}

/// A captioned image with a click action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub name: String,
    pub src: String,
    pub class: TileClass,
    pub action: TileAction,
}

impl Tile {
    pub fn menu(name: &str, src: &str) -> Self {
        Self {
            name: name.to_string(),
            src: src.to_string(),
            class: TileClass::Menu,
            action: TileAction::SelectRover(name.to_string()),
        }
    }

    pub fn image(name: String, src: &str) -> Self {
        Self {
            name,
            src: src.to_string(),
            class: TileClass::Image,
            action: TileAction::OpenImage(src.to_string()),
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<div><h4>{name}</h4><img alt="{name}" src="{src}" class="{class}"></div>"#,
            name = escape(&self.name),
            src = escape(&self.src),
            class = escape(self.class.css()),
        )
    }
}

/// The static Mars weather widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherEmbed {
    pub src: String,
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WeatherEmbed {
    fn default() -> Self {
        Self {
            src: "https://mars.nasa.gov/layout/embed/image/mslweather/".into(),
            title: "Mars Weather".into(),
            width: 800,
            height: 530,
        }
    }
}

impl fmt::Display for WeatherEmbed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<iframe src='{}' title='{}' width='{}' height='{}' scrolling='no' frameborder='0'></iframe>",
            escape(&self.src),
            escape(&self.title),
            self.width,
            self.height
        )
    }
}

/// Element slots of the dashboard page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    /// Instructions or the rover details table.
    pub app: Fragment,
    pub menu_grid: Vec<Tile>,
    pub img_grid: Vec<Tile>,
    pub weather: Option<WeatherEmbed>,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html>")?;
        writeln!(
            f,
            r#"<head><meta charset="utf-8"><title>{}</title></head>"#,
            escape(&self.title)
        )?;
        writeln!(f, "<body>")?;
        writeln!(f, r#"<h1 id="title">{}</h1>"#, escape(&self.title))?;
        write_grid(f, "menuGrid", &self.menu_grid)?;
        writeln!(f, r#"<div id="app">"#)?;
        write!(f, "{}", self.app)?;
        writeln!(f, "</div>")?;
        write_grid(f, "imgGrid", &self.img_grid)?;
        write!(f, r#"<div id="weatherIframe">"#)?;
        if let Some(weather) = &self.weather {
            write!(f, "{weather}")?;
        }
        writeln!(f, "</div>")?;
        writeln!(f, "</body>")?;
        writeln!(f, "</html>")
    }
}

fn write_grid(f: &mut fmt::Formatter<'_>, id: &str, tiles: &[Tile]) -> fmt::Result {
    writeln!(f, r#"<div id="{id}">"#)?;
    for tile in tiles {
        writeln!(f, "{tile}")?;
    }
    writeln!(f, "</div>")
}

/// Escape text for use in element content and quoted attribute values.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
