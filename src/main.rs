//! rover-dashboard: Mars rover photos in the terminal, through a proxy that
//! keeps the photo API key on the server.
//!
//! ## Architecture overview
//!
//! ```text
//!                 rover-dashboard serve
//!                ┌────────────────────┐  api_key  ┌──────────────┐
//!                │ proxy/ (axum)      │ ────────► │ upstream API │
//!                └────────────────────┘           └──────────────┘
//!                          ▲ /rover-manifest, /rover-photos
//!                          │
//! ┌──────────────┐ update  ┌──────────┐ render() ┌──────────┐ draw() ┌──────────┐
//! │ sequencer.rs │ ──────► │  app.rs  │ ───────► │ page.rs  │ ─────► │  ui.rs   │
//! │  (loading)   │         │ (store)  │          │  (DOM)   │        │ (render) │
//! └──────────────┘         └──────────┘          └──────────┘        └──────────┘
//!                               ▲
//!                               │ handle_key_event()
//!                          ┌──────────┐
//!                          │ input.rs │
//!                          └──────────┘
//! ```
//!
//! * **`source/`**: the `RoverSource` trait, rover data types and the proxy
//!   client.
//! * **`store`**: rover names, selection, and the per-rover caches.
//! * **`sequencer`**: loads stale manifests and photos, one rover at a time.
//! * **`render`** / **`page`**: store → page projection and the page model.
//! * **`app`**: owns store and page; the single update entry point.
//! * **`ui`** / **`input`**: terminal drawing and key handling.
//! * **`proxy/`**: the HTTP proxy (`rover-dashboard serve`).
//!
//! `rover-dashboard export` skips the terminal and prints the rendered page
//! as an HTML document.

mod app;
mod browser;
mod config;
mod error;
mod input;
mod page;
mod proxy;
mod render;
mod sequencer;
mod source;
mod store;
mod ui;

use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Runtime;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use app::App;
use config::{ProxyConfig, DEFAULT_PROXY_URL};
use input::Command;
use sequencer::Sequencer;
use source::ProxySource;
use store::{Store, StoreUpdate};

const USAGE: &str = "\
usage: rover-dashboard [PROXY_URL]                  run the dashboard (default http://localhost:3000)
       rover-dashboard serve                        run the proxy (needs API_KEY)
       rover-dashboard export [PROXY_URL] [ROVER]   print the rendered page as HTML";

/// UI tick.
const TICK_RATE: Duration = Duration::from_millis(100);

/// How often the dashboard re-checks its caches.  Data is only re-fetched
/// once the calendar day has changed.
const REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the default panic message is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("serve") => run_proxy(),
        Some("export") => run_export(
            args.get(1).map(String::as_str).unwrap_or(DEFAULT_PROXY_URL),
            args.get(2).map(String::as_str),
        ),
        Some("-h" | "--help") => {
            println!("{USAGE}");
            Ok(())
        }
        Some(url) => run_dashboard(url),
        None => run_dashboard(DEFAULT_PROXY_URL),
    }
}

fn run_proxy() -> Result<()> {
    fmt().with_env_filter(env_filter()).init();

    let config = ProxyConfig::from_env()?;
    let runtime = Runtime::new()?;
    runtime.block_on(proxy::serve(config))
}

/// Load once, render like the dashboard would, and print the page.
fn run_export(proxy_url: &str, rover: Option<&str>) -> Result<()> {
    fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .init();

    let runtime = Runtime::new()?;
    let sequencer = Sequencer::new(ProxySource::new(proxy_url));
    let mut app = App::new(Store::default());

    runtime.block_on(sequencer.load_all(&mut app));
    app.mount();
    if let Some(rover) = rover {
        app.update(StoreUpdate::SelectRover(rover.to_string()), true);
    }

    print!("{}", app.page);
    Ok(())
}

fn run_dashboard(proxy_url: &str) -> Result<()> {
    // Logs go to a file; anything on stdout would corrupt the screen.
    let log_path = config::dashboard_log_path();
    let log_file = File::create(&log_path)
        .with_context(|| format!("creating log file {}", log_path.display()))?;
    fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    install_panic_hook();

    let runtime = Runtime::new()?;
    let sequencer = Sequencer::new(ProxySource::new(proxy_url));
    let mut app = App::new(Store::default());
    app.status = format!("Loading rover data from {proxy_url}…");

    // -- terminal setup (RAII: Drop restores on exit or panic) ---------------
    let mut guard = TerminalGuard::new()?;
    guard.terminal.draw(|f| ui::draw(&mut app, f))?;

    // -- page load: fetch, render, then menu ---------------------------------
    let report = runtime.block_on(sequencer.load_all(&mut app));
    app.status = report.summary();
    app.mount();
    let mut last_load = Instant::now();

    // -- main event loop -----------------------------------------------------
    loop {
        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if let Some(Command::Open(url)) = input::handle_key_event(&mut app, key) {
                    if let Err(e) = browser::open(&url) {
                        error!(%url, error = %e, "could not open image");
                    }
                }
            }
        }

        if app.quit {
            break;
        }

        if app.reload_requested || last_load.elapsed() >= REFRESH_INTERVAL {
            app.reload_requested = false;
            app.status = "Reloading…".into();
            guard.terminal.draw(|f| ui::draw(&mut app, f))?;

            let report = runtime.block_on(sequencer.load_all(&mut app));
            app.status = report.summary();
            app.render();
            last_load = Instant::now();
        }
    }

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
