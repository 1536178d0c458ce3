//! query-console - a terminal query console
//!
//! Runs SQL queries against a CSV-backed dataset and shows the results as a
//! grid or a chart, with a resizable editor and a shareable export link.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod bus;
mod component;
mod components;
mod config;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::components::ConsoleServices;
use crate::config::Config;
use crate::services::{CsvSource, ExportLink, FileStore, Osc52Clipboard, PreferenceStore};
use crate::tui::Tui;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::Event;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "query-console", version, about = "Terminal query console")]
struct Cli {
    /// CSV file to query; the bundled sample is used when omitted
    data: Option<PathBuf>,

    /// Server the export link points at
    #[arg(long)]
    base_url: Option<String>,

    /// Pixel height of one terminal row
    #[arg(long)]
    cell_height: Option<u16>,

    /// Do not read or write saved preferences
    #[arg(long)]
    no_storage: bool,

    /// Write the effective configuration to disk and exit
    #[arg(long)]
    save_config: bool,
}

/// Log to a file under the config directory; the terminal belongs to the UI
fn init_tracing() {
    let Some(dir) = Config::config_dir() else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("console.log"))
    else {
        return;
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("query_console=info"))
        .unwrap_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::load_or_default();
    if let Some(base_url) = cli.base_url {
        config.export_base_url = base_url;
    }
    if let Some(cell_height) = cli.cell_height {
        config.cell_height_px = cell_height;
    }
    let config = config.sanitized();

    if cli.save_config {
        config.save()?;
        return Ok(());
    }

    let export_link = ExportLink::new(&config.export_base_url)
        .with_context(|| format!("invalid export base url '{}'", config.export_base_url))?;
    let file_store = if cli.no_storage {
        None
    } else {
        FileStore::open_default()
    };
    match &file_store {
        Some(store) => tracing::info!(path = %store.path().display(), "preference storage"),
        None => tracing::warn!("preference storage unavailable, layout will not persist"),
    }
    let store = file_store.map(|store| Rc::new(store) as Rc<dyn PreferenceStore>);

    let services = ConsoleServices {
        store,
        clipboard: Rc::new(Osc52Clipboard),
        export_link,
        cell_height_px: config.cell_height_px,
    };
    let mut app = App::new(services, CsvSource::from_path(cli.data));

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(config.tick_rate_ms));
    tui.enter()?;

    let result = run_app(&mut tui, &mut app);

    app.shutdown();
    tui.exit()?;

    if let Err(err) = result {
        tracing::error!("{:#}", err);
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(err) = app.draw(frame, frame.area()) {
                tracing::error!("draw error: {:#}", err);
            }
        })?;

        if let Some(event) = tui.next_event()? {
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Mouse(mouse) => app.handle_mouse_event(mouse, app.area())?,
                Event::Paste(text) => Some(Action::EditorPaste(text)),
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Action might produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                current_action = app.update(a)?;
            }
        } else {
            // No event - send a tick for time-based updates
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}
