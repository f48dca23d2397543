mod app;
mod autosave;
mod components;
mod config;
mod dialogs;
mod editor;
mod error;
mod event;
mod fs;
mod handler;
mod logging;
mod menu;
mod selection;
mod storage;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::App;
use crate::autosave::AutoSave;
use crate::config::{AppConfig, GeneralConfig, StorageConfig};
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, Tui};

/// Browse a workspace of PDF documents and Markdown notes.
#[derive(Parser, Debug)]
#[command(name = "nb", version, about)]
struct Cli {
    /// Workspace folder to open at startup
    path: Option<PathBuf>,

    /// Path to a config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run without filesystem access (every storage call is a no-op)
    #[arg(long)]
    no_storage: bool,

    /// Log level for the log file (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Disable mouse support
    #[arg(long)]
    no_mouse: bool,
}

impl Cli {
    /// Flags expressed as a partial config that overrides file values.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                workspace: self.path.as_ref().map(|p| p.display().to_string()),
                mouse: self.no_mouse.then_some(false),
            },
            storage: StorageConfig {
                enabled: self.no_storage.then_some(false),
            },
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.log_level.as_deref());

    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));
    tracing::debug!(?config, "configuration resolved");

    let workspace = match config.workspace() {
        Some(path) if config.storage_enabled() => Some(path.canonicalize().map_err(|_| {
            error::AppError::InvalidPath(format!("{} does not exist", path.display()))
        })?),
        other => other,
    };

    install_panic_hook();

    let storage = storage::select_storage(config.storage_enabled());
    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut events = EventHandler::new(Duration::from_millis(16));
    let autosave = AutoSave::new(
        config.autosave_delay(),
        config.indicator_duration(),
        events.sender(),
    );
    let mut app = App::new(storage, autosave, config.date_format());

    if let Some(path) = workspace {
        app.open_workspace(path).await;
    }

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key).await,
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse).await,
            Event::Paste(text) => app.handle_paste(&text).await,
            Event::AutoSaveDue(ticket) => app.on_autosave_due(ticket).await,
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
        }

        if app.should_quit {
            break;
        }
    }

    app.flush_pending_save().await;
    tui.restore()?;
    tracing::info!("exiting");
    Ok(())
}
