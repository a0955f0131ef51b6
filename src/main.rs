mod app;
mod components;
mod config;
mod error;
mod event;
mod handler;
mod panel;
mod store;
mod theme;
mod tui;
mod ui;
mod vault;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::App;
use crate::config::{AppConfig, GeneralConfig, ThemeConfig, WatcherConfig};
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, Tui};
use crate::vault::watcher::VaultWatcher;

/// A terminal file-tree panel for note vaults with manual ordering.
#[derive(Parser, Debug)]
#[command(name = "nt", version, about)]
struct Cli {
    /// Vault root directory (defaults to config, then current directory)
    path: Option<PathBuf>,

    /// Explicit config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Color scheme: dark, light, custom
    #[arg(long)]
    theme: Option<String>,

    /// Disable the vault watcher (out-of-band change handling)
    #[arg(long)]
    no_watcher: bool,

    /// Disable mouse support
    #[arg(long)]
    no_mouse: bool,
}

impl Cli {
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                default_vault: None,
                mouse: self.no_mouse.then_some(false),
            },
            watcher: WatcherConfig {
                enabled: self.no_watcher.then_some(false),
                ignore: None,
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                custom: None,
            },
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    let path = cli
        .path
        .clone()
        .or_else(|| config.general.default_vault.clone().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let path = path.canonicalize().map_err(|_| {
        error::AppError::InvalidPath(format!("{} does not exist", path.display()))
    })?;

    let theme = theme::resolve_theme(&config.theme);

    install_panic_hook(config.mouse_enabled());

    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut app = App::new(&path)?;
    let mut events = EventHandler::new(Duration::from_millis(16));
    let event_tx = events.sender();

    // Initialize the vault watcher (unless disabled)
    let watcher = if config.watcher_enabled() {
        match VaultWatcher::new(&path, config.watch_ignore_patterns(), event_tx.clone()) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                app.watcher_active = false;
                app.set_status_message(format!("Watcher unavailable: {}", e));
                None
            }
        }
    } else {
        app.watcher_active = false;
        None
    };

    loop {
        tui.draw(|frame| {
            ui::render(&mut app, &theme, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
            Event::Vault(vault_event) => app.handle_vault_event(vault_event),
        }

        // Sync watcher pause/resume state
        if let Some(ref watcher) = watcher {
            if app.watcher_active && !watcher.is_active() {
                watcher.resume();
            } else if !app.watcher_active && watcher.is_active() {
                watcher.pause();
            }
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}
