#![deny(unsafe_code)]

//! Downline TUI — interactive genealogy tree explorer.

mod app;
mod keymap;
mod panels;

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use downline_config::{AppConfig, LoggingConfig};
use downline_core::{DomainNode, FetchError, FetchKey, TreeFetchGateway, create_gateway};
use ratatui::prelude::*;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::app::App;

type FetchResult = (FetchKey, Result<Option<DomainNode>, FetchError>);

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::var_os("DOWNLINE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("downline.toml"));
    let config = if config_path.exists() {
        AppConfig::load(&config_path).await?
    } else {
        AppConfig::default()
    };

    init_logging(&config.logging)?;
    info!(config = %config_path.display(), "Starting downline TUI");

    let gateway: Arc<dyn TreeFetchGateway> = Arc::from(create_gateway(&config.gateway).await?);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut app = App::new(&config, gateway.name());
    spawn_fetch(&gateway, &tx, app.start());

    // Set up terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = run(&mut terminal, &mut app, &gateway, &tx, &mut rx);

    // Restore terminal
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    gateway: &Arc<dyn TreeFetchGateway>,
    tx: &UnboundedSender<FetchResult>,
    rx: &mut UnboundedReceiver<FetchResult>,
) -> Result<()> {
    while !app.should_quit {
        while let Ok((key, result)) = rx.try_recv() {
            app.on_fetched(key, result);
        }

        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(fetch_key) = app.handle_key(key.code)
        {
            if app.take_refresh() {
                gateway.invalidate();
            }
            spawn_fetch(gateway, tx, fetch_key);
        }
    }
    Ok(())
}

/// Fetch `key` off the UI thread; the result comes back through `tx`.
fn spawn_fetch(
    gateway: &Arc<dyn TreeFetchGateway>,
    tx: &UnboundedSender<FetchResult>,
    key: FetchKey,
) {
    debug!(%key, "Spawning fetch");
    let gateway = Arc::clone(gateway);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = gateway.fetch(&key).await;
        // Receiver gone means the UI has exited.
        let _ = tx.send((key, result));
    });
}

/// Log to `logging.file` when set. The terminal belongs to the UI, so
/// nothing is logged otherwise.
fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let Some(path) = &logging.file else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level)),
        )
        .init();
    Ok(())
}
