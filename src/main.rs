//! cstview - headless CST view of a Python buffer
//!
//! Seeds the session, renders, optionally moves the cursor, then prints
//! the status line to stderr and the markup to stdout (or `--out`).

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use cstview::cli::CliArgs;
use cstview::render::TreeSitterRenderer;
use cstview::session_store::{FileStore, SessionStore};
use cstview::widget::{EditorWidget, MemoryPanel, MemoryWidget};
use cstview::{App, SyncConfig};

/// Upper bound on waiting for renders to settle
const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

fn main() -> Result<()> {
    cstview::tracing::init();

    let args = CliArgs::parse();

    let mut config = SyncConfig::load();
    if let Some(ms) = args.debounce_ms {
        config.debounce_ms = ms;
    }
    if args.new {
        config.restore_session = false;
    }

    let store = match FileStore::open_default() {
        Ok(store) => {
            tracing::debug!("Session file: {}", store.path().display());
            SessionStore::new(Box::new(store))
        }
        Err(e) => {
            tracing::warn!("{}; session will not be saved", e);
            SessionStore::in_memory()
        }
    };

    let renderer = TreeSitterRenderer::new()?;
    let mut app = App::new(
        &config,
        MemoryWidget::new(""),
        MemoryPanel::new(),
        Box::new(renderer),
        store,
    )?;
    app.start(SETTLE_TIMEOUT)?;

    if let Some(path) = &args.file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        app.widget_mut().set_text(&text);
    }
    if let Some(position) = args.cursor {
        app.widget_mut().move_cursor(position);
    }
    if !app.run_until_idle(SETTLE_TIMEOUT) {
        anyhow::bail!("Rendering did not settle within {:?}", SETTLE_TIMEOUT);
    }

    eprintln!("{}", app.session().status_line());

    let markup = app.panel().markup();
    match &args.out {
        Some(path) => std::fs::write(path, markup)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", markup),
    }

    Ok(())
}
