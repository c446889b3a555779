//! formwright - terminal form builder
//!
//! Design multi-step forms with validation rules, preview them as a
//! respondent would, and collect submissions.

mod app;
mod config;
mod platform;
mod state;
mod store;
mod ui;

use anyhow::Result;
use app::App;
use config::BuilderConfig;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use store::{Autosave, FileGateway, FormRepository, MemoryGateway, PersistenceGateway};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE: &str = "formwright.log";

/// Log to a file in the data directory; stderr would corrupt the TUI
fn init_logging(data_dir: Option<&Path>) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "formwright=info".into());

    let log_file = data_dir.and_then(|dir| {
        fs::create_dir_all(dir).ok()?;
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE))
            .ok()
    });

    let registry = tracing_subscriber::registry().with(filter);
    match log_file {
        Some(file) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init(),
        None => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = BuilderConfig::load().unwrap_or_else(|e| {
        eprintln!("Ignoring unreadable config: {e:#}");
        BuilderConfig::default()
    });
    let data_dir = config.data_dir();
    init_logging(data_dir.as_deref());

    let gateway: Arc<dyn PersistenceGateway> = match &data_dir {
        Some(dir) => {
            tracing::info!("Storing forms in {}", dir.display());
            Arc::new(FileGateway::new(dir))
        }
        None => {
            tracing::warn!("No data directory available; forms will not persist");
            Arc::new(MemoryGateway::new())
        }
    };

    let (autosave, worker) = if config.autosave_enabled() {
        let (autosave, worker) = Autosave::spawn(FormRepository::new(Arc::clone(&gateway)));
        (Some(autosave), Some(worker))
    } else {
        (None, None)
    };

    let mut app = App::new(config, gateway, autosave);
    app.refresh_forms().await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Closing the channel lets the worker drain pending saves and exit
    drop(app);
    if let Some(worker) = worker {
        if let Err(e) = worker.await {
            tracing::warn!("Autosave worker failed: {e}");
        }
    }

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        let size = terminal.size()?;
        app.terminal_size = Some((size.height, size.width));

        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key).await?,
                Event::Mouse(mouse) => app.handle_mouse(mouse).await?,
                _ => {}
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
