//! arucraft-tui: terminal front end for the aruCraftR panel
//!
//! - Sidebar with the panel pages, collapsible with Tab
//! - Server list with cached profiles
//! - Toasts from the request dispatcher in the status bar

mod app;
mod input;
mod ui;

use std::io;
use std::time::Duration;

use arucraft_core::{PanelConfig, PanelContext};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{App, AppResult};
use crate::input::handle_key;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to a file, stdout belongs to the terminal UI
    let log_dir = dirs::cache_dir()
        .map(|d| d.join(arucraft_core::APP_DIR))
        .unwrap_or_else(|| std::env::temp_dir().join(arucraft_core::APP_DIR));
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "tui.log");

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arucraft_tui=debug,arucraft_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(file_appender))
        .init();

    let config = PanelConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Falling back to default config");
        PanelConfig::default()
    });
    let mouse = config.tui.mouse;
    let tick = Duration::from_millis(config.tui.tick_ms);

    let ctx = match PanelContext::open(config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            warn!(error = %e, "Stores unavailable, running without persistence");
            PanelContext::in_memory(config)
        }
    };
    let mut app = App::new(ctx);
    app.refresh_player().await;
    app.refresh(false).await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if mouse {
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    } else {
        execute!(stdout, EnterAlternateScreen)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, tick).await;

    // Restore terminal
    disable_raw_mode()?;
    if mouse {
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    } else {
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    }
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        return Err(e);
    }

    Ok(())
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick: Duration,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                match handle_key(app, key).await {
                    AppResult::Continue => {}
                    AppResult::Quit => return Ok(()),
                }
            }
        }

        app.tick();
    }
}
