//! optdash-tui: interactive options dashboard.
//!
//! Pass `--offline` to use the deterministic synthetic provider instead of
//! Yahoo Finance. Configuration is read from
//! `<config dir>/optdash/config.toml` when present.

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use optdash_core::Dashboard;
use optdash_core::config::DashboardConfig;
use optdash_core::data::{CircuitBreaker, DashboardProvider, SyntheticProvider, YahooProvider};

use optdash_tui::{AppState, handle_key, ui};

fn main() -> Result<()> {
    // Logging would draw over the alternate screen, so it is opt-in.
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_ansi(false)
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    }

    let offline = std::env::args().skip(1).any(|a| a == "--offline");

    let config_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("optdash")
        .join("config.toml");
    let config = DashboardConfig::load_or_default(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;

    let provider: Box<dyn DashboardProvider> = if offline {
        Box::new(SyntheticProvider::new(chrono::Local::now().date_naive()))
    } else {
        let circuit_breaker = Arc::new(CircuitBreaker::default_provider());
        Box::new(YahooProvider::new(circuit_breaker)?)
    };
    let dashboard = Dashboard::new(provider, config);
    tracing::info!(provider = dashboard.provider_name(), "starting tui");
    let mut app = AppState::new(dashboard);

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Run queued fetches after the "Loading" status is on screen.
        if app.pending.is_some() {
            app.process_pending();
            continue;
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
