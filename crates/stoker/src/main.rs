//! Stoker - live dashboard for bulk package build servers.

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use miette::{IntoDiagnostic, Result};
use ratatui::prelude::*;
use std::io;
use std::time::Duration;
use stoker_cli::Args;
use stoker_client::{HttpSource, Poller, PollerConfig, TokioTimer};
use stoker_monitor::{App, DashboardSurface, Theme};

fn main() -> Result<()> {
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new().into_diagnostic()?;

    // Shared surface: the poll task writes, the draw loop reads
    let surface = DashboardSurface::new();
    let source = HttpSource::new().into_diagnostic()?;

    let mut config = PollerConfig::new(args.url.clone());
    config.poll_interval = Duration::from_secs(args.poll_interval.max(1));
    config.retry_delay = Duration::from_secs(args.poll_interval.div_ceil(2).max(1));

    let poller = Poller::new(config, source, surface.clone(), TokioTimer);
    let poll_task = runtime.spawn(poller.run());

    let mut app = App::new(surface, Theme::from_name(&args.theme));

    // Setup terminal
    enable_raw_mode().into_diagnostic()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).into_diagnostic()?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).into_diagnostic()?;

    // Run the main loop
    let res = run_app(&mut terminal, &mut app);

    // Stop polling before tearing the terminal down
    poll_task.abort();

    // Restore terminal
    disable_raw_mode().into_diagnostic()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .into_diagnostic()?;
    terminal.show_cursor().into_diagnostic()?;

    // Handle result
    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

/// Main application loop.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()>
where
    io::Error: From<B::Error>,
{
    let tick_rate = Duration::from_millis(100);

    loop {
        // Draw UI
        terminal.draw(|frame| app.render(frame))?;

        // Handle events
        app.poll_events(tick_rate)?;

        // Check if we should quit
        if app.should_quit {
            return Ok(());
        }
    }
}
