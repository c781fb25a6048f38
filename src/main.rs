mod app;
mod event;
mod theme;
mod view;

use std::io::stdout;
use std::path::PathBuf;

use clap::Parser;
use crossterm::execute;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};

use trail_explorer::model::TrailId;

/// Trail Explorer: browse hiking trails with a live detail panel,
/// elevation profile and map.
#[derive(Parser, Debug)]
#[command(name = "trail-explorer", version, about)]
struct Cli {
    /// Path to the trail data file (JSON or YAML)
    #[arg(long, default_value = "./data/trails.json")]
    trails: PathBuf,

    /// Disable file watching (static mode)
    #[arg(long)]
    no_watch: bool,

    /// Trail id to select on startup
    #[arg(long, value_name = "ID")]
    select: Option<u32>,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    if !cli.trails.exists() {
        eprintln!("Error: trail data not found at {}", cli.trails.display());
        std::process::exit(1);
    }

    // Set up logging to file (we own the terminal)
    let log_dir = std::env::var("TRAIL_EXPLORER_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir().join("trail-explorer"));
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "explorer.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trail_explorer=info".parse()?),
        )
        .init();

    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture);
        ratatui::restore();
        original_hook(panic_info);
    }));

    // Load before touching the terminal so data errors print normally
    let mut app = app::App::new(cli.trails, cli.no_watch, cli.select.map(TrailId::new))?;

    // Set up terminal with mouse capture enabled
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal).await;

    // Restore terminal: disable mouse capture before restoring
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    ratatui::restore();

    result
}
