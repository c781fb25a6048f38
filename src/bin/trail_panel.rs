use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use trail_explorer::model::TrailId;
use trail_explorer::panel::{
    ChartRuntime, PanelController, PanelSurface, PopupState, RegionContent,
};
use trail_explorer::parser;
use trail_explorer::state::SelectionState;

/// Trail Panel: render the detail panel for one selection without a
/// terminal UI and print the result as JSON.
#[derive(Parser, Debug)]
#[command(name = "trail-panel", version, about)]
struct Cli {
    /// Path to the trail data file (JSON or YAML)
    #[arg(long, default_value = "./data/trails.json")]
    trails: PathBuf,

    /// Trail id to select; omit for the empty panel
    #[arg(long, value_name = "ID")]
    select: Option<u32>,

    /// Move the elevation chart cursor to this sample (repeatable, applied
    /// in order)
    #[arg(long, value_name = "I")]
    cursor: Vec<usize>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    // Log to stderr (stdout carries the JSON snapshot)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("trail_explorer=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    if !cli.cursor.is_empty() && cli.select.is_none() {
        anyhow::bail!("--cursor needs --select: the empty panel has no chart");
    }

    let loaded = parser::load_trails(&cli.trails)
        .with_context(|| format!("loading {}", cli.trails.display()))?;
    for rejected in &loaded.rejected {
        tracing::warn!(error = %rejected, "trail record rejected");
    }

    let surface = PanelSurface::complete();
    let popup = Rc::new(RefCell::new(PopupState::new()));
    let mut panel = PanelController::new(
        loaded.directory,
        &surface,
        ChartRuntime::new(),
        Rc::clone(&popup),
    )?;

    let selection = SelectionState::new();
    let mut watch = selection.subscribe();
    selection.set(cli.select.map(TrailId::new));
    panel.sync(&mut watch);

    for index in cli.cursor {
        if !panel.engine_mut().set_cursor(Some(index)) {
            tracing::warn!(index, "cursor not moved");
        }
    }

    let output = json!({
        "state": panel.state().trail_id(),
        "cursor": panel.cursor().index(),
        "regions": panel.snapshot(),
        "infographMarkup": panel.regions().infograph.with(RegionContent::markup),
        "popup": &*popup.borrow(),
    });

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");

    Ok(())
}
