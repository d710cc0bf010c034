use anyhow::{Context, Result};
use env_logger::Builder;
use log::{LevelFilter, info, warn};

use crate::chart::{ChartStyle, build_figure, figure_title};
use crate::cli::Cli;
use crate::parser::{parse_log, read_log};

mod chart;
mod cli;
mod parser;
mod ui;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Logging setup
    let crate_level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter(Some("train_log_plotter"), crate_level)
        .parse_default_env()
        .init();

    run(cli)
}

/// Load, parse and lay out the log, then show it until the window is closed.
fn run(cli: Cli) -> Result<()> {
    let style = match &cli.style {
        Some(path) => ChartStyle::load(path)?,
        None => ChartStyle::default(),
    };

    let text = read_log(&cli.log)?;
    let parsed = parse_log(&text).with_context(|| format!("Inconsistent log {}", cli.log.display()))?;
    if parsed.train.is_empty() {
        warn!("No 'Iteration <n>, loss = <value>' lines found in {}", cli.log.display());
    }
    info!(
        "Parsed {} train and {} test iterations from {}",
        parsed.train.len(),
        parsed.test.len(),
        cli.log.display()
    );

    let figure = build_figure(figure_title(&cli.log), &parsed, &cli.train_output, &cli.test_output)?;
    info!("Showing '{}' with {} panels", figure.title, figure.panels.len());

    ui::show(figure, style, cli.output)
}
