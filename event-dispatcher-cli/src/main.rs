//! Event Dispatcher Scenario Runner
//!
//! Command-line front end for the event-dispatcher library. It loads a TOML
//! scenario and adds:
//! - Declarative listeners (record / fail)
//! - Scripted subscribe, unsubscribe, dispatch and expect steps
//! - Report generation (TXT/JSON)

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

mod callbacks;
mod config;
mod host;
mod report;
mod runner;
mod state;

use config::OutputFormat;

/// Event Dispatcher - Run scripted publish/subscribe scenarios
#[derive(Parser, Debug)]
#[command(name = "event-dispatcher-cli")]
#[command(about = "Run publish/subscribe scenarios against an event registry", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the scenario file (TOML)
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Txt)]
    format: OutputFormat,

    /// Output file for the report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Keep running after a dispatch fails
    #[arg(long)]
    continue_on_error: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Event Dispatcher CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using event-dispatcher library v{}", event_dispatcher::VERSION);

    log::info!("Loading scenario from: {:?}", args.scenario);
    let scenario = config::load_config(&args.scenario)?;
    let name = scenario.display_name(&args.scenario);

    let continue_on_error = args.continue_on_error || scenario.continue_on_error;
    let report = runner::run_scenario(&scenario, &name, continue_on_error)?;
    let rendered = report.render(args.format)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report: {:?}", path))?;
            log::info!("Report written to {:?}", path);
        }
        None => print!("{}", rendered),
    }

    if !report.passed() {
        anyhow::bail!(
            "Scenario '{}' did not pass ({} failed expectation(s), aborted: {})",
            name,
            report.failed_expectations(),
            report.aborted
        );
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
