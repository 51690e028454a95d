use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use sales_dashboard::args::Args;
use sales_dashboard::{CsvFileExporter, Dashboard, DashboardError, Dataset, Event, Session};
use tracing::{debug, error, trace, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

const EXIT_DATA_LOAD: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Event(Event),
    Show,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match (verb.to_lowercase().as_str(), rest.trim()) {
        ("select", value) if !value.is_empty() => {
            Some(Command::Event(Event::SelectorChanged(value.to_string())))
        }
        ("export", "") => Some(Command::Event(Event::ExportRequested)),
        ("show", "") => Some(Command::Show),
        ("quit", "") | ("exit", "") => Some(Command::Quit),
        _ => None,
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.log_level());
    trace!("{args:?}");

    let dataset = match load_dataset(&args) {
        Ok(dataset) => Arc::new(dataset),
        Err(e) => {
            error!("cannot start without sales data: {e}");
            return ExitCode::from(EXIT_DATA_LOAD);
        }
    };

    match run(args, dataset) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_dataset(args: &Args) -> Result<Dataset> {
    match args.data() {
        Some(path) => Dataset::load(path),
        None => {
            debug!("no data file given, using the sample table");
            Dataset::sample().map_err(|e| DashboardError::data_load("sample", e).into())
        }
    }
}

fn run(args: Args, dataset: Arc<Dataset>) -> Result<()> {
    let initial = match args.category() {
        Some(category) => category.to_string(),
        None => dataset
            .categories()
            .first()
            .cloned()
            .unwrap_or_else(|| sales_dashboard::models::ALL.to_string()),
    };

    let exporter = CsvFileExporter::new(args.export_path());
    let dashboard = Dashboard::new(dataset, exporter).with_export_scope(args.export_scope());
    let mut session = dashboard.open_session(&initial)?;

    let stdout = io::stdout();
    print_bundle(&mut stdout.lock(), &session)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Some(Command::Event(event)) => {
                session = dashboard.handle(session, event);
                print_bundle(&mut stdout.lock(), &session)?;
            }
            Some(Command::Show) => print_bundle(&mut stdout.lock(), &session)?,
            Some(Command::Quit) => break,
            None => warn!("unknown command: {line:?}"),
        }
    }
    Ok(())
}

fn print_bundle<W: Write>(out: &mut W, session: &Session) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, session.bundle())?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        // RUST_LOG exists; use it.
        Some(_) => EnvFilter::from_default_env(),
        // RUST_LOG does not exist; use the given level for this crate only.
        None => EnvFilter::new(format!("{}={level}", env!("CARGO_CRATE_NAME"))),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
