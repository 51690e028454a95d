//! Command line interface for the sales-dashboard binary.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing_subscriber::filter::LevelFilter;

use crate::controller::ExportScope;

/// sales-dashboard: an interactive sales report driven from standard input.
///
/// Each input line is one event: `select <category>` (or `select All`),
/// `export`, `show`, or `quit`. After every event the current dashboard
/// output is written to standard output as JSON.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    /// CSV file with the sales table, either `month,category,amount` rows or
    /// a `month` column followed by one column per category. Defaults to the
    /// built-in sample data.
    #[arg(long, env = "SALES_DASHBOARD_DATA")]
    data: Option<PathBuf>,

    /// Category shown at startup. Defaults to the first category in the data.
    #[arg(long)]
    category: Option<String>,

    /// Where `export` writes the CSV file.
    #[arg(long, default_value = "sales_data.csv")]
    export_path: PathBuf,

    /// Whether `export` writes the filtered records or the whole table.
    #[arg(long, value_enum, default_value_t = ExportScopeArg::Filtered)]
    export_scope: ExportScopeArg,

    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,
}

impl Args {
    pub fn data(&self) -> Option<&Path> {
        self.data.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    pub fn export_scope(&self) -> ExportScope {
        self.export_scope.into()
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }
}

/// Command line spelling of `ExportScope`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportScopeArg {
    /// The records matching the current category.
    #[default]
    Filtered,
    /// The whole table.
    Full,
}

impl From<ExportScopeArg> for ExportScope {
    fn from(value: ExportScopeArg) -> Self {
        match value {
            ExportScopeArg::Filtered => ExportScope::Filtered,
            ExportScopeArg::Full => ExportScope::Full,
        }
    }
}
