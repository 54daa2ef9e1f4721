//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Datalint: validate tabular data against column metadata
#[derive(Parser)]
#[command(name = "datalint")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint a data file against a metadata document
    Lint {
        /// Path to the data file (CSV/TSV or JSON lines)
        #[arg(long, value_name = "FILE")]
        data: PathBuf,

        /// Path to the metadata JSON document
        #[arg(long, value_name = "FILE")]
        meta: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,

        /// Fail on the first value that cannot be coerced
        #[arg(long)]
        strict: bool,

        /// Do not coerce columns toward their declared types
        #[arg(long)]
        no_impose: bool,

        /// Path to a JSON configuration file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Path to a `metadata,representation` CSV overriding the type conversion table
        #[arg(long, value_name = "FILE")]
        conversions: Option<PathBuf>,
    },

    /// Generate a metadata document from a data file
    Generate {
        /// Path to the data file (CSV/TSV or JSON lines)
        #[arg(long, value_name = "FILE")]
        data: PathBuf,

        /// Table name to record in the metadata
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown table of pass/fail per column and check
    #[default]
    Summary,
    /// Markdown narrative per column with sample offending rows
    Detailed,
    /// Nested JSON with full check detail
    Json,
    /// Flat JSON rows of column, check and success
    Table,
}
