//! Lint command - validate a data file against a metadata document.

use std::path::PathBuf;

use colored::Colorize;
use datalint::{
    CoercionPolicy, LintConfig, Linter, TableMetadata, render_detailed_markdown,
    TypeConversionTable, render_summary_markdown,
};

use crate::cli::OutputFormat;

/// Exit status for a lint that ran but did not pass.
pub const EXIT_LINT_FAILED: i32 = 2;

pub struct LintArgs {
    pub data: PathBuf,
    pub meta: PathBuf,
    pub format: OutputFormat,
    pub strict: bool,
    pub no_impose: bool,
    pub config: Option<PathBuf>,
    pub conversions: Option<PathBuf>,
}

/// Run the lint and print the chosen view. Returns whether every check passed.
pub fn run(args: LintArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => LintConfig::from_json_path(path)?,
        None => LintConfig::default(),
    };
    if let Some(path) = &args.conversions {
        config.conversions = TypeConversionTable::from_csv_path(path)?;
    }
    if args.strict {
        config.coercion = CoercionPolicy::Raise;
    }
    if args.no_impose {
        config.impose_types = false;
    }

    let dataset = super::read_dataset(&args.data, &config.reader)?;
    let metadata = TableMetadata::from_path(&args.meta)?;

    let mut linter = Linter::with_config(dataset, metadata, config)?;
    linter.check_all();
    let passed = linter.overall_success()?;

    match args.format {
        OutputFormat::Summary => {
            print!("{}", render_summary_markdown(linter.log()));
        }
        OutputFormat::Detailed => {
            print!("{}", render_detailed_markdown(linter.log(), linter.metadata()));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&linter.log().as_dict())?);
        }
        OutputFormat::Table => {
            println!("{}", serde_json::to_string_pretty(&linter.log().as_table_rows())?);
        }
    }

    if matches!(args.format, OutputFormat::Summary | OutputFormat::Detailed) {
        println!();
        let verdict = if passed {
            "PASSED".green().bold()
        } else {
            "FAILED".red().bold()
        };
        println!(
            "{} {} against {}",
            verdict,
            args.data.display().to_string().white(),
            args.meta.display()
        );
    }

    Ok(passed)
}
