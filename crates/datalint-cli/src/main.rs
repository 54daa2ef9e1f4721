//! Datalint CLI - validate tabular data against column metadata.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use commands::lint::{EXIT_LINT_FAILED, LintArgs};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Lint {
            data,
            meta,
            format,
            strict,
            no_impose,
            config,
            conversions,
        } => commands::lint::run(LintArgs {
            data,
            meta,
            format,
            strict,
            no_impose,
            config,
            conversions,
        }),

        Commands::Generate { data, name } => commands::generate::run(data, name).map(|()| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_LINT_FAILED),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
