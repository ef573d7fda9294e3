//! Dataset divider command line.
//!
//! Reads an ARFF file, splits it into train/validation/test subsets and
//! writes each subset back as ARFF alongside a JSON split record.
//!
//! # Commands
//!
//! - `divider info <file.arff>` - Shape, column types and stratify candidates
//! - `divider split <file.arff>` - Split and write `<name>_train.arff`,
//!   `<name>_validation.arff`, `<name>_test.arff` and `<name>_split.json`
//!
//! # Logging
//!
//! Set `RUST_LOG` to adjust verbosity (default `divider=info`), e.g.
//! `RUST_LOG=divider=debug divider split iris.arff`.

mod info;
mod input;
mod split;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Split ARFF datasets into reproducible train/validation/test subsets
#[derive(Parser)]
#[command(name = "divider")]
#[command(about = "Split ARFF datasets into train/validation/test subsets", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dataset shape, column types and stratification candidates
    Info(info::InfoArgs),

    /// Split a dataset 60/20/20 and write the subsets as ARFF
    Split(split::SplitArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("divider=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info(args) => info::run(&args),
        Commands::Split(args) => split::run(&args),
    }
}
