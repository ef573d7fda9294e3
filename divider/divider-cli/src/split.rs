//! `divider split`: split a dataset and write the subsets.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use divider::arff::{save_arff_with, EncodeParams};
use divider::split::{
    split, suggest_stratify_column, SplitConfig, SplitDistribution, SplitRecord, SplitResult,
    StratifyOutcome,
};
use divider::types::Table;
use owo_colors::OwoColorize;
use tracing::info;

use crate::input;

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// ARFF file to split
    #[arg(name = "FILE")]
    pub input: PathBuf,

    /// Directory for the output files
    #[arg(long, short, default_value = ".")]
    pub out: PathBuf,

    /// Random seed (default 42)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Keep row order instead of shuffling
    #[arg(long)]
    pub no_shuffle: bool,

    /// Stratify on this column
    #[arg(long, conflicts_with = "auto_stratify")]
    pub stratify: Option<String>,

    /// Stratify on the suggested column, if any
    #[arg(long)]
    pub auto_stratify: bool,

    /// JSON split config; flags override its fields
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Largest distinct count declared nominal rather than STRING
    #[arg(long)]
    pub nominal_threshold: Option<usize>,

    /// Skip malformed data records instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Print the split record as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Paths written by a split.
#[derive(Debug)]
pub struct SplitOutputs {
    pub train: PathBuf,
    pub validation: PathBuf,
    pub test: PathBuf,
    pub record: PathBuf,
}

/// Everything a finished split produced.
#[derive(Debug)]
pub struct SplitRun {
    pub table: Table,
    pub result: SplitResult,
    pub record: SplitRecord,
    pub outputs: SplitOutputs,
}

/// Builds the effective config: file first, then command-line flags.
pub fn resolve_config(args: &SplitArgs, table: &Table) -> Result<SplitConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read config {}", path.display()))?;
            SplitConfig::from_json(&text)
                .with_context(|| format!("cannot parse config {}", path.display()))?
        }
        None => SplitConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.random_seed = seed;
    }
    if args.no_shuffle {
        config.shuffle = false;
    }
    if let Some(column) = &args.stratify {
        config.stratify_column = Some(column.clone());
    } else if args.auto_stratify {
        config.stratify_column = suggest_stratify_column(table);
        if config.stratify_column.is_none() {
            eprintln!(
                "{} no column qualifies for stratification; splitting without it",
                "warning:".yellow().bold()
            );
        }
    }

    Ok(config)
}

/// Splits the input and writes all outputs.
pub fn execute(args: &SplitArgs) -> Result<SplitRun> {
    let doc = input::load(&args.input, args.lenient)?;
    let config = resolve_config(args, &doc.table)?;
    let result = split(&doc.table, &config)
        .with_context(|| format!("cannot split {}", args.input.display()))?;

    fs::create_dir_all(&args.out)
        .with_context(|| format!("cannot create {}", args.out.display()))?;

    let name = input::dataset_name(&args.input);
    let mut params = EncodeParams::default();
    if let Some(threshold) = args.nominal_threshold {
        params = params.with_nominal_threshold(threshold);
    }

    let outputs = SplitOutputs {
        train: args.out.join(format!("{name}_train.arff")),
        validation: args.out.join(format!("{name}_validation.arff")),
        test: args.out.join(format!("{name}_test.arff")),
        record: args.out.join(format!("{name}_split.json")),
    };

    for (suffix, subset, path) in [
        ("train", &result.train, &outputs.train),
        ("validation", &result.validation, &outputs.validation),
        ("test", &result.test, &outputs.test),
    ] {
        write_subset(subset, &format!("{name}_{suffix}"), path, &params)?;
    }

    let record = result.record();
    let json = serde_json::to_string_pretty(&record).context("cannot serialize split record")?;
    fs::write(&outputs.record, json)
        .with_context(|| format!("cannot write {}", outputs.record.display()))?;

    info!(
        input = %args.input.display(),
        out = %args.out.display(),
        "wrote split outputs"
    );

    Ok(SplitRun {
        table: doc.table,
        result,
        record,
        outputs,
    })
}

fn write_subset(table: &Table, relation: &str, path: &Path, params: &EncodeParams) -> Result<()> {
    save_arff_with(table, relation, path, params)
        .with_context(|| format!("cannot write {}", path.display()))
}

pub fn run(args: &SplitArgs) -> Result<()> {
    let SplitRun {
        table,
        result,
        record,
        outputs,
    } = execute(args)?;

    if let StratifyOutcome::ColumnMissing { column } = &result.stratification {
        eprintln!(
            "{} stratify column '{column}' not found; split without stratification",
            "warning:".yellow().bold()
        );
    }
    for fallback in result.stratification.fallbacks() {
        eprintln!(
            "{} stratification fell back to a random split ({fallback})",
            "warning:".yellow().bold()
        );
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&record).context("cannot serialize split record")?
        );
        return Ok(());
    }

    println!("{} {}", "Split:".bold(), result);
    println!(
        "  seed {}, shuffle {}",
        record.random_seed,
        if record.shuffle { "on" } else { "off" }
    );

    if let Some(column) = result.stratification.applied_column() {
        if let Some(distribution) = SplitDistribution::from_result(&table, &result, column) {
            println!();
            println!("{distribution}");
        }
    }

    println!();
    for path in [
        &outputs.train,
        &outputs.validation,
        &outputs.test,
        &outputs.record,
    ] {
        println!("  {} {}", "wrote".green(), path.display());
    }

    Ok(())
}
