//! `divider info`: describe a dataset.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use divider::split::{
    stratification_candidates, suggest_stratify_column, DatasetInfo, StratifyCandidate,
};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::input;

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// ARFF file to describe
    #[arg(name = "FILE")]
    pub input: PathBuf,

    /// Skip malformed data records instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Everything `info` reports, in the shape printed by `--json`.
#[derive(Debug, Serialize)]
pub struct InfoReport {
    pub relation: String,
    pub info: DatasetInfo,
    pub candidates: Vec<StratifyCandidate>,
    pub suggested_stratify_column: Option<String>,
    pub skipped_lines: Vec<usize>,
}

pub fn report(args: &InfoArgs) -> Result<InfoReport> {
    let doc = input::load(&args.input, args.lenient)?;
    Ok(InfoReport {
        info: DatasetInfo::from_table(&doc.table),
        candidates: stratification_candidates(&doc.table),
        suggested_stratify_column: suggest_stratify_column(&doc.table),
        skipped_lines: doc.malformed_rows.iter().map(|r| r.line).collect(),
        relation: doc.relation,
    })
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let report = report(args)?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("cannot serialize report")?;
        println!("{json}");
        return Ok(());
    }

    println!("{} {}", "Relation:".bold(), report.relation);
    println!("{}", report.info);

    println!("{}", "Missing values per column:".bold());
    for (column, missing) in &report.info.missing_values {
        println!("  {column:<24} {missing}");
    }

    println!("{}", "Stratification candidates:".bold());
    if report.candidates.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for candidate in &report.candidates {
        let kind = if candidate.categorical {
            "categorical"
        } else {
            "numeric"
        };
        println!(
            "  {:<24} {} classes ({kind})",
            candidate.column, candidate.classes
        );
    }

    match &report.suggested_stratify_column {
        Some(column) => println!("{} {}", "Suggested stratify column:".bold(), column.green()),
        None => println!("{} {}", "Suggested stratify column:".bold(), "none".dimmed()),
    }

    Ok(())
}
