// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use tracing::warn;

use crate::aggregate::{Aggregatable, aggregate};
use crate::config::Settings;
use crate::convert::{tradingview, wealthfolio};
use crate::models::{RowError, SkippedRow, TargetFormat};
use crate::parser::parse_transactions_with_currency;
use crate::serialize::{to_tradingview_csv, to_wealthfolio_csv};
use crate::symbols::SymbolMap;
use crate::utils::{errors_table, maybe_print_json, read_input, skipped_table, write_output};

/// Diagnostics for one conversion run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub format: TargetFormat,
    pub rows: usize,
    pub records: usize,
    pub parse_errors: Vec<String>,
    pub errors: Vec<RowError>,
    pub skipped: Vec<SkippedRow>,
}

pub fn handle(settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let input = m.get_one::<String>("input").unwrap().trim();
    let parsed = parse_transactions_with_currency(&read_input(input)?, &settings.default_currency)
        .with_context(|| format!("Parse CSV {}", input))?;
    for e in &parsed.errors {
        warn!("{}", e);
    }

    let symbols = match m.get_one::<String>("symbols").map(|s| s.trim()) {
        Some(path) => {
            let text =
                fs::read_to_string(path).with_context(|| format!("Open symbol map {}", path))?;
            SymbolMap::from_json(&text).with_context(|| format!("Invalid symbol map {}", path))?
        }
        None => SymbolMap::new(),
    };

    let format = match m.get_one::<String>("format") {
        Some(f) => f.parse::<TargetFormat>()?,
        None => settings.default_format,
    };
    let merge = if m.get_flag("aggregate") {
        true
    } else if m.get_flag("no_aggregate") {
        false
    } else {
        settings.aggregate
    };
    let out = m.get_one::<String>("out").map(|s| s.trim());

    let (csv_text, records, errors, skipped) = match format {
        TargetFormat::TradingView => {
            let outcome = tradingview::convert(&parsed.rows, &symbols);
            let records = maybe_aggregate(outcome.records, merge);
            (to_tradingview_csv(&records)?, records.len(), outcome.errors, outcome.skipped)
        }
        TargetFormat::Wealthfolio => {
            let outcome = wealthfolio::convert(&parsed.rows, &symbols);
            let records = maybe_aggregate(outcome.records, merge);
            (to_wealthfolio_csv(&records)?, records.len(), outcome.errors, outcome.skipped)
        }
    };
    write_output(out, &csv_text)?;

    let report = Report {
        format,
        rows: parsed.rows.len(),
        records,
        parse_errors: parsed.errors,
        errors,
        skipped,
    };

    if let Some(path) = m.get_one::<String>("report").map(|s| s.trim()) {
        fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("Write report {}", path))?;
    }

    if maybe_print_json(m.get_flag("json"), &report)? {
        return Ok(());
    }
    print_summary(&report, out);
    Ok(())
}

fn maybe_aggregate<R: Aggregatable>(records: Vec<R>, merge: bool) -> Vec<R> {
    if merge { aggregate(records) } else { records }
}

// Summary goes to stderr so stdout can carry the CSV.
fn print_summary(report: &Report, out: Option<&str>) {
    eprintln!(
        "Converted {} of {} rows to {} ({} records, {} skipped, {} errors)",
        report
            .rows
            .saturating_sub(report.skipped.len() + report.errors.len()),
        report.rows,
        report.format,
        report.records,
        report.skipped.len(),
        report.errors.len()
    );
    if let Some(path) = out {
        eprintln!("Wrote {}", path);
    }
    if !report.parse_errors.is_empty() {
        for e in &report.parse_errors {
            eprintln!("parse error: {}", e);
        }
    }
    if !report.skipped.is_empty() {
        eprintln!("{}", skipped_table(&report.skipped));
    }
    if !report.errors.is_empty() {
        eprintln!("{}", errors_table(&report.errors));
    }
}
