// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use std::fs;

use crate::models::{RowError, SkippedRow};

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn skipped_table(skipped: &[SkippedRow]) -> Table {
    let rows = skipped
        .iter()
        .map(|s| {
            vec![
                s.row.to_string(),
                s.r#type.clone(),
                s.description.clone(),
                s.reason.clone(),
            ]
        })
        .collect();
    pretty_table(&["Row", "Type", "Description", "Reason"], rows)
}

pub fn errors_table(errors: &[RowError]) -> Table {
    let rows = errors
        .iter()
        .map(|e| {
            vec![
                e.row.to_string(),
                e.isin.clone(),
                e.description.clone(),
                e.error.clone(),
            ]
        })
        .collect();
    pretty_table(&["Row", "ISIN", "Description", "Error"], rows)
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}

pub fn read_input(path: &str) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Open CSV {}", path))
}

/// Write to `out`, or to stdout when no path is given.
pub fn write_output(out: Option<&str>, text: &str) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Write {}", path))?;
        }
        None => print!("{}", text),
    }
    Ok(())
}
