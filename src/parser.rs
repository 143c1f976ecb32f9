// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{HashMap, HashSet};

use csv::{ReaderBuilder, Trim};
use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::{DEFAULT_CURRENCY, RawTransaction};

pub const COLUMNS: [&str; 14] = [
    "date",
    "time",
    "status",
    "reference",
    "description",
    "assettype",
    "type",
    "isin",
    "shares",
    "price",
    "amount",
    "fee",
    "tax",
    "currency",
];

#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedInput {
    pub rows: Vec<RawTransaction>,
    /// Non-fatal problems: malformed records, encoding issues.
    pub errors: Vec<String>,
}

pub fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    if header.contains(';') { b';' } else { b',' }
}

fn decode(content: &[u8], errors: &mut Vec<String>) -> String {
    let content = content.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(content);
    match std::str::from_utf8(content) {
        Ok(s) => s.to_string(),
        Err(e) => {
            warn!(valid_up_to = e.valid_up_to(), "input is not valid UTF-8, decoding lossily");
            errors.push(format!(
                "Invalid UTF-8 at byte {}; some characters were replaced",
                e.valid_up_to()
            ));
            String::from_utf8_lossy(content).into_owned()
        }
    }
}

fn strip_quotes(s: &str) -> String {
    s.trim().trim_matches('"').trim().to_string()
}

pub fn parse_transactions(content: &[u8]) -> Result<ParsedInput> {
    parse_transactions_with_currency(content, DEFAULT_CURRENCY)
}

/// Like [`parse_transactions`], filling empty `currency` cells with `default_currency`.
pub fn parse_transactions_with_currency(content: &[u8], default_currency: &str) -> Result<ParsedInput> {
    let mut errors = Vec::new();
    let text = decode(content, &mut errors);
    let delimiter = detect_delimiter(&text);

    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = rdr.headers()?.clone();
    let idx: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().trim_matches('"').to_lowercase(), i))
        .collect();
    if !idx.contains_key("type") {
        return Err(Error::MissingColumn("type".to_string()));
    }
    for col in COLUMNS.iter().filter(|c| !idx.contains_key(**c)) {
        warn!(column = *col, "expected column missing, reading as empty");
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let rec = match result {
            Ok(rec) => rec,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                errors.push(format!("Row {}: {}", line, e));
                continue;
            }
        };
        if rec.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let line = rec.position().map(|p| p.line() as usize).unwrap_or(0);
        if rec.len() != headers.len() {
            warn!(line, fields = rec.len(), "record length differs from header");
            errors.push(format!(
                "Row {}: expected {} fields, found {}",
                line,
                headers.len(),
                rec.len()
            ));
            continue;
        }
        let get = |col: &str| -> String {
            idx.get(col)
                .and_then(|&c| rec.get(c))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };
        let currency = get("currency");
        rows.push(RawTransaction {
            date: get("date"),
            time: get("time"),
            status: get("status"),
            reference: strip_quotes(&get("reference")),
            description: strip_quotes(&get("description")),
            asset_type: get("assettype"),
            r#type: get("type"),
            isin: get("isin"),
            shares: get("shares"),
            price: get("price"),
            amount: get("amount"),
            fee: get("fee"),
            tax: get("tax"),
            currency: if currency.is_empty() {
                default_currency.to_string()
            } else {
                currency
            },
            line,
        });
    }

    Ok(ParsedInput { rows, errors })
}

/// Distinct non-empty ISINs in first-seen order.
pub fn unique_isins(rows: &[RawTransaction]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .map(|r| r.isin.trim())
        .filter(|isin| !isin.is_empty())
        .filter(|isin| seen.insert(isin.to_string()))
        .map(str::to_string)
        .collect()
}
