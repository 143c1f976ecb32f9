// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod tradingview;
pub mod wealthfolio;

use tracing::{debug, info, warn};

use crate::classify::{Amounts, Decision, Route, classify};
use crate::error::RowErrorKind;
use crate::models::{ConversionOutcome, RawTransaction, SkipReason, TargetFormat, display_row};
use crate::symbols::{SymbolLookup, SymbolMap, symbol_for};

/// What a converter made of one routed row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowResult<R> {
    Records(Vec<R>),
    Skip(SkipReason),
    Error(RowErrorKind),
}

impl<R> RowResult<R> {
    pub fn one(record: R) -> Self {
        RowResult::Records(vec![record])
    }
}

/// Classify every row and hand the routed ones to `convert_row`. Rows never
/// influence each other, and no row aborts the run.
pub(crate) fn run<R, F>(
    format: TargetFormat,
    rows: &[RawTransaction],
    symbols: &SymbolMap,
    convert_row: F,
) -> ConversionOutcome<R>
where
    F: Fn(&RawTransaction, Route, &Amounts, &SymbolMap) -> RowResult<R>,
{
    let mut out = ConversionOutcome::default();
    for (index, tx) in rows.iter().enumerate() {
        let classified = classify(tx);
        let result = match classified.decision {
            Decision::Skip(reason) => RowResult::Skip(reason),
            Decision::Route(route) => {
                debug!(row = display_row(index, tx), ?route, "routed");
                convert_row(tx, route, &classified.amounts, symbols)
            }
        };
        match result {
            RowResult::Records(records) => out.records.extend(records),
            RowResult::Skip(reason) => {
                debug!(row = display_row(index, tx), %reason, "skipped");
                out.push_skip(index, tx, reason);
            }
            RowResult::Error(kind) => {
                debug!(row = display_row(index, tx), isin = %tx.isin, %kind, "row error");
                out.push_error(index, tx, kind);
            }
        }
    }
    info!(
        format = %format,
        rows = rows.len(),
        records = out.records.len(),
        skipped = out.skipped.len(),
        errors = out.errors.len(),
        "conversion finished"
    );
    out
}

/// Symbol for a row that names a security. Rows without an ISIN fall back to
/// `cash_fallback` when one is given (dividends booked on the cash account).
pub(crate) fn security_symbol(
    tx: &RawTransaction,
    symbols: &SymbolMap,
    format: TargetFormat,
    cash_fallback: Option<String>,
) -> Result<String, RowErrorKind> {
    let isin = tx.isin.trim();
    if isin.is_empty() {
        return cash_fallback.ok_or(RowErrorKind::MissingIsin);
    }
    match symbols.lookup(isin) {
        SymbolLookup::Resolved(resolved) => Ok(symbol_for(resolved, format)),
        SymbolLookup::Unresolved => Err(RowErrorKind::UnresolvedIsin),
        SymbolLookup::NotLookedUp => {
            warn!(isin, "ISIN missing from symbol map");
            Err(RowErrorKind::UnresolvedIsin)
        }
    }
}

/// Skip reason for an income row whose net value came out as zero.
pub(crate) fn zero_income_reason(amounts: &Amounts) -> SkipReason {
    if amounts.withheld().is_zero() {
        SkipReason::ZeroAmount
    } else {
        SkipReason::FullyWithheld
    }
}
