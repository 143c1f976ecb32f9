// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use csv::{QuoteStyle, WriterBuilder};

use crate::error::{Error, Result};
use crate::models::{TradingViewRecord, WealthfolioRecord};
use crate::normalize::fmt_decimal;

pub const TRADINGVIEW_HEADER: [&str; 6] =
    ["Symbol", "Side", "Qty", "Fill Price", "Commission", "Closing Time"];

pub const WEALTHFOLIO_HEADER: [&str; 8] = [
    "date",
    "symbol",
    "quantity",
    "activityType",
    "unitPrice",
    "currency",
    "fee",
    "amount",
];

/// Whether `field` can be written without quoting and still read back as one field.
pub fn is_plain_field(field: &str) -> bool {
    !field.contains([',', '"', '\n', '\r'])
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::Io(std::io::Error::other(e)))
}

/// Fields are written verbatim, never quoted. The converter rejects symbols that
/// fail [`is_plain_field`].
pub fn to_tradingview_csv(records: &[TradingViewRecord]) -> Result<String> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_writer(Vec::new());
    wtr.write_record(TRADINGVIEW_HEADER)?;
    for r in records {
        wtr.write_record([
            r.symbol.as_str(),
            r.side.as_str(),
            fmt_decimal(&r.qty).as_str(),
            fmt_decimal(&r.fill_price).as_str(),
            fmt_decimal(&r.commission).as_str(),
            r.closing_time.as_str(),
        ])?;
    }
    finish(wtr)
}

pub fn to_wealthfolio_csv(records: &[WealthfolioRecord]) -> Result<String> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());
    wtr.write_record(WEALTHFOLIO_HEADER)?;
    for r in records {
        wtr.write_record([
            r.date.as_str(),
            r.symbol.as_str(),
            fmt_decimal(&r.quantity).as_str(),
            r.activity_type.as_str(),
            fmt_decimal(&r.unit_price).as_str(),
            r.currency.as_str(),
            fmt_decimal(&r.fee).as_str(),
            fmt_decimal(&r.amount).as_str(),
        ])?;
    }
    finish(wtr)
}
