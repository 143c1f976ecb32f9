// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Required column '{0}' not found in header")]
    MissingColumn(String),

    #[error("Unknown format '{0}' (use tradingview|wealthfolio)")]
    InvalidFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Per-row failure that sends a transaction to the error list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RowErrorKind {
    #[error("Missing ISIN for trade transaction")]
    MissingIsin,

    #[error("Could not resolve ISIN to ticker symbol")]
    UnresolvedIsin,

    #[error("Symbol contains a comma, quote or line break")]
    UnquotableSymbol,
}
