// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, RowErrorKind};

pub const DEFAULT_CURRENCY: &str = "EUR";

/// One row of the broker export, as text. Fields are trimmed; numbers stay
/// locale-formatted until the classifier parses them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub date: String,
    pub time: String,
    pub status: String,
    pub reference: String,
    pub description: String,
    pub asset_type: String,
    pub r#type: String,
    pub isin: String,
    pub shares: String,
    pub price: String,
    pub amount: String,
    pub fee: String,
    pub tax: String,
    pub currency: String,
    /// 1-based line in the source file where the record starts; 0 when unknown.
    #[serde(default)]
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    TradingView,
    #[default]
    Wealthfolio,
}

impl TargetFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetFormat::TradingView => "tradingview",
            TargetFormat::Wealthfolio => "wealthfolio",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tradingview" | "tv" => Ok(TargetFormat::TradingView),
            "wealthfolio" | "wf" => Ok(TargetFormat::Wealthfolio),
            other => Err(Error::InvalidFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// `Side` column of the TradingView import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradingViewSide {
    Buy,
    Sell,
    Dividend,
    Withdrawal,
    Deposit,
    #[serde(rename = "Taxes and fees")]
    TaxesAndFees,
}

impl TradingViewSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradingViewSide::Buy => "Buy",
            TradingViewSide::Sell => "Sell",
            TradingViewSide::Dividend => "Dividend",
            TradingViewSide::Withdrawal => "Withdrawal",
            TradingViewSide::Deposit => "Deposit",
            TradingViewSide::TaxesAndFees => "Taxes and fees",
        }
    }

    pub fn trade_side(&self) -> Option<TradeSide> {
        match self {
            TradingViewSide::Buy => Some(TradeSide::Buy),
            TradingViewSide::Sell => Some(TradeSide::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for TradingViewSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `activityType` column of the Wealthfolio import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Buy,
    Sell,
    Dividend,
    Interest,
    Deposit,
    Withdrawal,
    Fee,
    Tax,
    TransferIn,
    TransferOut,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Buy => "BUY",
            ActivityType::Sell => "SELL",
            ActivityType::Dividend => "DIVIDEND",
            ActivityType::Interest => "INTEREST",
            ActivityType::Deposit => "DEPOSIT",
            ActivityType::Withdrawal => "WITHDRAWAL",
            ActivityType::Fee => "FEE",
            ActivityType::Tax => "TAX",
            ActivityType::TransferIn => "TRANSFER_IN",
            ActivityType::TransferOut => "TRANSFER_OUT",
        }
    }

    pub fn trade_side(&self) -> Option<TradeSide> {
        match self {
            ActivityType::Buy => Some(TradeSide::Buy),
            ActivityType::Sell => Some(TradeSide::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingViewRecord {
    pub symbol: String,
    pub side: TradingViewSide,
    pub qty: Decimal,
    pub fill_price: Decimal,
    pub commission: Decimal,
    pub closing_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WealthfolioRecord {
    pub date: String,
    pub symbol: String,
    pub quantity: Decimal,
    pub activity_type: ActivityType,
    pub unit_price: Decimal,
    pub currency: String,
    pub fee: Decimal,
    pub amount: Decimal,
}

/// Why a row was left out of the output without being an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    Status(String),
    UnknownStatus(String),
    UnsupportedType,
    ZeroStornoAmount,
    ZeroFeeAmount,
    ZeroSettlementAmount,
    ZeroTaxAmount,
    NoQuantity,
    ZeroAmount,
    FullyWithheld,
    OutOfRange,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Status(s) => write!(f, "Status: {}", s),
            SkipReason::UnknownStatus(s) => write!(f, "Unknown status: {}", s),
            SkipReason::UnsupportedType => f.write_str("Transaction type not supported"),
            SkipReason::ZeroStornoAmount => f.write_str("Zero amount STORNO transaction"),
            SkipReason::ZeroFeeAmount => f.write_str("Zero fee amount"),
            SkipReason::ZeroSettlementAmount => {
                f.write_str("Zero tax/fee amount in interest settlement")
            }
            SkipReason::ZeroTaxAmount => f.write_str("Zero tax amount"),
            SkipReason::NoQuantity => f.write_str("No shares/quantity specified"),
            SkipReason::ZeroAmount => f.write_str("Zero amount"),
            SkipReason::FullyWithheld => f.write_str("Fully withheld: amount offset by fee/tax"),
            SkipReason::OutOfRange => f.write_str("Numeric value out of range"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    pub row: usize,
    pub isin: String,
    pub description: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRow {
    pub row: usize,
    pub r#type: String,
    pub description: String,
    pub reason: String,
}

/// Row number shown in diagnostics: the source line when the parser recorded
/// one, otherwise the zero-based index counted from line 2 (header is line 1).
pub fn display_row(index: usize, tx: &RawTransaction) -> usize {
    if tx.line > 0 { tx.line } else { index + 2 }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutcome<R> {
    pub records: Vec<R>,
    pub errors: Vec<RowError>,
    pub skipped: Vec<SkippedRow>,
}

impl<R> Default for ConversionOutcome<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            errors: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<R> ConversionOutcome<R> {
    pub fn push_error(&mut self, index: usize, tx: &RawTransaction, kind: RowErrorKind) {
        self.errors.push(RowError {
            row: display_row(index, tx),
            isin: tx.isin.clone(),
            description: tx.description.clone(),
            error: kind.to_string(),
        });
    }

    pub fn push_skip(&mut self, index: usize, tx: &RawTransaction, reason: SkipReason) {
        self.skipped.push(SkippedRow {
            row: display_row(index, tx),
            r#type: tx.r#type.clone(),
            description: tx.description.clone(),
            reason: reason.to_string(),
        });
    }
}
