// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::models::{RawTransaction, SkipReason, TradeSide};
use crate::normalize::parse_locale_number;

/// What the broker's `type` column says the row is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    Buy,
    Sell,
    Dividend,
    Interest,
    Deposit,
    Withdrawal,
    Tax,
    Fee,
    TaxesAndFees,
    Unsupported,
}

// Ordered: exact matches are tried over the whole table first, then substring
// containment in this same order, so longer labels must precede their prefixes.
const TYPE_TABLE: &[(&str, TxKind)] = &[
    ("taxes and fees", TxKind::TaxesAndFees),
    ("savings plan", TxKind::Buy),
    ("sparplan", TxKind::Buy),
    ("buy", TxKind::Buy),
    ("sell", TxKind::Sell),
    ("dividend", TxKind::Dividend),
    ("distribution", TxKind::Dividend),
    ("interest", TxKind::Interest),
    ("deposit", TxKind::Deposit),
    ("withdrawal", TxKind::Withdrawal),
    ("taxes", TxKind::Tax),
    ("tax", TxKind::Tax),
    ("fee", TxKind::Fee),
    ("security transfer", TxKind::Unsupported),
    ("corporate action", TxKind::Unsupported),
    ("stock split", TxKind::Unsupported),
    ("spin-off", TxKind::Unsupported),
    ("transfer", TxKind::Unsupported),
    ("merger", TxKind::Unsupported),
    ("spin", TxKind::Unsupported),
];

const REJECTED_STATUSES: [&str; 5] = ["cancelled", "canceled", "rejected", "pending", "failed"];
const ACCEPTED_STATUSES: [&str; 3] = ["executed", "completed", "done"];

pub fn map_type(raw: &str) -> Option<TxKind> {
    let t = raw.trim().to_lowercase();
    if t.is_empty() {
        return None;
    }
    TYPE_TABLE
        .iter()
        .find(|(label, _)| *label == t)
        .or_else(|| TYPE_TABLE.iter().find(|(label, _)| t.contains(label)))
        .map(|(_, kind)| *kind)
}

/// Rows with a disallowed or unrecognised status never reach the type table.
pub fn status_gate(status: &str) -> Option<SkipReason> {
    let s = status.trim();
    if s.is_empty() {
        return None;
    }
    let lower = s.to_lowercase();
    if REJECTED_STATUSES.iter().any(|r| lower.contains(r)) {
        return Some(SkipReason::Status(s.to_string()));
    }
    if !ACCEPTED_STATUSES.iter().any(|a| lower.contains(a)) {
        return Some(SkipReason::UnknownStatus(s.to_string()));
    }
    None
}

pub fn is_reversal(tx: &RawTransaction) -> bool {
    let description = tx.description.to_lowercase();
    let reference = tx.reference.to_lowercase();
    description.contains("storno") || reference.contains("cancel") || reference.contains("storno")
}

/// "KKT-Abschluss": the periodic cash-account settlement booked as interest.
pub fn is_interest_settlement(tx: &RawTransaction, amount: Decimal) -> bool {
    let description = tx.description.to_lowercase();
    description.contains("kkt") || description.contains("abschluss") || amount < Decimal::ZERO
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Amounts {
    pub shares: Decimal,
    pub price: Decimal,
    pub amount: Decimal,
    pub fee: Decimal,
    pub tax: Decimal,
}

impl Amounts {
    pub fn from_row(tx: &RawTransaction) -> Self {
        Self {
            shares: parse_locale_number(&tx.shares),
            price: parse_locale_number(&tx.price),
            amount: parse_locale_number(&tx.amount),
            fee: parse_locale_number(&tx.fee),
            tax: parse_locale_number(&tx.tax),
        }
    }

    /// Fee and tax folded into one commission value. Saturates; rows where
    /// this would overflow are rejected by [`Amounts::in_range`] first.
    pub fn withheld(&self) -> Decimal {
        self.fee.abs().saturating_add(self.tax.abs())
    }

    /// Every product and sum the converters form from this row is representable.
    pub fn in_range(&self) -> bool {
        self.shares.checked_mul(self.price).is_some()
            && self.fee.abs().checked_add(self.tax.abs()).is_some()
            && self.tax.abs().checked_add(self.amount.abs()).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Trade(TradeSide),
    Dividend,
    Interest,
    /// Absolute tax and fee components; at least one is non-zero.
    InterestSettlement { tax: Decimal, fee: Decimal },
    Deposit,
    Withdrawal,
    Tax,
    Fee,
    FeeRefund,
    TaxesAndFees,
    Reversal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Route(Route),
    Skip(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub decision: Decision,
    pub amounts: Amounts,
}

pub fn classify(tx: &RawTransaction) -> Classified {
    let amounts = Amounts::from_row(tx);
    let decision = decide(tx, &amounts);
    Classified { decision, amounts }
}

fn decide(tx: &RawTransaction, amounts: &Amounts) -> Decision {
    if let Some(reason) = status_gate(&tx.status) {
        return Decision::Skip(reason);
    }

    let kind = match map_type(&tx.r#type) {
        Some(TxKind::Unsupported) | None => return Decision::Skip(SkipReason::UnsupportedType),
        Some(kind) => kind,
    };

    if !amounts.in_range() {
        return Decision::Skip(SkipReason::OutOfRange);
    }

    if is_reversal(tx) {
        if amounts.amount.is_zero() {
            return Decision::Skip(SkipReason::ZeroStornoAmount);
        }
        return Decision::Route(Route::Reversal);
    }

    match kind {
        TxKind::Buy => Decision::Route(Route::Trade(TradeSide::Buy)),
        TxKind::Sell => Decision::Route(Route::Trade(TradeSide::Sell)),
        TxKind::Dividend => Decision::Route(Route::Dividend),
        TxKind::Deposit => Decision::Route(Route::Deposit),
        TxKind::Withdrawal => Decision::Route(Route::Withdrawal),
        TxKind::TaxesAndFees => Decision::Route(Route::TaxesAndFees),
        TxKind::Fee => {
            if amounts.amount.is_zero() {
                Decision::Skip(SkipReason::ZeroFeeAmount)
            } else if amounts.amount > Decimal::ZERO {
                Decision::Route(Route::FeeRefund)
            } else {
                Decision::Route(Route::Fee)
            }
        }
        TxKind::Tax => {
            if amounts.amount.is_zero() {
                Decision::Skip(SkipReason::ZeroTaxAmount)
            } else {
                Decision::Route(Route::Tax)
            }
        }
        TxKind::Interest => {
            if !is_interest_settlement(tx, amounts.amount) {
                return Decision::Route(Route::Interest);
            }
            let tax = amounts.tax.abs();
            let fee = amounts.amount.abs();
            if tax.is_zero() && fee.is_zero() {
                Decision::Skip(SkipReason::ZeroSettlementAmount)
            } else {
                Decision::Route(Route::InterestSettlement { tax, fee })
            }
        }
        TxKind::Unsupported => Decision::Skip(SkipReason::UnsupportedType),
    }
}
