// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! TradingView portfolio import: exchange-prefixed symbols, cash on `$CASH`.

use rust_decimal::Decimal;

use super::{RowResult, run, security_symbol, zero_income_reason};
use crate::classify::{Amounts, Route};
use crate::models::{
    ConversionOutcome, RawTransaction, SkipReason, TargetFormat, TradeSide, TradingViewRecord,
    TradingViewSide,
};
use crate::error::RowErrorKind;
use crate::normalize::{TimestampStyle, format_timestamp};
use crate::serialize::is_plain_field;
use crate::symbols::SymbolMap;

pub const CASH_SYMBOL: &str = "$CASH";

pub fn convert(rows: &[RawTransaction], symbols: &SymbolMap) -> ConversionOutcome<TradingViewRecord> {
    run(TargetFormat::TradingView, rows, symbols, convert_row)
}

fn convert_row(
    tx: &RawTransaction,
    route: Route,
    amounts: &Amounts,
    symbols: &SymbolMap,
) -> RowResult<TradingViewRecord> {
    let closing_time = format_timestamp(&tx.date, &tx.time, TimestampStyle::Spaced);
    let record = |symbol: String, side, qty, fill_price, commission| TradingViewRecord {
        symbol,
        side,
        qty,
        fill_price,
        commission,
        closing_time: closing_time.clone(),
    };
    let cash = |side, value: Decimal, commission| {
        record(CASH_SYMBOL.to_string(), side, Decimal::ONE, value, commission)
    };
    let taxes_and_fees = |value: Decimal| {
        record(
            CASH_SYMBOL.to_string(),
            TradingViewSide::TaxesAndFees,
            Decimal::ZERO,
            Decimal::ZERO,
            value,
        )
    };

    match route {
        Route::Trade(side) => {
            let symbol = match plain_symbol(tx, symbols, None) {
                Ok(s) => s,
                Err(kind) => return RowResult::Error(kind),
            };
            let qty = amounts.shares.abs();
            if qty.is_zero() {
                return RowResult::Skip(SkipReason::NoQuantity);
            }
            let side = match side {
                TradeSide::Buy => TradingViewSide::Buy,
                TradeSide::Sell => TradingViewSide::Sell,
            };
            RowResult::one(record(symbol, side, qty, amounts.price, amounts.withheld()))
        }
        Route::Dividend => {
            let fallback = Some(CASH_SYMBOL.to_string());
            let symbol = match plain_symbol(tx, symbols, fallback) {
                Ok(s) => s,
                Err(kind) => return RowResult::Error(kind),
            };
            let value = amounts.amount.abs();
            if value.is_zero() {
                return RowResult::Skip(zero_income_reason(amounts));
            }
            RowResult::one(record(
                symbol,
                TradingViewSide::Dividend,
                Decimal::ONE,
                value,
                amounts.withheld(),
            ))
        }
        // No interest side on this platform; interest lands on the cash balance.
        Route::Interest => {
            let value = amounts.amount.abs();
            if value.is_zero() {
                return RowResult::Skip(zero_income_reason(amounts));
            }
            RowResult::one(cash(TradingViewSide::Deposit, value, amounts.withheld()))
        }
        Route::Deposit | Route::Withdrawal => {
            let value = amounts.amount.abs();
            if value.is_zero() {
                return RowResult::Skip(SkipReason::ZeroAmount);
            }
            let side = if route == Route::Deposit {
                TradingViewSide::Deposit
            } else {
                TradingViewSide::Withdrawal
            };
            RowResult::one(cash(side, value, amounts.withheld()))
        }
        Route::Reversal | Route::FeeRefund => RowResult::one(cash(
            TradingViewSide::Deposit,
            amounts.amount.abs(),
            Decimal::ZERO,
        )),
        Route::Tax | Route::Fee => RowResult::one(taxes_and_fees(amounts.amount.abs())),
        Route::TaxesAndFees => {
            let mut value = amounts.amount.abs();
            if value.is_zero() {
                value = amounts.withheld();
            }
            if value.is_zero() {
                return RowResult::Skip(SkipReason::ZeroFeeAmount);
            }
            RowResult::one(taxes_and_fees(value))
        }
        Route::InterestSettlement { tax, fee } => RowResult::one(taxes_and_fees(tax + fee)),
    }
}

// Output is unquoted, so a delimiter inside a symbol would shift the columns.
fn plain_symbol(
    tx: &RawTransaction,
    symbols: &SymbolMap,
    cash_fallback: Option<String>,
) -> Result<String, RowErrorKind> {
    let symbol = security_symbol(tx, symbols, TargetFormat::TradingView, cash_fallback)?;
    if is_plain_field(&symbol) {
        Ok(symbol)
    } else {
        Err(RowErrorKind::UnquotableSymbol)
    }
}
