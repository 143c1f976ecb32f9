// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Wealthfolio activity import: suffixed tickers, cash on `$CASH-{currency}`.

use rust_decimal::Decimal;

use super::{RowResult, run, security_symbol, zero_income_reason};
use crate::classify::{Amounts, Route};
use crate::models::{
    ActivityType, ConversionOutcome, DEFAULT_CURRENCY, RawTransaction, SkipReason, TargetFormat,
    TradeSide, WealthfolioRecord,
};
use crate::normalize::{TimestampStyle, format_timestamp};
use crate::symbols::SymbolMap;

pub fn cash_symbol(currency: &str) -> String {
    format!("$CASH-{}", currency)
}

pub fn convert(rows: &[RawTransaction], symbols: &SymbolMap) -> ConversionOutcome<WealthfolioRecord> {
    run(TargetFormat::Wealthfolio, rows, symbols, convert_row)
}

fn convert_row(
    tx: &RawTransaction,
    route: Route,
    amounts: &Amounts,
    symbols: &SymbolMap,
) -> RowResult<WealthfolioRecord> {
    let date = format_timestamp(&tx.date, &tx.time, TimestampStyle::IsoUtcMillis);
    let currency = match tx.currency.trim() {
        "" => DEFAULT_CURRENCY.to_string(),
        c => c.to_string(),
    };
    let cash = cash_symbol(&currency);
    let activity = |symbol: String, activity_type, quantity: Decimal, unit_price: Decimal, fee| {
        WealthfolioRecord {
            date: date.clone(),
            symbol,
            quantity,
            activity_type,
            unit_price,
            currency: currency.clone(),
            fee,
            amount: quantity.saturating_mul(unit_price),
        }
    };
    let on_cash = |activity_type, value: Decimal, fee| {
        activity(cash.clone(), activity_type, Decimal::ONE, value, fee)
    };

    match route {
        Route::Trade(side) => {
            let symbol = match security_symbol(tx, symbols, TargetFormat::Wealthfolio, None) {
                Ok(s) => s,
                Err(kind) => return RowResult::Error(kind),
            };
            let quantity = amounts.shares.abs();
            if quantity.is_zero() {
                return RowResult::Skip(SkipReason::NoQuantity);
            }
            let activity_type = match side {
                TradeSide::Buy => ActivityType::Buy,
                TradeSide::Sell => ActivityType::Sell,
            };
            RowResult::one(activity(
                symbol,
                activity_type,
                quantity,
                amounts.price,
                amounts.withheld(),
            ))
        }
        Route::Dividend => {
            let symbol = match security_symbol(tx, symbols, TargetFormat::Wealthfolio, Some(cash.clone())) {
                Ok(s) => s,
                Err(kind) => return RowResult::Error(kind),
            };
            let value = amounts.amount.abs();
            if value.is_zero() {
                return RowResult::Skip(zero_income_reason(amounts));
            }
            RowResult::one(activity(
                symbol,
                ActivityType::Dividend,
                Decimal::ONE,
                value,
                amounts.withheld(),
            ))
        }
        Route::Interest => {
            let value = amounts.amount.abs();
            if value.is_zero() {
                return RowResult::Skip(zero_income_reason(amounts));
            }
            RowResult::one(on_cash(ActivityType::Interest, value, amounts.withheld()))
        }
        Route::Deposit | Route::Withdrawal => {
            let value = amounts.amount.abs();
            if value.is_zero() {
                return RowResult::Skip(SkipReason::ZeroAmount);
            }
            let activity_type = if route == Route::Deposit {
                ActivityType::Deposit
            } else {
                ActivityType::Withdrawal
            };
            RowResult::one(on_cash(activity_type, value, amounts.withheld()))
        }
        Route::Reversal | Route::FeeRefund => RowResult::one(on_cash(
            ActivityType::Deposit,
            amounts.amount.abs(),
            Decimal::ZERO,
        )),
        Route::Tax => RowResult::one(on_cash(ActivityType::Tax, amounts.amount.abs(), Decimal::ZERO)),
        Route::Fee => RowResult::one(on_cash(ActivityType::Fee, amounts.amount.abs(), Decimal::ZERO)),
        Route::TaxesAndFees => {
            let mut value = amounts.amount.abs();
            if value.is_zero() {
                value = amounts.withheld();
            }
            if value.is_zero() {
                return RowResult::Skip(SkipReason::ZeroFeeAmount);
            }
            RowResult::one(on_cash(ActivityType::Fee, value, Decimal::ZERO))
        }
        // Tax first, then the fee part of the settlement.
        Route::InterestSettlement { tax, fee } => {
            let mut records = Vec::with_capacity(2);
            if !tax.is_zero() {
                records.push(on_cash(ActivityType::Tax, tax, Decimal::ZERO));
            }
            if !fee.is_zero() {
                records.push(on_cash(ActivityType::Fee, fee, Decimal::ZERO));
            }
            RowResult::Records(records)
        }
    }
}
