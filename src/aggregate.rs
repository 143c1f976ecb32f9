// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Merge runs of consecutive same-symbol, same-side trades into one record at
//! the quantity-weighted average price.
//!
//! Grouping is positional: two runs of the same symbol separated by any other
//! record stay separate.

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{TradeSide, TradingViewRecord, WealthfolioRecord};

/// Decimal places kept on a merged average price.
pub const AVERAGE_PRICE_DP: u32 = 8;

pub trait Aggregatable: Sized {
    /// `Some` only for buys and sells; everything else breaks a run.
    fn group_key(&self) -> Option<(&str, TradeSide)>;
    fn quantity(&self) -> Decimal;
    fn unit_price(&self) -> Decimal;
    fn fee(&self) -> Decimal;
    /// Build the merged record, taking timestamp and the rest from `last`.
    fn merged(last: Self, quantity: Decimal, unit_price: Decimal, fee: Decimal) -> Self;
}

impl Aggregatable for TradingViewRecord {
    fn group_key(&self) -> Option<(&str, TradeSide)> {
        self.side.trade_side().map(|s| (self.symbol.as_str(), s))
    }

    fn quantity(&self) -> Decimal {
        self.qty
    }

    fn unit_price(&self) -> Decimal {
        self.fill_price
    }

    fn fee(&self) -> Decimal {
        self.commission
    }

    fn merged(last: Self, quantity: Decimal, unit_price: Decimal, fee: Decimal) -> Self {
        TradingViewRecord {
            qty: quantity,
            fill_price: unit_price,
            commission: fee,
            ..last
        }
    }
}

impl Aggregatable for WealthfolioRecord {
    fn group_key(&self) -> Option<(&str, TradeSide)> {
        self.activity_type
            .trade_side()
            .map(|s| (self.symbol.as_str(), s))
    }

    fn quantity(&self) -> Decimal {
        self.quantity
    }

    fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    fn fee(&self) -> Decimal {
        self.fee
    }

    fn merged(last: Self, quantity: Decimal, unit_price: Decimal, fee: Decimal) -> Self {
        WealthfolioRecord {
            quantity,
            unit_price,
            fee,
            amount: quantity.saturating_mul(unit_price),
            ..last
        }
    }
}

#[derive(Debug)]
pub enum GroupState<R> {
    Empty,
    Accumulating {
        symbol: String,
        side: TradeSide,
        items: Vec<R>,
    },
}

#[derive(Debug)]
pub struct Aggregator<R> {
    state: GroupState<R>,
    out: Vec<R>,
}

impl<R: Aggregatable> Default for Aggregator<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Aggregatable> Aggregator<R> {
    pub fn new() -> Self {
        Self {
            state: GroupState::Empty,
            out: Vec::new(),
        }
    }

    pub fn state(&self) -> &GroupState<R> {
        &self.state
    }

    pub fn push(&mut self, record: R) {
        let key = record
            .group_key()
            .map(|(symbol, side)| (symbol.to_string(), side));

        let Some((symbol, side)) = key else {
            self.flush();
            self.out.push(record);
            return;
        };

        if let GroupState::Accumulating {
            symbol: current,
            side: current_side,
            items,
        } = &mut self.state
        {
            if *current == symbol && *current_side == side {
                items.push(record);
                return;
            }
        }

        self.flush();
        self.state = GroupState::Accumulating {
            symbol,
            side,
            items: vec![record],
        };
    }

    pub fn flush(&mut self) {
        if let GroupState::Accumulating { items, .. } =
            std::mem::replace(&mut self.state, GroupState::Empty)
        {
            self.out.extend(merge_group(items));
        }
    }

    pub fn finish(mut self) -> Vec<R> {
        self.flush();
        self.out
    }
}

/// Collapse a group into one record. A single record passes through as is, and
/// a group whose totals do not fit in a `Decimal` is passed through unmerged.
///
/// # Panics
///
/// Panics on an empty group; the state machine never produces one.
pub fn merge_group<R: Aggregatable>(mut items: Vec<R>) -> Vec<R> {
    assert!(!items.is_empty(), "merge_group called with an empty group");
    if items.len() == 1 {
        return items;
    }

    let Some((quantity, unit_price, fee)) = totals(&items) else {
        warn!(records = items.len(), "group totals overflow, keeping trades unmerged");
        return items;
    };
    match items.pop() {
        Some(last) => vec![R::merged(last, quantity, unit_price, fee)],
        None => items,
    }
}

fn totals<R: Aggregatable>(items: &[R]) -> Option<(Decimal, Decimal, Decimal)> {
    let mut quantity = Decimal::ZERO;
    let mut cost = Decimal::ZERO;
    let mut fee = Decimal::ZERO;
    for item in items {
        quantity = quantity.checked_add(item.quantity())?;
        cost = cost.checked_add(item.quantity().checked_mul(item.unit_price())?)?;
        fee = fee.checked_add(item.fee())?;
    }
    let unit_price = if quantity.is_zero() {
        Decimal::ZERO
    } else {
        cost.checked_div(quantity)?.round_dp(AVERAGE_PRICE_DP)
    };
    // merged records may recompute quantity x price
    quantity.checked_mul(unit_price)?;
    Some((quantity, unit_price, fee))
}

pub fn aggregate<R: Aggregatable>(records: Vec<R>) -> Vec<R> {
    let mut aggregator = Aggregator::new();
    for record in records {
        aggregator.push(record);
    }
    aggregator.finish()
}
