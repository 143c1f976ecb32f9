// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use std::str::FromStr;
use tradeport::convert::{tradingview, wealthfolio};
use tradeport::models::{ActivityType, RawTransaction, TradingViewSide};
use tradeport::symbols::{ResolvedSymbol, SymbolMap};

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn symbols() -> SymbolMap {
    let mut map = SymbolMap::new();
    map.insert(
        "DE000A0H0744",
        Some(ResolvedSymbol {
            ticker: "4COP".into(),
            exchange: "XETR".into(),
            exchange_code: "GY".into(),
            full_symbol_primary: "XETR:4COP".into(),
            ..Default::default()
        }),
    );
    map.insert("US0000000001", None);
    map
}

fn row(kind: &str, isin: &str, shares: &str, price: &str, amount: &str, fee: &str, tax: &str) -> RawTransaction {
    RawTransaction {
        date: "2024-05-02".into(),
        time: "10:15".into(),
        status: "Executed".into(),
        description: "Test row".into(),
        r#type: kind.into(),
        isin: isin.into(),
        shares: shares.into(),
        price: price.into(),
        amount: amount.into(),
        fee: fee.into(),
        tax: tax.into(),
        currency: "EUR".into(),
        ..Default::default()
    }
}

#[test]
fn tradingview_buy_end_to_end() {
    let rows = vec![row("Buy", "DE000A0H0744", "10", "25,50", "-255,00", "0,99", "0,00")];
    let out = tradingview::convert(&rows, &symbols());
    assert!(out.errors.is_empty());
    assert!(out.skipped.is_empty());
    assert_eq!(out.records.len(), 1);
    let r = &out.records[0];
    assert_eq!(r.symbol, "XETR:4COP");
    assert_eq!(r.side, TradingViewSide::Buy);
    assert_eq!(r.qty, d("10"));
    assert_eq!(r.fill_price, d("25.5"));
    assert_eq!(r.commission, d("0.99"));
    assert_eq!(r.closing_time, "2024-05-02 10:15:00");
}

#[test]
fn wealthfolio_buy_uses_suffix_and_gross_amount() {
    let rows = vec![row("Savings plan", "DE000A0H0744", "2", "25,50", "-51,00", "0,00", "0,00")];
    let out = wealthfolio::convert(&rows, &symbols());
    let r = &out.records[0];
    assert_eq!(r.symbol, "4COP.DE");
    assert_eq!(r.activity_type, ActivityType::Buy);
    assert_eq!(r.quantity, d("2"));
    assert_eq!(r.unit_price, d("25.5"));
    assert_eq!(r.amount, d("51"));
    assert_eq!(r.fee, Decimal::ZERO);
    assert_eq!(r.currency, "EUR");
    assert_eq!(r.date, "2024-05-02T10:15:00.000Z");
}

#[test]
fn missing_and_unresolved_isins_are_errors() {
    let rows = vec![
        row("Buy", "", "1", "10", "-10", "", ""),
        row("Sell", "US0000000001", "1", "10", "10", "", ""),
        row("Sell", "FR0000120271", "1", "10", "10", "", ""),
    ];
    for (errors, skipped, records) in [
        {
            let o = tradingview::convert(&rows, &symbols());
            (o.errors, o.skipped.len(), o.records.len())
        },
        {
            let o = wealthfolio::convert(&rows, &symbols());
            (o.errors, o.skipped.len(), o.records.len())
        },
    ] {
        assert_eq!(records, 0);
        assert_eq!(skipped, 0);
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].row, 2);
        assert!(errors[0].error.contains("Missing ISIN"));
        assert_eq!(errors[1].row, 3);
        assert_eq!(errors[1].error, "Could not resolve ISIN to ticker symbol");
        assert_eq!(errors[2].isin, "FR0000120271");
    }
}

#[test]
fn cancelled_rows_only_appear_in_skipped() {
    let mut cancelled = row("Buy", "", "1", "10", "-10", "", "");
    cancelled.status = "Cancelled".into();
    let mut rejected = row("Dividend", "DE000A0H0744", "", "", "5", "", "");
    rejected.status = "Rejected".into();
    let mut pending = row("Deposit", "", "", "", "100", "", "");
    pending.status = "Pending".into();
    let rows = vec![cancelled, rejected, pending];

    let out = wealthfolio::convert(&rows, &symbols());
    assert!(out.records.is_empty());
    assert!(out.errors.is_empty());
    assert_eq!(out.skipped.len(), 3);
    assert_eq!(out.skipped[0].reason, "Status: Cancelled");
    assert_eq!(out.skipped[2].row, 4);
    assert_eq!(out.skipped[1].r#type, "Dividend");
}

#[test]
fn interest_settlement_splits_tax_then_fee() {
    let mut r = row("Interest", "", "", "", "-155,04", "", "185,98");
    r.description = "KKT-Abschluss".into();
    let rows = vec![r];

    let out = wealthfolio::convert(&rows, &symbols());
    assert_eq!(out.records.len(), 2);
    assert_eq!(out.records[0].activity_type, ActivityType::Tax);
    assert_eq!(out.records[0].unit_price, d("185.98"));
    assert_eq!(out.records[0].amount, d("185.98"));
    assert_eq!(out.records[0].symbol, "$CASH-EUR");
    assert_eq!(out.records[1].activity_type, ActivityType::Fee);
    assert_eq!(out.records[1].unit_price, d("155.04"));

    let out = tradingview::convert(&rows, &symbols());
    assert_eq!(out.records.len(), 1);
    assert_eq!(out.records[0].side, TradingViewSide::TaxesAndFees);
    assert_eq!(out.records[0].symbol, "$CASH");
    assert_eq!(out.records[0].commission, d("341.02"));
}

#[test]
fn storno_interest_becomes_deposit() {
    let mut r = row("Interest", "", "", "", "12,34", "", "");
    r.description = "Zinsen STORNO".into();
    let rows = vec![r];

    let wf = wealthfolio::convert(&rows, &symbols());
    assert_eq!(wf.records.len(), 1);
    assert_eq!(wf.records[0].activity_type, ActivityType::Deposit);
    assert_eq!(wf.records[0].amount, d("12.34"));

    let tv = tradingview::convert(&rows, &symbols());
    assert_eq!(tv.records[0].side, TradingViewSide::Deposit);
    assert_eq!(tv.records[0].fill_price, d("12.34"));
}

#[test]
fn dividend_without_isin_books_on_cash() {
    let rows = vec![row("Dividend", "", "", "", "3,21", "", "0,57")];
    let out = wealthfolio::convert(&rows, &symbols());
    assert!(out.errors.is_empty());
    let r = &out.records[0];
    assert_eq!(r.symbol, "$CASH-EUR");
    assert_eq!(r.activity_type, ActivityType::Dividend);
    assert_eq!(r.quantity, Decimal::ONE);
    assert_eq!(r.unit_price, d("3.21"));
    assert_eq!(r.fee, d("0.57"));

    let out = tradingview::convert(&rows, &symbols());
    assert_eq!(out.records[0].symbol, "$CASH");
    assert_eq!(out.records[0].side, TradingViewSide::Dividend);
}

#[test]
fn fully_withheld_dividend_has_its_own_reason() {
    let rows = vec![
        row("Dividend", "DE000A0H0744", "", "", "0,00", "", "1,20"),
        row("Dividend", "DE000A0H0744", "", "", "0,00", "", ""),
    ];
    for skipped in [
        tradingview::convert(&rows, &symbols()).skipped,
        wealthfolio::convert(&rows, &symbols()).skipped,
    ] {
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0].reason, "Fully withheld: amount offset by fee/tax");
        assert_eq!(skipped[1].reason, "Zero amount");
    }
}

#[test]
fn zero_share_trade_is_skipped() {
    let rows = vec![row("Buy", "DE000A0H0744", "0", "25,50", "0", "", "")];
    let out = tradingview::convert(&rows, &symbols());
    assert_eq!(out.skipped[0].reason, "No shares/quantity specified");
    let out = wealthfolio::convert(&rows, &symbols());
    assert_eq!(out.skipped[0].reason, "No shares/quantity specified");
}

#[test]
fn cash_movements_fees_and_taxes() {
    let mut usd = row("Withdrawal", "", "", "", "-50,00", "", "");
    usd.currency = "USD".into();
    let rows = vec![
        row("Deposit", "", "", "", "1.000,00", "", ""),
        usd,
        row("Fee", "", "", "", "-1,00", "", ""),
        row("Fee", "", "", "", "1,00", "", ""),
        row("Taxes", "", "", "", "-2,50", "", ""),
        row("Interest", "", "", "", "4,20", "", ""),
        row("Taxes and fees", "", "", "", "-0,30", "", ""),
    ];

    let wf = wealthfolio::convert(&rows, &symbols());
    let types: Vec<ActivityType> = wf.records.iter().map(|r| r.activity_type).collect();
    assert_eq!(
        types,
        vec![
            ActivityType::Deposit,
            ActivityType::Withdrawal,
            ActivityType::Fee,
            ActivityType::Deposit,
            ActivityType::Tax,
            ActivityType::Interest,
            ActivityType::Fee,
        ]
    );
    assert_eq!(wf.records[0].amount, d("1000"));
    assert_eq!(wf.records[1].symbol, "$CASH-USD");
    assert_eq!(wf.records[1].unit_price, d("50"));
    assert_eq!(wf.records[4].unit_price, d("2.5"));

    let tv = tradingview_sides(&rows);
    assert_eq!(
        tv,
        vec![
            TradingViewSide::Deposit,
            TradingViewSide::Withdrawal,
            TradingViewSide::TaxesAndFees,
            TradingViewSide::Deposit,
            TradingViewSide::TaxesAndFees,
            TradingViewSide::Deposit,
            TradingViewSide::TaxesAndFees,
        ]
    );
}

fn tradingview_sides(rows: &[RawTransaction]) -> Vec<TradingViewSide> {
    tradingview::convert(rows, &symbols())
        .records
        .iter()
        .map(|r| r.side)
        .collect()
}

#[test]
fn every_row_lands_in_exactly_one_list() {
    let mut cancelled = row("Sell", "DE000A0H0744", "1", "1", "1", "", "");
    cancelled.status = "cancelled".into();
    let rows = vec![
        row("Buy", "DE000A0H0744", "1", "1", "-1", "", ""),
        row("Buy", "", "1", "1", "-1", "", ""),
        cancelled,
        row("Security transfer", "DE000A0H0744", "5", "", "", "", ""),
        row("Deposit", "", "", "", "10", "", ""),
    ];
    let out = tradingview::convert(&rows, &symbols());
    assert_eq!(out.records.len() + out.errors.len() + out.skipped.len(), rows.len());
    let mut seen: Vec<usize> = out
        .errors
        .iter()
        .map(|e| e.row)
        .chain(out.skipped.iter().map(|s| s.row))
        .collect();
    seen.sort();
    assert_eq!(seen, vec![3, 4, 5]);
}

#[test]
fn out_of_range_numbers_skip_instead_of_panicking() {
    let rows = vec![
        row("Buy", "DE000A0H0744", "100000000000000000000", "1000000000000", "-1", "", ""),
        row("Dividend", "DE000A0H0744", "", "", "5", "70000000000000000000000000000", "70000000000000000000000000000"),
        row("Buy", "DE000A0H0744", "1", "10", "-10", "", ""),
    ];
    let wf = wealthfolio::convert(&rows, &symbols());
    assert_eq!(wf.records.len(), 1);
    assert_eq!(wf.skipped.len(), 2);
    assert!(wf.skipped.iter().all(|s| s.reason == "Numeric value out of range"));

    let tv = tradingview::convert(&rows, &symbols());
    assert_eq!(tv.records.len(), 1);
    assert_eq!(tv.skipped[0].row, 2);
    assert_eq!(tv.skipped[1].reason, "Numeric value out of range");
}

#[test]
fn tradingview_symbol_derived_when_primary_is_missing() {
    let map = SymbolMap::from_json(
        r#"{
            "DE000A0H0744": {"ticker": "4COP", "exchangeCode": "GY"},
            "DE0007164600": {"ticker": "SAP", "exchangeCode": "GS", "fullSymbolPrimary": " "},
            "US0378331005": {"ticker": "AAPL"}
        }"#,
    )
    .unwrap();
    let rows = vec![
        row("Buy", "DE000A0H0744", "1", "10", "-10", "", ""),
        row("Buy", "DE0007164600", "1", "10", "-10", "", ""),
        row("Buy", "US0378331005", "1", "10", "-10", "", ""),
    ];
    let out = tradingview::convert(&rows, &map);
    assert!(out.errors.is_empty());
    let symbols: Vec<&str> = out.records.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["XETR:4COP", "SWB:SAP", "XETR:AAPL"]);
}

#[test]
fn tradingview_rejects_symbols_that_need_quoting() {
    let mut map = symbols();
    map.insert(
        "DE0007164600",
        Some(ResolvedSymbol {
            ticker: "SAP".into(),
            exchange_code: "GY".into(),
            validated_symbol_tradingview: Some("XETR:SAP,X".into()),
            ..Default::default()
        }),
    );
    let rows = vec![row("Sell", "DE0007164600", "1", "10", "10", "", "")];
    let out = tradingview::convert(&rows, &map);
    assert!(out.records.is_empty());
    assert_eq!(out.errors[0].error, "Symbol contains a comma, quote or line break");

    // Wealthfolio output is quoted, so the same entry converts there.
    assert_eq!(wealthfolio::convert(&rows, &map).records.len(), 1);
}

#[test]
fn diagnostics_use_the_source_line_when_known() {
    let mut cancelled = row("Buy", "DE000A0H0744", "1", "10", "-10", "", "");
    cancelled.status = "Cancelled".into();
    cancelled.line = 9;
    let mut missing = row("Sell", "", "1", "10", "10", "", "");
    missing.line = 12;
    let rows = vec![cancelled, missing];

    let out = wealthfolio::convert(&rows, &symbols());
    assert_eq!(out.skipped[0].row, 9);
    assert_eq!(out.errors[0].row, 12);
}
