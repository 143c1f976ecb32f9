// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tradeport::error::Error;
use tradeport::parser::{
    detect_delimiter, parse_transactions, parse_transactions_with_currency, unique_isins,
};

const EXPORT: &str = "date;time;status;reference;description;assetType;type;isin;shares;price;amount;fee;tax;currency
2024-05-02;10:15:00;Executed;\"REF-1\";\"iShares Core MSCI\";Security;Buy;DE000A0H0744;10;25,50;-255,00;0,99;0,00;EUR
2024-05-03;;Executed;REF-2;Zinsen;Cash;Interest;;;;1,23;;;
;;;;;;;;;;;;;
2024-05-04;09:00:00;Executed;REF-3;Sparplan;Security;Savings plan;DE000A0H0744;1;26,00;-26,00;;;EUR
";

#[test]
fn parses_semicolon_export() {
    let parsed = parse_transactions(EXPORT.as_bytes()).unwrap();
    assert!(parsed.errors.is_empty());
    assert_eq!(parsed.rows.len(), 3);

    let first = &parsed.rows[0];
    assert_eq!(first.reference, "REF-1");
    assert_eq!(first.description, "iShares Core MSCI");
    assert_eq!(first.asset_type, "Security");
    assert_eq!(first.r#type, "Buy");
    assert_eq!(first.price, "25,50");

    // empty currency falls back to EUR
    assert_eq!(parsed.rows[1].currency, "EUR");
    assert_eq!(parsed.rows[1].isin, "");
}

#[test]
fn comma_export_with_mixed_case_headers_and_bom() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(
        b"Date,Time,Status,Type,ISIN,Shares,Price,Amount,Currency\n2024-01-10,08:00,Executed,Sell,US0378331005,2,180.5,361,USD\n",
    );
    let parsed = parse_transactions(&bytes).unwrap();
    assert_eq!(parsed.rows.len(), 1);
    let row = &parsed.rows[0];
    assert_eq!(row.date, "2024-01-10");
    assert_eq!(row.r#type, "Sell");
    assert_eq!(row.isin, "US0378331005");
    assert_eq!(row.currency, "USD");
    assert_eq!(row.fee, "");
}

#[test]
fn configured_default_currency() {
    let csv = "date;type;amount;currency\n2024-01-01;Deposit;100;\n";
    let parsed = parse_transactions_with_currency(csv.as_bytes(), "CHF").unwrap();
    assert_eq!(parsed.rows[0].currency, "CHF");
}

#[test]
fn missing_type_column_is_fatal() {
    let err = parse_transactions(b"date;amount\n2024-01-01;1\n").unwrap_err();
    assert!(matches!(err, Error::MissingColumn(ref c) if c == "type"));
}

#[test]
fn invalid_utf8_is_reported_not_fatal() {
    let mut bytes = b"date;type;description\n2024-01-01;Deposit;Einzahlung ".to_vec();
    bytes.push(0xFF);
    bytes.push(b'\n');
    let parsed = parse_transactions(&bytes).unwrap();
    assert_eq!(parsed.rows.len(), 1);
    assert_eq!(parsed.errors.len(), 1);
    assert!(parsed.rows[0].description.starts_with("Einzahlung"));
}

#[test]
fn delimiter_detection_reads_header_only() {
    assert_eq!(detect_delimiter("a;b;c\n1,2,3"), b';');
    assert_eq!(detect_delimiter("a,b,c\n1;2;3"), b',');
    assert_eq!(detect_delimiter(""), b',');
}

#[test]
fn unique_isins_keep_first_seen_order() {
    let parsed = parse_transactions(EXPORT.as_bytes()).unwrap();
    assert_eq!(unique_isins(&parsed.rows), vec!["DE000A0H0744".to_string()]);
}

#[test]
fn rows_with_wrong_field_count_are_reported() {
    let csv = "date;time;status;reference;description;assetType;type;isin;shares;price;amount;fee;tax;currency
2024-05-02;Executed;Buy
2024-05-03;10:00:00;Executed;R2;Deposit;Cash;Deposit;;;;100,00;;;EUR
2024-05-04;10:00:00;Executed;R3;Buy;Security;Buy;DE000A0H0744;1;2,00;-2,00;;;EUR;extra;more
";
    let parsed = parse_transactions(csv.as_bytes()).unwrap();
    assert_eq!(parsed.rows.len(), 1);
    assert_eq!(parsed.rows[0].r#type, "Deposit");
    assert_eq!(
        parsed.errors,
        vec![
            "Row 2: expected 14 fields, found 3".to_string(),
            "Row 4: expected 14 fields, found 16".to_string(),
        ]
    );
}

#[test]
fn rows_remember_their_source_line() {
    let parsed = parse_transactions(EXPORT.as_bytes()).unwrap();
    let lines: Vec<usize> = parsed.rows.iter().map(|r| r.line).collect();
    // line 4 is blank
    assert_eq!(lines, vec![2, 3, 5]);

    let bad = "date;type;amount\n2024-01-01;Deposit\n2024-01-02;Deposit;5\n";
    let parsed = parse_transactions(bad.as_bytes()).unwrap();
    assert_eq!(parsed.errors, vec!["Row 2: expected 3 fields, found 2".to_string()]);
    assert_eq!(parsed.rows[0].line, 3);
}
