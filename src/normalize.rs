// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a number that may use either European ("1.234,56") or US ("1,234.56")
/// separators. Anything that does not end up numeric is zero.
pub fn parse_locale_number(text: &str) -> Decimal {
    let s: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if s.is_empty() {
        return Decimal::ZERO;
    }

    let last_dot = s.rfind('.');
    let last_comma = s.rfind(',');
    let commas = s.matches(',').count();

    let normalized = match (last_dot, last_comma) {
        // 1.234,56
        (Some(d), Some(c)) if c > d => {
            let stripped = s.replace('.', "");
            replace_last(&stripped, ',', '.')
        }
        // 1,234.56
        (Some(_), Some(_)) => s.replace(',', ""),
        (None, Some(_)) if commas == 1 => s.replace(',', "."),
        (None, Some(_)) => {
            if trailing_groups_are_thousands(&s, ',') {
                s.replace(',', "")
            } else {
                return Decimal::ZERO;
            }
        }
        (Some(_), None) => {
            if trailing_groups_are_thousands(&s, '.') {
                s.replace('.', "")
            } else {
                keep_last_only(&s, '.')
            }
        }
        (None, None) => s,
    };

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .unwrap_or(Decimal::ZERO)
}

fn replace_last(s: &str, from: char, to: char) -> String {
    match s.rfind(from) {
        Some(i) => {
            let mut out = String::with_capacity(s.len());
            out.push_str(&s[..i]);
            out.push(to);
            out.push_str(&s[i + from.len_utf8()..]);
            out
        }
        None => s.to_string(),
    }
}

// "1.000" and "1.234.567" are whole thousands; "25.50" is not.
fn trailing_groups_are_thousands(s: &str, sep: char) -> bool {
    let mut parts = s.split(sep);
    parts.next();
    let mut seen = false;
    for p in parts {
        if p.len() != 3 {
            return false;
        }
        seen = true;
    }
    seen
}

fn keep_last_only(s: &str, sep: char) -> String {
    match s.rfind(sep) {
        Some(i) => {
            let head: String = s[..i].chars().filter(|c| *c != sep).collect();
            format!("{}{}", head, &s[i..])
        }
        None => s.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampStyle {
    /// `YYYY-MM-DD HH:MM:SS`
    Spaced,
    /// `YYYY-MM-DDTHH:MM:SS.000Z`; the local broker time is taken as UTC.
    IsoUtcMillis,
}

pub fn format_timestamp(date: &str, time: &str, style: TimestampStyle) -> String {
    let date = date.trim();
    if date.is_empty() {
        return String::new();
    }
    let time = pad_time(time.trim());

    let parsed = NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M:%S");
    match (parsed, style) {
        (Ok(dt), TimestampStyle::Spaced) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        (Ok(dt), TimestampStyle::IsoUtcMillis) => dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        (Err(_), TimestampStyle::Spaced) => format!("{} {}", date, time),
        (Err(_), TimestampStyle::IsoUtcMillis) => format!("{}T{}.000Z", date, time),
    }
}

fn pad_time(time: &str) -> String {
    if time.is_empty() {
        return "00:00:00".to_string();
    }
    if time.split(':').count() == 2 {
        format!("{}:00", time)
    } else {
        time.to_string()
    }
}

/// Render a decimal without trailing zeros (`25.50` -> `25.5`, `-0` -> `0`).
pub fn fmt_decimal(d: &Decimal) -> String {
    let n = d.normalize();
    if n.is_zero() {
        "0".to_string()
    } else {
        n.to_string()
    }
}
