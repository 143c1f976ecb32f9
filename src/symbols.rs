// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::TargetFormat;

static ISIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2}[A-Z0-9]{9}[0-9]$").unwrap());

pub fn is_well_formed_isin(isin: &str) -> bool {
    ISIN_RE.is_match(isin)
}

/// A listing venue the identifier service can report data for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exchange {
    /// Source-system exchange code.
    pub code: &'static str,
    pub label: &'static str,
    /// TradingView exchange prefix.
    pub prefix: &'static str,
    /// Yahoo-style ticker suffix used by Wealthfolio.
    pub suffix: &'static str,
}

/// Lookup priority order as well as the code table.
pub static EXCHANGES: [Exchange; 7] = [
    Exchange { code: "GY", label: "Xetra", prefix: "XETR", suffix: ".DE" },
    Exchange { code: "GF", label: "Frankfurt", prefix: "FWB", suffix: ".F" },
    Exchange { code: "GS", label: "Stuttgart", prefix: "SWB", suffix: ".SG" },
    Exchange { code: "GM", label: "Munich", prefix: "MUN", suffix: ".MU" },
    Exchange { code: "GD", label: "Düsseldorf", prefix: "DUS", suffix: ".DU" },
    Exchange { code: "GH", label: "Hamburg", prefix: "HAM", suffix: ".HM" },
    Exchange { code: "GB", label: "Berlin", prefix: "BER", suffix: ".BE" },
];

pub const DEFAULT_SUFFIX: &str = ".DE";
pub const DEFAULT_PREFIX: &str = "XETR";
pub const PRIMARY_EXCHANGE: &str = "GY";
pub const DERIVATIVES_EXCHANGE: &str = "GS";

pub fn exchange_by_code(code: &str) -> Option<&'static Exchange> {
    let code = code.trim();
    EXCHANGES.iter().find(|e| e.code.eq_ignore_ascii_case(code))
}

pub fn suffix_for_code(code: &str) -> &'static str {
    exchange_by_code(code).map(|e| e.suffix).unwrap_or(DEFAULT_SUFFIX)
}

pub fn prefix_for_code(code: &str) -> &'static str {
    exchange_by_code(code).map(|e| e.prefix).unwrap_or(DEFAULT_PREFIX)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSymbol {
    pub ticker: String,
    #[serde(default)]
    pub exchange: String,
    #[serde(default)]
    pub exchange_code: String,
    #[serde(default)]
    pub full_symbol_primary: String,
    #[serde(default, rename = "validatedSymbolTradingView")]
    pub validated_symbol_tradingview: Option<String>,
    #[serde(default, rename = "validatedSymbolWealthfolio")]
    pub validated_symbol_wealthfolio: Option<String>,
    #[serde(default)]
    pub security_type: Option<String>,
    #[serde(default)]
    pub security_type2: Option<String>,
    #[serde(default)]
    pub market_sector: Option<String>,
}

/// Absent and empty optional strings both mean "use the default".
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn symbol_for(resolved: &ResolvedSymbol, format: TargetFormat) -> String {
    match format {
        TargetFormat::TradingView => match non_empty(&resolved.validated_symbol_tradingview) {
            Some(s) => s.to_string(),
            None if !resolved.full_symbol_primary.trim().is_empty() => {
                resolved.full_symbol_primary.trim().to_string()
            }
            None => format!(
                "{}:{}",
                prefix_for_code(&resolved.exchange_code),
                resolved.ticker.trim()
            ),
        },
        TargetFormat::Wealthfolio => match non_empty(&resolved.validated_symbol_wealthfolio) {
            Some(s) => s.to_string(),
            None => format!("{}{}", resolved.ticker, suffix_for_code(&resolved.exchange_code)),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolLookup<'a> {
    Resolved(&'a ResolvedSymbol),
    /// Looked up, but the resolver found nothing.
    Unresolved,
    NotLookedUp,
}

/// Resolver output keyed by ISIN. A key mapped to `None` was looked up and not
/// found; a missing key was never looked up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolMap {
    inner: HashMap<String, Option<ResolvedSymbol>>,
}

impl SymbolMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, isin: impl Into<String>, resolved: Option<ResolvedSymbol>) {
        let resolved = resolved.filter(|r| !r.ticker.trim().is_empty());
        self.inner.insert(isin.into(), resolved);
    }

    pub fn lookup(&self, isin: &str) -> SymbolLookup<'_> {
        match self.inner.get(isin) {
            Some(Some(r)) => SymbolLookup::Resolved(r),
            Some(None) => SymbolLookup::Unresolved,
            None => SymbolLookup::NotLookedUp,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn resolved_count(&self) -> usize {
        self.inner.values().filter(|v| v.is_some()).count()
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let raw: HashMap<String, Option<ResolvedSymbol>> = serde_json::from_str(text)?;
        let mut map = SymbolMap::new();
        for (isin, resolved) in raw {
            let isin = isin.trim().to_string();
            if !is_well_formed_isin(&isin) {
                warn!(isin = %isin, "symbol map key is not a well-formed ISIN");
            }
            map.insert(isin, resolved);
        }
        Ok(map)
    }
}

impl FromIterator<(String, Option<ResolvedSymbol>)> for SymbolMap {
    fn from_iter<T: IntoIterator<Item = (String, Option<ResolvedSymbol>)>>(iter: T) -> Self {
        let mut map = SymbolMap::new();
        for (isin, resolved) in iter {
            map.insert(isin, resolved);
        }
        map
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityClass {
    /// ETP, ETN, ETC, certificates, warrants, commodity products.
    Derivative,
    Etf,
    Other,
}

pub fn classify_security(
    security_type: Option<&str>,
    security_type2: Option<&str>,
    market_sector: Option<&str>,
) -> SecurityClass {
    let t1 = security_type.unwrap_or("").to_uppercase();
    let t2 = security_type2.unwrap_or("").to_uppercase();
    let sector = market_sector.unwrap_or("").to_lowercase();

    const DERIVATIVE_MARKERS: [&str; 6] = ["ETP", "ETN", "ETC", "CERTIFICATE", "WARRANT", "ZERTIFIKAT"];
    let is_derivative = [&t1, &t2].iter().any(|t| {
        DERIVATIVE_MARKERS
            .iter()
            .any(|m| t.split(|c: char| !c.is_ascii_alphanumeric()).any(|w| w.starts_with(m)))
    }) || sector.contains("commodity");
    if is_derivative {
        return SecurityClass::Derivative;
    }

    if [&t1, &t2].iter().any(|t| t.contains("ETF") || t.contains("UCITS")) {
        return SecurityClass::Etf;
    }
    SecurityClass::Other
}

/// Exchange a security should be listed under; `None` keeps the found one.
pub fn routed_exchange(class: SecurityClass) -> Option<&'static str> {
    match class {
        SecurityClass::Derivative => Some(DERIVATIVES_EXCHANGE),
        SecurityClass::Etf => Some(PRIMARY_EXCHANGE),
        SecurityClass::Other => None,
    }
}

/// What the identifier service reports for one ISIN on one exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub ticker: String,
    pub security_type: Option<String>,
    pub security_type2: Option<String>,
    pub market_sector: Option<String>,
}

/// Source of listings, e.g. an identifier-mapping service client.
pub trait ListingSource {
    fn find(&self, isin: &str, exchange_code: &str) -> Option<Listing>;
}

impl ListingSource for HashMap<(String, String), Listing> {
    fn find(&self, isin: &str, exchange_code: &str) -> Option<Listing> {
        self.get(&(isin.to_string(), exchange_code.to_string())).cloned()
    }
}

/// Try the exchanges in priority order, then apply the routing rule to the
/// first listing found.
pub fn resolve_isin<S: ListingSource + ?Sized>(source: &S, isin: &str) -> Option<ResolvedSymbol> {
    let (found_on, listing) = EXCHANGES
        .iter()
        .find_map(|e| source.find(isin, e.code).map(|l| (e, l)))?;
    if listing.ticker.trim().is_empty() {
        return None;
    }

    let class = classify_security(
        listing.security_type.as_deref(),
        listing.security_type2.as_deref(),
        listing.market_sector.as_deref(),
    );
    let exchange = routed_exchange(class)
        .and_then(exchange_by_code)
        .unwrap_or(found_on);
    debug!(isin, found = found_on.code, routed = exchange.code, ?class, "resolved listing");

    let ticker = listing.ticker.trim().to_string();
    Some(ResolvedSymbol {
        full_symbol_primary: format!("{}:{}", exchange.prefix, ticker),
        ticker,
        exchange: exchange.label.to_string(),
        exchange_code: exchange.code.to_string(),
        validated_symbol_tradingview: None,
        validated_symbol_wealthfolio: None,
        security_type: listing.security_type,
        security_type2: listing.security_type2,
        market_sector: listing.market_sector,
    })
}

pub fn resolve_all<S: ListingSource + ?Sized>(source: &S, isins: &[String]) -> SymbolMap {
    isins
        .iter()
        .map(|isin| (isin.clone(), resolve_isin(source, isin)))
        .collect()
}
