// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use std::path::Path;

use crate::config::{load_from, save_to};
use crate::models::TargetFormat;
use crate::utils::pretty_table;

pub fn handle(path: &Path, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let s = load_from(path)?;
            let rows = vec![
                vec!["defaultFormat".to_string(), s.default_format.to_string()],
                vec!["aggregate".to_string(), s.aggregate.to_string()],
                vec!["defaultCurrency".to_string(), s.default_currency],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("path", _)) => println!("{}", path.display()),
        Some(("set", sub)) => {
            let mut s = load_from(path)?;
            if let Some(raw) = sub.get_one::<String>("format") {
                s.default_format = raw.parse::<TargetFormat>()?;
            }
            if let Some(raw) = sub.get_one::<String>("aggregate") {
                s.aggregate = match raw.trim().to_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    other => return Err(anyhow!("Invalid aggregate value '{}', use true|false", other)),
                };
            }
            if let Some(raw) = sub.get_one::<String>("currency") {
                let ccy = raw.trim().to_uppercase();
                if ccy.len() != 3 || !ccy.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(anyhow!("Invalid currency '{}', expected a 3-letter code", raw.trim()));
                }
                s.default_currency = ccy;
            }
            save_to(path, &s)?;
            println!("Saved settings to {}", path.display());
        }
        _ => {}
    }
    Ok(())
}
