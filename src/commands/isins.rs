// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::parser::{parse_transactions, unique_isins};
use crate::symbols::is_well_formed_isin;
use crate::utils::read_input;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let input = m.get_one::<String>("input").unwrap().trim();
    let parsed =
        parse_transactions(&read_input(input)?).with_context(|| format!("Parse CSV {}", input))?;
    let isins = unique_isins(&parsed.rows);

    if m.get_flag("template") {
        println!("{}", serde_json::to_string_pretty(&template(&isins))?);
        return Ok(());
    }
    for isin in &isins {
        if is_well_formed_isin(isin) {
            println!("{}", isin);
        } else {
            println!("{}\t(malformed)", isin);
        }
    }
    Ok(())
}

/// Symbol map skeleton: every ISIN present, none resolved yet.
pub fn template(isins: &[String]) -> Value {
    let mut map = Map::new();
    for isin in isins {
        map.insert(isin.clone(), Value::Null);
    }
    Value::Object(map)
}
