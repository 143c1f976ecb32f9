// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::{DEFAULT_CURRENCY, TargetFormat};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Tradeport", "tradeport"));

pub const CONFIG_ENV: &str = "TRADEPORT_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub default_format: TargetFormat,
    pub aggregate: bool,
    pub default_currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_format: TargetFormat::default(),
            aggregate: false,
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

pub fn settings_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .ok_or_else(|| Error::Config("Could not determine platform-specific config dir".into()))?;
    Ok(proj.config_dir().join("settings.json"))
}

/// Missing file means defaults.
pub fn load_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| Error::Config(format!("Invalid settings at {}: {}", path.display(), e)))
}

pub fn save_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, serde_json::to_string_pretty(settings)?)?;
    Ok(())
}

pub fn load() -> Result<Settings> {
    load_from(&settings_path()?)
}
