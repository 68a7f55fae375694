// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::fs;
use std::path::PathBuf;

use crate::categorize::RuleSet;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Nestegg", "nestegg"));

pub const DEFAULT_OWNER: &str = "default";

/// The owner whose rows a command may read and write. Passed explicitly into
/// every query instead of living in process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub owner: String,
}

impl Scope {
    pub fn new(owner: impl Into<String>) -> Self {
        let owner = owner.into();
        let owner = owner.trim();
        Scope {
            owner: if owner.is_empty() {
                DEFAULT_OWNER.to_string()
            } else {
                owner.to_string()
            },
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::new(DEFAULT_OWNER)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub rules_path: PathBuf,
    pub scope: Scope,
}

pub fn data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.to_path_buf())
}

impl Config {
    /// `NESTEGG_DB` overrides the database location; the rules path and owner
    /// come from the command line (which itself falls back to env vars).
    pub fn resolve(owner: Option<&str>, rules: Option<&str>) -> Result<Config> {
        let db_path = match std::env::var_os("NESTEGG_DB") {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => data_dir()?.join("nestegg.sqlite"),
        };
        let rules_path = match rules.map(str::trim).filter(|s| !s.is_empty()) {
            Some(p) => PathBuf::from(p),
            None => data_dir()?.join("rules.json"),
        };
        Ok(Config {
            db_path,
            rules_path,
            scope: Scope::new(owner.unwrap_or(DEFAULT_OWNER)),
        })
    }

    pub fn load_rules(&self) -> Result<RuleSet> {
        RuleSet::load_or_default(&self.rules_path)
            .with_context(|| format!("Load rule set {}", self.rules_path.display()))
    }
}
