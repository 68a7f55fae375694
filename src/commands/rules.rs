// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::categorize::RuleSet;
use crate::config::Config;
use crate::utils::pretty_table;
use anyhow::{Context, Result, anyhow};
use std::fs;

pub fn handle(config: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let rules = config.load_rules()?;
            if sub.get_flag("json") {
                println!("{}", rules.to_json_pretty()?);
            } else {
                println!("{}", rules_table(&rules));
            }
        }
        Some(("init", sub)) => {
            let path = &config.rules_path;
            if path.exists() && !sub.get_flag("force") {
                return Err(anyhow!(
                    "Rule set already exists at {} (use --force to overwrite)",
                    path.display()
                ));
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Create {}", parent.display()))?;
            }
            fs::write(path, RuleSet::default().to_json_pretty()?)
                .with_context(|| format!("Write rule set {}", path.display()))?;
            println!("Wrote built-in rule set to {}", path.display());
        }
        _ => {}
    }
    Ok(())
}

pub fn rules_table(rules: &RuleSet) -> comfy_table::Table {
    let mut data = vec![
        vec![
            "payment".to_string(),
            rules.payment_category.clone(),
            rules.payment_markers.join(", "),
        ],
        vec![
            "fixed".to_string(),
            String::new(),
            rules.fixed_keywords.join(", "),
        ],
        vec![
            "work".to_string(),
            rules.work_tag.clone(),
            rules.work_keywords.join(", "),
        ],
    ];
    for fallback in &rules.fallback_categories {
        data.push(vec![
            "fallback".to_string(),
            fallback.category.clone(),
            fallback.keywords.join(", "),
        ]);
    }
    pretty_table(&["Rule", "Sets", "Keywords"], data)
}
