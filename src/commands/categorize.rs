// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::categorize::{CategorizeReport, RuleSet, categorize_all};
use crate::commands::transactions::{load_visible_transactions, save_categorization};
use crate::config::Scope;
use crate::utils::{OutputFormat, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use std::collections::HashSet;

pub fn handle(
    conn: &mut Connection,
    scope: &Scope,
    rules: &RuleSet,
    m: &clap::ArgMatches,
) -> Result<()> {
    let dry_run = m.get_flag("dry-run");
    let report = run(conn, scope, rules, dry_run)?;
    if !OutputFormat::from_matches(m).emit(&report)? {
        println!(
            "{}",
            pretty_table(
                &["Processed", "Updated", "Knowledge base"],
                vec![vec![
                    report.processed_count.to_string(),
                    report.updated_count.to_string(),
                    report.knowledge_base_size.to_string(),
                ]],
            )
        );
        if dry_run {
            println!("Dry run: no changes saved");
        }
    }
    Ok(())
}

/// Categorizes every transaction of the owner's visible accounts and, unless
/// `dry_run`, saves the changed rows in a single transaction.
pub fn run(
    conn: &mut Connection,
    scope: &Scope,
    rules: &RuleSet,
    dry_run: bool,
) -> Result<CategorizeReport> {
    let mut transactions = load_visible_transactions(conn, scope)?;
    let report = categorize_all(rules, &mut transactions);

    if !dry_run && !report.changed_ids.is_empty() {
        let changed: HashSet<i64> = report.changed_ids.iter().copied().collect();
        let tx = conn.transaction()?;
        for t in transactions.iter().filter(|t| changed.contains(&t.id)) {
            save_categorization(&tx, t)?;
        }
        tx.commit()?;
    }
    tracing::info!(
        owner = %scope.owner,
        processed = report.processed_count,
        updated = report.updated_count,
        knowledge_base = report.knowledge_base_size,
        dry_run,
        "categorization finished"
    );
    Ok(report)
}
