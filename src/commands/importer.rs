// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::{NewTransaction, insert_transaction};
use crate::config::Scope;
use crate::utils::{id_for_account, parse_date, parse_decimal};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::collections::{HashMap, hash_map::Entry};
use std::path::Path;

pub fn handle(conn: &mut Connection, scope: &Scope, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let summary = import_transactions(conn, scope, Path::new(path))?;
            println!(
                "Imported {} transactions from {} ({} already present)",
                summary.inserted, path, summary.skipped
            );
            Ok(())
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Reads `date,description,amount,account[,category,external_id,tags]` rows.
/// Rows whose external id is already stored are skipped, so re-importing an
/// export is harmless. The whole file is applied in one transaction.
pub fn import_transactions(conn: &mut Connection, scope: &Scope, path: &Path) -> Result<ImportSummary> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path.display()))?;

    let tx = conn.transaction()?;
    let mut account_cache: HashMap<String, i64> = HashMap::new();
    let mut summary = ImportSummary::default();

    for (line, result) in rdr.records().enumerate() {
        let rec = result?;
        let date_raw = rec.get(0).context("date missing")?.trim().to_string();
        let description = rec.get(1).context("description missing")?.trim().to_string();
        let amount_raw = rec.get(2).context("amount missing")?.trim().to_string();
        let account = rec.get(3).context("account missing")?.trim().to_string();
        let optional = |i: usize| {
            rec.get(i)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };

        let date = parse_date(&date_raw)
            .with_context(|| format!("Invalid transaction date '{}' on row {}", date_raw, line + 1))?;
        let amount = parse_decimal(&amount_raw)
            .with_context(|| format!("Invalid amount '{}' for {}", amount_raw, description))?;

        let account_id = match account_cache.entry(account.clone()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => *entry.insert(id_for_account(&tx, scope, &account)?),
        };

        let new_tx = NewTransaction {
            account_id,
            date,
            amount,
            description,
            category: optional(4),
            external_id: optional(5),
            tags: optional(6),
            is_fixed: false,
            is_recurring: false,
        };
        if insert_transaction(&tx, &new_tx)? {
            summary.inserted += 1;
        } else {
            tracing::debug!(external_id = ?new_tx.external_id, "skipping already imported transaction");
            summary.skipped += 1;
        }
    }
    tx.commit()?;
    tracing::info!(path = %path.display(), inserted = summary.inserted, skipped = summary.skipped, "import finished");
    Ok(summary)
}
