// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::categorize::UNCATEGORIZED;
use crate::config::Scope;
use crate::models::Transaction;
use crate::utils::{
    OutputFormat, decimal_column, id_for_account, parse_bool, parse_date, parse_decimal,
    parse_month, pretty_table,
};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, scope: &Scope, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, scope, sub)?,
        Some(("list", sub)) => list(conn, scope, sub)?,
        Some(("edit", sub)) => edit(conn, scope, sub)?,
        _ => {}
    }
    Ok(())
}

/// A transaction as it arrives from manual entry or an import file.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub is_fixed: bool,
    pub is_recurring: bool,
    pub external_id: Option<String>,
}

/// Inserts `tx` unless a row with the same external id already exists.
/// Returns whether a row was written.
pub fn insert_transaction(conn: &Connection, tx: &NewTransaction) -> Result<bool> {
    let changed = conn.execute(
        "INSERT INTO transactions(account_id, date, amount, description, category, tags,
            is_fixed, is_recurring, external_id)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)
         ON CONFLICT(external_id) DO NOTHING",
        params![
            tx.account_id,
            tx.date,
            tx.amount.to_string(),
            tx.description,
            tx.category,
            tx.tags,
            tx.is_fixed,
            tx.is_recurring,
            tx.external_id,
        ],
    )?;
    Ok(changed > 0)
}

fn non_empty(v: Option<&String>) -> Option<String> {
    v.map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn add(conn: &Connection, scope: &Scope, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let account_name = sub.get_one::<String>("account").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap().trim().to_string();

    let new_tx = NewTransaction {
        account_id: id_for_account(conn, scope, account_name)?,
        date,
        amount,
        description,
        category: non_empty(sub.get_one::<String>("category")),
        tags: non_empty(sub.get_one::<String>("tags")),
        is_fixed: sub.get_flag("fixed"),
        is_recurring: sub.get_flag("recurring"),
        external_id: non_empty(sub.get_one::<String>("external-id")),
    };
    if insert_transaction(conn, &new_tx)? {
        println!(
            "Recorded {} on {} at '{}' (acct: {})",
            new_tx.amount,
            new_tx.date,
            new_tx.description,
            account_name.trim()
        );
    } else {
        println!(
            "Skipped: transaction with external id {:?} already exists",
            new_tx.external_id.unwrap_or_default()
        );
    }
    Ok(())
}

fn edit(conn: &Connection, scope: &Scope, sub: &clap::ArgMatches) -> Result<()> {
    let raw = sub.get_one::<String>("id").unwrap();
    let id = raw.trim().parse::<i64>()?;

    let owned: Option<i64> = conn
        .query_row(
            "SELECT t.id FROM transactions t JOIN accounts a ON t.account_id=a.id
             WHERE t.id=?1 AND a.owner=?2",
            params![id, scope.owner],
            |r| r.get(0),
        )
        .optional()?;
    if owned.is_none() {
        return Err(anyhow!("Transaction {} not found", id));
    }

    if let Some(cat) = sub.get_one::<String>("category") {
        let cat = cat.trim();
        let cat = if cat.is_empty() { None } else { Some(cat) };
        conn.execute(
            "UPDATE transactions SET category=?1 WHERE id=?2",
            params![cat, id],
        )?;
    }
    if let Some(tags) = sub.get_one::<String>("tags") {
        let tags = tags.trim();
        let tags = if tags.is_empty() { None } else { Some(tags) };
        conn.execute("UPDATE transactions SET tags=?1 WHERE id=?2", params![tags, id])?;
    }
    if let Some(raw) = sub.get_one::<String>("fixed") {
        conn.execute(
            "UPDATE transactions SET is_fixed=?1 WHERE id=?2",
            params![parse_bool(raw)?, id],
        )?;
    }
    if let Some(raw) = sub.get_one::<String>("tax-deductible") {
        conn.execute(
            "UPDATE transactions SET is_tax_deductible=?1 WHERE id=?2",
            params![parse_bool(raw)?, id],
        )?;
    }
    println!("Updated transaction {}", id);
    Ok(())
}

/// Every transaction of the owner's visible accounts, oldest first.
pub fn load_visible_transactions(conn: &Connection, scope: &Scope) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.account_id, t.date, t.amount, t.description, t.category, t.is_fixed,
                t.is_recurring, t.is_tax_deductible, t.tags, t.external_id
         FROM transactions t JOIN accounts a ON t.account_id=a.id
         WHERE a.owner=?1 AND a.is_hidden=0
         ORDER BY t.date, t.id",
    )?;
    let mut rows = stmt.query(params![scope.owner])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let amount: String = r.get(3)?;
        data.push(Transaction {
            id: r.get(0)?,
            account_id: r.get(1)?,
            date: r.get(2)?,
            amount: decimal_column(&amount, "amount")?,
            description: r.get(4)?,
            category: r.get(5)?,
            is_fixed: r.get(6)?,
            is_recurring: r.get(7)?,
            is_tax_deductible: r.get(8)?,
            tags: r.get(9)?,
            external_id: r.get(10)?,
        });
    }
    Ok(data)
}

/// Writes back the fields the categorization engine may change.
pub fn save_categorization(conn: &Connection, tx: &Transaction) -> Result<()> {
    conn.execute(
        "UPDATE transactions SET category=?1, is_fixed=?2, tags=?3 WHERE id=?4",
        params![tx.category, tx.is_fixed, tx.tags, tx.id],
    )?;
    Ok(())
}

fn list(conn: &Connection, scope: &Scope, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, scope, sub)?;
    if !OutputFormat::from_matches(sub).emit(&data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.account.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    if r.is_fixed { "fixed".into() } else { String::new() },
                    r.tags.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Account", "Description", "Amount", "Category", "Fixed", "Tags"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub account: String,
    pub description: String,
    pub amount: String,
    pub category: String,
    pub is_fixed: bool,
    pub tags: String,
}

pub fn query_rows(
    conn: &Connection,
    scope: &Scope,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.id, t.date, a.name, t.description, t.amount, t.category, t.is_fixed, t.tags
         FROM transactions t JOIN accounts a ON t.account_id=a.id
         WHERE a.owner=? AND a.is_hidden=0",
    );
    let mut params_vec: Vec<String> = vec![scope.owner.clone()];

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(parse_month(month)?);
    }
    if let Some(acct) = sub.get_one::<String>("account") {
        sql.push_str(" AND a.name=?");
        params_vec.push(acct.trim().into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND t.category=?");
        params_vec.push(cat.trim().into());
    }
    if sub.get_flag("uncategorized") {
        sql.push_str(" AND (t.category IS NULL OR trim(t.category)='' OR t.category=?)");
        params_vec.push(UNCATEGORIZED.into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let category: Option<String> = r.get(5)?;
        let tags: Option<String> = r.get(7)?;
        data.push(TransactionRow {
            id: r.get(0)?,
            date: r.get(1)?,
            account: r.get(2)?,
            description: r.get(3)?,
            amount: r.get(4)?,
            category: category.unwrap_or_else(|| UNCATEGORIZED.to_string()),
            is_fixed: r.get(6)?,
            tags: tags.unwrap_or_default(),
        });
    }
    Ok(data)
}
