// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Scope;
use crate::models::{Account, AccountType};
use crate::utils::{
    OutputFormat, decimal_column, fmt_money, id_for_account, parse_decimal, pretty_table,
};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;

pub fn handle(conn: &Connection, scope: &Scope, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let typ: AccountType = sub.get_one::<String>("type").unwrap().parse()?;
            let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
            let institution = sub
                .get_one::<String>("institution")
                .map(|s| s.trim())
                .filter(|s| !s.is_empty());
            conn.execute(
                "INSERT INTO accounts(owner, name, type, balance, institution) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![scope.owner, name, typ.as_str(), balance.to_string(), institution],
            )?;
            println!("Added account '{}' ({}, balance {})", name, typ, balance);
        }
        Some(("list", sub)) => {
            let accounts = load_accounts(conn, scope, sub.get_flag("all"))?;
            if !OutputFormat::from_matches(sub).emit(&accounts)? {
                let data = accounts
                    .iter()
                    .map(|a| {
                        vec![
                            a.name.clone(),
                            a.r#type.to_string(),
                            fmt_money(&a.balance),
                            a.institution.clone().unwrap_or_default(),
                            if a.is_hidden { "yes".into() } else { String::new() },
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Name", "Type", "Balance", "Institution", "Hidden"], data)
                );
            }
        }
        Some(("show", sub)) => {
            let detail = account_detail(conn, scope, sub.get_one::<String>("name").unwrap())?;
            if !OutputFormat::from_matches(sub).emit(&detail)? {
                let a = &detail.account;
                let rows = vec![
                    vec!["Name".to_string(), a.name.clone()],
                    vec!["Type".to_string(), a.r#type.to_string()],
                    vec!["Balance".to_string(), fmt_money(&a.balance)],
                    vec![
                        "Institution".to_string(),
                        a.institution.clone().unwrap_or_default(),
                    ],
                    vec!["Hidden".to_string(), a.is_hidden.to_string()],
                    vec!["Linked assets".to_string(), detail.linked_assets.join(", ")],
                ];
                println!("{}", pretty_table(&["Field", "Value"], rows));
            }
        }
        Some(("set-balance", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
            let id = id_for_account(conn, scope, name)?;
            conn.execute(
                "UPDATE accounts SET balance=?1 WHERE id=?2",
                params![balance.to_string(), id],
            )?;
            println!("Balance of '{}' set to {}", name.trim(), balance);
        }
        Some(("hide", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let hidden = toggle_hidden(conn, scope, name)?;
            println!(
                "Account '{}' is now {}",
                name.trim(),
                if hidden { "hidden" } else { "visible" }
            );
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let id = id_for_account(conn, scope, name)?;
            conn.execute("DELETE FROM accounts WHERE id=?1", params![id])?;
            println!("Removed account '{}'", name.trim());
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct AccountDetail {
    #[serde(flatten)]
    pub account: Account,
    pub linked_assets: Vec<String>,
}

pub fn account_detail(conn: &Connection, scope: &Scope, name: &str) -> Result<AccountDetail> {
    let id = id_for_account(conn, scope, name)?;
    let account = account_by_id(conn, id)?.ok_or_else(|| anyhow!("Account {} not found", id))?;
    let mut stmt = conn.prepare(
        "SELECT name FROM assets WHERE linked_account_id=?1 AND owner=?2 ORDER BY name",
    )?;
    let linked_assets = stmt
        .query_map(params![id, scope.owner], |r| r.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(AccountDetail {
        account,
        linked_assets,
    })
}

/// Flips the account's visibility and returns the new hidden state.
pub fn toggle_hidden(conn: &Connection, scope: &Scope, name: &str) -> Result<bool> {
    let id = id_for_account(conn, scope, name)?;
    conn.execute(
        "UPDATE accounts SET is_hidden = 1 - is_hidden WHERE id=?1",
        params![id],
    )?;
    let hidden: bool = conn.query_row(
        "SELECT is_hidden FROM accounts WHERE id=?1",
        params![id],
        |r| r.get(0),
    )?;
    Ok(hidden)
}

const ACCOUNT_COLUMNS: &str = "id, owner, name, type, balance, institution, is_hidden";

fn account_from_row(r: &Row<'_>) -> Result<Account> {
    let typ: String = r.get(3)?;
    let balance: String = r.get(4)?;
    Ok(Account {
        id: r.get(0)?,
        owner: r.get(1)?,
        name: r.get(2)?,
        r#type: typ.parse()?,
        balance: decimal_column(&balance, "balance")?,
        institution: r.get(5)?,
        is_hidden: r.get(6)?,
    })
}

pub fn load_accounts(conn: &Connection, scope: &Scope, include_hidden: bool) -> Result<Vec<Account>> {
    let sql = format!(
        "SELECT {} FROM accounts WHERE owner=?1 AND (?2 OR is_hidden=0) ORDER BY name",
        ACCOUNT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![scope.owner, include_hidden])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(account_from_row(r)?);
    }
    Ok(data)
}

/// Looks an account up by id regardless of owner; links may point at a
/// household member's loan.
pub fn account_by_id(conn: &Connection, id: i64) -> Result<Option<Account>> {
    let sql = format!("SELECT {} FROM accounts WHERE id=?1", ACCOUNT_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(r) => Ok(Some(account_from_row(r)?)),
        None => Ok(None),
    }
}

pub fn account_type(conn: &Connection, id: i64) -> Result<AccountType> {
    let typ: Option<String> = conn
        .query_row("SELECT type FROM accounts WHERE id=?1", params![id], |r| {
            r.get(0)
        })
        .optional()?;
    let typ = typ.ok_or_else(|| anyhow!("Account {} not found", id))?;
    Ok(typ.parse()?)
}
