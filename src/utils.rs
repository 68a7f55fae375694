// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use crate::config::Scope;
use crate::errors::ValidationError;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    let s = s.trim();
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Largest amount accepted for asset values and loan fields.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

pub fn parse_non_negative(field: &'static str, s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d < Decimal::ZERO {
        return Err(ValidationError::Negative {
            field,
            value: s.trim().to_string(),
        }
        .into());
    }
    if d > MAX_AMOUNT {
        return Err(ValidationError::TooLarge {
            field,
            value: s.trim().to_string(),
        }
        .into());
    }
    Ok(d)
}

pub fn parse_ownership(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d < Decimal::ZERO || d > Decimal::ONE_HUNDRED {
        return Err(ValidationError::Ownership(s.trim().to_string()).into());
    }
    Ok(d)
}

pub fn parse_term(s: &str) -> Result<i64> {
    let n = s
        .trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid term '{}', expected months", s))?;
    if n <= 0 {
        return Err(ValidationError::Term(n).into());
    }
    Ok(n)
}

pub fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        other => Err(anyhow::anyhow!("Invalid boolean '{}', expected true/false", other)),
    }
}

/// Decimals are stored as TEXT; parse one back with the column named in errors.
pub fn decimal_column(raw: &str, column: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .with_context(|| format!("Invalid {} '{}' in database", column, raw))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.to_vec());
    for row in rows {
        table.add_row(row);
    }
    table
}

pub fn id_for_account(conn: &Connection, scope: &Scope, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM accounts WHERE owner=?1 AND name=?2")?;
    let id: i64 = stmt
        .query_row(params![scope.owner, name.trim()], |r| r.get(0))
        .with_context(|| format!("Account '{}' not found", name.trim()))?;
    Ok(id)
}

pub fn id_for_asset(conn: &Connection, scope: &Scope, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM assets WHERE owner=?1 AND name=?2")?;
    let id: i64 = stmt
        .query_row(params![scope.owner, name.trim()], |r| r.get(0))
        .with_context(|| format!("Asset '{}' not found", name.trim()))?;
    Ok(id)
}

pub fn month_end(month: &str) -> Result<NaiveDate> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}'", month))?;
    let next = first
        .checked_add_months(chrono::Months::new(1))
        .ok_or_else(|| anyhow::anyhow!("Invalid month '{}'", month))?;
    next.pred_opt()
        .ok_or_else(|| anyhow::anyhow!("Invalid month '{}'", month))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonLines,
}

impl OutputFormat {
    /// Reads `--json` and `--jsonl`; either may be absent from the command.
    pub fn from_matches(m: &clap::ArgMatches) -> Self {
        let flag = |id: &str| matches!(m.try_get_one::<bool>(id), Ok(Some(true)));
        if flag("json") {
            OutputFormat::Json
        } else if flag("jsonl") {
            OutputFormat::JsonLines
        } else {
            OutputFormat::Table
        }
    }

    /// Prints `value` and returns `true` for the JSON formats; table output is
    /// left to the caller.
    pub fn emit<T: serde::Serialize>(self, value: &T) -> Result<bool> {
        match self {
            OutputFormat::Table => return Ok(false),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::JsonLines => match serde_json::to_value(value)? {
                serde_json::Value::Array(items) => {
                    for item in items {
                        println!("{}", item);
                    }
                }
                other => println!("{}", other),
            },
        }
        Ok(true)
    }
}
