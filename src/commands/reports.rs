// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::categorize::{RuleSet, UNCATEGORIZED, is_uncategorized, normalize_description};
use crate::commands::accounts::load_accounts;
use crate::commands::assets::{asset_equity_rows, load_assets};
use crate::commands::transactions::load_visible_transactions;
use crate::config::Scope;
use crate::models::Transaction;
use crate::utils::{OutputFormat, fmt_money, month_end, parse_month, pretty_table};
use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Categories that move money around rather than spend it.
const NON_SPENDING_CATEGORIES: [&str; 4] = ["Transfer", "Credit Card Payment", "Income", "Deposit"];

pub fn handle(conn: &Connection, scope: &Scope, rules: &RuleSet, m: &clap::ArgMatches) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    match m.subcommand() {
        Some(("networth", sub)) => {
            let summary = net_worth(conn, scope, today)?;
            if !OutputFormat::from_matches(sub).emit(&summary)? {
                let rows = vec![
                    vec!["Cash & investments".into(), fmt_money(&summary.cash_and_investments)],
                    vec!["Unlinked liabilities".into(), fmt_money(&summary.unlinked_liabilities)],
                    vec!["Asset equity".into(), fmt_money(&summary.asset_equity)],
                    vec!["Net worth".into(), fmt_money(&summary.net_worth)],
                ];
                println!("{}", pretty_table(&["Component", "Amount"], rows));
            }
        }
        Some(("spending", sub)) => {
            let (start, end) = match sub.get_one::<String>("month") {
                Some(month) => {
                    let month = parse_month(month)?;
                    let start = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
                        .with_context(|| format!("Invalid month '{}'", month))?;
                    (start, month_end(&month)?)
                }
                None => {
                    let range = sub.get_one::<String>("range").map(String::as_str);
                    (range_start(range.unwrap_or("365d"), today)?, today)
                }
            };
            let transactions = load_visible_transactions(conn, scope)?;
            let summary = spending_summary(&transactions, rules, start, end);
            if !OutputFormat::from_matches(sub).emit(&summary)? {
                let dist = summary
                    .distribution
                    .iter()
                    .map(|c| vec![c.name.clone(), fmt_money(&c.value)])
                    .collect();
                println!("{}", pretty_table(&["Category", "Spent"], dist));
                let trend = summary
                    .trend
                    .iter()
                    .map(|t| vec![t.month.clone(), fmt_money(&t.fixed), fmt_money(&t.variable)])
                    .collect();
                println!("{}", pretty_table(&["Month", "Fixed", "Variable"], trend));
            }
        }
        _ => {}
    }
    Ok(())
}

fn range_start(range: &str, today: NaiveDate) -> Result<NaiveDate> {
    match range {
        "30d" => Ok(today - Duration::days(30)),
        "ytd" => NaiveDate::from_ymd_opt(today.year(), 1, 1)
            .with_context(|| format!("Invalid year {}", today.year())),
        _ => Ok(today - Duration::days(365)),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetWorth {
    pub cash_and_investments: Decimal,
    pub unlinked_liabilities: Decimal,
    pub asset_equity: Decimal,
    pub net_worth: Decimal,
}

/// Visible account balances plus asset equity. Accounts linked to an asset
/// are already netted into that asset's equity and are not counted twice.
pub fn net_worth(conn: &Connection, scope: &Scope, today: NaiveDate) -> Result<NetWorth> {
    let linked: HashSet<i64> = load_assets(conn, scope)?
        .into_iter()
        .filter_map(|a| a.linked_account_id)
        .collect();

    let mut summary = NetWorth::default();
    for account in load_accounts(conn, scope, false)? {
        if linked.contains(&account.id) {
            continue;
        }
        if account.r#type.is_liability() {
            summary.unlinked_liabilities += account.balance.abs();
        } else {
            summary.cash_and_investments += account.balance;
        }
    }
    summary.asset_equity = asset_equity_rows(conn, scope, today)?
        .iter()
        .map(|r| r.equity_value)
        .sum();
    summary.net_worth =
        summary.cash_and_investments + summary.asset_equity - summary.unlinked_liabilities;
    Ok(summary)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTrend {
    pub month: String,
    pub fixed: Decimal,
    pub variable: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSummary {
    pub distribution: Vec<CategoryTotal>,
    pub trend: Vec<MonthTrend>,
}

fn is_spending(tx: &Transaction, rules: &RuleSet) -> bool {
    if tx.amount <= Decimal::ZERO {
        return false;
    }
    if let Some(cat) = tx.category.as_deref() {
        if cat == rules.payment_category || NON_SPENDING_CATEGORIES.contains(&cat) {
            return false;
        }
    }
    !rules.is_payment(&normalize_description(&tx.description))
}

/// Expenses between `start` and `end` inclusive, by category (largest first)
/// and by month split into fixed and variable.
pub fn spending_summary(
    transactions: &[Transaction],
    rules: &RuleSet,
    start: NaiveDate,
    end: NaiveDate,
) -> SpendingSummary {
    let mut by_category: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut by_month: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();

    for tx in transactions
        .iter()
        .filter(|t| t.date >= start && t.date <= end && is_spending(t, rules))
    {
        let category = if is_uncategorized(tx.category.as_deref()) {
            UNCATEGORIZED.to_string()
        } else {
            tx.category.clone().unwrap_or_default()
        };
        *by_category.entry(category).or_insert(Decimal::ZERO) += tx.amount;

        let entry = by_month
            .entry(tx.date.format("%Y-%m").to_string())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        if tx.is_fixed {
            entry.0 += tx.amount;
        } else {
            entry.1 += tx.amount;
        }
    }

    let mut distribution: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(name, value)| CategoryTotal {
            name,
            value: value.round_dp(2),
        })
        .collect();
    distribution.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));

    let trend = by_month
        .into_iter()
        .map(|(month, (fixed, variable))| MonthTrend {
            month,
            fixed: fixed.round_dp(2),
            variable: variable.round_dp(2),
        })
        .collect();

    SpendingSummary { distribution, trend }
}
