// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::accounts::{account_by_id, account_type};
use crate::config::Scope;
use crate::db::default_term_months;
use crate::errors::ValidationError;
use crate::liability::{LiabilitySource, resolve_liability};
use crate::models::{AmortizationTerms, Asset, AssetType};
use crate::utils::{
    OutputFormat, decimal_column, fmt_money, id_for_account, id_for_asset, parse_date,
    parse_non_negative, parse_ownership, parse_term, pretty_table,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, scope: &Scope, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, scope, sub)?,
        Some(("list", sub)) => list(conn, scope, sub)?,
        Some(("update", sub)) => update(conn, scope, sub)?,
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let id = id_for_asset(conn, scope, name)?;
            conn.execute("DELETE FROM assets WHERE id=?1", params![id])?;
            println!("Removed asset '{}'", name.trim());
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, scope: &Scope, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let typ: AssetType = sub.get_one::<String>("type").unwrap().parse()?;
    let value = parse_non_negative("value", sub.get_one::<String>("value").unwrap())?;

    let mut asset = Asset {
        id: 0,
        owner: scope.owner.clone(),
        name,
        r#type: typ,
        value,
        ownership_percentage: Decimal::ONE_HUNDRED,
        linked_account_id: None,
        manual_mortgage_balance: Decimal::ZERO,
        amortization: AmortizationTerms::none(),
        monthly_payment: Decimal::ZERO,
    };
    apply_field_args(conn, scope, &mut asset, sub)?;

    conn.execute(
        "INSERT INTO assets(owner, name, type, value, ownership_percentage, linked_account_id,
            manual_mortgage_balance, interest_rate, term_months, original_principal,
            amortization_start_date, monthly_payment)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
        params![
            asset.owner,
            asset.name,
            asset.r#type.as_str(),
            asset.value.to_string(),
            asset.ownership_percentage.to_string(),
            asset.linked_account_id,
            asset.manual_mortgage_balance.to_string(),
            asset.amortization.interest_rate.to_string(),
            asset.amortization.term_months,
            asset.amortization.original_principal.to_string(),
            asset.amortization.start_date,
            asset.monthly_payment.to_string(),
        ],
    )?;
    println!("Added asset '{}' ({}, value {})", asset.name, asset.r#type, asset.value);
    Ok(())
}

fn update(conn: &Connection, scope: &Scope, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let id = id_for_asset(conn, scope, name)?;
    let mut asset = asset_by_id(conn, id)?;

    if let Some(raw) = sub.get_one::<String>("value") {
        asset.value = parse_non_negative("value", raw)?;
    }
    if sub.get_flag("unlink") {
        asset.linked_account_id = None;
    }
    apply_field_args(conn, scope, &mut asset, sub)?;

    conn.execute(
        "UPDATE assets SET value=?1, ownership_percentage=?2, linked_account_id=?3,
            manual_mortgage_balance=?4, interest_rate=?5, term_months=?6,
            original_principal=?7, amortization_start_date=?8, monthly_payment=?9
         WHERE id=?10",
        params![
            asset.value.to_string(),
            asset.ownership_percentage.to_string(),
            asset.linked_account_id,
            asset.manual_mortgage_balance.to_string(),
            asset.amortization.interest_rate.to_string(),
            asset.amortization.term_months,
            asset.amortization.original_principal.to_string(),
            asset.amortization.start_date,
            asset.monthly_payment.to_string(),
            id,
        ],
    )?;
    println!("Updated asset '{}'", asset.name);
    Ok(())
}

/// Copies the optional liability-related arguments onto `asset`, rejecting
/// values the resolver cannot use.
fn apply_field_args(
    conn: &Connection,
    scope: &Scope,
    asset: &mut Asset,
    sub: &clap::ArgMatches,
) -> Result<()> {
    if let Some(raw) = sub.get_one::<String>("ownership") {
        asset.ownership_percentage = parse_ownership(raw)?;
    }
    if let Some(acct) = sub.get_one::<String>("link-account") {
        let acct_id = id_for_account(conn, scope, acct)?;
        let typ = account_type(conn, acct_id)?;
        if !typ.is_liability() {
            return Err(ValidationError::LinkTarget {
                name: acct.trim().to_string(),
                account_type: typ.to_string(),
            }
            .into());
        }
        asset.linked_account_id = Some(acct_id);
    }
    if let Some(raw) = sub.get_one::<String>("manual-balance") {
        asset.manual_mortgage_balance = parse_non_negative("manual balance", raw)?;
    }
    if let Some(raw) = sub.get_one::<String>("principal") {
        asset.amortization.original_principal = parse_non_negative("principal", raw)?;
    }
    if let Some(raw) = sub.get_one::<String>("rate") {
        asset.amortization.interest_rate = parse_non_negative("interest rate", raw)?;
    }
    if let Some(raw) = sub.get_one::<String>("term") {
        asset.amortization.term_months = Some(parse_term(raw)?);
    }
    if let Some(raw) = sub.get_one::<String>("start") {
        asset.amortization.start_date = Some(parse_date(raw)?);
    }
    if let Some(raw) = sub.get_one::<String>("monthly-payment") {
        asset.monthly_payment = parse_non_negative("monthly payment", raw)?;
    }
    Ok(())
}

const ASSET_COLUMNS: &str = "id, owner, name, type, value, ownership_percentage, linked_account_id, \
     manual_mortgage_balance, interest_rate, term_months, original_principal, \
     amortization_start_date, monthly_payment";

fn asset_from_row(r: &Row<'_>) -> Result<Asset> {
    let typ: String = r.get(3)?;
    let value: String = r.get(4)?;
    let ownership: String = r.get(5)?;
    let manual: String = r.get(7)?;
    let rate: String = r.get(8)?;
    let principal: String = r.get(10)?;
    let start: Option<NaiveDate> = r.get(11)?;
    let payment: String = r.get(12)?;
    Ok(Asset {
        id: r.get(0)?,
        owner: r.get(1)?,
        name: r.get(2)?,
        r#type: typ.parse()?,
        value: decimal_column(&value, "value")?,
        ownership_percentage: decimal_column(&ownership, "ownership_percentage")?,
        linked_account_id: r.get(6)?,
        manual_mortgage_balance: decimal_column(&manual, "manual_mortgage_balance")?,
        amortization: AmortizationTerms {
            start_date: start,
            original_principal: decimal_column(&principal, "original_principal")?,
            interest_rate: decimal_column(&rate, "interest_rate")?,
            term_months: r.get(9)?,
        },
        monthly_payment: decimal_column(&payment, "monthly_payment")?,
    })
}

pub fn asset_by_id(conn: &Connection, id: i64) -> Result<Asset> {
    let sql = format!("SELECT {} FROM assets WHERE id=?1", ASSET_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![id])?;
    let r = rows
        .next()?
        .with_context(|| format!("Asset {} not found", id))?;
    asset_from_row(r)
}

pub fn load_assets(conn: &Connection, scope: &Scope) -> Result<Vec<Asset>> {
    let sql = format!(
        "SELECT {} FROM assets WHERE owner=?1 ORDER BY name",
        ASSET_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![scope.owner])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(asset_from_row(r)?);
    }
    Ok(data)
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetEquityRow {
    pub name: String,
    pub r#type: String,
    pub value: Decimal,
    pub ownership_percentage: Decimal,
    pub linked_account: Option<String>,
    pub liability_balance: Decimal,
    pub liability_source: LiabilitySource,
    pub equity_value: Decimal,
}

/// Resolves every asset of `scope` as of `today`. Computed values are never
/// written back.
pub fn asset_equity_rows(
    conn: &Connection,
    scope: &Scope,
    today: NaiveDate,
) -> Result<Vec<AssetEquityRow>> {
    let default_term = default_term_months(conn)?;
    let mut out = Vec::new();
    for asset in load_assets(conn, scope)? {
        let linked = match asset.linked_account_id {
            Some(id) => account_by_id(conn, id)?,
            None => None,
        };
        let resolution = resolve_liability(
            &asset,
            linked.as_ref().map(|a| a.balance),
            today,
            default_term,
        );
        out.push(AssetEquityRow {
            name: asset.name,
            r#type: asset.r#type.to_string(),
            value: asset.value,
            ownership_percentage: asset.ownership_percentage,
            linked_account: linked.map(|a| a.name),
            liability_balance: resolution.liability_balance.round_dp(2),
            liability_source: resolution.source,
            equity_value: resolution.equity_value.round_dp(2),
        });
    }
    Ok(out)
}

fn list(conn: &Connection, scope: &Scope, sub: &clap::ArgMatches) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let rows = asset_equity_rows(conn, scope, today)?;
    if !OutputFormat::from_matches(sub).emit(&rows)? {
        let data = rows
            .iter()
            .map(|r| {
                vec![
                    r.name.clone(),
                    r.r#type.clone(),
                    fmt_money(&r.value),
                    format!("{}%", r.ownership_percentage.normalize()),
                    fmt_money(&r.liability_balance),
                    r.liability_source.as_str().to_string(),
                    r.linked_account.clone().unwrap_or_default(),
                    fmt_money(&r.equity_value),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Name", "Type", "Value", "Owned", "Liability", "Source", "Linked", "Equity"],
                data,
            )
        );
    }
    Ok(())
}
