// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Outstanding liability and owner equity for a single asset.
//!
//! Exactly one source is authoritative, checked in order: a linked account's
//! balance, a manual balance, then the amortization schedule.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;

use crate::errors::AmortizationError;
use crate::models::{AmortizationTerms, Asset};

pub const DEFAULT_TERM_MONTHS: i64 = 360;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LiabilitySource {
    LinkedAccount,
    Manual,
    Amortized,
    None,
}

impl LiabilitySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LiabilitySource::LinkedAccount => "linked",
            LiabilitySource::Manual => "manual",
            LiabilitySource::Amortized => "amortized",
            LiabilitySource::None => "none",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub liability_balance: Decimal,
    pub equity_value: Decimal,
    pub source: LiabilitySource,
}

/// `linked_balance` is the balance of the asset's linked account, or `None`
/// when the asset has no link or the linked account no longer exists.
pub fn resolve_liability(
    asset: &Asset,
    linked_balance: Option<Decimal>,
    today: NaiveDate,
    default_term: i64,
) -> Resolution {
    let (liability, source) = match asset.linked_account_id.and(linked_balance) {
        Some(balance) => (balance.abs(), LiabilitySource::LinkedAccount),
        None if !asset.manual_mortgage_balance.is_zero() => {
            (asset.manual_mortgage_balance.abs(), LiabilitySource::Manual)
        }
        None if asset.amortization.is_configured() => {
            match amortized_balance(&asset.amortization, today, default_term) {
                Ok(balance) => (balance, LiabilitySource::Amortized),
                Err(err) => {
                    tracing::warn!(asset_id = asset.id, error = %err, "amortization failed, treating liability as zero");
                    (Decimal::ZERO, LiabilitySource::None)
                }
            }
        }
        None => (Decimal::ZERO, LiabilitySource::None),
    };

    Resolution {
        liability_balance: liability,
        equity_value: equity_value(asset.value, liability, asset.ownership_percentage),
        source,
    }
}

/// Whole calendar months between `start` and `today`, ignoring the day of
/// month. Never negative.
pub fn elapsed_months(start: NaiveDate, today: NaiveDate) -> i64 {
    let years = i64::from(today.year() - start.year());
    let months = i64::from(today.month()) - i64::from(start.month());
    (years * 12 + months).max(0)
}

/// Remaining principal on a fixed-rate loan, floored at zero. Elapsed months
/// are not capped at the term.
pub fn amortized_balance(
    terms: &AmortizationTerms,
    today: NaiveDate,
    default_term: i64,
) -> Result<Decimal, AmortizationError> {
    let Some(start) = terms.start_date else {
        return Ok(Decimal::ZERO);
    };
    let n = terms.term_months.unwrap_or(default_term);
    if n <= 0 {
        return Err(AmortizationError::InvalidTerm(n));
    }
    if terms.interest_rate < Decimal::ZERO {
        return Err(AmortizationError::NegativeRate(
            terms.interest_rate.to_string(),
        ));
    }
    let p = elapsed_months(start, today);
    amortize(terms.original_principal, terms.interest_rate, n, p)
}

/// `B = P * [(1+r)^n - (1+r)^p] / [(1+r)^n - 1]`, or straight-line when the
/// rate is zero.
pub fn amortize(
    principal: Decimal,
    annual_rate_pct: Decimal,
    term_months: i64,
    elapsed: i64,
) -> Result<Decimal, AmortizationError> {
    let n = Decimal::from(term_months);
    let r = annual_rate_pct / Decimal::ONE_HUNDRED / Decimal::from(12);

    let balance = if r.is_zero() {
        let per_month = principal
            .checked_div(n)
            .ok_or(AmortizationError::DivisionByZero)?;
        let paid = per_month
            .checked_mul(Decimal::from(elapsed))
            .ok_or(AmortizationError::Overflow(elapsed))?;
        principal - paid
    } else {
        let growth = Decimal::ONE + r;
        let full = growth
            .checked_powi(term_months)
            .ok_or(AmortizationError::Overflow(term_months))?;
        let done = growth
            .checked_powi(elapsed)
            .ok_or(AmortizationError::Overflow(elapsed))?;
        let ratio = (full - done)
            .checked_div(full - Decimal::ONE)
            .ok_or(AmortizationError::DivisionByZero)?;
        principal
            .checked_mul(ratio)
            .ok_or(AmortizationError::Overflow(elapsed))?
    };

    Ok(balance.max(Decimal::ZERO))
}

/// `(value - liability) * pct / 100`, with `pct` clamped into `[0, 100]`.
/// Values too large to represent give 0.
pub fn equity_value(value: Decimal, liability: Decimal, ownership_percentage: Decimal) -> Decimal {
    let share = ownership_percentage.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED) / Decimal::ONE_HUNDRED;
    match value
        .checked_sub(liability)
        .and_then(|net| net.checked_mul(share))
    {
        Some(equity) => equity,
        None => {
            tracing::warn!(%value, %liability, "equity overflowed, treating as zero");
            Decimal::ZERO
        }
    }
}
