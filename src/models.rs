// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Checking,
    Savings,
    CreditCard,
    Investment,
    Mortgage,
    Loan,
}

impl AccountType {
    pub const ALL: [AccountType; 6] = [
        AccountType::Checking,
        AccountType::Savings,
        AccountType::CreditCard,
        AccountType::Investment,
        AccountType::Mortgage,
        AccountType::Loan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
            AccountType::CreditCard => "credit_card",
            AccountType::Investment => "investment",
            AccountType::Mortgage => "mortgage",
            AccountType::Loan => "loan",
        }
    }

    /// Debt accounts whose positive balance is money owed.
    pub fn is_liability(&self) -> bool {
        matches!(
            self,
            AccountType::CreditCard | AccountType::Mortgage | AccountType::Loan
        )
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        AccountType::ALL
            .into_iter()
            .find(|t| t.as_str() == norm)
            .ok_or_else(|| ValidationError::AccountType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    RealEstate,
    Investment,
    Vehicle,
    Other,
}

impl AssetType {
    pub const ALL: [AssetType; 4] = [
        AssetType::RealEstate,
        AssetType::Investment,
        AssetType::Vehicle,
        AssetType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::RealEstate => "real_estate",
            AssetType::Investment => "investment",
            AssetType::Vehicle => "vehicle",
            AssetType::Other => "other",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        AssetType::ALL
            .into_iter()
            .find(|t| t.as_str() == norm)
            .ok_or_else(|| ValidationError::AssetType(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub r#type: AccountType,
    pub balance: Decimal,
    pub institution: Option<String>,
    pub is_hidden: bool,
}

/// Fixed-rate loan parameters attached to an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationTerms {
    pub start_date: Option<NaiveDate>,
    pub original_principal: Decimal,
    /// Annual rate in percent, e.g. `6` for 6%.
    pub interest_rate: Decimal,
    pub term_months: Option<i64>,
}

impl AmortizationTerms {
    pub fn none() -> Self {
        AmortizationTerms {
            start_date: None,
            original_principal: Decimal::ZERO,
            interest_rate: Decimal::ZERO,
            term_months: None,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.start_date.is_some() && self.original_principal > Decimal::ZERO
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub r#type: AssetType,
    pub value: Decimal,
    pub ownership_percentage: Decimal,
    pub linked_account_id: Option<i64>,
    pub manual_mortgage_balance: Decimal,
    pub amortization: AmortizationTerms,
    pub monthly_payment: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub category: Option<String>,
    pub is_fixed: bool,
    pub is_recurring: bool,
    pub is_tax_deductible: bool,
    pub tags: Option<String>,
    pub external_id: Option<String>,
}
