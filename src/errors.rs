// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failure while amortizing a single asset's loan. Never escapes the
/// liability resolver; the asset is treated as carrying no liability.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmortizationError {
    #[error("term must be a positive number of months, got {0}")]
    InvalidTerm(i64),
    #[error("interest rate must not be negative, got {0}")]
    NegativeRate(String),
    #[error("arithmetic overflow computing (1+r)^{0}")]
    Overflow(i64),
    #[error("division by zero in amortization formula")]
    DivisionByZero,
}

#[derive(Debug, Error)]
pub enum RuleSetError {
    #[error("unsupported rule set version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("rule set field '{0}' must not be empty")]
    Empty(&'static str),
    #[error("failed to read rule set at {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse rule set at {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Malformed user input rejected before it reaches the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown account type '{0}' (expected checking, savings, credit_card, investment, mortgage or loan)")]
    AccountType(String),
    #[error("unknown asset type '{0}' (expected real_estate, investment, vehicle or other)")]
    AssetType(String),
    #[error("ownership percentage must be between 0 and 100, got {0}")]
    Ownership(String),
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: String },
    #[error("{field} must not exceed 1000000000000000, got {value}")]
    TooLarge { field: &'static str, value: String },
    #[error("term must be a positive number of months, got {0}")]
    Term(i64),
    #[error("account '{name}' is a {account_type} account; assets can only link to credit_card, mortgage or loan accounts")]
    LinkTarget { name: String, account_type: String },
}
