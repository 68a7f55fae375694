// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::RuleSetError;

pub const RULESET_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackCategory {
    pub category: String,
    pub keywords: Vec<String>,
}

/// Keyword lists driving the static categorization rules. Stored as a
/// versioned JSON document so rule changes never need a rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    pub version: u32,
    #[serde(default = "default_payment_category")]
    pub payment_category: String,
    pub payment_markers: Vec<String>,
    #[serde(default)]
    pub fixed_keywords: Vec<String>,
    #[serde(default)]
    pub work_keywords: Vec<String>,
    #[serde(default = "default_work_tag")]
    pub work_tag: String,
    #[serde(default = "default_min_partial_key_len")]
    pub min_partial_key_len: usize,
    #[serde(default)]
    pub fallback_categories: Vec<FallbackCategory>,
}

fn default_payment_category() -> String {
    "Credit Card Payment".to_string()
}

fn default_work_tag() -> String {
    "Work".to_string()
}

fn default_min_partial_key_len() -> usize {
    5
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet {
            version: RULESET_VERSION,
            payment_category: default_payment_category(),
            payment_markers: words(&[
                "payment to chase",
                "payment to amex",
                "credit card payment",
                "payment to citi",
                "payment to discover",
            ]),
            fixed_keywords: words(&[
                "mortgage", "loan", "netflix", "spotify", "hulu", "insurance", "verizon", "at&t",
                "comcast", "xfinity", "gym", "hoa",
            ]),
            work_keywords: words(&["doordash", "uber", "lyft", "wework", "aws", "github"]),
            work_tag: default_work_tag(),
            min_partial_key_len: default_min_partial_key_len(),
            fallback_categories: vec![
                FallbackCategory {
                    category: "Transportation".into(),
                    keywords: words(&["uber", "lyft"]),
                },
                FallbackCategory {
                    category: "Food".into(),
                    keywords: words(&["market", "grocery", "whole foods"]),
                },
                FallbackCategory {
                    category: "Dining".into(),
                    keywords: words(&["restaurant", "bar"]),
                },
                FallbackCategory {
                    category: "Travel".into(),
                    keywords: words(&["travel", "airline", "hotel", "airbnb"]),
                },
            ],
        }
    }
}

impl RuleSet {
    pub fn from_json(text: &str, origin: &str) -> Result<Self, RuleSetError> {
        let rules: RuleSet = serde_json::from_str(text).map_err(|source| RuleSetError::Parse {
            path: origin.to_string(),
            source,
        })?;
        rules.validated()
    }

    /// Reads `path` when it exists, otherwise returns the built-in rules.
    pub fn load_or_default(path: &Path) -> Result<Self, RuleSetError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no rule set file, using built-in rules");
            return Ok(RuleSet::default());
        }
        let text = fs::read_to_string(path).map_err(|source| RuleSetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let rules = RuleSet::from_json(&text, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), "loaded rule set");
        Ok(rules)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn validated(mut self) -> Result<Self, RuleSetError> {
        if self.version != RULESET_VERSION {
            return Err(RuleSetError::UnsupportedVersion {
                found: self.version,
                expected: RULESET_VERSION,
            });
        }
        if self.payment_category.trim().is_empty() {
            return Err(RuleSetError::Empty("payment_category"));
        }
        if self.work_tag.trim().is_empty() {
            return Err(RuleSetError::Empty("work_tag"));
        }

        // Descriptions are matched case-folded, so keywords must be too.
        let fold = |list: &mut Vec<String>| {
            *list = list
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
        };
        fold(&mut self.payment_markers);
        fold(&mut self.fixed_keywords);
        fold(&mut self.work_keywords);
        for fallback in &mut self.fallback_categories {
            fold(&mut fallback.keywords);
        }
        Ok(self)
    }

    pub fn is_payment(&self, normalized: &str) -> bool {
        self.payment_markers
            .iter()
            .any(|m| normalized.contains(m.as_str()))
    }

    pub fn is_fixed_expense(&self, normalized: &str) -> bool {
        self.fixed_keywords
            .iter()
            .any(|k| normalized.contains(k.as_str()))
    }

    pub fn is_work_expense(&self, normalized: &str) -> bool {
        self.work_keywords
            .iter()
            .any(|k| normalized.contains(k.as_str()))
    }

    pub fn fallback_category(&self, normalized: &str) -> Option<&str> {
        self.fallback_categories
            .iter()
            .find(|f| f.keywords.iter().any(|k| normalized.contains(k.as_str())))
            .map(|f| f.category.as_str())
    }
}
