// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! History-learned and keyword-based transaction categorization.
//!
//! Every rule only fills a field that is still empty, so running the engine
//! over its own output changes nothing.

mod knowledge;
mod rules;

pub use knowledge::{KnowledgeBase, Learned};
pub use rules::{FallbackCategory, RULESET_VERSION, RuleSet};

use serde::Serialize;

use crate::models::Transaction;

pub const UNCATEGORIZED: &str = "Uncategorized";

pub fn normalize_description(description: &str) -> String {
    description.trim().to_lowercase()
}

pub fn is_uncategorized(category: Option<&str>) -> bool {
    match category {
        None => true,
        Some(c) => c.trim().is_empty() || c == UNCATEGORIZED,
    }
}

fn tags_unset(tags: Option<&str>) -> bool {
    tags.is_none_or(|t| t.trim().is_empty())
}

/// Transactions the engine is allowed to touch.
pub fn is_target(tx: &Transaction) -> bool {
    is_uncategorized(tx.category.as_deref()) || tags_unset(tx.tags.as_deref())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorizeReport {
    pub processed_count: usize,
    pub updated_count: usize,
    pub knowledge_base_size: usize,
    #[serde(skip)]
    pub changed_ids: Vec<i64>,
}

pub struct Categorizer<'a> {
    rules: &'a RuleSet,
    knowledge: KnowledgeBase,
}

impl<'a> Categorizer<'a> {
    pub fn new(rules: &'a RuleSet, knowledge: KnowledgeBase) -> Self {
        Categorizer { rules, knowledge }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Applies payment detection, history, and keyword rules to `tx`.
    /// Returns whether any field changed.
    pub fn apply(&self, tx: &mut Transaction) -> bool {
        let desc = normalize_description(&tx.description);
        let mut changed = false;

        if self.rules.is_payment(&desc) {
            if is_uncategorized(tx.category.as_deref()) {
                tx.category = Some(self.rules.payment_category.clone());
                changed = true;
            }
            return changed;
        }

        if let Some(learned) = self.knowledge.exact(&desc) {
            if is_uncategorized(tx.category.as_deref()) {
                tx.category = Some(learned.category.clone());
                changed = true;
            }
            if !tx.is_fixed && learned.is_fixed {
                tx.is_fixed = true;
                changed = true;
            }
            if tags_unset(tx.tags.as_deref()) {
                if let Some(tags) = &learned.tags {
                    tx.tags = Some(tags.clone());
                    changed = true;
                }
            }
        } else if is_uncategorized(tx.category.as_deref()) {
            if let Some((key, learned)) =
                self.knowledge.partial(&desc, self.rules.min_partial_key_len)
            {
                tracing::trace!(id = tx.id, key, category = %learned.category, "partial history match");
                tx.category = Some(learned.category.clone());
                changed = true;
            }
        }

        if !tx.is_fixed && self.rules.is_fixed_expense(&desc) {
            tx.is_fixed = true;
            changed = true;
        }
        if tags_unset(tx.tags.as_deref()) && self.rules.is_work_expense(&desc) {
            tx.tags = Some(self.rules.work_tag.clone());
            changed = true;
        }

        if is_uncategorized(tx.category.as_deref()) {
            if let Some(category) = self.rules.fallback_category(&desc) {
                tx.category = Some(category.to_string());
                changed = true;
            }
        }

        changed
    }
}

/// Learns from every categorized transaction in `transactions`, then applies
/// the result to every target in the same slice.
pub fn categorize_all(rules: &RuleSet, transactions: &mut [Transaction]) -> CategorizeReport {
    let knowledge = KnowledgeBase::learn(transactions.iter());
    let categorizer = Categorizer::new(rules, knowledge);

    let mut report = CategorizeReport {
        knowledge_base_size: categorizer.knowledge().len(),
        ..CategorizeReport::default()
    };
    for tx in transactions.iter_mut().filter(|tx| is_target(tx)) {
        report.processed_count += 1;
        if categorizer.apply(tx) {
            report.updated_count += 1;
            report.changed_ids.push(tx.id);
        }
    }
    report
}
