// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::NaiveDate;

use super::{is_uncategorized, normalize_description};
use crate::models::Transaction;

/// What a previously categorized description taught us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Learned {
    pub category: String,
    pub is_fixed: bool,
    pub tags: Option<String>,
    date: NaiveDate,
    id: i64,
}

/// Normalized description -> most recent categorization of that description.
///
/// Keys are kept sorted so partial matching scans them in a stable order.
#[derive(Debug, Default, Clone)]
pub struct KnowledgeBase {
    entries: BTreeMap<String, Learned>,
}

impl KnowledgeBase {
    pub fn learn<'a, I>(history: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut entries: BTreeMap<String, Learned> = BTreeMap::new();
        for tx in history {
            let Some(category) = tx.category.as_deref() else {
                continue;
            };
            if is_uncategorized(Some(category)) {
                continue;
            }
            let key = normalize_description(&tx.description);
            if key.is_empty() {
                continue;
            }
            let learned = Learned {
                category: category.to_string(),
                is_fixed: tx.is_fixed,
                tags: tx.tags.clone().filter(|t| !t.trim().is_empty()),
                date: tx.date,
                id: tx.id,
            };
            match entries.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(learned);
                }
                Entry::Occupied(mut slot) => {
                    // Latest date wins; same-day collisions go to the newer row.
                    let current = slot.get();
                    if (learned.date, learned.id) > (current.date, current.id) {
                        slot.insert(learned);
                    }
                }
            }
        }
        KnowledgeBase { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn exact(&self, normalized: &str) -> Option<&Learned> {
        self.entries.get(normalized)
    }

    /// First key (in key order) of at least `min_len` characters that occurs
    /// inside `normalized`.
    pub fn partial(&self, normalized: &str, min_len: usize) -> Option<(&str, &Learned)> {
        self.entries
            .iter()
            .find(|(key, _)| key.chars().count() >= min_len && normalized.contains(key.as_str()))
            .map(|(key, learned)| (key.as_str(), learned))
    }
}
