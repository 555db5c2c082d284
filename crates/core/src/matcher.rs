use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::rules::{GroupSet, RuleKind};
use crate::transaction::TransactionRow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMatch {
    pub group: String,
    pub kind: RuleKind,
    pub rule: String,
}

/// The same rule value claimed by two groups. The server refuses such a
/// configuration; the preview lets `kept` take the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleConflict {
    pub kind: RuleKind,
    pub value: String,
    pub kept: String,
    pub shadowed: String,
}

/// Previews where a transaction lands: exact from-account first, then exact
/// to-account, then the longest substring contained in the details. Among
/// equally long substrings the one starting earliest in the details wins.
pub struct GroupMatcher {
    from_accounts: HashMap<String, String>,
    to_accounts: HashMap<String, String>,
    /// (fragment, group, length in chars), in group-name order.
    substrings: Vec<(String, String, usize)>,
    conflicts: Vec<RuleConflict>,
}

impl GroupMatcher {
    pub fn new(groups: &GroupSet) -> Self {
        let mut conflicts = Vec::new();
        let mut tables: [HashMap<String, String>; 3] = Default::default();
        let mut substrings = Vec::new();

        // Groups iterate in name order, so the first name wins on conflicts.
        for (name, rules) in groups.iter() {
            for (slot, kind) in RuleKind::ALL.iter().enumerate() {
                for value in rules.rules(*kind) {
                    if value.is_empty() {
                        continue;
                    }
                    match tables[slot].entry(value.clone()) {
                        Entry::Occupied(existing) => {
                            if existing.get() != name {
                                conflicts.push(RuleConflict {
                                    kind: *kind,
                                    value: value.clone(),
                                    kept: existing.get().clone(),
                                    shadowed: name.to_string(),
                                });
                            }
                        }
                        Entry::Vacant(slot_entry) => {
                            slot_entry.insert(name.to_string());
                            if *kind == RuleKind::Substrings {
                                substrings.push((value.clone(), name.to_string(), value.chars().count()));
                            }
                        }
                    }
                }
            }
        }

        let [_, from_accounts, to_accounts] = tables;

        Self {
            from_accounts,
            to_accounts,
            substrings,
            conflicts,
        }
    }

    pub fn find_match(&self, tx: &TransactionRow) -> Option<CategoryMatch> {
        if !tx.from_account.is_empty() {
            if let Some(group) = self.from_accounts.get(&tx.from_account) {
                return Some(CategoryMatch {
                    group: group.clone(),
                    kind: RuleKind::FromAccounts,
                    rule: tx.from_account.clone(),
                });
            }
        }
        if !tx.to_account.is_empty() {
            if let Some(group) = self.to_accounts.get(&tx.to_account) {
                return Some(CategoryMatch {
                    group: group.clone(),
                    kind: RuleKind::ToAccounts,
                    rule: tx.to_account.clone(),
                });
            }
        }
        self.longest_substring(&tx.details)
            .map(|(fragment, group)| CategoryMatch {
                group: group.to_string(),
                kind: RuleKind::Substrings,
                rule: fragment.to_string(),
            })
    }

    fn longest_substring(&self, details: &str) -> Option<(&str, &str)> {
        let mut best = None;
        let mut best_len = 0;
        for (start, _) in details.char_indices() {
            let rest = &details[start..];
            for (fragment, group, len) in &self.substrings {
                // Strictly longer only: a later start never displaces an equal match.
                if *len > best_len && rest.starts_with(fragment.as_str()) {
                    best = Some((fragment.as_str(), group.as_str()));
                    best_len = *len;
                }
            }
        }
        best
    }

    pub fn conflicts(&self) -> &[RuleConflict] {
        &self.conflicts
    }
}
