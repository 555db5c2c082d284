use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid groups payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown rule type: '{0}'")]
    UnknownRuleKind(String),
}

/// The three rule collections a group owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    /// Fragments matched against the transaction description.
    Substrings,
    /// Exact matches on the paying account.
    FromAccounts,
    /// Exact matches on the receiving account.
    ToAccounts,
}

impl RuleKind {
    pub const ALL: [RuleKind; 3] = [RuleKind::Substrings, RuleKind::FromAccounts, RuleKind::ToAccounts];

    /// Collection name as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::Substrings => "substrings",
            RuleKind::FromAccounts => "fromAccounts",
            RuleKind::ToAccounts => "toAccounts",
        }
    }

    /// Singular method name used when adding a rule: `substring`, `fromAccount`, `toAccount`.
    pub fn method(self) -> &'static str {
        match self {
            RuleKind::Substrings => "substring",
            RuleKind::FromAccounts => "fromAccount",
            RuleKind::ToAccounts => "toAccount",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace(|c: char| c == '-' || c == '_', "");
        match normalized.as_str() {
            "substrings" | "substring" => Ok(RuleKind::Substrings),
            "fromaccounts" | "fromaccount" => Ok(RuleKind::FromAccounts),
            "toaccounts" | "toaccount" => Ok(RuleKind::ToAccounts),
            _ => Err(ModelError::UnknownRuleKind(s.to_string())),
        }
    }
}

/// Appends `value` unless an equal element is already present.
/// Returns `true` when the collection changed.
pub fn add_unique(collection: &mut Vec<String>, value: &str) -> bool {
    if collection.iter().any(|v| v == value) {
        return false;
    }
    collection.push(value.to_string());
    true
}

/// Replaces the first element equal to `old` with `new`, keeping its index.
pub fn replace_value(collection: &mut [String], old: &str, new: &str) -> bool {
    match collection.iter().position(|v| v == old) {
        Some(idx) => {
            collection[idx] = new.to_string();
            true
        }
        None => false,
    }
}

/// Removes every element equal to `value` and returns how many were dropped.
pub fn remove_all(collection: &mut Vec<String>, value: &str) -> usize {
    let before = collection.len();
    collection.retain(|v| v != value);
    before - collection.len()
}

// Groups serialized by the server carry `null` for empty collections.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupRules {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub substrings: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub from_accounts: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub to_accounts: Vec<String>,
}

impl GroupRules {
    pub fn rules(&self, kind: RuleKind) -> &[String] {
        match kind {
            RuleKind::Substrings => &self.substrings,
            RuleKind::FromAccounts => &self.from_accounts,
            RuleKind::ToAccounts => &self.to_accounts,
        }
    }

    pub fn rules_mut(&mut self, kind: RuleKind) -> &mut Vec<String> {
        match kind {
            RuleKind::Substrings => &mut self.substrings,
            RuleKind::FromAccounts => &mut self.from_accounts,
            RuleKind::ToAccounts => &mut self.to_accounts,
        }
    }

    pub fn add(&mut self, kind: RuleKind, value: &str) -> bool {
        add_unique(self.rules_mut(kind), value)
    }

    pub fn update(&mut self, kind: RuleKind, old: &str, new: &str) -> bool {
        replace_value(self.rules_mut(kind), old, new)
    }

    pub fn remove(&mut self, kind: RuleKind, value: &str) -> usize {
        remove_all(self.rules_mut(kind), value)
    }

    pub fn is_empty(&self) -> bool {
        RuleKind::ALL.iter().all(|k| self.rules(*k).is_empty())
    }
}

/// All groups keyed by display name, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupSet {
    groups: BTreeMap<String, GroupRules>,
}

impl GroupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the `{name: {Substrings, FromAccounts, ToAccounts}}` payload.
    /// A literal `null` is treated as no groups.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let groups: Option<BTreeMap<String, Option<GroupRules>>> = serde_json::from_str(json)?;
        Ok(groups
            .unwrap_or_default()
            .into_iter()
            .map(|(name, rules)| (name, rules.unwrap_or_default()))
            .collect())
    }

    pub fn insert(&mut self, name: impl Into<String>, rules: GroupRules) -> Option<GroupRules> {
        self.groups.insert(name.into(), rules)
    }

    pub fn get(&self, name: &str) -> Option<&GroupRules> {
        self.groups.get(name)
    }

    /// Case-sensitive exact lookup.
    pub fn contains(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GroupRules)> {
        self.groups.iter().map(|(name, rules)| (name.as_str(), rules))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<(String, GroupRules)> for GroupSet {
    fn from_iter<I: IntoIterator<Item = (String, GroupRules)>>(iter: I) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}
