use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rules::ModelError;

/// Metadata the server keeps about every account seen in transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AccountInfo {
    pub is_transaction_account: bool,
    pub source_type: Option<String>,
    pub source: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub occurences_in_transactions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountDirectory {
    accounts: BTreeMap<String, AccountInfo>,
}

impl AccountDirectory {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let accounts: Option<BTreeMap<String, AccountInfo>> = serde_json::from_str(json)?;
        Ok(Self {
            accounts: accounts.unwrap_or_default(),
        })
    }

    /// Names are matched after trimming, the way table cells are read.
    pub fn lookup(&self, name: &str) -> Option<&AccountInfo> {
        self.accounts.get(name.trim())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
