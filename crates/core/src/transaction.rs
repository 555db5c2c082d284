use serde::{Deserialize, Serialize};

use crate::rules::RuleKind;

/// A row of the uncategorized-transactions listing. Read-only here: its
/// fields only pre-fill a new rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRow {
    pub from_account: String,
    pub to_account: String,
    pub details: String,
}

impl TransactionRow {
    pub fn new(from_account: &str, to_account: &str, details: &str) -> Self {
        TransactionRow {
            from_account: from_account.to_string(),
            to_account: to_account.to_string(),
            details: details.to_string(),
        }
    }

    /// The value a rule of `kind` would be created with.
    pub fn prefill(&self, kind: RuleKind) -> &str {
        match kind {
            RuleKind::Substrings => self.details.trim(),
            RuleKind::FromAccounts => &self.from_account,
            RuleKind::ToAccounts => &self.to_account,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefill_picks_matching_field() {
        let row = TransactionRow::new("CARD-1", "SHOP-9", "  GROCERY MARKET 12  ");
        assert_eq!(row.prefill(RuleKind::Substrings), "GROCERY MARKET 12");
        assert_eq!(row.prefill(RuleKind::FromAccounts), "CARD-1");
        assert_eq!(row.prefill(RuleKind::ToAccounts), "SHOP-9");
    }
}
