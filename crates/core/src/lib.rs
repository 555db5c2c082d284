pub mod account;
pub mod matcher;
pub mod rules;
pub mod transaction;

pub use account::{AccountDirectory, AccountInfo};
pub use matcher::{CategoryMatch, GroupMatcher, RuleConflict};
pub use rules::{add_unique, remove_all, replace_value, GroupRules, GroupSet, ModelError, RuleKind};
pub use transaction::TransactionRow;
