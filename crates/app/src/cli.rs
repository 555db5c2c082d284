use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tally_core::RuleKind;
use tally_editor::Language;

#[derive(Parser)]
#[command(name = "tally", about = "Edit transaction categorization groups on a finance server.")]
pub struct Cli {
    /// Config file (default: platform config dir / config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Server base URL, e.g. http://localhost:8080
    #[arg(long, global = true, env = "TALLY_SERVER_URL")]
    pub server: Option<String>,

    /// Message language (en or ru)
    #[arg(long, global = true)]
    pub lang: Option<Language>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all groups and their rules.
    Groups,
    /// Show the rules of one group.
    Show {
        group: String,
    },
    /// Create an empty group.
    Create {
        name: String,
        /// Use the form-style createGroup action with raw rule strings
        #[arg(long)]
        legacy: bool,
        #[arg(long, default_value = "", requires = "legacy")]
        substrings: String,
        #[arg(long = "from-accounts", default_value = "", requires = "legacy")]
        from_accounts: String,
        #[arg(long = "to-accounts", default_value = "", requires = "legacy")]
        to_accounts: String,
    },
    /// Rename a group, keeping its rules.
    Rename {
        old: String,
        new: String,
    },
    /// Delete a group and its rules.
    DeleteGroup {
        name: String,
    },
    /// Add a rule to a group, typed in or taken from a transaction.
    Add {
        group: String,
        /// substring, from-account or to-account
        #[arg(long)]
        by: RuleKind,
        /// Rule value; when omitted it is taken from the transaction fields
        #[arg(long)]
        value: Option<String>,
        /// Transaction's paying account
        #[arg(long = "from-account", default_value = "")]
        from_account: String,
        /// Transaction's receiving account
        #[arg(long = "to-account", default_value = "")]
        to_account: String,
        /// Transaction's description
        #[arg(long, default_value = "")]
        details: String,
    },
    /// Replace one rule of a group.
    Edit {
        group: String,
        kind: RuleKind,
        old: String,
        new: String,
    },
    /// Remove every occurrence of a rule from a group.
    RemoveRule {
        group: String,
        kind: RuleKind,
        value: String,
    },
    /// Show what the server knows about an account.
    Account {
        name: String,
    },
    /// Show which group a transaction would be categorized into.
    Preview {
        #[arg(long = "from-account", default_value = "")]
        from_account: String,
        #[arg(long = "to-account", default_value = "")]
        to_account: String,
        #[arg(long, default_value = "")]
        details: String,
    },
    /// Report rule values claimed by more than one group.
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_from_transaction() {
        let cli = Cli::try_parse_from([
            "tally", "add", "Shops", "--by", "to-account", "--to-account", "SHOP-9",
        ])
        .unwrap();
        match cli.command {
            Commands::Add { group, by, value, to_account, .. } => {
                assert_eq!(group, "Shops");
                assert_eq!(by, RuleKind::ToAccounts);
                assert!(value.is_none());
                assert_eq!(to_account, "SHOP-9");
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tally", "groups", "--lang", "ru", "-y"]).unwrap();
        assert_eq!(cli.lang, Some(Language::Ru));
        assert!(cli.yes);
    }

    #[test]
    fn legacy_fields_require_legacy_flag() {
        assert!(Cli::try_parse_from(["tally", "create", "Cafe", "--substrings", "COFFEE"]).is_err());
        assert!(Cli::try_parse_from(["tally", "create", "Cafe", "--legacy", "--substrings", "COFFEE"]).is_ok());
    }

    #[test]
    fn rejects_unknown_rule_kind() {
        assert!(Cli::try_parse_from(["tally", "edit", "Rent", "amount", "a", "b"]).is_err());
    }
}
