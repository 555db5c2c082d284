use anyhow::Result;
use tally_core::{AccountInfo, GroupMatcher, GroupRules, RuleConflict, RuleKind, TransactionRow};
use tally_editor::{Language, Message, Outcome, Prompter, RuleSetEditor, RuleSource};
use tally_client::Transport;

use crate::cli::Commands;

pub async fn run<T: Transport, P: Prompter>(editor: &mut RuleSetEditor<T, P>, command: Commands) -> Result<()> {
    match command {
        Commands::Groups => {
            let groups = editor.groups().await?;
            if groups.is_empty() {
                println!("No groups.");
            }
            for (name, rules) in groups.iter() {
                println!("{name}");
                print_rules(rules);
            }
        }
        Commands::Show { group } => {
            let rules = editor.group(&group).await?;
            println!("{group}");
            print_rules(&rules);
        }
        Commands::Create {
            name,
            legacy,
            substrings,
            from_accounts,
            to_accounts,
        } => {
            let outcome = if legacy {
                editor
                    .create_group_legacy(&name, &substrings, &from_accounts, &to_accounts)
                    .await?
            } else {
                editor.create_group(&name).await?
            };
            report(outcome);
        }
        Commands::Rename { old, new } => report(editor.rename_group(&old, &new).await?),
        Commands::DeleteGroup { name } => report(editor.delete_group(&name).await?),
        Commands::Add {
            group,
            by,
            value,
            from_account,
            to_account,
            details,
        } => {
            let row = TransactionRow::new(&from_account, &to_account, &details);
            let source = match &value {
                Some(value) => RuleSource::Manual(value),
                None => RuleSource::Transaction(&row),
            };
            report(editor.add_rule(&group, by, source).await?);
        }
        Commands::Edit { group, kind, old, new } => {
            editor.open_rule_edit(&group, kind, &old).await?;
            report(editor.submit_rule_edit(&new).await?);
        }
        Commands::RemoveRule { group, kind, value } => {
            editor.open_rule_edit(&group, kind, &value).await?;
            report(editor.delete_selected_rule().await?);
        }
        Commands::Account { name } => {
            let lang = editor.language();
            let accounts = editor.accounts().await?;
            for (label, value) in describe_account(accounts.lookup(&name), lang) {
                if value.is_empty() {
                    println!("{label}");
                } else {
                    println!("{label}: {value}");
                }
            }
        }
        Commands::Preview {
            from_account,
            to_account,
            details,
        } => {
            let matcher = GroupMatcher::new(editor.groups().await?);
            let row = TransactionRow::new(&from_account, &to_account, &details);
            match matcher.find_match(&row) {
                Some(m) => println!("{} (by {} '{}')", m.group, m.kind.method(), m.rule),
                None => println!("Uncategorized"),
            }
        }
        Commands::Check => {
            let matcher = GroupMatcher::new(editor.groups().await?);
            if matcher.conflicts().is_empty() {
                println!("No conflicting rules.");
            }
            for c in matcher.conflicts() {
                println!("{}", describe_conflict(c));
            }
            if !matcher.conflicts().is_empty() {
                anyhow::bail!("{} duplicated rule(s)", matcher.conflicts().len());
            }
        }
    }
    Ok(())
}

fn print_rules(rules: &GroupRules) {
    for kind in RuleKind::ALL {
        let values = rules.rules(kind);
        if !values.is_empty() {
            println!("  {kind}: {}", values.join(", "));
        }
    }
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Submitted => println!("Saved."),
        Outcome::Unchanged => println!("Nothing to change."),
        Outcome::Cancelled => println!("Cancelled."),
    }
}

fn describe_conflict(c: &RuleConflict) -> String {
    format!(
        "{} '{}' is duplicated in groups '{}' and '{}'; the server rejects this configuration",
        c.kind.method(),
        c.value,
        c.kept,
        c.shadowed
    )
}

/// Label/value lines describing an account; unknown accounts get a single line.
fn describe_account(info: Option<&AccountInfo>, lang: Language) -> Vec<(String, String)> {
    let Some(info) = info else {
        return vec![(Message::UnknownAccount.text(lang), String::new())];
    };
    let owner = if info.is_transaction_account {
        Message::AccountMine
    } else {
        Message::AccountUnknown
    };
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    vec![
        (Message::AccountType.text(lang), owner.text(lang)),
        (Message::SourceType.text(lang), text(&info.source_type)),
        (Message::Source.text(lang), text(&info.source)),
        (Message::From.text(lang), text(&info.from)),
        (Message::To.text(lang), text(&info.to)),
        (
            Message::OccurencesInTransactions.text(lang),
            info.occurences_in_transactions.to_string(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_is_described_as_an_error() {
        let conflict = RuleConflict {
            kind: RuleKind::Substrings,
            value: "SHOP".into(),
            kept: "Alpha".into(),
            shadowed: "Beta".into(),
        };
        assert_eq!(
            describe_conflict(&conflict),
            "substring 'SHOP' is duplicated in groups 'Alpha' and 'Beta'; the server rejects this configuration"
        );
    }

    #[test]
    fn unknown_account_is_one_line() {
        let lines = describe_account(None, Language::En);
        assert_eq!(lines, vec![("Unknown account".to_string(), String::new())]);
    }

    #[test]
    fn describes_known_account() {
        let info = AccountInfo {
            is_transaction_account: true,
            source_type: Some("AmeriaCsv".into()),
            source: None,
            from: Some("2024-01-01".into()),
            to: Some("2024-02-01".into()),
            occurences_in_transactions: 5,
        };
        let lines = describe_account(Some(&info), Language::En);
        assert_eq!(lines[0], ("Type".to_string(), "My".to_string()));
        assert_eq!(lines[1].1, "AmeriaCsv");
        assert_eq!(lines[2].1, "");
        assert_eq!(lines[5], ("Occurrences in transactions".to_string(), "5".to_string()));
    }
}
