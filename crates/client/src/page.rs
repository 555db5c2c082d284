use std::sync::OnceLock;

use regex::Regex;
use tally_core::{AccountDirectory, GroupSet, ModelError};
use thiserror::Error;

pub const GROUPS_SCRIPT_ID: &str = "groupsData";
pub const ACCOUNTS_SCRIPT_ID: &str = "accountsData";

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Page has no <script id=\"{0}\"> payload")]
    MissingPayload(&'static str),
    #[error("Invalid payload: {0}")]
    Payload(#[from] ModelError),
}

macro_rules! script_re {
    ($name:ident, $id:literal) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| {
                Regex::new(concat!(
                    r#"(?s)<script\b[^>]*\bid\s*=\s*["']"#,
                    $id,
                    r#"["'][^>]*>(.*?)</script>"#
                ))
                .expect("invalid regex")
            })
        }
    };
}

script_re!(re_groups, "groupsData");
script_re!(re_accounts, "accountsData");

/// Server-authoritative state embedded in the categorization page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSnapshot {
    pub groups: GroupSet,
    pub accounts: AccountDirectory,
}

impl PageSnapshot {
    pub fn parse(html: &str) -> Result<Self, PageError> {
        let groups_json = embedded_json(html, re_groups()).ok_or(PageError::MissingPayload(GROUPS_SCRIPT_ID))?;
        let groups = GroupSet::from_json(groups_json)?;

        let accounts = match embedded_json(html, re_accounts()) {
            Some(json) => AccountDirectory::from_json(json)?,
            None => AccountDirectory::default(),
        };

        Ok(Self { groups, accounts })
    }
}

/// Body of the first matching `<script>` element, trimmed.
fn embedded_json<'a>(html: &'a str, re: &Regex) -> Option<&'a str> {
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|body| body.as_str().trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!doctype html>
<html><body>
<table id="transactions"><tr><td>x</td></tr></table>
<script id="groupsData" type="application/json">
  {"Rent": {"Substrings": ["rent"], "FromAccounts": null, "ToAccounts": []}}
</script>
<script type="application/json" id='accountsData'>{"CARD-1": {"IsTransactionAccount": true}}</script>
<script src="/static/js/groups.js"></script>
</body></html>"#;

    #[test]
    fn extracts_both_payloads() {
        let snapshot = PageSnapshot::parse(PAGE).unwrap();
        assert_eq!(snapshot.groups.len(), 1);
        assert_eq!(snapshot.groups.get("Rent").unwrap().substrings, vec!["rent"]);
        assert!(snapshot.accounts.lookup("CARD-1").unwrap().is_transaction_account);
    }

    #[test]
    fn missing_accounts_payload_is_empty_directory() {
        let html = r#"<script id="groupsData">{}</script>"#;
        let snapshot = PageSnapshot::parse(html).unwrap();
        assert!(snapshot.groups.is_empty());
        assert!(snapshot.accounts.is_empty());
    }

    #[test]
    fn missing_groups_payload_is_an_error() {
        let err = PageSnapshot::parse("<html></html>").unwrap_err();
        assert!(matches!(err, PageError::MissingPayload(GROUPS_SCRIPT_ID)));
    }

    #[test]
    fn malformed_groups_payload_is_an_error() {
        let err = PageSnapshot::parse(r#"<script id="groupsData">{oops</script>"#).unwrap_err();
        assert!(matches!(err, PageError::Payload(_)));
    }
}
