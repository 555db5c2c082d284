use serde::Serialize;
use tally_core::GroupRules;

/// Body of a POST to the categorization endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum GroupAction {
    /// Creates the group if absent and replaces whichever collections are present.
    #[serde(rename_all = "camelCase")]
    UpsertGroup {
        group_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        substrings: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        from_accounts: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        to_accounts: Option<Vec<String>>,
    },
    #[serde(rename_all = "camelCase")]
    RenameGroup {
        group_name: String,
        new_group_name: String,
    },
    #[serde(rename_all = "camelCase")]
    DeleteGroup { group_name: String },
    /// Older form-based bootstrap; collections travel as raw form strings.
    #[serde(rename_all = "camelCase")]
    CreateGroup {
        group_name: String,
        substrings: String,
        from_accounts: String,
        to_accounts: String,
    },
}

impl GroupAction {
    /// Full reconciled group: all three collections, not just the changed one.
    pub fn upsert(group_name: &str, rules: &GroupRules) -> Self {
        GroupAction::UpsertGroup {
            group_name: group_name.to_string(),
            substrings: Some(rules.substrings.clone()),
            from_accounts: Some(rules.from_accounts.clone()),
            to_accounts: Some(rules.to_accounts.clone()),
        }
    }

    pub fn create_empty(group_name: &str) -> Self {
        GroupAction::UpsertGroup {
            group_name: group_name.to_string(),
            substrings: None,
            from_accounts: None,
            to_accounts: None,
        }
    }

    pub fn rename(group_name: &str, new_group_name: &str) -> Self {
        GroupAction::RenameGroup {
            group_name: group_name.to_string(),
            new_group_name: new_group_name.to_string(),
        }
    }

    pub fn delete(group_name: &str) -> Self {
        GroupAction::DeleteGroup {
            group_name: group_name.to_string(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GroupAction::UpsertGroup { .. } => "upsertGroup",
            GroupAction::RenameGroup { .. } => "renameGroup",
            GroupAction::DeleteGroup { .. } => "deleteGroup",
            GroupAction::CreateGroup { .. } => "createGroup",
        }
    }

    pub fn group_name(&self) -> &str {
        match self {
            GroupAction::UpsertGroup { group_name, .. }
            | GroupAction::RenameGroup { group_name, .. }
            | GroupAction::DeleteGroup { group_name }
            | GroupAction::CreateGroup { group_name, .. } => group_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upsert_carries_all_collections() {
        let rules = GroupRules {
            substrings: vec!["rent".into()],
            from_accounts: vec![],
            to_accounts: vec!["LL-1".into()],
        };
        let body = serde_json::to_value(GroupAction::upsert("Rent", &rules)).unwrap();
        assert_eq!(
            body,
            json!({
                "action": "upsertGroup",
                "groupName": "Rent",
                "substrings": ["rent"],
                "fromAccounts": [],
                "toAccounts": ["LL-1"]
            })
        );
    }

    #[test]
    fn create_empty_omits_collections() {
        let body = serde_json::to_value(GroupAction::create_empty("Food")).unwrap();
        assert_eq!(body, json!({"action": "upsertGroup", "groupName": "Food"}));
    }

    #[test]
    fn rename_and_delete_shapes() {
        assert_eq!(
            serde_json::to_value(GroupAction::rename("Old", "New")).unwrap(),
            json!({"action": "renameGroup", "groupName": "Old", "newGroupName": "New"})
        );
        assert_eq!(
            serde_json::to_value(GroupAction::delete("Old")).unwrap(),
            json!({"action": "deleteGroup", "groupName": "Old"})
        );
    }

    #[test]
    fn legacy_create_sends_raw_strings() {
        let action = GroupAction::CreateGroup {
            group_name: "Cafe".into(),
            substrings: "COFFEE".into(),
            from_accounts: "".into(),
            to_accounts: "".into(),
        };
        assert_eq!(action.name(), "createGroup");
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({
                "action": "createGroup",
                "groupName": "Cafe",
                "substrings": "COFFEE",
                "fromAccounts": "",
                "toAccounts": ""
            })
        );
    }
}
