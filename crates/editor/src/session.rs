use tally_core::{GroupRules, RuleKind};

/// Context of one rule-edit interaction. Owns a copy of the group's rules
/// taken when the modal opened; dropped when the modal closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEditSession {
    group: String,
    kind: RuleKind,
    rules: GroupRules,
    selected: String,
}

impl RuleEditSession {
    pub fn new(group: &str, kind: RuleKind, rules: GroupRules, current_value: &str) -> Self {
        Self {
            group: group.to_string(),
            kind,
            rules,
            selected: current_value.to_string(),
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn rules(&self) -> &GroupRules {
        &self.rules
    }

    /// Rules of the edited kind, in display order.
    pub fn choices(&self) -> &[String] {
        self.rules.rules(self.kind)
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Switches to another rule of the same kind; unknown values are ignored.
    pub fn select(&mut self, value: &str) -> bool {
        if self.choices().iter().any(|v| v == value) {
            self.selected = value.to_string();
            true
        } else {
            false
        }
    }

    /// The group with the selected rule replaced in place by `new_value`.
    pub fn updated(&self, new_value: &str) -> GroupRules {
        let mut rules = self.rules.clone();
        rules.update(self.kind, &self.selected, new_value);
        rules
    }

    /// The group with every occurrence of the selected rule removed.
    pub fn without_selected(&self) -> GroupRules {
        let mut rules = self.rules.clone();
        rules.remove(self.kind, &self.selected);
        rules
    }
}

/// `Closed -> Open(session)` on invocation; back to `Closed` on submit,
/// delete, cancel or an outside click.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RuleEditModal {
    #[default]
    Closed,
    Open(RuleEditSession),
}

impl RuleEditModal {
    /// Replaces whatever session was open.
    pub fn open(&mut self, session: RuleEditSession) {
        *self = RuleEditModal::Open(session);
    }

    pub fn close(&mut self) -> Option<RuleEditSession> {
        match std::mem::take(self) {
            RuleEditModal::Open(session) => Some(session),
            RuleEditModal::Closed => None,
        }
    }

    pub fn session(&self) -> Option<&RuleEditSession> {
        match self {
            RuleEditModal::Open(session) => Some(session),
            RuleEditModal::Closed => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut RuleEditSession> {
        match self {
            RuleEditModal::Open(session) => Some(session),
            RuleEditModal::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, RuleEditModal::Open(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rent() -> GroupRules {
        GroupRules {
            substrings: vec!["rent".into(), "lease".into()],
            from_accounts: vec!["A".into()],
            to_accounts: vec![],
        }
    }

    #[test]
    fn select_only_accepts_existing_rules() {
        let mut session = RuleEditSession::new("Rent", RuleKind::Substrings, rent(), "rent");
        assert!(session.select("lease"));
        assert_eq!(session.selected(), "lease");
        assert!(!session.select("A"));
        assert_eq!(session.selected(), "lease");
    }

    #[test]
    fn updated_replaces_selected_in_place() {
        let session = RuleEditSession::new("Rent", RuleKind::Substrings, rent(), "lease");
        let updated = session.updated("lease payment");
        assert_eq!(updated.substrings, vec!["rent", "lease payment"]);
        assert_eq!(updated.from_accounts, vec!["A"]);
        // The snapshot itself is untouched.
        assert_eq!(session.rules(), &rent());
    }

    #[test]
    fn updated_with_missing_selection_changes_nothing() {
        let session = RuleEditSession::new("Rent", RuleKind::Substrings, rent(), "mortgage");
        assert_eq!(session.updated("x"), rent());
    }

    #[test]
    fn modal_transitions() {
        let mut modal = RuleEditModal::default();
        assert!(!modal.is_open());
        assert!(modal.close().is_none());

        modal.open(RuleEditSession::new("Rent", RuleKind::Substrings, rent(), "rent"));
        modal.open(RuleEditSession::new("Rent", RuleKind::FromAccounts, rent(), "A"));
        assert_eq!(modal.session().unwrap().kind(), RuleKind::FromAccounts);

        let closed = modal.close().unwrap();
        assert_eq!(closed.selected(), "A");
        assert_eq!(modal, RuleEditModal::Closed);
    }
}
