use tally_client::{GroupAction, PageSnapshot, Transport, TransportError};
use tally_core::{AccountDirectory, GroupRules, GroupSet, RuleKind, TransactionRow};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::i18n::{Language, Message};
use crate::prompt::Prompter;
use crate::session::{RuleEditModal, RuleEditSession};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Group name cannot be empty")]
    EmptyGroupName,
    #[error("Rule value cannot be empty")]
    EmptyRuleValue,
    #[error("Group already exists: {0}")]
    DuplicateGroup(String),
    #[error("Group not found: {0}")]
    UnknownGroup(String),
    #[error("No rule is being edited")]
    NoOpenRuleEdit,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl EditorError {
    /// Text shown to the user in the configured language.
    pub fn message(&self, lang: Language) -> String {
        match self {
            EditorError::EmptyGroupName => Message::GroupNameEmpty.text(lang),
            EditorError::EmptyRuleValue => Message::RuleValueEmpty.text(lang),
            EditorError::DuplicateGroup(name) => Message::GroupExists(name).text(lang),
            EditorError::UnknownGroup(name) => Message::GroupNotFound(name).text(lang),
            EditorError::NoOpenRuleEdit => Message::NoOpenRuleEdit.text(lang),
            EditorError::Transport(e) => Message::RequestFailed(&e.to_string()).text(lang),
        }
    }

    /// Rejected before any request was sent.
    pub fn is_validation(&self) -> bool {
        !matches!(self, EditorError::Transport(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Accepted by the server; the snapshot has been discarded and re-fetched
    /// when possible.
    Submitted,
    /// Nothing needed sending.
    Unchanged,
    /// The user declined the confirmation.
    Cancelled,
}

/// Where the value of a new rule comes from.
#[derive(Debug, Clone, Copy)]
pub enum RuleSource<'a> {
    Manual(&'a str),
    /// Pre-filled from the matching field of a selected transaction.
    Transaction(&'a TransactionRow),
}

impl RuleSource<'_> {
    pub fn value(&self, kind: RuleKind) -> &str {
        match self {
            RuleSource::Manual(value) => value.trim(),
            RuleSource::Transaction(row) => row.prefill(kind).trim(),
        }
    }
}

/// Edits group rule sets against a snapshot of server state.
///
/// Nothing is updated optimistically: every accepted mutation discards the
/// snapshot (and any open rule edit) and fetches a fresh one.
pub struct RuleSetEditor<T, P> {
    transport: T,
    prompter: P,
    language: Language,
    snapshot: Option<PageSnapshot>,
    modal: RuleEditModal,
}

impl<T: Transport, P: Prompter> RuleSetEditor<T, P> {
    /// The snapshot is fetched lazily by the first operation that needs it.
    pub fn new(transport: T, prompter: P, language: Language) -> Self {
        Self {
            transport,
            prompter,
            language,
            snapshot: None,
            modal: RuleEditModal::Closed,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn modal(&self) -> &RuleEditModal {
        &self.modal
    }

    pub fn is_synced(&self) -> bool {
        self.snapshot.is_some()
    }

    pub async fn groups(&mut self) -> Result<&GroupSet, EditorError> {
        let result = self.current().await.map(|_| ());
        self.report(result)?;
        self.current().await.map(|s| &s.groups)
    }

    pub async fn accounts(&mut self) -> Result<&AccountDirectory, EditorError> {
        let result = self.current().await.map(|_| ());
        self.report(result)?;
        self.current().await.map(|s| &s.accounts)
    }

    /// Current rule collections of one group.
    pub async fn group(&mut self, name: &str) -> Result<GroupRules, EditorError> {
        let result = self.lookup(name).await;
        self.report(result)
    }

    /// Appends a rule unless the group already holds it, then submits the
    /// whole group.
    pub async fn add_rule(
        &mut self,
        group: &str,
        kind: RuleKind,
        source: RuleSource<'_>,
    ) -> Result<Outcome, EditorError> {
        let result = self.try_add_rule(group, kind, source).await;
        self.report(result)
    }

    /// Opens the rule-edit modal, replacing any session already open.
    pub async fn open_rule_edit(
        &mut self,
        group: &str,
        kind: RuleKind,
        current_value: &str,
    ) -> Result<&RuleEditSession, EditorError> {
        let result = self.lookup(group).await;
        let rules = self.report(result)?;
        self.modal
            .open(RuleEditSession::new(group, kind, rules, current_value));
        self.modal.session().ok_or(EditorError::NoOpenRuleEdit)
    }

    /// Picks which rule of the open session is being edited.
    pub fn select_rule(&mut self, value: &str) -> Result<bool, EditorError> {
        let result = self
            .modal
            .session_mut()
            .map(|session| session.select(value))
            .ok_or(EditorError::NoOpenRuleEdit);
        self.report(result)
    }

    /// Cancel or click outside; the session is discarded.
    pub fn close_rule_edit(&mut self) -> Option<RuleEditSession> {
        self.modal.close()
    }

    /// Replaces the selected rule with `new_value`. An empty value keeps the
    /// modal open and sends nothing.
    pub async fn submit_rule_edit(&mut self, new_value: &str) -> Result<Outcome, EditorError> {
        let result = self.try_submit_rule_edit(new_value).await;
        self.report(result)
    }

    /// Removes every occurrence of the selected rule after confirmation.
    pub async fn delete_selected_rule(&mut self) -> Result<Outcome, EditorError> {
        let result = self.try_delete_selected_rule().await;
        self.report(result)
    }

    /// Creates an empty group. Duplicate names are rejected locally, which is
    /// best-effort: the server has the final say.
    pub async fn create_group(&mut self, name: &str) -> Result<Outcome, EditorError> {
        let result = self.try_create_group(name, None).await;
        self.report(result)
    }

    /// Form-style creation with raw, unsplit rule strings.
    pub async fn create_group_legacy(
        &mut self,
        name: &str,
        substrings: &str,
        from_accounts: &str,
        to_accounts: &str,
    ) -> Result<Outcome, EditorError> {
        let raw = [substrings, from_accounts, to_accounts];
        let result = self.try_create_group(name, Some(raw)).await;
        self.report(result)
    }

    pub async fn rename_group(&mut self, old_name: &str, new_name: &str) -> Result<Outcome, EditorError> {
        let new_name = new_name.trim();
        if new_name == old_name {
            debug!(group = old_name, "rename to same name ignored");
            return Ok(Outcome::Unchanged);
        }
        if new_name.is_empty() {
            return self.report(Err(EditorError::EmptyGroupName));
        }
        let result = self.submit(GroupAction::rename(old_name, new_name)).await;
        self.report(result)
    }

    pub async fn delete_group(&mut self, name: &str) -> Result<Outcome, EditorError> {
        if !self.confirm(Message::ConfirmDeleteGroup) {
            return Ok(Outcome::Cancelled);
        }
        let result = self.submit(GroupAction::delete(name)).await;
        self.report(result)
    }

    async fn try_add_rule(
        &mut self,
        group: &str,
        kind: RuleKind,
        source: RuleSource<'_>,
    ) -> Result<Outcome, EditorError> {
        let value = source.value(kind);
        if value.is_empty() {
            return Err(EditorError::EmptyRuleValue);
        }
        let mut rules = self.lookup(group).await?;
        if !rules.add(kind, value) {
            debug!(group, kind = %kind, value, "rule already present");
        }
        self.submit(GroupAction::upsert(group, &rules)).await
    }

    async fn try_submit_rule_edit(&mut self, new_value: &str) -> Result<Outcome, EditorError> {
        let session = self.modal.session().ok_or(EditorError::NoOpenRuleEdit)?;
        let new_value = new_value.trim();
        if new_value.is_empty() {
            return Err(EditorError::EmptyRuleValue);
        }
        let action = GroupAction::upsert(session.group(), &session.updated(new_value));
        self.submit(action).await
    }

    async fn try_delete_selected_rule(&mut self) -> Result<Outcome, EditorError> {
        if !self.modal.is_open() {
            return Err(EditorError::NoOpenRuleEdit);
        }
        if !self.confirm(Message::ConfirmDeleteRule) {
            return Ok(Outcome::Cancelled);
        }
        let session = self.modal.session().ok_or(EditorError::NoOpenRuleEdit)?;
        let action = GroupAction::upsert(session.group(), &session.without_selected());
        self.submit(action).await
    }

    async fn try_create_group(&mut self, name: &str, raw: Option<[&str; 3]>) -> Result<Outcome, EditorError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditorError::EmptyGroupName);
        }
        if self.current().await?.groups.contains(name) {
            return Err(EditorError::DuplicateGroup(name.to_string()));
        }
        let action = match raw {
            Some([substrings, from_accounts, to_accounts]) => GroupAction::CreateGroup {
                group_name: name.to_string(),
                substrings: substrings.to_string(),
                from_accounts: from_accounts.to_string(),
                to_accounts: to_accounts.to_string(),
            },
            None => GroupAction::create_empty(name),
        };
        self.submit(action).await
    }

    async fn submit(&mut self, action: GroupAction) -> Result<Outcome, EditorError> {
        info!(action = action.name(), group = action.group_name(), "submitting");
        self.transport.submit(&action).await?;

        // From here on the server's copy is the only valid one.
        self.snapshot = None;
        self.modal.close();
        match self.fetch_snapshot().await {
            Ok(snapshot) => self.snapshot = Some(snapshot),
            // The change is saved; the next operation fetches again.
            Err(e) => warn!(error = %e, "re-fetch after submit failed"),
        }
        Ok(Outcome::Submitted)
    }

    async fn fetch_snapshot(&self) -> Result<PageSnapshot, EditorError> {
        let html = self.transport.fetch_page().await?;
        let snapshot = PageSnapshot::parse(&html).map_err(TransportError::from)?;
        debug!(groups = snapshot.groups.len(), accounts = snapshot.accounts.len(), "snapshot loaded");
        Ok(snapshot)
    }

    async fn current(&mut self) -> Result<&PageSnapshot, EditorError> {
        let snapshot = match self.snapshot.take() {
            Some(snapshot) => snapshot,
            None => self.fetch_snapshot().await?,
        };
        let snapshot: &PageSnapshot = self.snapshot.insert(snapshot);
        Ok(snapshot)
    }

    async fn lookup(&mut self, name: &str) -> Result<GroupRules, EditorError> {
        self.current()
            .await?
            .groups
            .get(name)
            .cloned()
            .ok_or_else(|| EditorError::UnknownGroup(name.to_string()))
    }

    fn confirm(&self, message: Message<'_>) -> bool {
        let accepted = self.prompter.confirm(&message.text(self.language));
        if !accepted {
            debug!("confirmation declined");
        }
        accepted
    }

    fn report<R>(&self, result: Result<R, EditorError>) -> Result<R, EditorError> {
        if let Err(e) = &result {
            warn!(error = %e, "editor operation failed");
            self.prompter.alert(&e.message(self.language));
        }
        result
    }
}
