use std::sync::Mutex;

/// Blocking dialogs the editor needs from its host.
pub trait Prompter {
    /// Yes/no question; `false` cancels the pending operation.
    fn confirm(&self, message: &str) -> bool;

    /// Notice shown for every rejected or failed operation.
    fn alert(&self, message: &str);
}

// ── Scripted prompter (used for tests) ────────────────────────────────────────

/// Answers every confirmation the same way and records what was shown.
#[derive(Default)]
pub struct ScriptedPrompter {
    answer: bool,
    confirmations: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn accepting() -> Self {
        Self {
            answer: true,
            ..Self::default()
        }
    }

    pub fn declining() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts
            .lock()
            .map(|a| a.clone())
            .unwrap_or_default()
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, message: &str) -> bool {
        if let Ok(mut shown) = self.confirmations.lock() {
            shown.push(message.to_string());
        }
        self.answer
    }

    fn alert(&self, message: &str) {
        if let Ok(mut shown) = self.alerts.lock() {
            shown.push(message.to_string());
        }
    }
}
