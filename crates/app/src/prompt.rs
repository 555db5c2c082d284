use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use tally_editor::Prompter;

/// Dialogs on the controlling terminal; alerts go to stderr.
pub struct TerminalPrompter {
    assume_yes: bool,
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        match Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(e) => {
                // No terminal to ask on: treat as a refusal.
                tracing::warn!(error = %e, "confirmation prompt failed");
                false
            }
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }
}
