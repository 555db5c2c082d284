pub mod editor;
pub mod i18n;
pub mod prompt;
pub mod session;

pub use editor::{EditorError, Outcome, RuleSetEditor, RuleSource};
pub use i18n::{Language, Message};
pub use prompt::{Prompter, ScriptedPrompter};
pub use session::{RuleEditModal, RuleEditSession};
