use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Ru => write!(f, "ru"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ru" => Ok(Language::Ru),
            other => Err(format!("Unsupported language: '{other}' (expected en or ru)")),
        }
    }
}

/// User-facing texts: alerts, confirmations, account description labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message<'a> {
    GroupNameEmpty,
    RuleValueEmpty,
    GroupExists(&'a str),
    GroupNotFound(&'a str),
    NoOpenRuleEdit,
    ConfirmDeleteRule,
    ConfirmDeleteGroup,
    /// Transport or server failure, prefixed like every other request error.
    RequestFailed(&'a str),
    UnknownAccount,
    AccountType,
    AccountMine,
    AccountUnknown,
    SourceType,
    Source,
    From,
    To,
    OccurencesInTransactions,
}

impl Message<'_> {
    pub fn text(&self, lang: Language) -> String {
        match lang {
            Language::En => self.en(),
            Language::Ru => self.ru(),
        }
    }

    fn en(&self) -> String {
        match self {
            Message::GroupNameEmpty => "Group name cannot be empty".into(),
            Message::RuleValueEmpty => "Rule value cannot be empty".into(),
            Message::GroupExists(name) => format!("Group '{name}' already exists"),
            Message::GroupNotFound(name) => format!("Group '{name}' not found"),
            Message::NoOpenRuleEdit => "No rule is being edited".into(),
            Message::ConfirmDeleteRule => "Are you sure you want to delete this rule?".into(),
            Message::ConfirmDeleteGroup => "Are you sure you want to delete this group?".into(),
            Message::RequestFailed(reason) => format!("Error: {reason}"),
            Message::UnknownAccount => "Unknown account".into(),
            Message::AccountType => "Type".into(),
            Message::AccountMine => "My".into(),
            Message::AccountUnknown => "Unknown".into(),
            Message::SourceType => "Source type".into(),
            Message::Source => "Source".into(),
            Message::From => "From".into(),
            Message::To => "To".into(),
            Message::OccurencesInTransactions => "Occurrences in transactions".into(),
        }
    }

    fn ru(&self) -> String {
        match self {
            Message::GroupNameEmpty => "Имя группы не может быть пустым".into(),
            Message::RuleValueEmpty => "Значение правила не может быть пустым".into(),
            Message::GroupExists(name) => format!("Группа '{name}' уже существует"),
            Message::GroupNotFound(name) => format!("Группа '{name}' не найдена"),
            Message::NoOpenRuleEdit => "Нет редактируемого правила".into(),
            Message::ConfirmDeleteRule => "Вы уверены, что хотите удалить это правило?".into(),
            Message::ConfirmDeleteGroup => "Вы уверены, что хотите удалить эту группу?".into(),
            Message::RequestFailed(reason) => format!("Ошибка: {reason}"),
            Message::UnknownAccount => "Неизвестный счёт".into(),
            Message::AccountType => "Тип".into(),
            Message::AccountMine => "Мой".into(),
            Message::AccountUnknown => "Неизвестный".into(),
            Message::SourceType => "Тип источника".into(),
            Message::Source => "Источник".into(),
            Message::From => "С".into(),
            Message::To => "По".into(),
            Message::OccurencesInTransactions => "Встречается в транзакциях".into(),
        }
    }
}
