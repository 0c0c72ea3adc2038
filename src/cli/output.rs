use colored::Colorize;
use std::fmt;
use std::sync::{OnceLock, RwLock};

use crate::notifications::NotificationKind;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

impl From<NotificationKind> for MessageKind {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Success => MessageKind::Success,
            NotificationKind::Warning => MessageKind::Warning,
            NotificationKind::Error => MessageKind::Error,
            NotificationKind::Info => MessageKind::Info,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct OutputPreferences {
    pub color: bool,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self { color: true }
    }
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

pub fn set_preferences(prefs: OutputPreferences) {
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = prefs;
    }
}

fn preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

fn build_label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "[i]",
        MessageKind::Success => "[✓]",
        MessageKind::Warning => "[!]",
        MessageKind::Error => "[x]",
        MessageKind::Section => "",
    }
}

/// Formats a message without printing it.
pub fn format_message(kind: MessageKind, message: impl fmt::Display, color: bool) -> String {
    let text = message.to_string();

    let base = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        _ => format!("{} {text}", build_label(kind)),
    };

    if !color {
        return base;
    }

    match kind {
        MessageKind::Success => base.bright_green().to_string(),
        MessageKind::Warning => base.bright_yellow().to_string(),
        MessageKind::Error => base.bright_red().to_string(),
        MessageKind::Section => base.bold().to_string(),
        MessageKind::Info => base,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let prefs = preferences();
    let formatted = format_message(kind, message, prefs.color);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Prints pre-rendered multi-line text as is.
pub fn block(text: &str) {
    println!("{}", text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_formatting_adds_labels() {
        assert_eq!(
            format_message(MessageKind::Warning, "USD CHECK CANCEL", false),
            "[!] USD CHECK CANCEL"
        );
        assert_eq!(
            format_message(MessageKind::Section, " Продукт ", false),
            "=== Продукт ==="
        );
    }

    #[test]
    fn notification_kinds_map_to_message_kinds() {
        assert_eq!(
            MessageKind::from(NotificationKind::Success),
            MessageKind::Success
        );
        assert_eq!(
            MessageKind::from(NotificationKind::Warning),
            MessageKind::Warning
        );
    }
}
