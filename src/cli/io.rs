use std::collections::VecDeque;
use std::io::BufRead;

use dialoguer::{theme::ColorfulTheme, Confirm as DialoguerPrompt, Select};

use crate::session::Confirm;

pub const SUBMIT_PROMPT: &str = "Завершить проверку и сохранить отчет?";
pub const SUBMIT_CHOICES: [&str; 2] = ["Подтвердить", "Отмена"];
pub const SUCCESS_MESSAGE: &str = "Проверка успешно завершена!";

/// Answer to the submission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitChoice {
    Confirm,
    Cancel,
    /// Closed without choosing.
    Dismiss,
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "д" | "да"
    )
}

/// Terminal prompts backed by dialoguer.
pub struct TerminalPrompts {
    theme: ColorfulTheme,
}

impl TerminalPrompts {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Confirm/cancel menu for a validated submission; Esc dismisses.
    pub fn submit_choice(&self) -> Result<SubmitChoice, dialoguer::Error> {
        let selection = Select::with_theme(&self.theme)
            .with_prompt(SUBMIT_PROMPT)
            .items(&SUBMIT_CHOICES)
            .default(0)
            .interact_opt()?;
        Ok(match selection {
            Some(0) => SubmitChoice::Confirm,
            Some(_) => SubmitChoice::Cancel,
            None => SubmitChoice::Dismiss,
        })
    }

    pub fn confirm_exit(&self) -> Result<bool, dialoguer::Error> {
        DialoguerPrompt::with_theme(&self.theme)
            .with_prompt("Выйти?")
            .default(false)
            .interact()
    }
}

impl Default for TerminalPrompts {
    fn default() -> Self {
        Self::new()
    }
}

impl Confirm for TerminalPrompts {
    fn confirm(&mut self, prompt: &str) -> bool {
        match DialoguerPrompt::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!(%err, "confirmation prompt failed; treating as no");
                false
            }
        }
    }
}

/// Lines read from stdin in script mode. Commands and prompt answers share the queue.
#[derive(Debug, Default)]
pub struct ScriptInput {
    lines: VecDeque<String>,
}

impl ScriptInput {
    pub fn from_reader(reader: impl BufRead) -> std::io::Result<Self> {
        let lines = reader.lines().collect::<Result<VecDeque<_>, _>>()?;
        Ok(Self { lines })
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn next_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }
}

impl Confirm for ScriptInput {
    /// Consumes the next line as the answer; missing input means no.
    fn confirm(&mut self, prompt: &str) -> bool {
        let answer = self.next_line().unwrap_or_default();
        let confirmed = is_yes(&answer);
        println!("? {prompt} {}", if confirmed { "да" } else { "нет" });
        confirmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_answers_in_both_languages() {
        for answer in ["y", "YES", " да ", "Д"] {
            assert!(is_yes(answer), "{answer}");
        }
        for answer in ["", "n", "нет", "ok"] {
            assert!(!is_yes(answer), "{answer}");
        }
    }

    #[test]
    fn script_confirm_consumes_one_line() {
        let mut input = ScriptInput::from_lines(["да", "show"]);
        assert!(input.confirm("Отменить проверку USD?"));
        assert_eq!(input.next_line().as_deref(), Some("show"));
        assert!(!input.confirm("again"));
    }

    #[test]
    fn reader_splits_lines() {
        let mut input = ScriptInput::from_reader("submit\nconfirm\n".as_bytes()).unwrap();
        assert_eq!(input.next_line().as_deref(), Some("submit"));
        assert_eq!(input.next_line().as_deref(), Some("confirm"));
        assert_eq!(input.next_line(), None);
    }
}
