use std::{borrow::Cow, io, thread, time::Duration};

use chrono::Utc;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use strsim::levenshtein;

use crate::{
    cli::{
        commands::{command_names, parse_command, Command, CommandError, COMMANDS},
        io::{ScriptInput, SubmitChoice, TerminalPrompts, SUCCESS_MESSAGE},
        output::{self, MessageKind, OutputPreferences},
        render, CliError,
    },
    config::{Config, ConfigManager},
    form::{Field, FieldKind},
    session::{Confirm, Effect, Intent, Session, READ_ONLY_MESSAGE},
    storage::{JsonFileStore, SnapshotStore},
    utils::build_info,
};

/// Environment variable switching the shell to line-by-line stdin mode.
pub const SCRIPT_ENV: &str = "SMOKE_CHECKLIST_SCRIPT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Exit,
}

/// Where prompt answers come from.
enum Input {
    Terminal(TerminalPrompts),
    Script(ScriptInput),
}

impl Confirm for Input {
    fn confirm(&mut self, prompt: &str) -> bool {
        match self {
            Input::Terminal(prompts) => prompts.confirm(prompt),
            Input::Script(lines) => lines.confirm(prompt),
        }
    }
}

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    output::set_preferences(OutputPreferences {
        color: config.color && mode == CliMode::Interactive,
    });

    let backend = JsonFileStore::in_dir(manager.base_dir())?;
    let store = SnapshotStore::new(Box::new(backend), config.storage_key.clone());
    let session = Session::open(store, &config);
    tracing::info!(?mode, dir = %manager.base_dir().display(), "shell started");

    match mode {
        CliMode::Interactive => {
            let mut shell = Shell::new(session, Input::Terminal(TerminalPrompts::new()));
            shell.run_interactive()
        }
        CliMode::Script => {
            let input = ScriptInput::from_reader(io::stdin().lock())?;
            let mut shell = Shell::new(session, Input::Script(input));
            shell.run_script();
            Ok(())
        }
    }
}

struct Shell {
    session: Session,
    input: Input,
    width: usize,
}

impl Shell {
    fn new(session: Session, input: Input) -> Self {
        let width = match input {
            Input::Terminal(_) => render::separator_width(),
            Input::Script(_) => 40,
        };
        Self {
            session,
            input,
            width,
        }
    }

    fn is_interactive(&self) -> bool {
        matches!(self.input, Input::Terminal(_))
    }

    fn run_interactive(&mut self) -> Result<(), CliError> {
        let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(CommandHelper::new(command_names())));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

        output::section("Smoke Test");
        self.show();
        if self.session.is_read_only() {
            output::info(READ_ONLY_MESSAGE);
        }

        loop {
            self.session.expire_toasts(Utc::now());
            match editor.readline(&render::prompt(&self.session)) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    editor.add_history_entry(trimmed).ok();
                    if self.handle_line(trimmed) == LoopControl::Exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    if self.confirm_exit()? {
                        self.unload();
                        break;
                    }
                }
                Err(ReadlineError::Eof) => {
                    self.unload();
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    fn run_script(&mut self) {
        loop {
            let Input::Script(lines) = &mut self.input else {
                return;
            };
            let Some(line) = lines.next_line() else {
                self.unload();
                return;
            };
            self.session.expire_toasts(Utc::now());
            if self.handle_line(line.trim()) == LoopControl::Exit {
                return;
            }
        }
    }

    fn confirm_exit(&self) -> Result<bool, CliError> {
        match &self.input {
            Input::Terminal(prompts) => Ok(prompts.confirm_exit()?),
            Input::Script(_) => Ok(true),
        }
    }

    fn handle_line(&mut self, line: &str) -> LoopControl {
        if line.is_empty() || line.starts_with('#') {
            return LoopControl::Continue;
        }
        let tokens = match split(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return LoopControl::Continue;
            }
        };

        match parse_command(&tokens) {
            Ok(Command::Intent(intent)) => self.dispatch(intent),
            Ok(Command::Show) => {
                self.show();
                LoopControl::Continue
            }
            Ok(Command::Help) => {
                print_help();
                LoopControl::Continue
            }
            Ok(Command::Version) => {
                output::block(&build_info::current().to_string());
                LoopControl::Continue
            }
            Ok(Command::Exit) => {
                self.unload();
                LoopControl::Exit
            }
            Err(CommandError::Unknown(name)) => {
                suggest_command(&name);
                LoopControl::Continue
            }
            Err(err) => {
                output::error(&err);
                LoopControl::Continue
            }
        }
    }

    fn dispatch(&mut self, intent: Intent) -> LoopControl {
        let effects = self.session.dispatch(intent, &mut self.input);
        self.apply(effects)
    }

    fn apply(&mut self, effects: Vec<Effect>) -> LoopControl {
        let mut control = LoopControl::Continue;
        for effect in effects {
            match effect {
                Effect::Toast(toast) => {
                    output::print(MessageKind::from(toast.kind), render::render_toast(&toast))
                }
                Effect::ShowErrors(errors) => {
                    output::print(MessageKind::Error, render::render_errors(&errors))
                }
                Effect::HideErrors | Effect::HideConfirmModal | Effect::MenuClosed => {}
                Effect::ScrollToSubmit => tracing::debug!("errors shown next to submit"),
                Effect::ShowConfirmModal => {
                    if self.ask_submit() == LoopControl::Exit {
                        control = LoopControl::Exit;
                    }
                }
                Effect::Focus(field) => output::info(format!(
                    "Исправьте поле \"{}\": {}",
                    field.label(),
                    fix_hint(field)
                )),
                Effect::Cleared(groups) => {
                    let fields: Vec<&str> = groups.iter().map(|group| group.field().key()).collect();
                    output::info(format!("Скрытые поля очищены: {}", fields.join(", ")));
                }
                Effect::EnterReadOnly => output::info(READ_ONLY_MESSAGE),
                Effect::LeaveReadOnly => output::info("Редактирование возобновлено"),
                Effect::ShowSuccessNotification { delay_ms } => {
                    if self.is_interactive() {
                        thread::sleep(Duration::from_millis(delay_ms));
                    }
                    output::success(SUCCESS_MESSAGE);
                    output::info("Доступны команды `print` и `edit`.");
                }
                Effect::HideSuccessNotification => output::info("Уведомление закрыто"),
                Effect::Print(report) => output::block(&render::render_report(&report)),
                Effect::MenuOpened => print_help(),
                Effect::NavigateHome => control = LoopControl::Exit,
                Effect::Rejected(reason) => output::warning(reason),
            }
        }
        control
    }

    /// Interactive shells answer the submission prompt right away; scripts use
    /// the `confirm`, `cancel` and `dismiss` commands.
    fn ask_submit(&mut self) -> LoopControl {
        let choice = match &self.input {
            Input::Terminal(prompts) => prompts.submit_choice(),
            Input::Script(_) => {
                output::info("Все поля заполнены. Введите `confirm` или `cancel`.");
                return LoopControl::Continue;
            }
        };
        let intent = match choice {
            Ok(SubmitChoice::Confirm) => Intent::ConfirmSubmit,
            Ok(SubmitChoice::Cancel) => Intent::CancelSubmit,
            Ok(SubmitChoice::Dismiss) => Intent::DismissConfirm,
            Err(err) => {
                tracing::warn!(%err, "submission prompt failed");
                Intent::DismissConfirm
            }
        };
        self.dispatch(intent)
    }

    fn show(&self) {
        output::block(&render::render_form(&self.session, self.width));
        if !self.session.errors().is_empty() {
            output::print(MessageKind::Error, render::render_errors(self.session.errors()));
        }
    }

    fn unload(&mut self) {
        self.session.dispatch(Intent::Unload, &mut self.input);
    }
}

fn fix_hint(field: Field) -> String {
    match field {
        Field::Ticket => "ticket <digits>".to_string(),
        Field::ConvertibleCurrency => "convertible <code>, then toggle-convertible".to_string(),
        field => match field.kind() {
            FieldKind::Checkbox => format!("check {}", field.key()),
            FieldKind::Select(options) => format!("set {} <{}>", field.key(), options.join("|")),
            FieldKind::Text => format!("set {} <value>", field.key()),
        },
    }
}

fn print_help() {
    output::section("Commands");
    let width = COMMANDS
        .iter()
        .map(|command| command.usage.chars().count())
        .max()
        .unwrap_or(0);
    for command in COMMANDS {
        let pad = width - command.usage.chars().count();
        output::block(&format!(
            "  {}{}  {}",
            command.usage,
            " ".repeat(pad),
            command.summary
        ));
    }
}

fn suggest_command(input: &str) {
    output::warning(CommandError::Unknown(input.to_string()));
    let needle = input.to_ascii_lowercase();
    let best = COMMANDS
        .iter()
        .map(|command| (levenshtein(command.name, &needle), command.name))
        .min_by_key(|(distance, _)| *distance);
    if let Some((distance, name)) = best {
        if distance <= 3 {
            output::info(format!("Suggestion: `{name}`?"));
        }
    }
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_string).collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        // Only the command word completes.
        if prefix.trim_start().contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let start = prefix.len() - prefix.trim_start().len();
        let needle = prefix[start..].to_ascii_lowercase();
        let candidates = self
            .commands
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn shell(lines: &[&str]) -> Shell {
        let store = SnapshotStore::new(Box::new(MemoryStore::new()), "smokeTestState");
        let session = Session::open(store, &Config::default());
        Shell::new(
            session,
            Input::Script(ScriptInput::from_lines(lines.iter().copied())),
        )
    }

    #[test]
    fn script_lines_drive_the_session() {
        let mut shell = shell(&["set product Slots", "add-id P1", "# comment", "exit", "show"]);
        shell.run_script();
        assert_eq!(shell.session.form().text(Field::Product), "Slots");
        assert_eq!(shell.session.form().product_ids().entries(), ["", "P1"]);
        let Input::Script(rest) = &mut shell.input else {
            panic!("script input expected");
        };
        assert_eq!(rest.next_line().as_deref(), Some("show"));
    }

    #[test]
    fn uncheck_prompt_answer_comes_from_the_next_line() {
        let mut shell = shell(&[
            "convertible usd",
            "toggle-convertible",
            "toggle-convertible",
            "нет",
        ]);
        shell.run_script();
        assert!(shell.session.form().convertible().is_checked());
    }

    #[test]
    fn back_confirmed_stops_the_script() {
        let mut shell = shell(&["back", "да", "set product Ignored"]);
        shell.run_script();
        assert_eq!(shell.session.form().text(Field::Product), "");
    }

    #[test]
    fn completion_offers_command_names_only_for_the_first_word() {
        let helper = CommandHelper::new(command_names());
        let history = DefaultHistory::new();
        let ctx = ReadlineContext::new(&history);
        let (start, pairs) = helper.complete("tog", 3, &ctx).unwrap();
        assert_eq!(start, 0);
        let names: Vec<&str> = pairs.iter().map(|pair| pair.replacement.as_str()).collect();
        assert_eq!(names, ["toggle", "toggle-convertible"]);
        let (_, pairs) = helper.complete("toggle d", 8, &ctx).unwrap();
        assert!(pairs.is_empty());
    }
}
