//! Maps shell command lines onto session intents.

use thiserror::Error;

use crate::{
    form::{site_options, Field, FieldKind, Section, CURRENCIES, CURRENCY_SLOTS},
    session::{CurrencyTarget, Intent},
};

/// Token that clears a select or text value.
const CLEAR_TOKEN: &str = "-";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    Show,
    Help,
    Version,
    Exit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command `{0}`. Type `help` to see available commands.")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("{0}")]
    InvalidArguments(String),
}

pub struct CommandInfo {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

const fn entry(name: &'static str, usage: &'static str, summary: &'static str) -> CommandInfo {
    CommandInfo {
        name,
        usage,
        summary,
    }
}

pub const COMMANDS: &[CommandInfo] = &[
    entry("show", "show", "Render the form"),
    entry("set", "set <field> <value|->", "Set a text or select field"),
    entry("check", "check <field>", "Tick a checkbox"),
    entry("uncheck", "uncheck <field>", "Untick a checkbox"),
    entry("ticket", "ticket <value>", "Set the ticket number (digits only)"),
    entry("add-id", "add-id [value]", "Add a product ID input"),
    entry("id", "id <n> <value>", "Edit product ID n"),
    entry("remove-id", "remove-id <n>", "Remove product ID n (not the first)"),
    entry("add-site", "add-site <desktop|mobile> [site]", "Add a site row"),
    entry("remove-site", "remove-site <section> <n>", "Remove an added site row"),
    entry("site", "site <section> <n> <site|->", "Choose the site of row n"),
    entry(
        "currency",
        "currency <section> <row> <slot> <code|->",
        "Choose a currency for a site slot",
    ),
    entry("toggle", "toggle <section> <row> <slot>", "Toggle a site currency check"),
    entry("convertible", "convertible <code|->", "Choose the convertible currency"),
    entry("toggle-convertible", "toggle-convertible", "Toggle the convertible currency check"),
    entry("submit", "submit", "Validate and ask for confirmation"),
    entry("confirm", "confirm", "Confirm the submission"),
    entry("cancel", "cancel", "Cancel the confirmation"),
    entry("dismiss", "dismiss", "Close the confirmation without answering"),
    entry("fix", "fix", "Jump to the first invalid field"),
    entry("edit", "edit", "Resume editing a completed check"),
    entry("print", "print", "Print the completed report"),
    entry("menu", "menu", "Open the menu"),
    entry("close-menu", "close-menu", "Close the menu"),
    entry("close-notification", "close-notification", "Hide the completion notice"),
    entry("back", "back", "Save and leave"),
    entry("version", "version", "Show build information"),
    entry("help", "help", "List commands"),
    entry("exit", "exit", "Save and quit"),
];

pub fn command_names() -> Vec<&'static str> {
    COMMANDS.iter().map(|command| command.name).collect()
}

fn usage_of(name: &str) -> &'static str {
    COMMANDS
        .iter()
        .find(|command| command.name == name)
        .map_or("help", |command| command.usage)
}

/// Parses tokens produced by `shell_words::split`.
pub fn parse_command(tokens: &[String]) -> Result<Command, CommandError> {
    let Some((head, args)) = tokens.split_first() else {
        return Ok(Command::Show);
    };
    let name = head.to_ascii_lowercase();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let usage = || CommandError::Usage(usage_of(&name));

    let intent = match (name.as_str(), args.as_slice()) {
        ("show", []) => return Ok(Command::Show),
        ("help" | "?", _) => return Ok(Command::Help),
        ("version", []) => return Ok(Command::Version),
        ("exit" | "quit", []) => return Ok(Command::Exit),

        ("set", [field, value @ ..]) if !value.is_empty() => {
            let field = parse_field(field)?;
            let value = value.join(" ");
            if field.is_checkbox() {
                return Err(CommandError::InvalidArguments(format!(
                    "`{field}` is a checkbox; use `check {field}` or `uncheck {field}`"
                )));
            }
            if value == CLEAR_TOKEN {
                Intent::ClearField(field)
            } else {
                Intent::SetText(field, normalize_value(field, &value)?)
            }
        }
        ("check" | "uncheck", [field]) => {
            let field = parse_field(field)?;
            if !field.is_checkbox() {
                return Err(CommandError::InvalidArguments(format!(
                    "`{field}` is not a checkbox"
                )));
            }
            Intent::SetFlag(field, name == "check")
        }
        ("ticket", [value]) => Intent::SetText(Field::Ticket, (*value).to_string()),

        ("add-id", []) => Intent::AddProductId(None),
        ("add-id", [value]) => Intent::AddProductId(Some((*value).to_string())),
        ("id", [index, value]) => Intent::SetProductId {
            index: parse_index(index)?,
            value: (*value).to_string(),
        },
        ("remove-id", [index]) => Intent::RemoveProductId(parse_index(index)?),

        ("add-site", [section]) => Intent::AddSite {
            section: parse_section(section)?,
            site: None,
        },
        ("add-site", [section, site]) => Intent::AddSite {
            section: parse_section(section)?,
            site: parse_site(site)?,
        },
        ("remove-site", [section, index]) => Intent::RemoveSite {
            section: parse_section(section)?,
            index: parse_index(index)?,
        },
        ("site", [section, index, site]) => Intent::SelectSite {
            section: parse_section(section)?,
            index: parse_index(index)?,
            site: parse_site(site)?,
        },

        ("currency", [section, row, slot, code]) => Intent::SelectCurrency {
            target: parse_site_target(section, row, slot)?,
            currency: parse_currency(code)?,
        },
        ("toggle", [section, row, slot]) => {
            Intent::ToggleCurrencyCheck(parse_site_target(section, row, slot)?)
        }
        ("convertible", [code]) => Intent::SelectCurrency {
            target: CurrencyTarget::Convertible,
            currency: parse_currency(code)?,
        },
        ("toggle-convertible", []) => Intent::ToggleCurrencyCheck(CurrencyTarget::Convertible),

        ("submit", []) => Intent::Submit,
        ("confirm", []) => Intent::ConfirmSubmit,
        ("cancel", []) => Intent::CancelSubmit,
        ("dismiss", []) => Intent::DismissConfirm,
        ("fix", []) => Intent::FixErrors,
        ("edit", []) => Intent::Edit,
        ("print", []) => Intent::Print,
        ("menu", []) => Intent::OpenMenu,
        ("close-menu", []) => Intent::CloseMenu,
        ("close-notification", []) => Intent::CloseSuccessNotification,
        ("back", []) => Intent::Back,

        (known, _) if COMMANDS.iter().any(|command| command.name == known) => {
            return Err(usage())
        }
        _ => return Err(CommandError::Unknown(head.clone())),
    };
    Ok(Command::Intent(intent))
}

fn parse_field(raw: &str) -> Result<Field, CommandError> {
    Field::from_key(raw).ok_or_else(|| {
        let known: Vec<&str> = Field::ALL.iter().map(|field| field.key()).collect();
        CommandError::InvalidArguments(format!(
            "Unknown field `{raw}`. Fields: {}",
            known.join(", ")
        ))
    })
}

/// Checks select values against their options; text passes through.
fn normalize_value(field: Field, value: &str) -> Result<String, CommandError> {
    match field.kind() {
        FieldKind::Select(options) => options
            .iter()
            .find(|option| option.eq_ignore_ascii_case(value))
            .map(|option| (*option).to_string())
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "`{value}` is not an option for `{field}`. Options: {}",
                    options.join(", ")
                ))
            }),
        FieldKind::Text | FieldKind::Checkbox => Ok(value.to_string()),
    }
}

/// 1-based index on the command line, 0-based in the intent.
fn parse_index(raw: &str) -> Result<usize, CommandError> {
    match raw.parse::<usize>() {
        Ok(index) if index > 0 => Ok(index - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{raw}` is not a valid position (use 1, 2, ...)"
        ))),
    }
}

fn parse_section(raw: &str) -> Result<Section, CommandError> {
    Section::parse(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!("Unknown section `{raw}`. Use desktop or mobile"))
    })
}

fn parse_site(raw: &str) -> Result<Option<String>, CommandError> {
    if raw == CLEAR_TOKEN {
        return Ok(None);
    }
    site_options()
        .find(|site| site.eq_ignore_ascii_case(raw))
        .map(|site| Some(site.to_string()))
        .ok_or_else(|| {
            let options: Vec<&str> = site_options().collect();
            CommandError::InvalidArguments(format!(
                "Unknown site `{raw}`. Sites: {}",
                options.join(", ")
            ))
        })
}

fn parse_currency(raw: &str) -> Result<Option<String>, CommandError> {
    if raw == CLEAR_TOKEN {
        return Ok(None);
    }
    let code = raw.to_ascii_uppercase();
    if CURRENCIES.contains(&code.as_str()) {
        Ok(Some(code))
    } else {
        Err(CommandError::InvalidArguments(format!(
            "Unknown currency `{raw}`. Currencies: {}",
            CURRENCIES.join(", ")
        )))
    }
}

fn parse_site_target(section: &str, row: &str, slot: &str) -> Result<CurrencyTarget, CommandError> {
    let slot = parse_index(slot)?;
    if slot >= CURRENCY_SLOTS {
        return Err(CommandError::InvalidArguments(format!(
            "Each site has {CURRENCY_SLOTS} currency slots"
        )));
    }
    Ok(CurrencyTarget::Site {
        section: parse_section(section)?,
        row: parse_index(row)?,
        slot,
    })
}
