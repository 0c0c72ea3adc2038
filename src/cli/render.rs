//! Plain-text views of the form, the error panel and the final report.

use std::fmt::Write as _;

use crate::{
    form::{
        AddButtonState, CheckStatus, CurrencySlot, Field, FieldGroup, FieldMap, Section,
        SiteEntry, SiteSection, Visibility, REQUIRED_FIELDS,
    },
    notifications::Notification,
    session::{Session, SubmissionPhase, ERRORS_HEADER},
};

const MIN_WIDTH: u16 = 40;
const MAX_WIDTH: u16 = 80;
const EMPTY: &str = "-";

/// Separator width clamped to the terminal size.
pub fn separator_width() -> usize {
    let columns = crossterm::terminal::size()
        .map(|(columns, _)| columns)
        .unwrap_or(MAX_WIDTH);
    usize::from(columns.clamp(MIN_WIDTH, MAX_WIDTH))
}

pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

fn or_empty(value: &str) -> &str {
    if value.trim().is_empty() {
        EMPTY
    } else {
        value
    }
}

fn checkbox(value: bool) -> &'static str {
    if value {
        "[x]"
    } else {
        "[ ]"
    }
}

fn slot_text(slot: &CurrencySlot) -> String {
    format!("{} {}", slot.status().marker(), slot.currency().unwrap_or(EMPTY))
}

pub fn phase_label(phase: SubmissionPhase) -> &'static str {
    match phase {
        SubmissionPhase::Editing => "редактирование",
        SubmissionPhase::PendingConfirm => "ожидает подтверждения",
        SubmissionPhase::Completed => "завершено",
    }
}

/// Renders the editable form the way the shell shows it after each command.
pub fn render_form(session: &Session, width: usize) -> String {
    let form = session.form();
    let visibility = session.visibility();
    let mut out = String::new();

    let _ = writeln!(out, "=== Smoke Test [{}] ===", phase_label(session.phase()));
    for field in [Field::Product, Field::Game, Field::Freespins, Field::Ticket] {
        let heading = field_heading(field, &visibility);
        let _ = writeln!(out, "{}: {}", heading, or_empty(form.text(field)));
    }
    if let Some(hint) = session.ticket_hint() {
        let _ = writeln!(out, "  {hint}");
    }

    let _ = writeln!(out, "ID продуктов:");
    let ids = form.product_ids();
    for (index, id) in ids.entries().iter().enumerate() {
        let removable = if ids.is_removable(index) { " (x)" } else { "" };
        let _ = writeln!(out, "  {}. {}{}", index + 1, or_empty(id), removable);
    }
    let _ = writeln!(out, "  {}", button(&ids.add_button()));

    for field in [
        Field::QuantityChecked,
        Field::DefaultBets,
        Field::DefaultBetsStatus,
        Field::MinBetsChecked,
        Field::MinBetsStatus,
        Field::AddedToTask,
        Field::NotifyManager,
        Field::ManagerResponse,
    ] {
        if !visibility.shows_field(field) {
            continue;
        }
        let heading = field_heading(field, &visibility);
        if field.is_checkbox() {
            let _ = writeln!(out, "{} {}", checkbox(form.flag(field)), heading);
        } else {
            let _ = writeln!(out, "{}: {}", heading, or_empty(form.text(field)));
        }
    }

    let _ = writeln!(
        out,
        "{}: {}",
        field_heading(Field::ConvertibleCurrency, &visibility),
        slot_text(form.convertible())
    );

    for section in Section::ALL {
        render_section(&mut out, section, form.sites(section));
    }

    if let Some(at) = form.completed_at() {
        let _ = writeln!(out, "Завершено: {}", at.to_rfc3339());
    }
    let _ = write!(out, "{}", separator(width));
    out
}

fn field_heading(field: Field, visibility: &Visibility) -> String {
    let required = REQUIRED_FIELDS.contains(&field)
        || FieldGroup::of_field(field)
            .map_or(false, |group| visibility.state(group).required);
    let marker = if required { " *" } else { "" };
    format!("{}{} ({})", field.label(), marker, field.key())
}

fn button(state: &AddButtonState) -> String {
    if state.enabled {
        format!("[+] {}", state.label)
    } else {
        format!("[ ] {}", state.label)
    }
}

fn render_section(out: &mut String, section: Section, sites: &SiteSection) {
    let _ = writeln!(out, "Сайты ({section}):");
    for row in sites.descriptors() {
        let slots: Vec<String> = row
            .slots
            .iter()
            .map(|(currency, status)| {
                format!("{} {}", status.marker(), currency.as_deref().unwrap_or(EMPTY))
            })
            .collect();
        let removable = if row.removable { " (x)" } else { "" };
        let _ = writeln!(
            out,
            "  {}. {} | {}{}",
            row.index + 1,
            row.site.as_deref().unwrap_or(EMPTY),
            slots.join(" | "),
            removable
        );
    }
    let _ = writeln!(out, "  {}", button(&sites.add_button()));
}

/// Error panel shown when submission is blocked.
pub fn render_errors(errors: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{ERRORS_HEADER}");
    for error in errors {
        let _ = writeln!(out, "  • {error}");
    }
    let _ = write!(out, "Введите `fix`, чтобы перейти к первому полю с ошибкой.");
    out
}

/// Read-only report of a submitted snapshot.
pub fn render_report(data: &FieldMap) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Отчет Smoke Test ===");
    for field in Field::ALL {
        if field == Field::ConvertibleCurrency {
            let status = if data.convertible_checked() {
                CheckStatus::Checked
            } else if data.text(field).is_empty() {
                CheckStatus::Unset
            } else {
                CheckStatus::Unchecked
            };
            let _ = writeln!(
                out,
                "{}: {} {}",
                field.label(),
                status.marker(),
                or_empty(data.text(field))
            );
        } else if field.is_checkbox() {
            let answer = if data.flag(field) { "да" } else { "нет" };
            let _ = writeln!(out, "{}: {}", field.label(), answer);
        } else if data.values.contains_key(field.key()) {
            let _ = writeln!(out, "{}: {}", field.label(), or_empty(data.text(field)));
        }
    }
    let ids: Vec<&str> = data.filled_product_ids().collect();
    let ids = if ids.is_empty() {
        EMPTY.to_string()
    } else {
        ids.join(", ")
    };
    let _ = writeln!(out, "ID продуктов: {ids}");
    for section in Section::ALL {
        let _ = writeln!(out, "Сайты ({section}):");
        for entry in data.sites(section) {
            let _ = writeln!(out, "  {}", report_site(entry));
        }
    }
    if let Some(at) = data.completed_at {
        let _ = write!(out, "Завершено: {}", at.to_rfc3339());
    }
    out.trim_end().to_string()
}

fn report_site(entry: &SiteEntry) -> String {
    let currencies: Vec<String> = entry
        .currencies
        .iter()
        .map(|check| {
            let status = if check.checked {
                CheckStatus::Checked
            } else {
                CheckStatus::Unchecked
            };
            format!("{} {}", status.marker(), check.currency)
        })
        .collect();
    if currencies.is_empty() {
        entry.site.clone()
    } else {
        format!("{}: {}", entry.site, currencies.join(", "))
    }
}

pub fn render_toast(toast: &Notification) -> String {
    format!("{} {}", toast.kind.icon(), toast.message)
}

/// Short summary used by the prompt line.
pub fn prompt(session: &Session) -> String {
    let product = session.form().text(Field::Product);
    let marker = if session.is_read_only() { "🔒" } else { "✎" };
    if product.trim().is_empty() {
        format!("smoke {marker}> ")
    } else {
        format!("smoke [{}] {marker}> ", product.trim())
    }
}
