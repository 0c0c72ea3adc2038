//! Submission rules for the smoke-test report.

use super::{visibility::TASK_STATUSES, Field, FieldMap, REQUIRED_FIELDS};

pub const MISSING_PRODUCT_ID: &str = "Добавьте хотя бы один ID продукта";
pub const TICKET_NOT_DIGITS: &str = "Тикет должен содержать только цифры";
pub const CONVERTIBLE_NOT_CHECKED: &str = "Конвертируемая валюта должна быть проверена (🟢)";
pub const DEFAULT_BETS_STATUS_MISSING: &str = "Выберите статус для дефолтных ставок";
pub const MIN_BETS_STATUS_MISSING: &str = "Выберите статус для минимальных ставок";
pub const MANAGER_RESPONSE_MISSING: &str = "Выберите ответ для менеджера";
pub const VALID_TICKET_HINT: &str = "✓ Корректный номер тикета";

pub fn missing_field(field: Field) -> String {
    format!("Заполните поле \"{}\"", field.label())
}

pub fn unchecked_box(field: Field) -> String {
    format!("Отметьте \"{}\"", field.label())
}

/// Returns one message per violated rule, in evaluation order. Empty means valid.
pub fn validate(values: &FieldMap) -> Vec<String> {
    let mut errors = Vec::new();

    for field in REQUIRED_FIELDS {
        if values.text(field).is_empty() {
            errors.push(missing_field(field));
        }
    }

    if values.filled_product_ids().next().is_none() {
        errors.push(MISSING_PRODUCT_ID.to_string());
    }

    for field in [Field::QuantityChecked, Field::MinBetsChecked] {
        if !values.flag(field) {
            errors.push(unchecked_box(field));
        }
    }

    let ticket = values.text(Field::Ticket);
    if !ticket.is_empty() && !is_digits(ticket) {
        errors.push(TICKET_NOT_DIGITS.to_string());
    }

    if !values.text(Field::ConvertibleCurrency).is_empty() && !values.convertible_checked() {
        errors.push(CONVERTIBLE_NOT_CHECKED.to_string());
    }

    if values.text(Field::DefaultBets) == "checked"
        && values.text(Field::DefaultBetsStatus).is_empty()
    {
        errors.push(DEFAULT_BETS_STATUS_MISSING.to_string());
    }

    let min_bets = values.flag(Field::MinBetsChecked);
    let min_status = values.text(Field::MinBetsStatus);
    if min_bets && min_status.is_empty() {
        errors.push(MIN_BETS_STATUS_MISSING.to_string());
    }

    if min_bets && TASK_STATUSES.contains(&min_status) && !values.flag(Field::AddedToTask) {
        errors.push(unchecked_box(Field::AddedToTask));
    }

    if values.text(Field::NotifyManager) == "yes" && values.text(Field::ManagerResponse).is_empty()
    {
        errors.push(MANAGER_RESPONSE_MISSING.to_string());
    }

    errors
}

/// Field an error message refers to, used to focus the first invalid input.
pub fn field_for_error(message: &str) -> Option<Field> {
    if let Some(field) = Field::ALL
        .into_iter()
        .find(|field| message == missing_field(*field) || message == unchecked_box(*field))
    {
        return Some(field);
    }
    match message {
        TICKET_NOT_DIGITS => Some(Field::Ticket),
        CONVERTIBLE_NOT_CHECKED => Some(Field::ConvertibleCurrency),
        DEFAULT_BETS_STATUS_MISSING => Some(Field::DefaultBetsStatus),
        MIN_BETS_STATUS_MISSING => Some(Field::MinBetsStatus),
        MANAGER_RESPONSE_MISSING => Some(Field::ManagerResponse),
        _ => None,
    }
}

/// First error that maps to a focusable field.
pub fn first_invalid_field(errors: &[String]) -> Option<Field> {
    errors.iter().find_map(|message| field_for_error(message))
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit())
}

/// Strips every non-digit character from ticket input.
pub fn sanitize_ticket(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Inline hint shown under the ticket input.
pub fn ticket_hint(ticket: &str) -> Option<&'static str> {
    is_digits(ticket).then_some(VALID_TICKET_HINT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FieldValue, CONVERTIBLE_CHECKED_KEY};

    fn set(values: &mut FieldMap, field: Field, value: FieldValue) {
        values.values.insert(field.key().to_string(), value);
    }

    fn text(value: &str) -> FieldValue {
        FieldValue::Text(value.to_string())
    }

    fn valid_form() -> FieldMap {
        let mut values = FieldMap::default();
        set(&mut values, Field::Product, text("Casino"));
        set(&mut values, Field::Game, text("Book of Ra"));
        set(&mut values, Field::Freespins, text("10"));
        set(&mut values, Field::Ticket, text("4455"));
        set(&mut values, Field::DefaultBets, text("not_checked"));
        set(&mut values, Field::NotifyManager, text("no"));
        set(&mut values, Field::ConvertibleCurrency, text("USD"));
        set(&mut values, Field::QuantityChecked, FieldValue::Flag(true));
        set(&mut values, Field::MinBetsChecked, FieldValue::Flag(true));
        set(&mut values, Field::MinBetsStatus, text("ok"));
        values
            .values
            .insert(CONVERTIBLE_CHECKED_KEY.into(), FieldValue::Flag(true));
        values.product_ids = vec!["P123".into()];
        values
    }

    #[test]
    fn complete_form_is_valid() {
        assert!(validate(&valid_form()).is_empty());
    }

    #[test]
    fn whitespace_counts_as_a_value() {
        let mut values = valid_form();
        set(&mut values, Field::Game, text("  "));
        assert!(validate(&values).is_empty());
    }

    #[test]
    fn empty_form_lists_required_fields_in_order() {
        let errors = validate(&FieldMap::default());
        assert_eq!(errors[0], "Заполните поле \"Продукт\"");
        assert_eq!(errors[6], "Заполните поле \"Конвертируемая валюта\"");
        assert_eq!(errors[7], MISSING_PRODUCT_ID);
        assert_eq!(errors[8], "Отметьте \"Количество продуктов проверено\"");
        assert_eq!(errors[9], "Отметьте \"Минимальные ставки проверены\"");
        assert_eq!(errors.len(), 10);
    }

    #[test]
    fn ticket_must_be_digits() {
        let mut values = valid_form();
        set(&mut values, Field::Ticket, text("12a"));
        assert_eq!(validate(&values), vec![TICKET_NOT_DIGITS.to_string()]);
    }

    #[test]
    fn convertible_currency_must_be_checked() {
        let mut values = valid_form();
        values.values.remove(CONVERTIBLE_CHECKED_KEY);
        assert_eq!(validate(&values), vec![CONVERTIBLE_NOT_CHECKED.to_string()]);
    }

    #[test]
    fn conditional_rules_apply() {
        let mut values = valid_form();
        set(&mut values, Field::DefaultBets, text("checked"));
        set(&mut values, Field::MinBetsStatus, text("bug"));
        set(&mut values, Field::NotifyManager, text("yes"));
        assert_eq!(
            validate(&values),
            vec![
                DEFAULT_BETS_STATUS_MISSING.to_string(),
                "Отметьте \"Добавил в задачу\"".to_string(),
                MANAGER_RESPONSE_MISSING.to_string(),
            ]
        );

        set(&mut values, Field::DefaultBetsStatus, text("ok"));
        set(&mut values, Field::AddedToTask, FieldValue::Flag(true));
        set(&mut values, Field::ManagerResponse, text("sent"));
        assert!(validate(&values).is_empty());
    }

    #[test]
    fn min_bets_status_required_when_checked() {
        let mut values = valid_form();
        values.values.remove(Field::MinBetsStatus.key());
        assert_eq!(validate(&values), vec![MIN_BETS_STATUS_MISSING.to_string()]);
    }

    #[test]
    fn errors_map_back_to_fields() {
        let errors = validate(&FieldMap::default());
        assert_eq!(first_invalid_field(&errors), Some(Field::Product));
        assert_eq!(
            first_invalid_field(&[MISSING_PRODUCT_ID.to_string(), TICKET_NOT_DIGITS.to_string()]),
            Some(Field::Ticket)
        );
        assert_eq!(field_for_error(MANAGER_RESPONSE_MISSING), Some(Field::ManagerResponse));
    }

    #[test]
    fn ticket_sanitizer_strips_non_digits() {
        assert_eq!(sanitize_ticket("#44-55 "), "4455");
        assert_eq!(sanitize_ticket("abc"), "");
        assert_eq!(ticket_hint("4455"), Some(VALID_TICKET_HINT));
        assert_eq!(ticket_hint(""), None);
    }
}
