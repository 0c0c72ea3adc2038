//! Three-state currency confirmation toggle attached to every currency selector.

use serde::{Deserialize, Serialize};

use super::CurrencyCheck;

/// Verification status shown next to a currency selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// No currency chosen; the toggle is inert.
    #[default]
    Unset,
    /// Currency chosen but not verified (🔴).
    Unchecked,
    /// Currency verified (🟢).
    Checked,
}

impl CheckStatus {
    pub fn marker(self) -> &'static str {
        match self {
            CheckStatus::Unset => "⚪",
            CheckStatus::Unchecked => "🔴",
            CheckStatus::Checked => "🟢",
        }
    }
}

/// Result of clicking a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Clicked without a currency selected.
    NoCurrency,
    Checked(String),
    Unchecked(String),
    /// Downgrade was declined at the confirmation prompt.
    Kept,
}

impl ToggleOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, ToggleOutcome::Checked(_) | ToggleOutcome::Unchecked(_))
    }
}

pub const SELECT_CURRENCY_FIRST: &str = "Сначала выберите валюту";

pub fn check_message(currency: &str) -> String {
    format!("{currency} CHECK")
}

pub fn cancel_message(currency: &str) -> String {
    format!("{currency} CHECK CANCEL")
}

pub fn uncheck_prompt(currency: &str) -> String {
    format!("Отменить проверку {currency}?")
}

/// A currency selector together with its toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencySlot {
    currency: Option<String>,
    status: CheckStatus,
}

impl CurrencySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn status(&self) -> CheckStatus {
        self.status
    }

    pub fn is_checked(&self) -> bool {
        self.status == CheckStatus::Checked
    }

    /// Changes the selected currency. Any change resets the toggle.
    pub fn select(&mut self, currency: Option<String>) {
        let currency = currency
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        self.status = if currency.is_some() {
            CheckStatus::Unchecked
        } else {
            CheckStatus::Unset
        };
        self.currency = currency;
    }

    /// Advances the toggle. Downgrading from checked asks `confirm_uncheck`
    /// with the prompt text and only proceeds when it returns `true`.
    pub fn toggle<F>(&mut self, confirm_uncheck: F) -> ToggleOutcome
    where
        F: FnOnce(&str) -> bool,
    {
        let Some(currency) = self.currency.clone() else {
            return ToggleOutcome::NoCurrency;
        };
        match self.status {
            CheckStatus::Checked => {
                if confirm_uncheck(&uncheck_prompt(&currency)) {
                    self.status = CheckStatus::Unchecked;
                    ToggleOutcome::Unchecked(currency)
                } else {
                    ToggleOutcome::Kept
                }
            }
            CheckStatus::Unchecked | CheckStatus::Unset => {
                self.status = CheckStatus::Checked;
                ToggleOutcome::Checked(currency)
            }
        }
    }

    /// Persisted form of the slot; `None` when no currency is selected.
    pub fn to_check(&self) -> Option<CurrencyCheck> {
        self.currency.as_ref().map(|currency| CurrencyCheck {
            currency: currency.clone(),
            checked: self.is_checked(),
        })
    }

    pub fn from_check(check: &CurrencyCheck) -> Self {
        Self::restore(Some(check.currency.clone()), check.checked)
    }

    pub fn restore(currency: Option<String>, checked: bool) -> Self {
        let mut slot = Self::new();
        slot.select(currency);
        if checked && slot.currency.is_some() {
            slot.status = CheckStatus::Checked;
        }
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked_slot(currency: &str) -> CurrencySlot {
        let mut slot = CurrencySlot::new();
        slot.select(Some(currency.into()));
        slot.toggle(|_| unreachable!("no prompt when checking"));
        slot
    }

    #[test]
    fn unset_slot_is_inert() {
        let mut slot = CurrencySlot::new();
        assert_eq!(slot.toggle(|_| true), ToggleOutcome::NoCurrency);
        assert_eq!(slot.status(), CheckStatus::Unset);
    }

    #[test]
    fn selecting_currency_starts_unchecked_and_checking_is_immediate() {
        let mut slot = CurrencySlot::new();
        slot.select(Some("USD".into()));
        assert_eq!(slot.status(), CheckStatus::Unchecked);
        assert_eq!(
            slot.toggle(|_| panic!("checking never prompts")),
            ToggleOutcome::Checked("USD".into())
        );
        assert!(slot.is_checked());
    }

    #[test]
    fn declined_downgrade_keeps_checked() {
        let mut slot = checked_slot("EUR");
        let mut asked = None;
        let outcome = slot.toggle(|prompt| {
            asked = Some(prompt.to_string());
            false
        });
        assert_eq!(outcome, ToggleOutcome::Kept);
        assert_eq!(asked.as_deref(), Some("Отменить проверку EUR?"));
        assert_eq!(slot.status(), CheckStatus::Checked);
    }

    #[test]
    fn confirmed_downgrade_unchecks() {
        let mut slot = checked_slot("KRW");
        assert_eq!(slot.toggle(|_| true), ToggleOutcome::Unchecked("KRW".into()));
        assert_eq!(slot.status(), CheckStatus::Unchecked);
    }

    #[test]
    fn any_selection_change_resets_status() {
        let mut slot = checked_slot("USD");
        slot.select(Some("USD".into()));
        assert_eq!(slot.status(), CheckStatus::Unchecked);

        let mut slot = checked_slot("USD");
        slot.select(Some("VND".into()));
        assert_eq!(slot.status(), CheckStatus::Unchecked);

        let mut slot = checked_slot("USD");
        slot.select(None);
        assert_eq!(slot.status(), CheckStatus::Unset);
        assert!(slot.to_check().is_none());
    }

    #[test]
    fn restore_ignores_checked_flag_without_currency() {
        let slot = CurrencySlot::restore(None, true);
        assert_eq!(slot.status(), CheckStatus::Unset);
        let slot = CurrencySlot::from_check(&CurrencyCheck {
            currency: "ADA".into(),
            checked: true,
        });
        assert_eq!(slot.status(), CheckStatus::Checked);
    }
}
