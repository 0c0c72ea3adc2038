use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::{
    currency::CurrencySlot,
    lists::{ProductIdList, SiteSection},
    validation::sanitize_ticket,
    visibility::{self, FieldGroup, Visibility},
    Field, FieldMap, FieldValue, Section, CONVERTIBLE_CHECKED_KEY,
};

/// The live, editable form.
///
/// Unlike [`FieldMap`] it keeps blank product inputs, unselected site rows and
/// empty currency slots, because those still occupy space in the lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmokeForm {
    values: BTreeMap<String, FieldValue>,
    product_ids: ProductIdList,
    desktop_sites: SiteSection,
    mobile_sites: SiteSection,
    convertible: CurrencySlot,
    completed_at: Option<DateTime<Utc>>,
}

impl SmokeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the live form from a persisted snapshot.
    pub fn restore(data: &FieldMap) -> Self {
        let mut values = data.values.clone();
        let convertible_checked = matches!(
            values.remove(CONVERTIBLE_CHECKED_KEY),
            Some(FieldValue::Flag(true))
        );
        let currency = values
            .get(Field::ConvertibleCurrency.key())
            .and_then(FieldValue::as_text)
            .map(str::to_string);
        values.remove(Field::ConvertibleCurrency.key());

        let mut form = Self {
            values,
            product_ids: ProductIdList::restore(&data.product_ids),
            desktop_sites: SiteSection::restore(&data.desktop_sites),
            mobile_sites: SiteSection::restore(&data.mobile_sites),
            convertible: CurrencySlot::restore(currency, convertible_checked),
            completed_at: data.completed_at,
        };
        form.refresh_visibility();
        form
    }

    /// Serializable snapshot of the current values.
    pub fn collect(&self) -> FieldMap {
        let mut values = self.values.clone();
        if let Some(currency) = self.convertible.currency() {
            values.insert(
                Field::ConvertibleCurrency.key().to_string(),
                FieldValue::Text(currency.to_string()),
            );
        }
        values.insert(
            CONVERTIBLE_CHECKED_KEY.to_string(),
            FieldValue::Flag(self.convertible.is_checked()),
        );
        FieldMap {
            values,
            product_ids: self.product_ids.collect(),
            desktop_sites: self.desktop_sites.collect(),
            mobile_sites: self.mobile_sites.collect(),
            completed_at: self.completed_at,
        }
    }

    pub fn text(&self, field: Field) -> &str {
        if field == Field::ConvertibleCurrency {
            return self.convertible.currency().unwrap_or("");
        }
        self.values
            .get(field.key())
            .and_then(FieldValue::as_text)
            .unwrap_or("")
    }

    pub fn flag(&self, field: Field) -> bool {
        self.values
            .get(field.key())
            .and_then(FieldValue::as_flag)
            .unwrap_or(false)
    }

    /// Sets a text or select field. Ticket input is reduced to its digits.
    /// Returns the groups whose inputs were cleared by the change.
    pub fn set_text(&mut self, field: Field, value: &str) -> Vec<FieldGroup> {
        if field == Field::ConvertibleCurrency {
            self.convertible.select(Some(value.to_string()));
            return Vec::new();
        }
        let value = if field == Field::Ticket {
            sanitize_ticket(value)
        } else {
            value.to_string()
        };
        if value.is_empty() {
            self.values.remove(field.key());
        } else {
            self.values
                .insert(field.key().to_string(), FieldValue::Text(value));
        }
        self.refresh_visibility()
    }

    pub fn set_flag(&mut self, field: Field, value: bool) -> Vec<FieldGroup> {
        self.values
            .insert(field.key().to_string(), FieldValue::Flag(value));
        self.refresh_visibility()
    }

    /// Clears a field of any kind.
    pub fn clear(&mut self, field: Field) -> Vec<FieldGroup> {
        if field == Field::ConvertibleCurrency {
            self.convertible.select(None);
            return Vec::new();
        }
        self.values.remove(field.key());
        self.refresh_visibility()
    }

    pub fn visibility(&self) -> Visibility {
        Visibility::compute(&self.collect())
    }

    fn refresh_visibility(&mut self) -> Vec<FieldGroup> {
        let mut snapshot = FieldMap {
            values: std::mem::take(&mut self.values),
            ..FieldMap::default()
        };
        let (_, cleared) = visibility::apply(&mut snapshot);
        self.values = snapshot.values;
        cleared
    }

    pub fn product_ids(&self) -> &ProductIdList {
        &self.product_ids
    }

    pub fn product_ids_mut(&mut self) -> &mut ProductIdList {
        &mut self.product_ids
    }

    pub fn sites(&self, section: Section) -> &SiteSection {
        match section {
            Section::Desktop => &self.desktop_sites,
            Section::Mobile => &self.mobile_sites,
        }
    }

    pub fn sites_mut(&mut self, section: Section) -> &mut SiteSection {
        match section {
            Section::Desktop => &mut self.desktop_sites,
            Section::Mobile => &mut self.mobile_sites,
        }
    }

    pub fn convertible(&self) -> &CurrencySlot {
        &self.convertible
    }

    pub fn convertible_mut(&mut self) -> &mut CurrencySlot {
        &mut self.convertible
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn set_completed_at(&mut self, at: Option<DateTime<Utc>>) {
        self.completed_at = at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::CheckStatus;

    #[test]
    fn fresh_form_has_seeded_lists() {
        let form = SmokeForm::new();
        assert_eq!(form.product_ids().len(), 1);
        assert_eq!(form.sites(Section::Desktop).len(), 3);
        assert_eq!(form.sites(Section::Mobile).len(), 3);
        assert_eq!(form.convertible().status(), CheckStatus::Unset);
    }

    #[test]
    fn ticket_input_is_sanitized() {
        let mut form = SmokeForm::new();
        form.set_text(Field::Ticket, "T-44 55");
        assert_eq!(form.text(Field::Ticket), "4455");
        form.set_text(Field::Ticket, "abc");
        assert_eq!(form.text(Field::Ticket), "");
    }

    #[test]
    fn unchecking_min_bets_clears_dependent_inputs() {
        let mut form = SmokeForm::new();
        form.set_flag(Field::MinBetsChecked, true);
        form.set_text(Field::MinBetsStatus, "bug");
        form.set_flag(Field::AddedToTask, true);

        let cleared = form.set_flag(Field::MinBetsChecked, false);
        assert!(cleared.contains(&FieldGroup::MinBetsStatus));
        assert!(cleared.contains(&FieldGroup::AddedToTask));
        assert_eq!(form.text(Field::MinBetsStatus), "");
        assert!(!form.flag(Field::AddedToTask));
    }

    #[test]
    fn dependent_input_is_dropped_while_hidden() {
        let mut form = SmokeForm::new();
        form.set_text(Field::ManagerResponse, "sent");
        assert_eq!(form.text(Field::ManagerResponse), "");
        form.set_text(Field::NotifyManager, "yes");
        form.set_text(Field::ManagerResponse, "sent");
        assert_eq!(form.text(Field::ManagerResponse), "sent");
    }

    #[test]
    fn collect_and_restore_round_trip() {
        let mut form = SmokeForm::new();
        form.set_text(Field::Product, "Casino");
        form.set_flag(Field::QuantityChecked, true);
        form.product_ids_mut().set(0, "P123");
        form.product_ids_mut().add(Some("P124".into()));
        form.convertible_mut().select(Some("USD".into()));
        form.convertible_mut().toggle(|_| true);
        let row = form.sites_mut(Section::Mobile).row_mut(2).unwrap();
        row.slot_mut(0).unwrap().select(Some("RUB".into()));

        let snapshot = form.collect();
        assert!(snapshot.convertible_checked());
        assert_eq!(snapshot.text(Field::ConvertibleCurrency), "USD");

        let restored = SmokeForm::restore(&snapshot);
        assert_eq!(restored.collect(), snapshot);
        assert_eq!(restored.convertible().status(), CheckStatus::Checked);
    }

    #[test]
    fn round_trip_survives_a_cleared_seeded_site() {
        let mut form = SmokeForm::new();
        form.sites_mut(Section::Desktop)
            .row_mut(0)
            .unwrap()
            .select_site(None);

        let saved = form.collect();
        assert_eq!(saved.desktop_sites.len(), 2);
        assert_eq!(SmokeForm::restore(&saved).collect(), saved);
    }
}
