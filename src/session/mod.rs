//! Event dispatch for one form-filling session.
//!
//! The UI turns user actions into [`Intent`]s and hands them to
//! [`Session::dispatch`]. The session updates the form, mirrors the result into
//! local storage, and returns the [`Effect`]s the UI has to render.

pub mod submission;

use chrono::{DateTime, Utc};

use crate::{
    config::Config,
    form::{
        currency::{cancel_message, check_message, SELECT_CURRENCY_FIRST},
        first_invalid_field, ticket_hint, validate, CurrencySlot, Field, FieldGroup, FieldMap,
        FormState, Section, SmokeForm, ToggleOutcome, Visibility,
    },
    notifications::{Notification, ToastService},
    storage::SnapshotStore,
};

pub use submission::{SubmissionPhase, Transition};

pub const RESUME_PROMPT: &str = "Возобновить редактирование завершенной проверки?";
pub const BACK_PROMPT: &str = "Вернуться на главную? Несохраненные данные будут потеряны.";
pub const READ_ONLY_MESSAGE: &str = "Проверка завершена: форма доступна только для чтения";
pub const CLOSE_CONFIRM_FIRST: &str = "Сначала закройте окно подтверждения";
pub const ERRORS_HEADER: &str = "НЕ ВСЕ ПОЛЯ ЗАПОЛНЕНЫ";

/// Answers synchronous yes/no prompts.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Identifies a currency selector and its toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyTarget {
    Convertible,
    Site {
        section: Section,
        row: usize,
        slot: usize,
    },
}

/// Typed user actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SetText(Field, String),
    SetFlag(Field, bool),
    ClearField(Field),
    AddProductId(Option<String>),
    SetProductId { index: usize, value: String },
    RemoveProductId(usize),
    AddSite { section: Section, site: Option<String> },
    RemoveSite { section: Section, index: usize },
    SelectSite { section: Section, index: usize, site: Option<String> },
    SelectCurrency { target: CurrencyTarget, currency: Option<String> },
    ToggleCurrencyCheck(CurrencyTarget),
    Submit,
    ConfirmSubmit,
    CancelSubmit,
    /// Click outside the confirmation prompt.
    DismissConfirm,
    FixErrors,
    Edit,
    Print,
    OpenMenu,
    CloseMenu,
    CloseSuccessNotification,
    Back,
    Unload,
}

/// Render instructions produced by a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Toast(Notification),
    ShowErrors(Vec<String>),
    HideErrors,
    ScrollToSubmit,
    ShowConfirmModal,
    HideConfirmModal,
    Focus(Field),
    /// Dependent inputs that were cleared because their group was hidden.
    Cleared(Vec<FieldGroup>),
    /// Submit control replaced by edit and print.
    EnterReadOnly,
    /// Submit control restored.
    LeaveReadOnly,
    ShowSuccessNotification { delay_ms: u64 },
    HideSuccessNotification,
    Print(FieldMap),
    MenuOpened,
    MenuClosed,
    NavigateHome,
    /// The action was not applied; carries the reason.
    Rejected(String),
}

pub struct Session {
    state: FormState,
    form: SmokeForm,
    phase: SubmissionPhase,
    errors: Vec<String>,
    toasts: ToastService,
    store: SnapshotStore,
    success_delay_ms: u64,
    menu_open: bool,
    success_visible: bool,
}

impl Session {
    /// Restores the saved state from `store`, or starts an empty form.
    pub fn open(store: SnapshotStore, config: &Config) -> Self {
        let (state, form) = match store.load_saved() {
            Some(state) => {
                let form = SmokeForm::restore(&state.form_data);
                (state, form)
            }
            None => (FormState::default(), SmokeForm::new()),
        };
        let phase = SubmissionPhase::for_state(&state);
        tracing::info!(?phase, "session opened");
        Self {
            state,
            form,
            phase,
            errors: Vec::new(),
            toasts: ToastService::new(config.toast_duration_ms),
            store,
            success_delay_ms: config.success_delay_ms,
            menu_open: false,
            success_visible: false,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn form(&self) -> &SmokeForm {
        &self.form
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn is_read_only(&self) -> bool {
        self.state.is_read_only
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn toasts(&self) -> &[Notification] {
        self.toasts.active()
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn success_visible(&self) -> bool {
        self.success_visible
    }

    pub fn visibility(&self) -> Visibility {
        self.form.visibility()
    }

    pub fn ticket_hint(&self) -> Option<&'static str> {
        ticket_hint(self.form.text(Field::Ticket))
    }

    /// Drops toasts that outlived the configured interval.
    pub fn expire_toasts(&mut self, now: DateTime<Utc>) -> usize {
        let expired = self.toasts.expire(now);
        if expired > 0 {
            self.state.notifications = self.toasts.active().to_vec();
        }
        expired
    }

    /// Applies one intent. `confirm` answers any prompt the intent raises.
    pub fn dispatch(&mut self, intent: Intent, confirm: &mut dyn Confirm) -> Vec<Effect> {
        tracing::debug!(?intent, phase = ?self.phase, "dispatch");
        match intent {
            Intent::Submit => self.submit(),
            Intent::ConfirmSubmit => self.complete(),
            Intent::CancelSubmit | Intent::DismissConfirm => self.cancel_submit(),
            Intent::FixErrors => self.focus_first_error(),
            Intent::Edit => self.resume(confirm),
            Intent::Print => self.print(),
            Intent::OpenMenu => {
                self.menu_open = true;
                vec![Effect::MenuOpened]
            }
            Intent::CloseMenu => {
                self.menu_open = false;
                vec![Effect::MenuClosed]
            }
            Intent::CloseSuccessNotification => {
                self.success_visible = false;
                vec![Effect::HideSuccessNotification]
            }
            Intent::Back => self.back(confirm),
            Intent::Unload => {
                self.unload();
                Vec::new()
            }
            edit => self.edit(edit, confirm),
        }
    }

    /// Field and list edits; every applied edit is persisted.
    fn edit(&mut self, intent: Intent, confirm: &mut dyn Confirm) -> Vec<Effect> {
        if self.state.is_read_only {
            return vec![Effect::Rejected(READ_ONLY_MESSAGE.into())];
        }
        if self.phase == SubmissionPhase::PendingConfirm {
            return vec![Effect::Rejected(CLOSE_CONFIRM_FIRST.into())];
        }

        let mut effects = Vec::new();
        let changed = match intent {
            Intent::SetText(field, value) => {
                if field.is_checkbox() {
                    return vec![Effect::Rejected(format!("{} is a checkbox", field.key()))];
                }
                push_cleared(&mut effects, self.form.set_text(field, &value));
                true
            }
            Intent::SetFlag(field, value) => {
                if !field.is_checkbox() {
                    return vec![Effect::Rejected(format!("{} is not a checkbox", field.key()))];
                }
                push_cleared(&mut effects, self.form.set_flag(field, value));
                true
            }
            Intent::ClearField(field) => {
                push_cleared(&mut effects, self.form.clear(field));
                true
            }
            Intent::AddProductId(preset) => self.form.product_ids_mut().add(preset).is_some(),
            Intent::SetProductId { index, value } => self.form.product_ids_mut().set(index, value),
            Intent::RemoveProductId(index) => self.form.product_ids_mut().remove(index),
            Intent::AddSite { section, site } => self.form.sites_mut(section).add(site).is_some(),
            Intent::RemoveSite { section, index } => self.form.sites_mut(section).remove(index),
            Intent::SelectSite {
                section,
                index,
                site,
            } => match self.form.sites_mut(section).row_mut(index) {
                Some(row) => {
                    row.select_site(site);
                    true
                }
                None => false,
            },
            Intent::SelectCurrency { target, currency } => match self.slot_mut(target) {
                Some(slot) => {
                    slot.select(currency);
                    true
                }
                None => false,
            },
            Intent::ToggleCurrencyCheck(target) => {
                let Some(slot) = self.slot_mut(target) else {
                    return vec![Effect::Rejected("Нет такого поля валюты".into())];
                };
                let outcome = slot.toggle(|prompt| confirm.confirm(prompt));
                match &outcome {
                    ToggleOutcome::NoCurrency => {
                        let toast = self.toasts.warning(SELECT_CURRENCY_FIRST).clone();
                        effects.push(Effect::Toast(toast));
                    }
                    ToggleOutcome::Checked(currency) => {
                        let toast = self.toasts.success(check_message(currency)).clone();
                        effects.push(Effect::Toast(toast));
                    }
                    ToggleOutcome::Unchecked(currency) => {
                        let toast = self.toasts.warning(cancel_message(currency)).clone();
                        effects.push(Effect::Toast(toast));
                    }
                    ToggleOutcome::Kept => return Vec::new(),
                }
                outcome.changed()
            }
            other => {
                tracing::warn!(?other, "intent is not an edit");
                false
            }
        };

        if changed {
            self.persist();
        } else if effects.is_empty() {
            effects.push(Effect::Rejected("Действие недоступно".into()));
        }
        effects
    }

    fn slot_mut(&mut self, target: CurrencyTarget) -> Option<&mut CurrencySlot> {
        match target {
            CurrencyTarget::Convertible => Some(self.form.convertible_mut()),
            CurrencyTarget::Site { section, row, slot } => self
                .form
                .sites_mut(section)
                .row_mut(row)
                .and_then(|row| row.slot_mut(slot)),
        }
    }

    fn submit(&mut self) -> Vec<Effect> {
        let errors = validate(&self.form.collect());
        let valid = errors.is_empty();
        let Some(next) = self.phase.next(Transition::Submit { valid }) else {
            let reason = if self.phase == SubmissionPhase::PendingConfirm {
                CLOSE_CONFIRM_FIRST
            } else {
                READ_ONLY_MESSAGE
            };
            return vec![Effect::Rejected(reason.into())];
        };
        self.phase = next;
        if valid {
            self.errors.clear();
            vec![Effect::HideErrors, Effect::ShowConfirmModal]
        } else {
            tracing::info!(count = errors.len(), "submission blocked by validation");
            self.errors = errors.clone();
            vec![Effect::ShowErrors(errors), Effect::ScrollToSubmit]
        }
    }

    fn complete(&mut self) -> Vec<Effect> {
        let Some(next) = self.phase.next(Transition::Confirm) else {
            return vec![Effect::Rejected("Нет открытого подтверждения".into())];
        };
        self.phase = next;
        let now = Utc::now();
        self.form.set_completed_at(Some(now));
        self.state.completed = true;
        self.state.is_read_only = true;
        self.persist();
        self.success_visible = true;
        tracing::info!(completed_at = %now.to_rfc3339(), "smoke test completed");
        vec![
            Effect::HideConfirmModal,
            Effect::EnterReadOnly,
            Effect::ShowSuccessNotification {
                delay_ms: self.success_delay_ms,
            },
        ]
    }

    fn cancel_submit(&mut self) -> Vec<Effect> {
        match self.phase.next(Transition::Cancel) {
            Some(next) => {
                self.phase = next;
                vec![Effect::HideConfirmModal]
            }
            None => Vec::new(),
        }
    }

    fn resume(&mut self, confirm: &mut dyn Confirm) -> Vec<Effect> {
        if self.phase != SubmissionPhase::Completed {
            return vec![Effect::Rejected("Форма уже редактируется".into())];
        }
        let confirmed = confirm.confirm(RESUME_PROMPT);
        let Some(next) = self.phase.next(Transition::Resume { confirmed }) else {
            return Vec::new();
        };
        self.phase = next;
        if !confirmed {
            return Vec::new();
        }
        self.state.completed = false;
        self.state.is_read_only = false;
        self.form.set_completed_at(None);
        self.success_visible = false;
        self.persist();
        tracing::info!("editing resumed");
        vec![Effect::LeaveReadOnly]
    }

    fn focus_first_error(&self) -> Vec<Effect> {
        first_invalid_field(&self.errors)
            .map(Effect::Focus)
            .into_iter()
            .collect()
    }

    fn print(&self) -> Vec<Effect> {
        if !self.state.is_read_only {
            return vec![Effect::Rejected("Печать доступна после завершения".into())];
        }
        vec![Effect::Print(self.state.form_data.clone())]
    }

    fn back(&mut self, confirm: &mut dyn Confirm) -> Vec<Effect> {
        if !confirm.confirm(BACK_PROMPT) {
            return Vec::new();
        }
        self.unload();
        vec![Effect::NavigateHome]
    }

    /// Best-effort final save; a completed report is already persisted.
    fn unload(&mut self) {
        if !self.state.completed {
            self.persist();
        }
    }

    fn persist(&mut self) {
        self.state.form_data = self.form.collect();
        self.state.notifications = self.toasts.active().to_vec();
        self.store.save(&self.state);
    }
}

fn push_cleared(effects: &mut Vec<Effect>, cleared: Vec<FieldGroup>) {
    if !cleared.is_empty() {
        effects.push(Effect::Cleared(cleared));
    }
}
