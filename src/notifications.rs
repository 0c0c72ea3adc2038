//! Transient toast notifications with a fixed auto-dismiss interval.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const MAX_LIFETIME_MS: u64 = 24 * 60 * 60 * 1_000;

/// Message categories for toasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
    Info,
}

impl NotificationKind {
    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Success => "✅",
            NotificationKind::Error => "❌",
            NotificationKind::Warning | NotificationKind::Info => "⚠️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Keeps the currently visible toasts and drops them once they expire.
#[derive(Debug, Clone)]
pub struct ToastService {
    lifetime: Duration,
    active: Vec<Notification>,
}

impl ToastService {
    pub fn new(lifetime_ms: u64) -> Self {
        let millis = lifetime_ms.min(MAX_LIFETIME_MS) as i64;
        Self {
            lifetime: Duration::milliseconds(millis),
            active: Vec::new(),
        }
    }

    pub fn show(&mut self, kind: NotificationKind, message: impl Into<String>) -> &Notification {
        self.show_at(kind, message, Utc::now())
    }

    pub fn show_at(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> &Notification {
        let message = message.into();
        tracing::debug!(?kind, %message, "toast shown");
        self.active.push(Notification {
            kind,
            message,
            created_at: now,
        });
        &self.active[self.active.len() - 1]
    }

    pub fn success(&mut self, message: impl Into<String>) -> &Notification {
        self.show(NotificationKind::Success, message)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> &Notification {
        self.show(NotificationKind::Warning, message)
    }

    /// Removes toasts older than the configured lifetime. Returns how many were dismissed.
    pub fn expire(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.active.len();
        let lifetime = self.lifetime;
        self.active.retain(|toast| now - toast.created_at < lifetime);
        before - self.active.len()
    }

    pub fn active(&self) -> &[Notification] {
        &self.active
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.active.last()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

impl Default for ToastService {
    fn default() -> Self {
        Self::new(3_000)
    }
}
