#![doc(test(attr(deny(warnings))))]

//! Smoke Checklist captures the results of a product-rollout smoke test:
//! product identifiers, per-site currency verification, conditional follow-up
//! fields and a final read-only report, persisted locally between runs.

pub mod cli;
pub mod config;
pub mod errors;
pub mod form;
pub mod notifications;
pub mod session;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Smoke checklist tracing initialized.");
    });
}
