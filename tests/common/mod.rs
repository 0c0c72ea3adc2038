#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use once_cell::sync::Lazy;
use smoke_checklist::{
    config::Config,
    form::Field,
    session::{CurrencyTarget, Effect, Intent, Session},
    storage::{JsonFileStore, SnapshotStore},
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated application directory.
pub fn temp_app_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Opens a session backed by the local storage file in `base`.
pub fn open_session(base: &Path) -> Session {
    let backend = JsonFileStore::in_dir(base).expect("create local storage");
    let store = SnapshotStore::new(Box::new(backend), "smokeTestState");
    Session::open(store, &Config::default())
}

pub fn no_prompt(prompt: &str) -> bool {
    panic!("unexpected prompt: {prompt}")
}

pub fn run(session: &mut Session, intent: Intent) -> Vec<Effect> {
    session.dispatch(intent, &mut no_prompt)
}

/// Fills every required input with the minimal valid report.
pub fn fill_valid(session: &mut Session) {
    for (field, value) in [
        (Field::Product, "Slots"),
        (Field::Game, "Book of Ra"),
        (Field::Freespins, "10"),
        (Field::Ticket, "4455"),
        (Field::DefaultBets, "not_checked"),
        (Field::NotifyManager, "no"),
        (Field::MinBetsStatus, "ok"),
    ] {
        if field == Field::MinBetsStatus {
            run(session, Intent::SetFlag(Field::MinBetsChecked, true));
        }
        run(session, Intent::SetText(field, value.into()));
    }
    run(session, Intent::SetFlag(Field::QuantityChecked, true));
    run(
        session,
        Intent::SetProductId {
            index: 0,
            value: "P123".into(),
        },
    );
    run(
        session,
        Intent::SelectCurrency {
            target: CurrencyTarget::Convertible,
            currency: Some("USD".into()),
        },
    );
    run(session, Intent::ToggleCurrencyCheck(CurrencyTarget::Convertible));
}
