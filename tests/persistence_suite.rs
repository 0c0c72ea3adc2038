mod common;

use std::fs;

use common::{fill_valid, open_session, run, temp_app_dir};
use regex::Regex;
use smoke_checklist::{
    form::{CheckStatus, Field, Section},
    session::{CurrencyTarget, Intent, SubmissionPhase},
    storage::{JsonFileStore, KeyValueStore},
    utils::paths::local_storage_file_in,
};

fn stored_snapshot(base: &std::path::Path) -> serde_json::Value {
    let store = JsonFileStore::in_dir(base).unwrap();
    let raw = store.get("smokeTestState").unwrap().expect("snapshot saved");
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn edits_survive_a_restart() {
    let base = temp_app_dir();
    {
        let mut session = open_session(&base);
        run(&mut session, Intent::SetText(Field::Product, "Slots".into()));
        run(&mut session, Intent::AddProductId(Some("P2".into())));
        run(
            &mut session,
            Intent::SetProductId {
                index: 0,
                value: " P1 ".into(),
            },
        );
        run(
            &mut session,
            Intent::AddSite {
                section: Section::Desktop,
                site: Some("Другой сайт 5".into()),
            },
        );
        let target = CurrencyTarget::Site {
            section: Section::Desktop,
            row: 3,
            slot: 0,
        };
        run(
            &mut session,
            Intent::SelectCurrency {
                target,
                currency: Some("KRW".into()),
            },
        );
        run(&mut session, Intent::ToggleCurrencyCheck(target));
    }

    let snapshot = stored_snapshot(&base);
    assert_eq!(snapshot["isReadOnly"], false);
    assert_eq!(snapshot["formData"]["product"], "Slots");
    assert_eq!(snapshot["formData"]["productIds"], serde_json::json!(["P1", "P2"]));
    assert_eq!(
        snapshot["formData"]["desktopSites"][3],
        serde_json::json!({
            "site": "Другой сайт 5",
            "currencies": [{"currency": "KRW", "checked": true}]
        })
    );

    let session = open_session(&base);
    assert_eq!(session.form().text(Field::Product), "Slots");
    assert_eq!(session.form().product_ids().entries(), ["P1", "P2"]);
    let row = &session.form().sites(Section::Desktop).rows()[3];
    assert_eq!(row.site(), Some("Другой сайт 5"));
    assert_eq!(row.slots()[0].status(), CheckStatus::Checked);
    assert_eq!(session.form().sites(Section::Mobile).len(), 3);
}

#[test]
fn completed_report_reopens_read_only_with_timestamp() {
    let base = temp_app_dir();
    {
        let mut session = open_session(&base);
        fill_valid(&mut session);
        run(&mut session, Intent::Submit);
        run(&mut session, Intent::ConfirmSubmit);
    }

    let snapshot = stored_snapshot(&base);
    assert_eq!(snapshot["completed"], true);
    assert_eq!(snapshot["isReadOnly"], true);
    assert_eq!(snapshot["formData"]["convertibleCurrencyChecked"], true);
    let completed_at = snapshot["formData"]["completedAt"].as_str().unwrap();
    let rfc3339 = Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|\+00:00)$").unwrap();
    assert!(rfc3339.is_match(completed_at), "{completed_at}");

    let session = open_session(&base);
    assert_eq!(session.phase(), SubmissionPhase::Completed);
    assert!(session.is_read_only());
    assert_eq!(session.form().text(Field::Ticket), "4455");
    assert!(session.form().convertible().is_checked());
}

#[test]
fn corrupted_storage_starts_a_fresh_form() {
    let base = temp_app_dir();
    fs::write(local_storage_file_in(&base), "{ not json").unwrap();

    let mut session = open_session(&base);
    assert!(!session.is_read_only());
    assert_eq!(session.form().text(Field::Product), "");

    run(&mut session, Intent::SetText(Field::Game, "Recovered".into()));
    let snapshot = stored_snapshot(&base);
    assert_eq!(snapshot["formData"]["game"], "Recovered");
}

#[test]
fn unparsable_snapshot_value_is_ignored() {
    let base = temp_app_dir();
    let store = JsonFileStore::in_dir(&base).unwrap();
    store.set("smokeTestState", "[1, 2, 3]").unwrap();
    store.set("otherKey", "kept").unwrap();

    let mut session = open_session(&base);
    assert_eq!(session.phase(), SubmissionPhase::Editing);
    run(&mut session, Intent::SetText(Field::Product, "X".into()));

    assert_eq!(store.get("otherKey").unwrap().as_deref(), Some("kept"));
}

#[test]
fn unload_saves_pending_edits() {
    let base = temp_app_dir();
    let mut session = open_session(&base);
    run(&mut session, Intent::SetText(Field::Freespins, "25".into()));
    fs::remove_file(local_storage_file_in(&base)).unwrap();

    run(&mut session, Intent::Unload);
    assert_eq!(stored_snapshot(&base)["formData"]["freespins"], "25");
}
