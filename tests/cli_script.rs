mod common;

use std::{fs, path::Path};

use assert_cmd::Command;
use common::temp_app_dir;
use predicates::prelude::*;
use predicates::str::contains;

const VALID_REPORT: &str = "\
set product Slots
set game \"Book of Ra\"
set freespins 10
ticket 44a55
id 1 P123
check quantityChecked
set defaultBets not_checked
check minBetsChecked
set minBetsStatus ok
set notifyManager no
convertible usd
toggle-convertible
submit
confirm
";

fn smoke(base: &Path) -> Command {
    let mut cmd = Command::cargo_bin("smoke_checklist").unwrap();
    cmd.env("SMOKE_CHECKLIST_HOME", base)
        .env("SMOKE_CHECKLIST_SCRIPT", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn empty_submit_prints_the_error_panel() {
    let base = temp_app_dir();
    smoke(&base)
        .write_stdin("submit\nexit\n")
        .assert()
        .success()
        .stdout(contains("НЕ ВСЕ ПОЛЯ ЗАПОЛНЕНЫ"))
        .stdout(contains("Заполните поле \"Продукт\""))
        .stdout(contains("confirm").not());
}

#[test]
fn valid_report_completes_and_prints() {
    let base = temp_app_dir();
    smoke(&base)
        .write_stdin(format!("{VALID_REPORT}print\nexit\n"))
        .assert()
        .success()
        .stdout(contains("USD CHECK"))
        .stdout(contains("Проверка успешно завершена!"))
        .stdout(contains("Тикет: 4455"))
        .stdout(contains("ID продуктов: P123"));

    let stored = fs::read_to_string(base.join("local_storage.json")).unwrap();
    assert!(stored.contains("smokeTestState"));
    assert!(stored.contains("completedAt"));
}

#[test]
fn declined_resume_keeps_the_report_locked() {
    let base = temp_app_dir();
    smoke(&base).write_stdin(VALID_REPORT).assert().success();

    smoke(&base)
        .write_stdin("edit\nнет\nset game Other\nexit\n")
        .assert()
        .success()
        .stdout(contains(
            "? Возобновить редактирование завершенной проверки? нет",
        ))
        .stdout(contains("Проверка завершена: форма доступна только для чтения"));

    smoke(&base)
        .write_stdin("edit\nда\nset game Other\nshow\n")
        .assert()
        .success()
        .stdout(contains("Редактирование возобновлено"))
        .stdout(contains("Игра * (game): Other"));
}

#[test]
fn uncheck_needs_confirmation() {
    let base = temp_app_dir();
    smoke(&base)
        .write_stdin("currency desktop 1 1 eur\ntoggle desktop 1 1\ntoggle desktop 1 1\nда\nshow\n")
        .assert()
        .success()
        .stdout(contains("EUR CHECK CANCEL"))
        .stdout(contains("1. Продакшн | 🔴 EUR"));
}

#[test]
fn unknown_command_gets_a_suggestion() {
    let base = temp_app_dir();
    smoke(&base)
        .write_stdin("sumbit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `sumbit`"))
        .stdout(contains("Suggestion: `submit`?"));
}

#[test]
fn bad_arguments_are_reported_without_stopping() {
    let base = temp_app_dir();
    smoke(&base)
        .write_stdin("set notifyManager maybe\nremove-id\nset product Ok\nshow\n")
        .assert()
        .success()
        .stdout(contains("is not an option for `notifyManager`"))
        .stdout(contains("Usage: remove-id <n>"))
        .stdout(contains("Продукт * (product): Ok"));
}

#[test]
fn version_prints_package_version() {
    let base = temp_app_dir();
    smoke(&base)
        .write_stdin("version\n")
        .assert()
        .success()
        .stdout(contains(format!("smoke_checklist {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn custom_storage_key_from_config_is_used() {
    let base = temp_app_dir();
    fs::write(base.join("config.json"), r#"{"storageKey": "customKey"}"#).unwrap();
    smoke(&base)
        .write_stdin("set product Slots\n")
        .assert()
        .success();
    let stored = fs::read_to_string(base.join("local_storage.json")).unwrap();
    assert!(stored.contains("customKey"));
    assert!(!stored.contains("smokeTestState"));
}

#[test]
fn invalid_config_fails_with_an_error() {
    let base = temp_app_dir();
    fs::write(base.join("config.json"), r#"{"storageKey": ""}"#).unwrap();
    smoke(&base)
        .write_stdin("show\n")
        .assert()
        .failure()
        .stderr(contains("Error:"));
}
