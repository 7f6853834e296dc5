#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A promptdeck invocation isolated to `dir`: its own data and config
/// directories, no presets, no colors.
fn deck(dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("promptdeck"));
    cmd.env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env("HOME", dir.path())
        .env("NO_COLOR", "1")
        .env("PROMPTDECK_SEED_PRESETS", "false")
        .env_remove("PROMPTDECK_DATA_DIR")
        .env_remove("PROMPTDECK_LOG")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(dir.path().join("data"));
    cmd
}

fn save_harbor(dir: &TempDir) {
    deck(dir)
        .args([
            "save",
            "--name",
            "Harbor",
            "--subject",
            "a red boat",
            "--action",
            "drifting",
            "--environment",
            "misty harbor",
            "--style",
            "oil painting",
            "--tag",
            "sea",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Template created: Harbor"));
}

fn exported_ids(dir: &TempDir) -> Vec<String> {
    let output = deck(dir).arg("export").output().unwrap();
    assert!(output.status.success());
    let items: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    items
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn empty_deck_lists_nothing() {
    let dir = TempDir::new().unwrap();
    deck(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No templates found."));
}

#[test]
fn first_run_seeds_presets_when_enabled() {
    let dir = TempDir::new().unwrap();
    deck(&dir)
        .env("PROMPTDECK_SEED_PRESETS", "true")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cinematic Portrait"));
}

#[test]
fn save_twice_merges() {
    let dir = TempDir::new().unwrap();
    save_harbor(&dir);
    deck(&dir)
        .args([
            "save",
            "--name",
            "Harbor",
            "--subject",
            "a red boat",
            "--action",
            "drifting",
            "--environment",
            "misty harbor",
            "--style",
            "oil painting",
            "--tag",
            "boats",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Template updated: Harbor"));

    assert_eq!(exported_ids(&dir).len(), 1);
    deck(&dir)
        .arg("tags")
        .assert()
        .success()
        .stdout(predicate::str::contains("sea").and(predicate::str::contains("boats")));
}

#[test]
fn red_template_is_rejected() {
    let dir = TempDir::new().unwrap();
    deck(&dir)
        .args(["save", "--name", "ab", "--subject", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template rejected"));
    assert!(exported_ids(&dir).is_empty());
}

#[test]
fn show_accepts_id_prefix() {
    let dir = TempDir::new().unwrap();
    save_harbor(&dir);
    let id = exported_ids(&dir).remove(0);

    deck(&dir)
        .args(["show", &id[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains("a red boat").and(predicate::str::contains(&id)));
}

#[test]
fn search_ranks_and_reports_misses() {
    let dir = TempDir::new().unwrap();
    save_harbor(&dir);

    deck(&dir)
        .args(["search", "boat", "--tag", "sea"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Harbor"));

    deck(&dir)
        .args(["search", "volcano"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No templates match"));
}

#[test]
fn use_prints_prompt_and_feeds_best_of() {
    let dir = TempDir::new().unwrap();
    save_harbor(&dir);
    let id = exported_ids(&dir).remove(0);

    deck(&dir)
        .args(["best"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No templates have been used enough yet."));

    deck(&dir)
        .args(["use", &id[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "a red boat, drifting, misty harbor, oil painting",
        ));
    deck(&dir).args(["success", &id[..8]]).assert().success();

    deck(&dir)
        .args(["best"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Harbor"));
}

#[test]
fn pin_and_delete_by_prefix() {
    let dir = TempDir::new().unwrap();
    save_harbor(&dir);
    let id = exported_ids(&dir).remove(0);

    deck(&dir).args(["pin", &id[..8]]).assert().success();
    deck(&dir)
        .args(["list", "--pinned"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Harbor"));

    deck(&dir).args(["delete", &id[..8]]).assert().success();
    assert!(exported_ids(&dir).is_empty());
}

#[test]
fn unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    deck(&dir)
        .args(["delete", "ffffffff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No template matches"));
}

#[test]
fn edit_without_fields_fails() {
    let dir = TempDir::new().unwrap();
    save_harbor(&dir);
    let id = exported_ids(&dir).remove(0);
    deck(&dir)
        .args(["edit", &id[..8]])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to change"));
}

#[test]
fn lint_grades_without_saving() {
    let dir = TempDir::new().unwrap();
    deck(&dir)
        .args(["lint", "--name", "ab", "--subject", "x"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("red"));

    deck(&dir)
        .args([
            "lint",
            "--name",
            "Harbor",
            "--subject",
            "a red boat",
            "--action",
            "drifting",
            "--environment",
            "misty harbor",
            "--style",
            "oil painting",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("green"));

    assert!(exported_ids(&dir).is_empty());
}

#[test]
fn export_to_file_then_import_elsewhere() {
    let source = TempDir::new().unwrap();
    save_harbor(&source);
    let file = source.path().join("deck.json");
    deck(&source)
        .args(["export", "--output"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to"));

    let target = TempDir::new().unwrap();
    deck(&target)
        .arg("import")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 template(s)"));
    deck(&target)
        .arg("import")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 duplicate"));
    assert_eq!(exported_ids(&target), exported_ids(&source));
}

#[test]
fn import_rejects_non_array() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("bad.json");
    fs::write(&file, r#"{"subject": "x"}"#).unwrap();
    deck(&dir)
        .arg("import")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON array"));
}

#[test]
fn reindex_reports_stats() {
    let dir = TempDir::new().unwrap();
    save_harbor(&dir);
    deck(&dir)
        .arg("reindex")
        .assert()
        .success()
        .stdout(predicate::str::contains("Index: 1 templates"));
}
