//! Integration tests for the leitner binary.
//!
//! These tests verify end-to-end behavior including:
//! - Adding, listing, and deleting cards
//! - The review workflow and its "done" messaging
//! - Answer validation
//! - CSV export and import

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("leitner"))
}

fn add(data_dir: &Path, word: &str, definition: &str) {
    cli()
        .arg("add")
        .arg(word)
        .arg(definition)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();
}

/// Cards as reported by `list --json`
fn list_json(data_dir: &Path) -> Vec<serde_json::Value> {
    let output = cli()
        .arg("list")
        .arg("--json")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("list --json should print a JSON array")
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Leitner spaced-repetition flashcards",
        ));
}

#[test]
fn test_add_and_list() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .arg("add")
        .arg("cat")
        .arg("feline")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added \"cat\""));

    assert!(data_dir.join("cards").exists());

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("cat = feline"));

    let cards = list_json(data_dir);
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["word"], "cat");
    assert_eq!(cards[0]["bin"], 0);
    assert_eq!(cards[0]["num_times_incorrect"], 0);
}

#[test]
fn test_duplicate_word_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add(data_dir, "cat", "feline");

    cli()
        .arg("add")
        .arg("cat")
        .arg("other")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(list_json(data_dir).len(), 1);
}

#[test]
fn test_blank_definition_rejected() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("add")
        .arg("cat")
        .arg("   ")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("definition is required"));
}

#[test]
fn test_next_on_empty_deck() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("next")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No cards yet"));
}

#[test]
fn test_review_then_temporarily_done() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add(data_dir, "cat", "feline");

    cli()
        .arg("next")
        .arg("--answer")
        .arg("correct")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("cat"))
        .stdout(predicate::str::contains("= feline"))
        .stdout(predicate::str::contains("Correct! Moved to bin 1"));

    // Bin 1 waits five seconds
    cli()
        .arg("next")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("You are temporarily done"));
}

#[test]
fn test_incorrect_answer_counts_miss() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add(data_dir, "cat", "feline");

    cli()
        .arg("next")
        .arg("--answer")
        .arg("incorrect")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Incorrect. Back to bin 1 (1 misses)"));

    let cards = list_json(data_dir);
    assert_eq!(cards[0]["bin"], 1);
    assert_eq!(cards[0]["num_times_incorrect"], 1);
}

#[test]
fn test_peek_does_not_record() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add(data_dir, "cat", "feline");

    cli()
        .arg("next")
        .arg("--peek")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Peek"));

    let cards = list_json(data_dir);
    assert_eq!(cards[0]["bin"], 0);
}

#[test]
fn test_answer_by_id_is_validated() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add(data_dir, "cat", "feline");
    let id = list_json(data_dir)[0]["id"].as_str().unwrap().to_string();

    cli()
        .arg("answer")
        .arg(&id)
        .arg("--correct")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved to bin 1"));

    // Replaying the answer is rejected while the card cools down
    cli()
        .arg("answer")
        .arg(&id)
        .arg("--correct")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not due for review"));

    assert_eq!(list_json(data_dir)[0]["bin"], 1);
}

#[test]
fn test_answer_serves_next_card() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add(data_dir, "cat", "feline");
    add(data_dir, "dog", "canine");

    let cards = list_json(data_dir);
    let cat_id = cards
        .iter()
        .find(|c| c["word"] == "cat")
        .and_then(|c| c["id"].as_str())
        .unwrap()
        .to_string();
    let dog_id = cards
        .iter()
        .find(|c| c["word"] == "dog")
        .and_then(|c| c["id"].as_str())
        .unwrap()
        .to_string();

    cli()
        .arg("answer")
        .arg(&cat_id)
        .arg("--correct")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Next up: dog"));

    // Nothing left due once both cards cool down
    cli()
        .arg("answer")
        .arg(&dog_id)
        .arg("--incorrect")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("You are temporarily done"));
}

#[test]
fn test_answer_requires_a_result() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("answer")
        .arg("00000000-0000-0000-0000-000000000000")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_answer_unknown_card() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("answer")
        .arg("00000000-0000-0000-0000-000000000000")
        .arg("--incorrect")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Card not found"));
}

#[test]
fn test_delete() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add(data_dir, "cat", "feline");
    let id = list_json(data_dir)[0]["id"].as_str().unwrap().to_string();

    cli()
        .arg("delete")
        .arg(&id)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted card"));

    cli()
        .arg("delete")
        .arg(&id)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No card with id"));

    assert!(list_json(data_dir).is_empty());
}

#[test]
fn test_permanently_done() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add(data_dir, "cat", "feline");
    add(data_dir, "dog", "canine");

    // Retire one card as mastered and one as too hard
    for mut card in list_json(data_dir) {
        if card["word"] == "cat" {
            card["bin"] = 11.into();
        } else {
            card["num_times_incorrect"] = 10.into();
        }
        let path = data_dir
            .join("cards")
            .join(format!("{}.json", card["id"].as_str().unwrap()));
        fs::write(path, serde_json::to_string(&card).unwrap()).unwrap();
    }

    cli()
        .arg("next")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("you are permanently done"));

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("mastered: 1"))
        .stdout(predicate::str::contains("retired:  1"));
}

#[test]
fn test_status_counts() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    add(data_dir, "cat", "feline");
    add(data_dir, "dog", "canine");

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cards:    2"))
        .stdout(predicate::str::contains("due:      2"))
        .stdout(predicate::str::contains("Next up:"));
}

#[test]
fn test_export_and_import() {
    let temp_dir = setup_test_dir();
    let source = temp_dir.path().join("source");
    let target = temp_dir.path().join("target");
    let csv_path = temp_dir.path().join("cards.csv");

    add(&source, "cat", "feline");
    add(&source, "dog", "canine");

    cli()
        .arg("export")
        .arg(&csv_path)
        .arg("--data-dir")
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 cards"));

    let csv_content = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert!(csv_content.starts_with("id,word,definition"));

    // Importing into a deck that already has "cat" skips it
    add(&target, "cat", "feline");
    cli()
        .arg("import")
        .arg(&csv_path)
        .arg("--data-dir")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 cards (1 skipped)"));

    assert_eq!(list_json(&target).len(), 2);
}
