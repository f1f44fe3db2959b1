//! End-to-end tests of the `deck-solver` binary against local data files.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const CATALOG: &str = "\
id,rarity,title
1,4,【月夜】オズ
2,3,【朝日】アーサー
3,4,【星空】カイン
4,3,【夕暮】リケ
5,3,【花冠】ネロ
6,4,【雪原】ミスラ
7,1,【見習い】ミチル
400,4,【新作】フィガロ
";

const SOLUTIONS: &str = r#"[
    {"quad": [1, 2, 3, 4], "support_set": [5, 6], "tags": "magic,physical", "colors": ["red", "blue"]},
    {"quad": [1, 2, 3, 400], "support_set": [7]},
    {"quad": [1, 2], "support_set": [5]}
]"#;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

struct Data {
    catalog: NamedTempFile,
    solutions: NamedTempFile,
}

impl Data {
    fn new() -> Self {
        Self {
            catalog: write_temp(CATALOG),
            solutions: write_temp(SOLUTIONS),
        }
    }

    fn match_cmd(&self, ids: &str) -> Command {
        let mut cmd = Command::cargo_bin("deck-solver").unwrap();
        cmd.arg("match")
            .arg(ids)
            .arg("--catalog")
            .arg(self.catalog.path())
            .arg("--solutions")
            .arg(self.solutions.path());
        cmd
    }
}

#[test]
fn test_strict_match_text_output() {
    let data = Data::new();
    data.match_cmd("1, 2, 3, 5")
        .assert()
        .success()
        .stdout(predicate::str::contains("#1 strong (3/4 core cards owned)"))
        .stdout(predicate::str::contains("月夜 / Oz"))
        .stdout(predicate::str::contains("Colors: red,blue"))
        // Unowned core card is flagged
        .stdout(predicate::str::is_match(r"\*\s+4\s+SR").unwrap());
}

#[test]
fn test_inserted_card_uses_external_id() {
    let data = Data::new();
    // External 381 is internal 400
    data.match_cmd("1,2,3,381")
        .arg("--format")
        .arg("tsv")
        .assert()
        .success()
        .stdout(predicate::str::contains("borrow\t4\t1,2,3,381\t7"));
}

#[test]
fn test_json_output() {
    let data = Data::new();
    let output = data
        .match_cmd("1,2,3,4,5")
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["generated_at"].is_string());
    assert_eq!(json["skipped_solutions"], 1);
    assert_eq!(json["result"]["pass"], "strict");
    assert_eq!(json["result"]["matches"][0]["tier"], "strong");
    assert_eq!(
        json["result"]["matches"][0]["quad"][0]["image"],
        "https://raw.githubusercontent.com/a1sareru/shoot300k/refs/heads/main/public/images/card_icons/Card_icon_1.png"
    );
    assert_eq!(json["result"]["matches"][0]["support"][0]["id"], 5);
}

#[test]
fn test_relaxed_fallback() {
    let data = Data::new();
    data.match_cmd("1,5")
        .assert()
        .success()
        .stdout(predicate::str::contains("showing relaxed matches"))
        .stdout(predicate::str::contains("relaxed-strong"));

    data.match_cmd("1,5")
        .arg("--no-relax")
        .assert()
        .success()
        .stdout(predicate::str::contains("No deck can be built"));
}

#[test]
fn test_near_miss_mode() {
    let data = Data::new();
    // 1,2,3,4 with support 5 is buildable and left out; 1,2,3,381 lacks one card
    data.match_cmd("1,2,3,4,5")
        .args(["--near-miss", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1\tnear-miss\tnear-borrow\t3\t1,2,3,381\t7"))
        .stdout(predicate::str::contains("1,2,3,4\t").not());
}

#[test]
fn test_low_rarity_cards_ignored() {
    let data = Data::new();
    // Card 7 is N rarity, so the support set of the second solution is never owned
    data.match_cmd("1,2,3,381,7")
        .args(["--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("borrow\t4\t1,2,3,381\t7\t7"));
}

#[test]
fn test_icon_base_option() {
    let data = Data::new();
    data.match_cmd("1,2,3,5")
        .args(["--format", "json", "--icon-base", "icons/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"image\": \"icons/Card_icon_1.png\""));
}

#[test]
fn test_invalid_input_rejected() {
    let data = Data::new();
    data.match_cmd("1,,2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid card IDs"));

    data.match_cmd("abc")
        .assert()
        .failure()
        .stderr(predicate::str::contains("comma-separated"));
}

#[test]
fn test_missing_data_file_fails() {
    Command::cargo_bin("deck-solver")
        .unwrap()
        .args([
            "match",
            "1,2",
            "--catalog",
            "/nonexistent/cards.csv",
            "--solutions",
            "/nonexistent/solutions.json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Calculation failed"));
}

#[test]
fn test_threshold_range_validated() {
    let data = Data::new();
    data.match_cmd("1,2").args(["--strong-min", "5"]).assert().failure();
}

#[test]
fn test_limit() {
    let data = Data::new();
    data.match_cmd("1,2,3,4,5,381,6")
        .args(["--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#1 "))
        .stdout(predicate::str::contains("#2 ").not())
        .stdout(predicate::str::contains("1 more matches"));
}

#[test]
fn test_cards_listing_and_selection() {
    let catalog = write_temp(CATALOG);
    Command::cargo_bin("deck-solver")
        .unwrap()
        .arg("cards")
        .arg("--catalog")
        .arg(catalog.path())
        .args(["--high-rarity-only", "--select", "381", "--select-all-sr"])
        .assert()
        .success()
        .stdout(predicate::str::contains("7 SR/SSR cards"))
        .stdout(predicate::str::contains("見習い").not())
        .stdout(predicate::str::contains("Selected (4): 2,4,5,381"));
}

#[test]
fn test_cards_json() {
    let catalog = write_temp(CATALOG);
    let output = Command::cargo_bin("deck-solver")
        .unwrap()
        .arg("cards")
        .arg("--catalog")
        .arg(catalog.path())
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let cards = json["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 8);
    // Newest first, in player-facing numbering
    assert_eq!(cards[0]["id"], 381);
    assert_eq!(cards[0]["character"], "Figaro");
    assert_eq!(json["selected"], "");
}
