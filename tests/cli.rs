use assert_cmd::Command;
use predicates::prelude::*;

/// Each test gets its own HOME so settings and data never leak between
/// runs (settings live under ~/.config/extrato).
fn extrato(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("extrato").unwrap();
    cmd.env("HOME", home);
    cmd
}

fn setup(home: &std::path::Path) -> std::path::PathBuf {
    let data_dir = home.join("extrato-data");
    extrato(home)
        .args(["init", "--data-dir", data_dir.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized extrato"));
    data_dir
}

const SAMPLE_EXTRACT: &str = r#"{
    "bank": "Nubank",
    "document": "fatura-2024-03.pdf",
    "transactions": [
        {"direction": "SAIDA", "date": "05/03/24", "description": "MERCADO LIVRE", "amount": 120.5},
        {"direction": "SAIDA", "date": "02/03/24", "description": "UBER TRIP", "amount": 34.9},
        {"direction": "ENTRADA", "date": "01/03/24", "description": "PIX RECEBIDO", "amount": 1500.0}
    ]
}"#;

#[test]
fn test_init_banks_and_status() {
    let home = tempfile::tempdir().unwrap();
    setup(home.path());

    extrato(home.path())
        .args(["banks", "add", "Nubank"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added bank: Nubank"));

    extrato(home.path())
        .args(["banks", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nubank"));

    extrato(home.path())
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Banks:         1"));
}

#[test]
fn test_second_principal_person_conflicts() {
    let home = tempfile::tempdir().unwrap();
    setup(home.path());

    extrato(home.path())
        .args(["people", "add", "Ana", "--type", "Principal"])
        .assert()
        .success();

    extrato(home.path())
        .args(["people", "add", "Bruno", "--type", "Principal"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("principal person already exists"));
}

#[test]
fn test_ingest_is_idempotent() {
    let home = tempfile::tempdir().unwrap();
    setup(home.path());

    let extract_path = home.path().join("extract.json");
    std::fs::write(&extract_path, SAMPLE_EXTRACT).unwrap();

    extrato(home.path())
        .args(["ingest", extract_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 transactions stored for Nubank"));

    extrato(home.path())
        .args(["ingest", extract_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already ingested"));

    // Still exactly one extract stored.
    extrato(home.path())
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracts:      1"));
}

#[test]
fn test_rules_drive_classification() {
    let home = tempfile::tempdir().unwrap();
    setup(home.path());

    let extract_path = home.path().join("extract.json");
    std::fs::write(&extract_path, SAMPLE_EXTRACT).unwrap();
    extrato(home.path())
        .args(["ingest", extract_path.to_str().unwrap()])
        .assert()
        .success();

    extrato(home.path())
        .args(["rules", "add", "--includes", "UBER", "--meaning", "corrida"])
        .assert()
        .success();

    extrato(home.path())
        .args(["classify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 classified, 2 still unmatched"));

    extrato(home.path())
        .args(["report", "extracts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("corrida"));
}

#[test]
fn test_monthly_report_buckets() {
    let home = tempfile::tempdir().unwrap();
    setup(home.path());

    let extract_path = home.path().join("extract.json");
    std::fs::write(&extract_path, SAMPLE_EXTRACT).unwrap();
    extrato(home.path())
        .args(["ingest", extract_path.to_str().unwrap()])
        .assert()
        .success();

    extrato(home.path())
        .args(["report", "monthly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-03"));
}

#[test]
fn test_bank_cascade_delete() {
    let home = tempfile::tempdir().unwrap();
    setup(home.path());

    let extract_path = home.path().join("extract.json");
    std::fs::write(&extract_path, SAMPLE_EXTRACT).unwrap();
    extrato(home.path())
        .args(["ingest", extract_path.to_str().unwrap()])
        .assert()
        .success();

    // Find the auto-registered bank's id via the list output.
    let output = extrato(home.path()).args(["banks", "list"]).output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let bank_id = stdout
        .lines()
        .find(|line| line.contains("Nubank"))
        .and_then(|line| line.split('|').nth(1))
        .map(|cell| cell.trim().to_string())
        .expect("bank row with id");

    extrato(home.path())
        .args(["banks", "delete", &bank_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("all of its extracts"));

    extrato(home.path())
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracts:      0"));
}

#[test]
fn test_unknown_rule_id_is_surfaced() {
    let home = tempfile::tempdir().unwrap();
    setup(home.path());

    extrato(home.path())
        .args(["rules", "delete", "no-such-rule"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Rule not found"));
}
