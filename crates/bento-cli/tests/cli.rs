//! Command-line behaviour against a throwaway data directory.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const KBANK_SLIP: &str = "โอนเงินสำเร็จ\n\
    12 ม.ค. 67 10:30 น.\n\
    นาย สมชาย ใจดี\n\
    ธ.กสิกรไทย\n\
    xxx-x-x1234-x\n\
    ร้านข้าวมันไก่ 0123\n\
    ธ.ไทยพาณิชย์\n\
    xxx-x-x5678-x\n\
    จำนวน: 60.00 บาท\n\
    ค่าธรรมเนียม: 0.00 บาท\n\
    เลขที่รายการ: 015012103045ATF07321";

/// `bento` isolated from the user's config and data directories.
fn bento(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bento").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("share"))
        .arg("--data-dir")
        .arg(home.path().join("data"));
    cmd
}

fn ledger_ids(home: &TempDir) -> Vec<String> {
    let content = fs::read_to_string(home.path().join("data").join("ledger.json")).unwrap();
    let ledger: serde_json::Value = serde_json::from_str(&content).unwrap();
    ledger
        .as_array()
        .unwrap()
        .iter()
        .map(|tx| tx["id"].as_str().unwrap().to_string())
        .collect()
}

fn write_slip(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path.display().to_string()
}

#[test]
fn test_parse_json_output() {
    let home = TempDir::new().unwrap();

    bento(&home)
        .args(["parse", "--format", "json", "ก๋วยเตี๋ยว 50 บาท"])
        .assert()
        .success()
        .stdout(predicate::str::contains("อาหาร"))
        .stdout(predicate::str::contains("ก๋วยเตี๋ยว"));
}

#[test]
fn test_parse_without_amount_is_not_understood() {
    let home = TempDir::new().unwrap();

    bento(&home)
        .args(["parse", "สวัสดีครับ"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ไม่เข้าใจ"));
}

#[test]
fn test_parse_save_records_income() {
    let home = TempDir::new().unwrap();

    bento(&home)
        .args(["parse", "--save", "เงินเดือนเข้า", "30,000"])
        .assert()
        .success()
        .stderr(predicate::str::contains("บันทึกรายรับ 30,000 บาท"));

    bento(&home)
        .args(["ledger", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions: 1"))
        .stdout(predicate::str::contains("+30,000 บาท"));
}

#[test]
fn test_scan_text_slips_and_flag_duplicates() {
    let home = TempDir::new().unwrap();
    let slip = write_slip(home.path(), "kbank.txt", KBANK_SLIP);

    bento(&home)
        .args(["scan", "--save", "--format", "csv", &slip])
        .assert()
        .success()
        .stdout(predicate::str::contains("ร้านข้าวมันไก่"))
        .stdout(predicate::str::contains("015012103045ATF07321"))
        .stdout(predicate::str::contains("60.00"));
    assert_eq!(ledger_ids(&home).len(), 1);

    bento(&home)
        .args(["scan", "--format", "json", &slip])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"possible_duplicate\": true"))
        .stdout(predicate::str::contains("⚠️ อาจซ้ำ"));

    bento(&home)
        .args(["ledger", "list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ร้านข้าวมันไก่"));
}

#[test]
fn test_scan_glob_writes_summary() {
    let home = TempDir::new().unwrap();
    write_slip(home.path(), "a.txt", KBANK_SLIP);
    write_slip(home.path(), "b.txt", "ซื้อของ\nยอดรวม 120.00 บาท");
    write_slip(home.path(), "notes.md", "ยอดรวม 999.00 บาท");
    let pattern = home.path().join("*").display().to_string();
    let summary = home.path().join("summary.csv");

    bento(&home)
        .args(["scan", &pattern, "--summary"])
        .arg(&summary)
        .assert()
        .success()
        .stderr(predicate::str::contains("Found 2 file(s)"));

    let csv = fs::read_to_string(&summary).unwrap();
    assert!(csv.starts_with("filename,status,layout,bank"));
    assert!(csv.contains("a.txt,success,single,กสิกรไทย"));
    assert!(csv.contains("b.txt,success"));
    assert!(!csv.contains("notes.md"));
}

#[test]
fn test_scan_continues_past_unreadable_matches() {
    let home = TempDir::new().unwrap();
    let slips = home.path().join("slips");
    fs::create_dir(&slips).unwrap();
    write_slip(&slips, "a.txt", "ซื้อของ\nยอดรวม 120.00 บาท");
    fs::create_dir(slips.join("b.txt")).unwrap();
    fs::write(slips.join("c.txt"), [0xff, 0xfe, 0x00, 0xd8]).unwrap();
    write_slip(&slips, "d.txt", "ก๋วยเตี๋ยว\nยอดรวม 50.00 บาท");
    let pattern = slips.join("*.txt").display().to_string();

    bento(&home)
        .args(["scan", "--format", "csv", &pattern])
        .assert()
        .success()
        .stdout(predicate::str::contains("120.00"))
        .stdout(predicate::str::contains("50.00"))
        .stdout(predicate::str::contains("❌ อ่านสลิป #2 ไม่สำเร็จ"))
        .stderr(predicate::str::contains("Found 3 file(s)"))
        .stderr(predicate::str::contains("1 failed"));
}

#[test]
fn test_unreadable_image_becomes_error_draft() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("bento.json");
    fs::write(&config, r#"{"ocr": {"command": "bento-test-missing-ocr"}}"#).unwrap();
    let image = home.path().join("slip.jpg");
    fs::write(&image, [0xff, 0xd8, 0xff, 0xe0]).unwrap();

    bento(&home)
        .arg("--config")
        .arg(&config)
        .arg("scan")
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::contains("❌ อ่านสลิป #1 ไม่สำเร็จ"))
        .stderr(predicate::str::contains("1 failed"));
}

#[test]
fn test_recategorize_learns_preference() {
    let home = TempDir::new().unwrap();
    let slip = write_slip(home.path(), "kbank.txt", KBANK_SLIP);

    bento(&home)
        .args(["scan", "--save", &slip])
        .assert()
        .success();
    let id = ledger_ids(&home).remove(0);

    bento(&home)
        .args(["recategorize", &id, "บันเทิง"])
        .assert()
        .success()
        .stdout(predicate::str::contains("อาหาร -> บันเทิง"));

    bento(&home)
        .args(["prefs", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ร้านข้าวมันไก่\tบันเทิง"));

    bento(&home)
        .args(["scan", "--format", "json", &slip])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"category\": \"บันเทิง\""));
}

#[test]
fn test_recategorize_rejects_unknown_category() {
    let home = TempDir::new().unwrap();

    bento(&home)
        .args(["parse", "--save", "ข้าว", "50"])
        .assert()
        .success();
    let id = ledger_ids(&home).remove(0);

    bento(&home)
        .args(["recategorize", &id, "ไม่มีหมวดนี้"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category"));
}

#[test]
fn test_config_init_set_get() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("custom.json");

    bento(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"));

    bento(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();

    bento(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "ocr.languages", "tha"])
        .assert()
        .success();

    bento(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "ocr.languages"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"tha\""));
}
