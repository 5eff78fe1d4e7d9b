//! End-to-end runs of the `pricemap` binary.

use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn pricemap() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_pricemap"));
    command.env_remove("RUST_LOG").env_remove("PRICEMAP_STANDARDS_DIR");
    command
}

#[test]
fn normalize_writes_output_next_to_input() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("prices.csv");
    fs::write(&input, "Art;Brand;RUB;Qty\nA1-123;SAMSUNG;1999.99;5\n").expect("write input");

    let output = pricemap()
        .arg("normalize")
        .arg(&input)
        .output()
        .expect("run pricemap");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let written = fs::read_to_string(dir.path().join("output/prices_normalized.csv"))
        .expect("normalized file");
    assert!(written.starts_with("Артикул;Бренд;Цена;Количество"));
}

#[test]
fn failed_file_sets_exit_code() {
    let dir = TempDir::new().expect("temp dir");
    let good = dir.path().join("Товары.csv");
    let bad = dir.path().join("broken.xlsx");
    fs::write(&good, "Наименование;Номер по каталогу\nФара;8K0941LR\n").expect("write good");
    fs::write(&bad, b"not a workbook").expect("write bad");
    let report = dir.path().join("report.json");

    let output = pricemap()
        .arg("multiplicity")
        .arg(&good)
        .arg(&bad)
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .arg("--report")
        .arg(&report)
        .output()
        .expect("run pricemap");
    assert_eq!(output.status.code(), Some(1));
    assert!(dir.path().join("out/Товары_кратность.csv").exists());
    assert!(!dir.path().join("out/broken_кратность.xlsx").exists());

    let reports: serde_json::Value =
        serde_json::from_slice(&fs::read(&report).expect("report written")).expect("json");
    assert_eq!(reports[0]["failure"], serde_json::Value::Null);
    assert_eq!(reports[1]["failure"]["kind"], "unreadable_input");
}

#[test]
fn schemas_lists_configured_suppliers() {
    let output = pricemap().arg("schemas").output().expect("run pricemap");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("generic (default)"));
    assert!(stdout.contains("moskvorechie_vip"));
}

#[test]
fn unknown_forced_schema_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("prices.csv");
    fs::write(&input, "Art;Brand\nA1;B\n").expect("write input");
    let output = pricemap()
        .args(["normalize", "--schema", "nobody"])
        .arg(&input)
        .output()
        .expect("run pricemap");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: unknown supplier schema: nobody"), "{stderr}");
}

#[test]
fn missing_input_does_not_stop_the_batch() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("gone.csv");
    let good = dir.path().join("Товары.csv");
    fs::write(&good, "Наименование;Номер по каталогу\nФара;8K0941LR\n").expect("write good");
    let report = dir.path().join("report.json");

    let output = pricemap()
        .arg("multiplicity")
        .arg(&missing)
        .arg(&good)
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .arg("--report")
        .arg(&report)
        .output()
        .expect("run pricemap");
    assert_eq!(output.status.code(), Some(1));
    assert!(dir.path().join("out/Товары_кратность.csv").exists());

    let reports: serde_json::Value =
        serde_json::from_slice(&fs::read(&report).expect("report written")).expect("json");
    assert_eq!(reports[0]["file_name"], "gone.csv");
    assert_eq!(reports[0]["failure"]["kind"], "unreadable_input");
    assert_eq!(reports[1]["failure"], serde_json::Value::Null);
}
