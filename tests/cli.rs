use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const ORDERS_CSV: &str = "Id,Name,Total\n1,Ada,12.5\n2,Grace,\n3,\"Hopper, Grace\",7\n";

fn blobtab() -> Command {
    Command::cargo_bin("blobtab").unwrap()
}

fn write_orders(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("orders.csv");
    fs::write(&path, ORDERS_CSV).unwrap();
    path
}

#[test]
fn export_then_import_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_orders(dir.path());
    let root = dir.path().join("store");

    blobtab()
        .arg("export")
        .arg(&input)
        .arg("--connection")
        .arg(format!("Root={}", root.display()))
        .args(["--container", "exports", "--blob", "orders.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 rows"));

    let payload = fs::read_to_string(root.join("exports").join("orders.json")).unwrap();
    assert!(payload.starts_with("{\"NewDataSet\":{\"orders\":["));

    blobtab()
        .arg("import")
        .arg("--connection")
        .arg(&root)
        .args(["--container", "exports", "--blob", "orders.json"])
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout("Id,Name,Total\n1,Ada,12.5\n2,Grace,\n3,\"Hopper, Grace\",7\n");
}

#[test]
fn import_merges_repeated_blobs() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_orders(dir.path());
    let root = dir.path().join("store");

    for blob in ["a.xml", "b.xml"] {
        blobtab()
            .arg("export")
            .arg(&input)
            .arg("--connection")
            .arg(&root)
            .args(["--container", "c", "--blob", blob, "--message-type", "xml"])
            .assert()
            .success();
    }

    blobtab()
        .arg("import")
        .arg("--connection")
        .arg(&root)
        .args(["--container", "c", "--message-type", "XML"])
        .args(["--blob", "a.xml", "--blob", "b.xml"])
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Id\": \"3\"").count(2));
}

#[test]
fn blank_container_fails_before_io() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_orders(dir.path());
    let root = dir.path().join("store");

    blobtab()
        .arg("export")
        .arg(&input)
        .arg("--connection")
        .arg(&root)
        .args(["--blob", "orders.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "The Container Name parameter is not specified",
        ));

    assert!(!root.exists());
}

#[test]
fn unknown_message_type_fails() {
    blobtab()
        .args(["import", "--connection", "/tmp", "--container", "c"])
        .args(["--blob", "b", "--message-type", "yaml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid Message Type"));
}

#[test]
fn preview_export_prints_document() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_orders(dir.path());

    blobtab()
        .arg("preview")
        .arg("--input")
        .arg(&input)
        .args(["--table", "Orders"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "<NewDataSet><Orders><Id>1</Id><Name>Ada</Name><Total>12.5</Total></Orders>",
        ));
}

#[test]
fn template_reshapes_export() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_orders(dir.path());
    let root = dir.path().join("store");
    let template = dir.path().join("ids.xml");
    fs::write(
        &template,
        "<Ids>{% for row in records %}<Id>{{ row.Id }}</Id>{% endfor %}</Ids>",
    )
    .unwrap();

    blobtab()
        .arg("export")
        .arg(&input)
        .arg("--connection")
        .arg(&root)
        .args(["--container", "c", "--blob", "ids.xml", "--message-type", "XML"])
        .arg("--template")
        .arg(&template)
        .assert()
        .success();

    let payload = fs::read_to_string(root.join("c").join("ids.xml")).unwrap();
    assert_eq!(payload, "<Ids><Id>1</Id><Id>2</Id><Id>3</Id></Ids>\n");
}
