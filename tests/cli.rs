#![forbid(unsafe_code)]
//! Fumée de bout en bout sur le binaire.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli(data: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("cuadrante-cli").unwrap();
    cmd.arg("--data").arg(data);
    cmd
}

#[test]
fn import_then_generate_full_coverage() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("cuadrante.json");
    let people = dir.path().join("people.csv");
    std::fs::write(
        &people,
        "id,name,role,category\n1,Ana,driver,plant\n2,Luz,driver,plant\n",
    )
    .unwrap();

    cli(&data)
        .arg("import-people")
        .arg("--csv")
        .arg(&people)
        .assert()
        .success();

    // aucune route au catalogue : couverture triviale, code 0
    cli(&data)
        .arg("generate")
        .arg("--year")
        .arg("2025")
        .arg("--month")
        .arg("11")
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: full coverage"));
}

#[test]
fn generate_with_gaps_exits_with_code_2() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("cuadrante.json");
    let people = dir.path().join("people.csv");
    let routes = dir.path().join("routes.json");
    std::fs::write(&people, "id,name,role,category\n1,Ana,driver,plant\n").unwrap();
    std::fs::write(
        &routes,
        r#"[{"short_code":"R1","assignment_mode":"default"},{"short_code":"R2","assignment_mode":"default"}]"#,
    )
    .unwrap();

    cli(&data)
        .arg("import-people")
        .arg("--csv")
        .arg(&people)
        .assert()
        .success();
    cli(&data)
        .arg("import-routes")
        .arg("--json")
        .arg(&routes)
        .assert()
        .success();

    // une seule personne pour deux routes : jours à trous, code 2
    cli(&data)
        .arg("generate")
        .arg("--year")
        .arg("2025")
        .arg("--month")
        .arg("11")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no driver for"));
}

#[test]
fn invalid_month_is_rejected() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("cuadrante.json");
    cli(&data)
        .arg("generate")
        .arg("--year")
        .arg("2025")
        .arg("--month")
        .arg("13")
        .assert()
        .failure()
        .stderr(predicate::str::contains("month must be 1-12"));
}
