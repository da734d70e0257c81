use assert_cmd::Command;
use predicates::prelude::*;

fn write_sample_catalog(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("books.json");
    let books = serde_json::json!([
        {"id": "a", "t": "Marea", "a": ["X"], "pg": 200, "m": "ligero", "v": ["aventura"], "ac": 5},
        {"id": "b", "t": "Umbral", "a": ["Y"], "pg": 500, "m": "oscuro", "v": ["thriller"], "ac": 8},
        {"id": "c", "t": "Faro", "a": ["X"], "pg": 300, "m": "ligero", "v": ["aventura"], "ac": 5},
    ]);
    std::fs::write(&path, serde_json::to_string_pretty(&books).expect("json")).expect("write");
    path
}

#[test]
fn steps_prints_the_question_catalog() {
    let mut cmd = Command::cargo_bin("nextread").expect("binary");
    cmd.arg("steps")
        .assert()
        .success()
        .stdout(predicate::str::contains("motivacion"))
        .stdout(predicate::str::contains("¿Cuánto tiempo quieres invertir?"));
}

#[test]
fn recommend_prints_the_shortlist_in_rank_order() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let books = write_sample_catalog(&dir);

    let mut cmd = Command::cargo_bin("nextread").expect("binary");
    cmd.arg("recommend")
        .arg("--books")
        .arg(&books)
        .args(["--answer", "motivacion=placer"])
        .args(["--answer", "estado=curioso"])
        .args(["--answer", "experiencia=espejo"])
        .args(["--answer", "factor=emotivo"])
        .args(["--answer", "formato=cualquiera"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Perfil lector"))
        .stdout(predicate::str::is_match("(?s)Marea.*Faro.*Umbral").expect("regex"))
        .stdout(predicate::str::contains("puntos: 70"));
}

#[test]
fn recommend_requires_an_answer_for_every_step() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let books = write_sample_catalog(&dir);

    let mut cmd = Command::cargo_bin("nextread").expect("binary");
    cmd.arg("recommend")
        .arg("--books")
        .arg(&books)
        .args(["--answer", "motivacion=placer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing --answer"));
}

#[test]
fn stats_reports_collection_totals() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let books = write_sample_catalog(&dir);

    let mut cmd = Command::cargo_bin("nextread").expect("binary");
    cmd.arg("stats")
        .arg("--books")
        .arg(&books)
        .assert()
        .success()
        .stdout(predicate::str::contains("Libros: 3"))
        .stdout(predicate::str::contains("Páginas: 1000"));
}

#[test]
fn lists_set_show_round_trip() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let data_dir = dir.path().to_string_lossy().to_string();

    let mut cmd = Command::cargo_bin("nextread").expect("binary");
    cmd.args(["lists", "set", "--data-dir", &data_dir, "--book", "a", "--list", "want"])
        .assert()
        .success();

    let mut cmd = Command::cargo_bin("nextread").expect("binary");
    cmd.args(["lists", "show", "--data-dir", &data_dir])
        .assert()
        .success()
        .stdout(predicate::str::contains("Quiero leer (1)"))
        .stdout(predicate::str::contains("Total: 1"));
}
