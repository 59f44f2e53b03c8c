use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*; // Used for writing assertions
use std::fs;
use std::process::Command; // Run programs

const SOURCE: &str = "* sample macros
MACRO
INCR &REG=1,&DEST
ADD &DEST &REG
MEND
MACRO
CLEAR &X &MODE=FAST
LOAD &X &OTHER
MEND
";

#[test]
fn writes_tables() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let src = dir.path().join("macros.asm");
    fs::write(&src, SOURCE)?;

    let mut cmd = Command::cargo_bin("macropass")?;
    cmd.arg(&src)
        .arg("-o")
        .arg(dir.path())
        .env("RUST_LOG", "info")
        .assert()
        .success()
        .stderr(predicate::str::contains("2 macros, 4 body lines, 1 warnings"));

    let mntab = fs::read_to_string(dir.path().join("mntab.json"))?;
    assert!(mntab.contains("\"CLEAR\""));
    let tables = macropass::emit::load_tables(dir.path())?;
    let clear = tables.find("CLEAR").ok_or("CLEAR missing")?;
    assert_eq!((clear.body_start, clear.kpd_start), (2, 1));
    assert_eq!(clear.body_len, 2);
    Ok(())
}

#[test]
fn quiet_by_default() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let src = dir.path().join("macros.asm");
    fs::write(&src, SOURCE)?;

    let mut cmd = Command::cargo_bin("macropass")?;
    cmd.arg(&src)
        .arg("-o")
        .arg(dir.path())
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("body lines").not());
    Ok(())
}

#[test]
fn prints_listing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let src = dir.path().join("macros.asm");
    fs::write(&src, SOURCE)?;

    let mut cmd = Command::cargo_bin("macropass")?;
    cmd.arg(&src)
        .arg("--out-dir")
        .arg(dir.path())
        .arg("--print")
        .assert()
        .success()
        .stdout(predicate::str::contains("INCR 1 1 0 0"))
        .stdout(predicate::str::contains("&MODE FAST"))
        .stdout(predicate::str::contains("&OTHER(?)"));
    Ok(())
}

#[test]
fn strict_rejects_stray_line() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let src = dir.path().join("macros.asm");
    fs::write(&src, format!("{SOURCE}START\n"))?;

    let mut cmd = Command::cargo_bin("macropass")?;
    cmd.arg(&src)
        .arg("-o")
        .arg(dir.path())
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("START"));
    assert!(!dir.path().join("mntab.json").exists());
    Ok(())
}

#[test]
fn missing_source() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut cmd = Command::cargo_bin("macropass")?;
    cmd.arg(dir.path().join("absent.asm"))
        .arg("-o")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
    Ok(())
}
