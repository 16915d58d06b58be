//! CLI driver end-to-end tests, grounded on `Luvion1-Fax/faxc`'s
//! `assert_cmd` + `tempfile` CLI test style.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn lc3_assembler() -> Command {
    Command::cargo_bin("lc3-assembler").unwrap()
}

#[test]
fn assembles_a_file_and_writes_the_object_image() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("hello.asm");
    fs::write(&input, ".ORIG x3000\nHALT\n.END").unwrap();

    lc3_assembler().arg(&input).assert().success();

    let output = dir.path().join("hello-assembled.obj");
    let bytes = fs::read(&output).expect("expected an assembled object file");
    assert_eq!(bytes, vec![0x30, 0x00, 0xF0, 0x25]);
}

#[test]
fn reports_a_diagnostic_and_exits_nonzero_on_bad_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.asm");
    fs::write(&input, ".ORIG x3000\nADD R0, R0, #99\n.END").unwrap();

    lc3_assembler()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));

    assert!(!dir.path().join("bad-assembled.obj").exists());
}

#[test]
fn missing_input_file_fails_without_panicking() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("does-not-exist.asm");

    lc3_assembler()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read input"));
}

#[test]
fn assembles_multiple_inputs_in_one_invocation() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a.asm");
    let second = dir.path().join("b.asm");
    fs::write(&first, ".ORIG x3000\nHALT\n.END").unwrap();
    fs::write(&second, ".ORIG x3000\nRTI\n.END").unwrap();

    lc3_assembler().arg(&first).arg(&second).assert().success();

    assert!(dir.path().join("a-assembled.obj").exists());
    assert!(dir.path().join("b-assembled.obj").exists());
}
