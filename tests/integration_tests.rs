use std::path::PathBuf;

use assert_cmd::Command;
use predicates::str::contains;

fn otto() -> Command {
    Command::cargo_bin("otto").unwrap()
}

fn tmp(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name)
}

#[test]
fn assembles_and_runs_add_program() {
    let bin = tmp("add.bin");

    otto()
        .arg("asm")
        .arg("tests/files/add.asm")
        .arg(&bin)
        .assert()
        .success()
        .stdout(contains("Saved"));

    assert_eq!(
        std::fs::read(&bin).unwrap(),
        [0x06, 0x05, 0x0E, 0x03, 0x81, 0x00]
    );

    otto()
        .arg("run")
        .arg(&bin)
        .arg("--speed")
        .arg("0")
        .assert()
        .success()
        .stdout(contains("Total cycles:  25"));
}

#[test]
fn run_reports_memory_dump() {
    let bin = tmp("countdown.bin");

    otto()
        .arg("asm")
        .arg("tests/files/countdown.asm")
        .arg(&bin)
        .arg("--dump")
        .assert()
        .success()
        .stdout(contains("Label: LOOP, address: $8002"));

    otto()
        .arg("run")
        .arg(&bin)
        .arg("--speed")
        .arg("0")
        .arg("--dump-addrs")
        .arg("4000,4001")
        .assert()
        .success()
        .stdout(contains("$4000: $0F"))
        .stdout(contains("$4001: $00"));
}

#[test]
fn assembly_failure_leaves_no_binary() {
    let bin = tmp("bad.bin");
    let _ = std::fs::remove_file(&bin);

    otto()
        .arg("asm")
        .arg("tests/files/bad.asm")
        .arg(&bin)
        .assert()
        .failure()
        .stderr(contains("unknown mnemonic"));

    assert!(!bin.exists(), "failed assembly must not write output");
}

#[test]
fn oversize_immediate_fails_assembly() {
    let bin = tmp("oversize.bin");
    let _ = std::fs::remove_file(&bin);
    let src = tmp("oversize.asm");
    std::fs::write(&src, "LHI #$1FF\nHLT\n").unwrap();

    otto()
        .arg("asm")
        .arg(&src)
        .arg(&bin)
        .assert()
        .failure()
        .stderr(contains("only loads 8 bits"));

    assert!(!bin.exists());
}

#[test]
fn scripted_debugger_session() {
    let bin = tmp("debug.bin");

    otto()
        .arg("asm")
        .arg("tests/files/add.asm")
        .arg(&bin)
        .assert()
        .success();

    otto()
        .arg("debug")
        .arg(&bin)
        .arg("--speed")
        .arg("0")
        .arg("--command")
        .arg(include_str!("commands/session"))
        .assert()
        .success()
        .stdout(contains("Breakpoint hit at $8004"))
        .stdout(contains("A:  $05"))
        .stdout(contains("B:  $03"))
        .stdout(contains("Program halted"))
        .stdout(contains("Disassembly at $8000"));
}

#[test]
fn run_config_file_supplies_defaults() {
    let bin = tmp("cfg.bin");
    let cfg = tmp("run.json");

    otto()
        .arg("asm")
        .arg("tests/files/add.asm")
        .arg(&bin)
        .assert()
        .success();

    std::fs::write(
        &cfg,
        r#"{"speed": 0, "memory_size": 65536, "dump_addrs": "8000-8002"}"#,
    )
    .unwrap();

    otto()
        .arg("run")
        .arg(&bin)
        .arg("--config")
        .arg(&cfg)
        .assert()
        .success()
        .stdout(contains("$8000: $06"));
}

#[test]
fn unknown_cpu_type_is_rejected() {
    otto()
        .arg("run")
        .arg("tests/files/add.asm")
        .arg("--cpu")
        .arg("6502")
        .assert()
        .failure()
        .stderr(contains("unsupported CPU type"));
}
