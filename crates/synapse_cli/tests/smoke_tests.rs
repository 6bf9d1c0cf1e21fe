//! CLI smoke tests: spawn the real binary and check basic behavior.

use std::process::Command;

fn cli_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_synapse"))
}

#[test]
fn test_help_flag() {
    let output = cli_bin().arg("--help").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Usage"),
        "Expected usage info in --help output"
    );
}

#[test]
fn test_version_flag() {
    let output = cli_bin().arg("--version").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("synapse"),
        "Expected crate name in --version output"
    );
}

#[test]
fn test_register_and_list_brains() {
    let dir = tempfile::TempDir::new().unwrap();
    let corpus = dir.path().join("corpus");
    std::fs::create_dir_all(&corpus).unwrap();
    std::fs::write(corpus.join("a.md"), "alpha").unwrap();
    let registry_dir = dir.path().join("registries");

    let output = cli_bin()
        .env("SYNAPSE_REGISTRY_DIR", &registry_dir)
        .args(["register", "smoke_brain"])
        .arg(&corpus)
        .output()
        .expect("failed to run");
    assert!(
        output.status.success(),
        "register failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let output = cli_bin()
        .env("SYNAPSE_REGISTRY_DIR", &registry_dir)
        .arg("brains")
        .output()
        .expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("smoke_brain"), "{}", stdout);
}

#[test]
fn test_query_unknown_brain_names_it() {
    let dir = tempfile::TempDir::new().unwrap();
    let output = cli_bin()
        .env("SYNAPSE_REGISTRY_DIR", dir.path().join("registries"))
        .env("SYNAPSE_LLM_PROVIDER", "mock")
        .args(["query", "ghost_brain", "anything"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ghost_brain"), "{}", stderr);
}
