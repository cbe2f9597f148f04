//! CLI integration tests for meshkey-cli.
//!
//! These tests verify the CLI behavior by running the actual binary
//! and checking outputs, exit codes, and file artifacts.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a Command for the meshkey binary.
fn meshkey() -> Command {
    Command::cargo_bin("meshkey").unwrap()
}

/// Write a minimal valid glTF fixture carrying `key` and return its path.
fn write_fixture(dir: &TempDir, key: u64) -> std::path::PathBuf {
    let path = dir.path().join("model.gltf");
    let document = serde_json::json!({
        "asset": { "version": "2.0" },
        "accessors": [
            {
                "componentType": 5126,
                "count": key,
                "max": [1.234567, 2.345678, 3.456789],
                "min": [-1.000001, -2.000002, -3.000003],
                "type": "VEC3"
            },
            { "componentType": 5125, "count": key, "type": "SCALAR" },
            { "componentType": 5126, "count": key, "type": "VEC2" }
        ]
    });
    fs::write(&path, serde_json::to_string(&document).unwrap()).unwrap();
    path
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_displays_usage() {
    meshkey()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Steganographic key embedding for glTF assets",
        ))
        .stdout(predicate::str::contains("encode"))
        .stdout(predicate::str::contains("decode"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_version_displays_version() {
    meshkey()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("meshkey"));
}

#[test]
fn test_encode_help_shows_options() {
    meshkey()
        .args(["encode", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--uid"))
        .stdout(predicate::str::contains("--validity"))
        .stdout(predicate::str::contains("--sequence-len"));
}

// ============================================================================
// End-to-End Workflow Tests
// ============================================================================

#[test]
fn test_encode_then_decode_recovers_key() {
    let temp = TempDir::new().unwrap();
    let model = write_fixture(&temp, 42);

    meshkey()
        .args([
            "encode",
            model.to_str().unwrap(),
            "--uid",
            "123456789",
            "--validity",
            "300",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Key hidden, token issued!"));

    let encoded = temp.path().join("model_encoded.gltf");
    let token_file = temp.path().join("model_token.txt");
    assert!(encoded.exists(), "encoded document must be written");
    assert!(token_file.exists(), "token file must be written");

    let token = fs::read_to_string(&token_file).unwrap();
    assert_eq!(token.len(), 96);
    assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));

    // The encoded document must not carry the key in plain form.
    let scrubbed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&encoded).unwrap()).unwrap();
    for index in 0..3 {
        assert_eq!(scrubbed["accessors"][index]["count"], 1);
    }

    // Token file is discovered automatically next to the encoded document.
    meshkey()
        .args(["decode", encoded.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Key recovered!"))
        .stdout(predicate::str::contains("42"))
        .stdout(predicate::str::contains("123456789"));

    let decoded = temp.path().join("model_decoded.gltf");
    let restored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&decoded).unwrap()).unwrap();
    for index in 0..3 {
        assert_eq!(restored["accessors"][index]["count"], 42);
    }
}

#[test]
fn test_inspect_reports_token_fields() {
    let temp = TempDir::new().unwrap();
    let model = write_fixture(&temp, 42);

    meshkey()
        .args([
            "encode",
            model.to_str().unwrap(),
            "--uid",
            "77",
            "--validity",
            "600",
            "--quiet",
        ])
        .assert()
        .success();

    let token_file = temp.path().join("model_token.txt");
    meshkey()
        .args(["inspect", token_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("77"))
        .stdout(predicate::str::contains("600"));
}

#[test]
fn test_quiet_suppresses_output() {
    let temp = TempDir::new().unwrap();
    let model = write_fixture(&temp, 42);

    meshkey()
        .args(["encode", model.to_str().unwrap(), "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

// ============================================================================
// Exit Code Tests
// ============================================================================

#[test]
fn test_missing_file_returns_input_error() {
    // Exit code 66 = EX_NOINPUT
    meshkey()
        .args(["encode", "nonexistent_model.gltf"])
        .assert()
        .code(66)
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_malformed_token_returns_data_error() {
    let temp = TempDir::new().unwrap();
    let model = write_fixture(&temp, 42);

    meshkey()
        .args(["encode", model.to_str().unwrap(), "--quiet"])
        .assert()
        .success();

    let encoded = temp.path().join("model_encoded.gltf");

    // Exit code 65 = EX_DATAERR
    meshkey()
        .args([
            "decode",
            encoded.to_str().unwrap(),
            "--token",
            "not-a-real-token",
        ])
        .assert()
        .code(65)
        .stderr(predicate::str::contains("malformed token"));
}

#[test]
fn test_low_precision_document_returns_data_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("flat.gltf");
    let document = serde_json::json!({
        "accessors": [
            { "count": 42, "max": [1.5, 2.5, 3.5], "min": [-1.5, -2.5, -3.5] },
            { "count": 42 },
            { "count": 42 }
        ]
    });
    fs::write(&path, serde_json::to_string(&document).unwrap()).unwrap();

    meshkey()
        .args(["encode", path.to_str().unwrap()])
        .assert()
        .code(65)
        .stderr(predicate::str::contains("unsupported document"));
}

#[test]
fn test_sequence_len_bounds_are_enforced() {
    let temp = TempDir::new().unwrap();
    let model = write_fixture(&temp, 42);

    meshkey()
        .args(["encode", model.to_str().unwrap(), "--sequence-len", "11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sequence length"));

    meshkey()
        .args(["encode", model.to_str().unwrap(), "--sequence-len", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sequence length"));
}
