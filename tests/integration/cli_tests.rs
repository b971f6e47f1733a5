//! Integration tests for the CLI binary.
//!
//! Drives the `iotc` binary end to end through its subcommands.
//!
//! This test is registered as a [[test]] in the iot-crypto-cli crate
//! so that CARGO_BIN_EXE_iotc is available.

use std::process::{Command, Output};

/// Get a Command pointing to the `iotc` binary.
fn iotc_binary() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_iotc"));
    cmd.env_remove("IOTC_PRIVATE_KEY")
        .env_remove("IOTC_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn run(args: &[&str]) -> Output {
    iotc_binary()
        .args(args)
        .output()
        .expect("failed to execute iotc")
}

/// Run and return trimmed stdout, failing on a non-zero exit.
fn run_ok(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "iotc {args:?} failed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn keygen() -> (String, String) {
    let stdout = run_ok(&["keygen", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("keygen emits JSON");
    (
        value["private_key"].as_str().unwrap().to_string(),
        value["public_key"].as_str().unwrap().to_string(),
    )
}

#[test]
fn cli_responds_to_help() {
    let stdout = run_ok(&["--help"]);
    assert!(
        stdout.contains("iotc") || stdout.contains("Usage"),
        "iotc --help output should contain usage information, got: {stdout}"
    );
}

#[test]
fn cli_responds_to_version() {
    let stdout = run_ok(&["--version"]);
    assert!(
        stdout.contains("0.1"),
        "iotc --version should contain version info, got: {stdout}"
    );
}

#[test]
fn cli_exits_with_error_on_unknown_flag() {
    let output = run(&["--nonexistent-flag"]);
    assert!(!output.status.success());
}

#[test]
fn keygen_plain_output() {
    let stdout = run_ok(&["keygen"]);
    let mut lines = stdout.lines();
    let private = lines.next().unwrap().strip_prefix("Private Key: ").unwrap();
    let public = lines.next().unwrap().strip_prefix("Public Key:  ").unwrap();
    assert_eq!(private.len(), 64);
    assert_eq!(public.len(), 130);
    assert!(public.starts_with("04"));
}

#[test]
fn pubkey_matches_keygen() {
    let (private_key, public_key) = keygen();
    assert_eq!(run_ok(&["pubkey", "--private-key", &private_key]), public_key);
}

#[test]
fn pubkey_reads_private_key_from_env() {
    let (private_key, public_key) = keygen();
    let output = iotc_binary()
        .arg("pubkey")
        .env("IOTC_PRIVATE_KEY", &private_key)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), public_key);
}

#[test]
fn sign_then_verify() {
    let (private_key, public_key) = keygen();
    let signature = run_ok(&["sign", "--private-key", &private_key, "--message", "test-message"]);

    let stdout = run_ok(&[
        "verify",
        "--signature",
        &signature,
        "--public-key",
        &public_key,
        "--message",
        "test-message",
    ]);
    assert_eq!(stdout, "Signature Valid: Yes");
}

#[test]
fn verify_fails_on_tampered_message() {
    let (private_key, public_key) = keygen();
    let signature = run_ok(&["sign", "--private-key", &private_key, "--message", "original"]);

    let output = run(&[
        "verify",
        "--json",
        "--signature",
        &signature,
        "--public-key",
        &public_key,
        "--message",
        "tampered",
    ]);
    assert!(!output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["valid"], false);
}

#[test]
fn verify_rejects_bad_public_key_as_usage_error() {
    let output = run(&[
        "verify",
        "--signature",
        "3006020101020101",
        "--public-key",
        "zz",
        "--message",
        "m",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--public-key"));
}

#[test]
fn sign_message_from_file() {
    let (private_key, public_key) = keygen();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reading.bin");
    std::fs::write(&path, [0x00u8, 0xff, 0x10, 0x80]).unwrap();
    let path = path.to_str().unwrap();

    let signature = run_ok(&["sign", "--private-key", &private_key, "--message-file", path]);
    run_ok(&[
        "verify",
        "--signature",
        &signature,
        "--public-key",
        &public_key,
        "--message-file",
        path,
    ]);
}

#[test]
fn sign_requires_a_message() {
    let (private_key, _) = keygen();
    let output = run(&["sign", "--private-key", &private_key]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing message"));
}

#[test]
fn agree_encrypt_decrypt_pipeline() {
    let (a_private, a_public) = keygen();
    let (b_private, b_public) = keygen();

    let k_ab = run_ok(&["agree", "--private-key", &a_private, "--peer-public-key", &b_public]);
    let k_ba = run_ok(&["agree", "--private-key", &b_private, "--peer-public-key", &a_public]);
    assert_eq!(k_ab, k_ba);
    assert_eq!(k_ab.len(), 64);

    let encrypted = run_ok(&["encrypt", "--key", &k_ab, "--plaintext", "payload"]);
    assert_eq!(encrypted.len(), (28 + 7) * 2);
    assert_eq!(
        run_ok(&["decrypt", "--key", &k_ba, "--payload", &encrypted]),
        "payload"
    );
}

#[test]
fn decrypt_with_wrong_key_fails() {
    let encrypted = run_ok(&["encrypt", "--key", "right-key", "--plaintext", "secret"]);
    let output = run(&["decrypt", "--key", "wrong-key", "--payload", &encrypted]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("decryption failed"));
}

#[test]
fn decrypt_writes_raw_bytes_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.bin");
    let output = dir.path().join("out.bin");
    let bytes = [0xc3u8, 0x28, 0x00, 0xfe];
    std::fs::write(&input, bytes).unwrap();

    let encrypted = run_ok(&[
        "encrypt",
        "--key",
        "k",
        "--plaintext-file",
        input.to_str().unwrap(),
    ]);
    run_ok(&[
        "decrypt",
        "--key",
        "k",
        "--payload",
        &encrypted,
        "--output",
        output.to_str().unwrap(),
    ]);
    assert_eq!(std::fs::read(&output).unwrap(), bytes);
}

#[test]
fn decrypt_non_utf8_to_stdout_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.bin");
    std::fs::write(&input, [0xc3u8, 0x28]).unwrap();

    let encrypted = run_ok(&[
        "encrypt",
        "--key",
        "k",
        "--plaintext-file",
        input.to_str().unwrap(),
    ]);
    let output = run(&["decrypt", "--key", "k", "--payload", &encrypted]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--output"));
}

#[test]
fn encrypt_key_from_env() {
    let output = iotc_binary()
        .args(["encrypt", "--plaintext", "hello"])
        .env("IOTC_KEY", "env-key")
        .output()
        .unwrap();
    assert!(output.status.success());
    let encrypted = String::from_utf8_lossy(&output.stdout).trim().to_string();
    assert_eq!(
        run_ok(&["decrypt", "--key", "env-key", "--payload", &encrypted]),
        "hello"
    );
}
