//! End-to-end tests of the `fletcher4sum` binary.
//!
//! Each test runs a fresh process, so backend selection and vector policy
//! can be exercised through flags and environment variables.

use assert_cmd::Command;
use fletcher::{Backend, Checksum};
use predicates::prelude::*;
use test_support::{
    byteswap_words, lcg_words, reference_fletcher4, temp_file_with, words_to_ne_bytes,
};

fn fletcher4sum() -> Command {
    let mut cmd = Command::cargo_bin("fletcher4sum").expect("binary is built");
    cmd.env_remove("FLETCHER4_IMPL")
        .env_remove("FLETCHER_DISABLE_SIMD")
        .env_remove("RUST_LOG");
    cmd
}

fn expected_line(words: &[u32], name: &str) -> String {
    format!("{}  {name}\n", Checksum::from(reference_fletcher4(words)))
}

#[test]
fn help_lists_options() {
    fletcher4sum()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--byteswap").and(predicate::str::contains("--impl")))
        .stderr(predicate::str::is_empty());
}

#[test]
fn stdin_is_read_without_operands() {
    fletcher4sum()
        .write_stdin(words_to_ne_bytes(&[1, 2, 3, 4]))
        .assert()
        .success()
        .stdout("a:14:23:38  -\n");
}

#[test]
fn files_are_reported_in_operand_order() {
    let first_words = lcg_words(4099, 0x5eed);
    let second_words = lcg_words(16, 7);
    let first = temp_file_with(&words_to_ne_bytes(&first_words)).expect("temp file");
    let second = temp_file_with(&words_to_ne_bytes(&second_words)).expect("temp file");
    let first_name = first.path().to_str().expect("utf-8 path");
    let second_name = second.path().to_str().expect("utf-8 path");

    let expected =
        expected_line(&second_words, second_name) + &expected_line(&first_words, first_name);
    fletcher4sum()
        .args([second_name, first_name])
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn every_backend_prints_the_same_checksum() {
    let words = lcg_words(1024 + 3, 11);
    let file = temp_file_with(&words_to_ne_bytes(&words)).expect("temp file");
    let name = file.path().to_str().expect("utf-8 path");
    let expected = expected_line(&words, name);

    for backend in Backend::available() {
        fletcher4sum()
            .args(["--impl", backend.name(), name])
            .assert()
            .success()
            .stdout(expected.clone());
    }

    fletcher4sum()
        .args(["--impl", "cycle", name, name, name])
        .assert()
        .success()
        .stdout(expected.repeat(3));
}

#[test]
fn byteswap_reads_foreign_words() {
    let words = lcg_words(300, 3);
    let foreign = byteswap_words(&words_to_ne_bytes(&words));

    fletcher4sum()
        .arg("--byteswap")
        .write_stdin(foreign)
        .assert()
        .success()
        .stdout(expected_line(&words, "-"));
}

#[test]
fn unaligned_input_fails_but_later_files_are_checksummed() {
    let bad = temp_file_with(&[0u8; 10]).expect("temp file");
    let good = temp_file_with(&words_to_ne_bytes(&[1, 2, 3, 4])).expect("temp file");
    let bad_name = bad.path().to_str().expect("utf-8 path");
    let good_name = good.path().to_str().expect("utf-8 path");

    fletcher4sum()
        .args([bad_name, good_name])
        .assert()
        .code(1)
        .stdout(format!("a:14:23:38  {good_name}\n"))
        .stderr(predicate::str::contains(bad_name).and(predicate::str::contains("multiple of 4")));
}

#[test]
fn missing_file_fails_with_one() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent.bin");

    fletcher4sum()
        .arg(&missing)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("absent.bin"));
}

#[test]
fn unknown_implementation_is_a_usage_error() {
    fletcher4sum()
        .args(["--impl", "sse9"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown fletcher4 implementation `sse9`"));
}

#[test]
fn unknown_option_is_a_usage_error() {
    fletcher4sum().arg("--md5").assert().code(2);
}

#[test]
fn list_marks_the_environment_override() {
    let output = fletcher4sum()
        .arg("--list")
        .env("FLETCHER4_IMPL", "scalar")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).expect("utf-8 listing");

    let marked: Vec<_> = text.lines().filter(|line| line.starts_with('*')).collect();
    assert_eq!(marked.len(), 1);
    assert!(marked[0].starts_with("* scalar "));
    assert_eq!(text.lines().count(), Backend::REGISTRY.len());
}

#[test]
fn no_simd_leaves_only_portable_backends() {
    let output = fletcher4sum()
        .args(["--no-simd", "--list"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).expect("utf-8 listing");

    for line in text.lines() {
        let name = line[2..].split_whitespace().next().expect("backend name");
        let portable = matches!(name, "scalar" | "superscalar" | "superscalar4");
        assert_eq!(line.ends_with(" available"), portable, "{line}");
    }
    assert!(text.lines().any(|line| line.starts_with("* superscalar4 ")));
}

#[test]
fn no_simd_still_checksums_correctly() {
    let words = lcg_words(1024, 0x5eed);
    fletcher4sum()
        .arg("--no-simd")
        .write_stdin(words_to_ne_bytes(&words))
        .assert()
        .success()
        .stdout(expected_line(&words, "-"));
}

#[test]
fn bench_reports_every_available_backend() {
    let output = fletcher4sum()
        .args(["--bench", "--bench-size", "4096"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).expect("utf-8 report");

    assert!(text.starts_with("4096 bytes x "));
    for backend in Backend::available() {
        assert!(text.contains(backend.name()), "{text}");
    }
}

#[test]
fn verbose_output_names_the_selected_backend() {
    fletcher4sum()
        .arg("-vv")
        .write_stdin(words_to_ne_bytes(&[1, 2, 3, 4]))
        .assert()
        .success()
        .stderr(predicate::str::contains("fletcher::select"));
}

#[test]
fn quiet_suppresses_diagnostics() {
    fletcher4sum()
        .args(["-q", "-vv"])
        .write_stdin(words_to_ne_bytes(&[1, 2, 3, 4]))
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn binary_builds_engine_without_parallel_feature() {
    let manifest = include_str!("../Cargo.toml");
    let package = &manifest[..manifest.find("[workspace]").expect("workspace table")];
    assert!(!package.contains("[features]"));
    assert!(!package.contains("parallel"));

    let cli = include_str!("../crates/cli/Cargo.toml");
    assert!(cli.contains(r#"fletcher = { path = "../fletcher", default-features = false }"#));
}
