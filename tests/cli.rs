//! Tests for the `pdf2text` binary's process contract.

mod common;

use axum::Router;
use common::{not_found, refused_url, serve};
use serde_json::Value;
use std::process::{Command, Output};

fn pdf2text(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pdf2text"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("PDFIUM_LIB_PATH")
        .output()
        .expect("run pdf2text")
}

#[test]
fn missing_url_exits_1_with_usage() {
    let out = pdf2text(&[]);

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage"), "stderr: {stderr}");
}

#[test]
fn zero_max_pages_is_an_argument_error() {
    let out = pdf2text(&["--max-pages", "0", "http://127.0.0.1:9/cv.pdf"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("invalid value '0'"), "stderr: {stderr}");
    assert!(stderr.contains("--max-pages"), "stderr: {stderr}");
}

#[test]
fn help_exits_0() {
    let out = pdf2text(&["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("pdf2text"));
}

#[test]
fn unreachable_url_prints_error_envelope_and_exits_0() {
    let url = refused_url();
    let out = pdf2text(&["--no-download", "--quiet", url.as_str()]);

    assert_eq!(out.status.code(), Some(0));
    let json: Value = serde_json::from_slice(&out.stdout).expect("stdout is JSON");
    assert_eq!(json["status"], "error");
    assert_eq!(json["extracted_text"], "");
    assert!(json["error_message"].is_string());
}

#[tokio::test(flavor = "multi_thread")]
async fn http_404_envelope_is_pretty_printed() {
    let base = serve(Router::new().route("/gone.pdf", not_found())).await;
    let url = format!("{base}/gone.pdf");

    let out = tokio::task::spawn_blocking(move || pdf2text(&["--no-download", url.as_str()]))
        .await
        .unwrap();

    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("{\n  \"status\": \"error\""), "stdout: {stdout}");
    let json: Value = serde_json::from_str(&stdout).unwrap();
    assert!(json["error_message"].as_str().unwrap().contains("404"));
    assert_eq!(json.as_object().unwrap().len(), 3);

    // Logs stay on stderr.
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Starting download"), "stderr: {stderr}");
}
