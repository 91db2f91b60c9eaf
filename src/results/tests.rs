//! Tests for the result serialization.

use super::{AnalysisResult, Submission};
use crate::{
    package::{fake::FakePackage, RawValue},
    static_analysis::static_analysis,
};
use serde_json::{json, Value};
use std::fs;

fn keys(value: &Value) -> Vec<&str> {
    let mut keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    keys
}

#[test]
fn it_failure_shape() {
    let result = AnalysisResult::failure("Failed to parse APK: invalid Zip archive");
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(
        value,
        json!({"ok": false, "error": "Failed to parse APK: invalid Zip archive"})
    );
    assert!(!result.is_ok());
    assert!(result.analysis().is_none());
    assert_eq!(
        result.error(),
        Some("Failed to parse APK: invalid Zip archive")
    );
}

#[test]
fn it_success_shape() {
    let mut package = FakePackage::default()
        .with_permissions(&["android.permission.CAMERA", "android.permission.INTERNET"])
        .debuggable(true);
    package.receivers = Ok(vec![RawValue::from("com.example.app.BootReceiver")]);

    let result = AnalysisResult::from(static_analysis(&package));
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(
        keys(&value),
        vec![
            "activities",
            "app_name",
            "certificates",
            "dangerous_permissions",
            "debuggable",
            "ok",
            "package_name",
            "permissions",
            "receivers",
            "recommendation",
            "recommendation_reason",
            "risk_label",
            "risk_reasons",
            "risk_score",
            "services",
            "urls",
            "version_code",
            "version_name",
        ]
    );
    assert_eq!(value["ok"], true);
    assert_eq!(value["package_name"], "com.example.app");
    assert_eq!(value["version_code"], 1);
    assert_eq!(value["debuggable"], true);
    assert_eq!(value["dangerous_permissions"], json!(["android.permission.CAMERA"]));
    assert_eq!(value["receivers"], json!(["com.example.app.BootReceiver"]));
    assert_eq!(value["risk_score"], 2);
    assert_eq!(value["risk_label"], "Low");
    assert_eq!(
        value["risk_reasons"],
        json!([
            "App is debuggable (should be disabled in release builds)",
            "Some dangerous permissions declared",
        ])
    );
    assert_eq!(value["recommendation"], "Generally safe (Low risk).");
    assert_eq!(
        value["recommendation_reason"],
        "No significant risk factors detected. Verify the source."
    );
}

#[test]
fn it_missing_fields_are_null() {
    let mut package = FakePackage::default();
    package.app_name = Err("no label".to_owned());
    package.debuggable = Err("invalid flag".to_owned());

    let value = serde_json::to_value(AnalysisResult::from(static_analysis(&package))).unwrap();

    assert_eq!(value["ok"], true);
    assert_eq!(value["app_name"], Value::Null);
    assert_eq!(value["debuggable"], Value::Null);
}

#[test]
fn it_submission_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let package = dir.path().join("sample.apk");
    fs::write(&package, b"abc").unwrap();

    let submission = Submission::new(&package, AnalysisResult::failure("boom"));
    let value = serde_json::to_value(&submission).unwrap();

    assert_eq!(
        value,
        json!({
            "ok": false,
            "error": "boom",
            "filename": "sample.apk",
            "sha256": "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        })
    );
}

#[test]
fn it_submission_without_file() {
    let dir = tempfile::tempdir().unwrap();
    let submission = Submission::new(dir.path().join("gone.apk"), AnalysisResult::failure("x"));

    assert_eq!(submission.sha256(), None);
    let value = serde_json::to_value(&submission).unwrap();
    assert_eq!(keys(&value), vec!["error", "filename", "ok"]);
}
