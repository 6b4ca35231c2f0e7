//! Tests reply decoding against realistic device bodies.

use campanel_core::{
    CoreError, parse_capture_reply, parse_delete_reply, parse_file_listing,
    parse_hardware_snapshot, parse_storage_summary,
};
use serde_json::Value;

#[test]
fn file_listing_keeps_device_order_and_accepts_size_alias() {
    let listing = parse_file_listing(
        br#"{"files":[{"name":"b.jpg","sizeBytes":2048},{"name":"a.jpg","size":1024}]}"#,
    )
    .expect("listing should decode");

    let names: Vec<_> = listing.files.iter().map(|file| file.name.as_str()).collect();
    assert_eq!(names, vec!["b.jpg", "a.jpg"]);
    assert_eq!(listing.files[0].size, 2048);
}

#[test]
fn file_listing_without_files_key_is_empty() {
    let listing = parse_file_listing(b"{}").expect("empty object should decode");
    assert!(listing.files.is_empty());
}

#[test]
fn storage_summary_requires_every_field() {
    let error = parse_storage_summary(br#"{"totalBytes":1024,"usedBytes":10}"#)
        .expect_err("missing fields should fail");
    assert!(matches!(error, CoreError::Decode(_)));
}

#[test]
fn storage_summary_reads_camel_case_fields() {
    let summary = parse_storage_summary(
        br#"{"totalBytes":4294967296,"usedBytes":1073741824,"fileCount":12,"usagePercent":25.0}"#,
    )
    .expect("summary should decode");
    assert_eq!(summary.total_bytes, 4_294_967_296);
    assert_eq!(summary.file_count, 12);
    assert_eq!(summary.usage_percent, 25.0);
}

#[test]
fn partial_hardware_snapshot_leaves_missing_fields_null() {
    let snapshot = parse_hardware_snapshot(br#"{"chipModel":"ESP32","cpuCores":2}"#)
        .expect("partial snapshot should decode");
    assert_eq!(snapshot.chip_model, Value::from("ESP32"));
    assert_eq!(snapshot.cpu_cores, Value::from(2));
    assert_eq!(snapshot.mac_address, Value::Null);
    assert_eq!(snapshot.jpeg_quality, Value::Null);
}

#[test]
fn html_error_page_is_a_decode_failure() {
    let error = parse_capture_reply(b"<html><body>503</body></html>")
        .expect_err("html should not decode");
    assert!(matches!(error, CoreError::Decode(_)));
}

#[test]
fn rejected_delete_carries_device_message() {
    let reply = parse_delete_reply(br#"{"success":false,"error":"not found"}"#)
        .expect("reply should decode");
    assert!(!reply.success);
    assert_eq!(reply.error.as_deref(), Some("not found"));
}
