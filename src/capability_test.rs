use serde_json::json;

use super::*;

// =============================================================
// MemoryStorage
// =============================================================

#[test]
fn memory_storage_get_missing_is_none() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.get_item("nope").unwrap(), None);
}

#[test]
fn memory_storage_set_then_get() {
    let storage = MemoryStorage::new();
    storage.set_item("k", "v").unwrap();
    assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn memory_storage_remove_deletes_entry() {
    let storage = MemoryStorage::new();
    storage.set_item("k", "v").unwrap();
    storage.remove_item("k").unwrap();
    assert_eq!(storage.get_item("k").unwrap(), None);
    assert!(storage.is_empty());
}

#[test]
fn memory_storage_clones_share_items() {
    let first = MemoryStorage::new();
    let second = first.clone();
    first.set_item("k", "v").unwrap();
    assert_eq!(second.get_item("k").unwrap().as_deref(), Some("v"));
    assert_eq!(second.len(), 1);
}

#[test]
fn memory_storage_quota_rejects_oversized_write() {
    let storage = MemoryStorage::with_quota(8);
    storage.set_item("k", "1234").unwrap();
    let err = storage.set_item("k2", "123456").unwrap_err();
    assert_eq!(err, StorageError::QuotaExceeded);
    assert_eq!(storage.get_item("k2").unwrap(), None);
}

#[test]
fn memory_storage_quota_counts_replaced_value_once() {
    let storage = MemoryStorage::with_quota(8);
    storage.set_item("k", "1234567").unwrap();
    storage.set_item("k", "7654321").unwrap();
    assert_eq!(storage.used_bytes(), 8);
}

// =============================================================
// JsonCodec
// =============================================================

#[test]
fn json_codec_encodes_object() {
    let raw = JsonCodec.encode(&json!({"TEST": 100})).unwrap();
    assert_eq!(raw, r#"{"TEST":100}"#);
}

#[test]
fn json_codec_rejects_malformed_input() {
    let err = JsonCodec.decode("{").unwrap_err();
    assert!(matches!(err, CodecError::Json(_)));
}

#[test]
fn json_codec_decodes_scalars() {
    assert_eq!(JsonCodec.decode("1.234").unwrap(), json!(1.234));
    assert_eq!(JsonCodec.decode("\"123\"").unwrap(), json!("123"));
}

// =============================================================
// Capabilities
// =============================================================

#[test]
fn closure_acts_as_navigation_classifier() {
    let caps = Capabilities::new(|| true);
    assert!(caps.navigation.is_back_forward_navigated());
}

#[test]
fn bare_capabilities_are_not_persistent() {
    let caps = Capabilities::new(|| false);
    assert!(!caps.is_persistent());
    assert!(!caps.with_storage(MemoryStorage::new()).is_persistent());
}

#[test]
fn in_memory_capabilities_are_persistent() {
    let caps = Capabilities::in_memory(MemoryStorage::new(), || false);
    assert!(caps.is_persistent());
}
