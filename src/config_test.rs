use super::*;

#[test]
fn default_uses_fixed_storage_key() {
    assert_eq!(StoreConfig::default().storage_key, "___persist___");
}

#[test]
fn for_url_prefixes_storage_key_with_href() {
    let config = StoreConfig::for_url("https://example.com/list?page=2");
    assert_eq!(config.storage_key, "https://example.com/list?page=2___persist___");
}

#[test]
fn from_json_reads_storage_key() {
    let config = StoreConfig::from_json(r#"{"storage_key":"custom"}"#).unwrap();
    assert_eq!(config.storage_key, "custom");
}

#[test]
fn from_json_empty_object_takes_defaults() {
    let config = StoreConfig::from_json("{}").unwrap();
    assert_eq!(config, StoreConfig::default());
}

#[test]
fn from_json_rejects_malformed_input() {
    assert!(StoreConfig::from_json("{").is_err());
}
