//! Host capabilities the state store is built on.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store never touches a concrete storage area or JSON engine. It is
//! handed optional capability handles at construction time and checks for
//! their presence before every use, so a host that lacks storage or a codec
//! still gets a working, if transient, store.

#[cfg(test)]
#[path = "capability_test.rs"]
mod capability_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::error::{CodecError, StorageError};

/// Synchronous string key/value storage, modelled on the Web Storage API.
pub trait StorageProvider {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the host refuses the read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::QuotaExceeded`] when the value does not fit.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key` entirely.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the host refuses the removal.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Translates between JSON values and their string form.
pub trait Codec {
    /// Encode a value to a string.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when the value cannot be represented.
    fn encode(&self, value: &Value) -> Result<String, CodecError>;

    /// Decode a string back into a value.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] for malformed input.
    fn decode(&self, raw: &str) -> Result<Value, CodecError>;
}

/// Reports whether the current page load is a back/forward restoration.
pub trait NavigationClassifier {
    fn is_back_forward_navigated(&self) -> bool;
}

impl<F> NavigationClassifier for F
where
    F: Fn() -> bool,
{
    fn is_back_forward_navigated(&self) -> bool {
        self()
    }
}

/// The bundle of handles a store is constructed with.
pub struct Capabilities {
    pub storage: Option<Box<dyn StorageProvider>>,
    pub codec: Option<Box<dyn Codec>>,
    pub navigation: Box<dyn NavigationClassifier>,
}

impl Capabilities {
    /// Capabilities with no storage and no codec.
    #[must_use]
    pub fn new(navigation: impl NavigationClassifier + 'static) -> Self {
        Self { storage: None, codec: None, navigation: Box::new(navigation) }
    }

    /// In-process storage plus the JSON codec, for hosts without a browser.
    #[must_use]
    pub fn in_memory(storage: MemoryStorage, navigation: impl NavigationClassifier + 'static) -> Self {
        Self::new(navigation).with_storage(storage).with_codec(JsonCodec)
    }

    #[must_use]
    pub fn with_storage(mut self, storage: impl StorageProvider + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    #[must_use]
    pub fn with_codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Some(Box::new(codec));
        self
    }

    /// Whether both storage and codec are present.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.storage.is_some() && self.codec.is_some()
    }
}

/// JSON codec backed by `serde_json`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, value: &Value) -> Result<String, CodecError> {
        Ok(serde_json::to_string(value)?)
    }

    fn decode(&self, raw: &str) -> Result<Value, CodecError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// In-process storage area.
///
/// Clones share the same underlying map, so a second store built from a
/// clone sees what the first one wrote, the way a reloaded page sees the
/// session storage of the page before it.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes once the total stored bytes would exceed `quota`.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self { items: Rc::default(), quota: Some(quota) }
    }

    /// Total bytes of keys and values currently stored.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.items.borrow().iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl StorageProvider for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let replaced = self.items.borrow().get(key).map_or(0, |old| key.len() + old.len());
            if self.used_bytes() - replaced + key.len() + value.len() > quota {
                return Err(StorageError::QuotaExceeded);
            }
        }
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}
