//! Session state store: one JSON object persisted in one storage slot.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages stash small pieces of UI state (scroll offsets, open panels, loaded
//! list pages) here so that a back/forward navigation can restore them. The
//! whole mapping is encoded as a single JSON object and written to the slot
//! on every mutation.
//!
//! LIFECYCLE
//! =========
//! 1. [`StateStore::init`] asks the navigation classifier once. A fresh load
//!    clears the slot so state from an unrelated earlier page cannot leak in.
//! 2. The first read or write hydrates the in-memory mapping from the slot.
//! 3. Every write re-encodes the mapping and replaces the slot.
//! 4. [`StateStore::reset`] empties the mapping and removes the slot.
//!
//! FAILURE MODEL
//! =============
//! No operation returns an error. Missing storage or codec makes the store
//! transient; a corrupt slot hydrates as empty with a warning; a rejected
//! write is logged and dropped while the in-memory mapping stays
//! authoritative.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::capability::{Capabilities, Codec, StorageProvider};
use crate::config::StoreConfig;
use crate::error::HydrateError;

/// In-memory state mapping.
pub type StateMap = Map<String, Value>;

/// How the in-memory mapping was populated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Hydration {
    /// Not read yet; the next access hydrates.
    #[default]
    Pending,
    /// The slot was absent or has been reset.
    Empty,
    /// The mapping was restored from the slot.
    Restored,
    /// The slot held malformed or non-object content; started empty.
    Corrupted,
    /// Storage or codec is unusable; state lives in memory only.
    Transient,
}

/// Owner of the state mapping and its storage slot.
pub struct StateStore {
    storage_key: String,
    storage: Option<Box<dyn StorageProvider>>,
    codec: Option<Box<dyn Codec>>,
    state: Option<StateMap>,
    hydration: Hydration,
}

impl StateStore {
    /// Build a store and apply the navigation reset policy.
    ///
    /// A load that is not a back/forward restoration removes the slot before
    /// anything can read it. A back/forward load leaves it for hydration.
    #[must_use]
    pub fn init(config: StoreConfig, capabilities: Capabilities) -> Self {
        let Capabilities { storage, codec, navigation } = capabilities;
        let mut store = Self {
            storage_key: config.storage_key,
            storage,
            codec,
            state: None,
            hydration: Hydration::Pending,
        };

        if navigation.is_back_forward_navigated() {
            log::debug!("persist: back/forward navigation, keeping slot {}", store.storage_key);
        } else {
            store.reset();
        }
        store
    }

    /// Value stored under `key`, hydrating first if needed.
    pub fn get_state_by_key(&mut self, key: &str) -> Option<Value> {
        self.state_mut().get(key).cloned()
    }

    /// Store `value` under `key`; `None` removes the key. The slot is
    /// rewritten before returning whenever storage and codec are present.
    pub fn set_state_by_key(&mut self, key: &str, value: Option<Value>) {
        let state = self.state_mut();
        match value {
            Some(value) => {
                state.insert(key.to_owned(), value);
            }
            None => {
                state.remove(key);
            }
        }
        self.flush();
    }

    /// Clear the mapping and remove the slot entirely.
    pub fn reset(&mut self) {
        self.state = Some(StateMap::new());
        self.hydration = Hydration::Empty;

        let Some(storage) = self.storage.as_deref() else {
            return;
        };
        match storage.remove_item(&self.storage_key) {
            Ok(()) => log::debug!("persist: removed slot {}", self.storage_key),
            Err(e) => log::warn!("persist: failed to remove slot {}: {e}", self.storage_key),
        }
    }

    /// Typed read of the value under `key`. A value of the wrong shape reads as absent.
    pub fn load<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let value = self.get_state_by_key(key)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                log::warn!("persist: value under {key} has unexpected shape: {e}");
                None
            }
        }
    }

    /// Typed write of `value` under `key`. Unserializable values are dropped.
    pub fn save<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => self.set_state_by_key(key, Some(value)),
            Err(e) => log::warn!("persist: dropped unserializable value for {key}: {e}"),
        }
    }

    /// Key of the storage slot.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// The underlying storage provider, if the host has one.
    #[must_use]
    pub fn storage(&self) -> Option<&dyn StorageProvider> {
        self.storage.as_deref()
    }

    #[must_use]
    pub fn hydration(&self) -> Hydration {
        self.hydration
    }

    /// Whether writes reach the storage slot.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.storage.is_some() && self.codec.is_some()
    }

    fn state_mut(&mut self) -> &mut StateMap {
        if self.state.is_none() {
            let (state, hydration) = self.hydrate();
            self.hydration = hydration;
            self.state = Some(state);
        }
        self.state.get_or_insert_with(StateMap::new)
    }

    fn hydrate(&self) -> (StateMap, Hydration) {
        let (Some(storage), Some(codec)) = (self.storage.as_deref(), self.codec.as_deref()) else {
            log::debug!("persist: storage or codec unavailable, state is transient");
            return (StateMap::new(), Hydration::Transient);
        };

        match read_slot(storage, codec, &self.storage_key) {
            Ok(Some(state)) => (state, Hydration::Restored),
            Ok(None) => (StateMap::new(), Hydration::Empty),
            Err(HydrateError::Storage(e)) => {
                log::warn!("persist: cannot read slot {}: {e}", self.storage_key);
                (StateMap::new(), Hydration::Transient)
            }
            Err(e) => {
                log::warn!("persist: ignoring corrupted slot {}: {e}", self.storage_key);
                (StateMap::new(), Hydration::Corrupted)
            }
        }
    }

    fn flush(&self) {
        let (Some(storage), Some(codec), Some(state)) =
            (self.storage.as_deref(), self.codec.as_deref(), self.state.as_ref())
        else {
            return;
        };

        let raw = match codec.encode(&Value::Object(state.clone())) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("persist: failed to encode state: {e}");
                return;
            }
        };
        if let Err(e) = storage.set_item(&self.storage_key, &raw) {
            log::warn!("persist: dropped write to slot {}: {e}", self.storage_key);
        }
    }
}

fn read_slot(
    storage: &dyn StorageProvider,
    codec: &dyn Codec,
    key: &str,
) -> Result<Option<StateMap>, HydrateError> {
    let Some(raw) = storage.get_item(key)? else {
        return Ok(None);
    };
    match codec.decode(&raw)? {
        Value::Object(state) => Ok(Some(state)),
        other => Err(HydrateError::NotAnObject(json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
