//! Browser bindings: session storage, navigation type, and the JS export.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only compiled with the `browser` feature. Everything here probes the host
//! and hands the store absent capabilities when the probe fails, so a page
//! running with storage disabled still loads.
//!
//! The page-wide store lives in a thread-local slot and is initialized on
//! first use, which is where the navigation reset policy runs.

use std::cell::RefCell;

use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::capability::{Capabilities, JsonCodec, NavigationClassifier, StorageProvider};
use crate::config::StoreConfig;
use crate::error::StorageError;
use crate::legacy::{self, CallShape, Outcome, PersistHandle};
use crate::store::StateStore;

/// `PerformanceNavigation.TYPE_BACK_FORWARD`.
const TYPE_BACK_FORWARD: u16 = 2;

thread_local! {
    static STORE: RefCell<Option<StateStore>> = const { RefCell::new(None) };
}

/// Route `log` records to the browser console.
pub fn init_logging(level: log::Level) {
    if console_log::init_with_level(level).is_err() {
        log::debug!("persist: console logger already installed");
    }
}

/// Probe the host for storage and build the capability bundle.
#[must_use]
pub fn detect() -> Capabilities {
    let caps = Capabilities::new(BrowserNavigation).with_codec(JsonCodec);
    match SessionStorage::open() {
        Some(storage) => caps.with_storage(storage),
        None => {
            log::debug!("persist: sessionStorage unavailable, state is transient");
            caps
        }
    }
}

/// Initialize the page-wide store with `config`. Later calls are ignored.
pub fn install(config: StoreConfig) {
    STORE.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(StateStore::init(config, detect()));
        }
    });
}

/// Run `f` against the page-wide store, initializing it with defaults if needed.
pub fn with_store<R>(f: impl FnOnce(&mut StateStore) -> R) -> R {
    STORE.with(|cell| {
        let mut slot = cell.borrow_mut();
        let store = slot.get_or_insert_with(|| StateStore::init(StoreConfig::default(), detect()));
        f(store)
    })
}

// =============================================================================
// CAPABILITIES
// =============================================================================

/// Storage provider over `window.sessionStorage`.
pub struct SessionStorage {
    storage: web_sys::Storage,
}

impl SessionStorage {
    /// The session storage area, if the host exposes one.
    #[must_use]
    pub fn open() -> Option<Self> {
        let window = web_sys::window()?;
        match window.session_storage() {
            Ok(Some(storage)) => Some(Self { storage }),
            Ok(None) => None,
            Err(e) => {
                log::debug!("persist: sessionStorage access denied: {}", host_error(e));
                None
            }
        }
    }
}

impl StorageProvider for SessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(host_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(host_error)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(host_error)
    }
}

fn host_error(err: JsValue) -> StorageError {
    match err.dyn_ref::<js_sys::Error>() {
        Some(e) if String::from(e.name()) == "QuotaExceededError" => StorageError::QuotaExceeded,
        Some(e) => StorageError::Host(String::from(e.message())),
        None => StorageError::Host(format!("{err:?}")),
    }
}

/// Navigation classifier reading the Navigation Timing API.
pub struct BrowserNavigation;

impl NavigationClassifier for BrowserNavigation {
    fn is_back_forward_navigated(&self) -> bool {
        let Some(performance) = web_sys::window().and_then(|w| w.performance()) else {
            return false;
        };

        let first = performance.get_entries_by_type("navigation").get(0);
        if let Some(timing) = first.dyn_ref::<web_sys::PerformanceNavigationTiming>() {
            return timing.type_() == web_sys::NavigationType::BackForward;
        }

        // Navigation Timing Level 1 fallback.
        performance.navigation().type_() == TYPE_BACK_FORWARD
    }
}

// =============================================================================
// JS EXPORT
// =============================================================================

/// Legacy plain call, applied to an argument array.
///
/// wasm-bindgen exports are not variadic, so the arity of the old callable
/// travels as the array length: `persistApply([])` reads the global key,
/// `persistApply([value])` stores it, `persistApply([key, value])` stores
/// under `key`. A host restores the old signature with
/// `const persist = (...args) => persistApply(args);`.
#[wasm_bindgen(js_name = persistApply)]
pub fn persist_apply(args: JsValue) -> JsValue {
    if !js_sys::Array::is_array(&args) {
        log::warn!("persist: persistApply expects an argument array, got {args:?}");
        return JsValue::UNDEFINED;
    }
    let args: Vec<Option<Value>> = js_sys::Array::from(&args).iter().map(|v| from_js(&v)).collect();
    let shape = CallShape::from_args(&args);
    match with_store(|store| legacy::dispatch(store, shape)) {
        Outcome::Value(value) => value.map_or(JsValue::UNDEFINED, |v| to_js(&v)),
        Outcome::Instance(handle) => JsPersist { handle }.into(),
    }
}

/// Legacy constructor form: `new Persist(key)`.
#[wasm_bindgen(js_name = Persist)]
pub struct JsPersist {
    handle: PersistHandle,
}

#[wasm_bindgen(js_class = Persist)]
impl JsPersist {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(key: String) -> Self {
        Self { handle: PersistHandle::new(key) }
    }

    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn key(&self) -> String {
        self.handle.key().to_owned()
    }

    /// Read the value at a dotted `path` under the bound key.
    #[must_use]
    pub fn get(&self, path: &str) -> JsValue {
        with_store(|store| self.handle.get(store, path)).map_or(JsValue::UNDEFINED, |v| to_js(&v))
    }

    /// Write `value` at a dotted `path` under the bound key; `undefined` removes it.
    pub fn set(&self, path: &str, value: JsValue) {
        let value = from_js(&value);
        with_store(|store| {
            self.handle.set(store, path, value);
        });
    }
}

/// Convert a JS value to JSON; `undefined` and unserializable values are `None`.
fn from_js(value: &JsValue) -> Option<Value> {
    if value.is_undefined() {
        return None;
    }
    // `JSON.stringify` yields `undefined` for functions and symbols.
    let raw = match js_sys::JSON::stringify(value) {
        Ok(raw) => raw.as_string()?,
        Err(e) => {
            log::warn!("persist: value is not JSON-serializable: {e:?}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("persist: value is not JSON-serializable: {e}");
            None
        }
    }
}

fn to_js(value: &Value) -> JsValue {
    match js_sys::JSON::parse(&value.to_string()) {
        Ok(js) => js,
        Err(e) => {
            log::warn!("persist: failed to convert value to JS: {e:?}");
            JsValue::UNDEFINED
        }
    }
}
