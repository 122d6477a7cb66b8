//! Adapter for the old single-callable persist API.
//!
//! DESIGN
//! ======
//! The old API was one function whose meaning depended on how many arguments
//! it got and whether it was invoked as a constructor. Here each call shape
//! is an explicit [`CallShape`] variant and [`dispatch`] maps it onto the
//! four store operations. The adapter holds no state of its own.

#[cfg(test)]
#[path = "legacy_test.rs"]
mod legacy_test;

use serde_json::{Map, Value};

use crate::consts::{GLOBAL_KEY, PATH_SEPARATOR};
use crate::store::StateStore;

/// How the legacy callable was invoked.
#[derive(Clone, Debug, PartialEq)]
pub enum CallShape {
    /// No arguments: read the global key.
    Read,
    /// A single string argument, or more than two arguments: read that key.
    ReadKey(String),
    /// A single non-string argument: store it under the global key.
    /// `None` (an `undefined` argument) removes the global key.
    StoreGlobal(Option<Value>),
    /// Key and value: store (or remove, for `None`) and read back.
    StoreKeyed { key: String, value: Option<Value> },
    /// Constructor invocation binding `key` for later instance access.
    Construct(String),
}

impl CallShape {
    /// Classify a plain (non-constructor) call by its positional arguments.
    ///
    /// `None` stands for an `undefined` argument, which is distinct from
    /// JSON `null` and still counts toward the arity.
    #[must_use]
    pub fn from_args(args: &[Option<Value>]) -> Self {
        match args {
            [] => Self::Read,
            [Some(Value::String(key))] => Self::ReadKey(key.clone()),
            [value] => Self::StoreGlobal(value.clone()),
            [key, value] => Self::StoreKeyed { key: key_string(key.as_ref()), value: value.clone() },
            [key, ..] => Self::ReadKey(key_string(key.as_ref())),
        }
    }
}

/// Result of a legacy call.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The value a plain call returns; `None` is `undefined`.
    Value(Option<Value>),
    /// The instance a constructor call returns.
    Instance(PersistHandle),
}

/// Execute `shape` against `store`.
pub fn dispatch(store: &mut StateStore, shape: CallShape) -> Outcome {
    match shape {
        CallShape::Read => Outcome::Value(store.get_state_by_key(GLOBAL_KEY)),
        CallShape::ReadKey(key) => Outcome::Value(store.get_state_by_key(&key)),
        CallShape::StoreGlobal(value) => {
            store.set_state_by_key(GLOBAL_KEY, value);
            Outcome::Value(None)
        }
        CallShape::StoreKeyed { key, value } => {
            store.set_state_by_key(&key, value);
            Outcome::Value(store.get_state_by_key(&key))
        }
        CallShape::Construct(key) => Outcome::Instance(PersistHandle::new(key)),
    }
}

/// Instance record created by a constructor call.
///
/// Construction touches no storage. The instance methods address a dotted
/// path inside the object stored under the bound key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistHandle {
    key: String,
}

impl PersistHandle {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the value at `path`; an empty path reads the whole bound value.
    pub fn get(&self, store: &mut StateStore, path: &str) -> Option<Value> {
        let root = store.get_state_by_key(&self.key)?;
        if path.is_empty() {
            return Some(root);
        }
        let mut current = &root;
        for segment in path.split(PATH_SEPARATOR) {
            current = current.get(segment)?;
        }
        Some(current.clone())
    }

    /// Write `value` at `path`, creating intermediate objects. `None` removes
    /// the leaf. An empty path replaces the whole bound value.
    pub fn set(&self, store: &mut StateStore, path: &str, value: Option<Value>) -> &Self {
        if path.is_empty() {
            store.set_state_by_key(&self.key, value);
            return self;
        }
        let mut root = match (store.get_state_by_key(&self.key), &value) {
            (Some(root), _) => root,
            (None, None) => return self,
            (None, Some(_)) => Value::Object(Map::new()),
        };
        let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        set_path(&mut root, &segments, value);
        store.set_state_by_key(&self.key, Some(root));
        self
    }
}

fn set_path(target: &mut Value, segments: &[&str], value: Option<Value>) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    if !target.is_object() {
        if value.is_none() {
            return;
        }
        *target = Value::Object(Map::new());
    }
    let Value::Object(map) = target else {
        return;
    };

    if rest.is_empty() {
        match value {
            Some(value) => {
                map.insert((*head).to_owned(), value);
            }
            None => {
                map.remove(*head);
            }
        }
        return;
    }

    let Some(value) = value else {
        if let Some(child) = map.get_mut(*head) {
            set_path(child, rest, None);
        }
        return;
    };
    let child = map
        .entry((*head).to_owned())
        .or_insert_with(|| Value::Object(Map::new()));
    set_path(child, rest, Some(value));
}

fn key_string(key: Option<&Value>) -> String {
    match key {
        Some(Value::String(key)) => key.clone(),
        Some(other) => other.to_string(),
        None => "undefined".to_owned(),
    }
}
