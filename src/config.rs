//! Store configuration.
//!
//! DESIGN
//! ======
//! The only tunable is the storage slot key. Hosts either take the fixed
//! default, scope the slot to the current page URL, or pass JSON
//! configuration through from their own settings.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::STORAGE_KEY;

/// Configuration for a [`crate::store::StateStore`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Key of the single storage slot holding the encoded state mapping.
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { storage_key: STORAGE_KEY.to_owned() }
    }
}

impl StoreConfig {
    /// Slot key scoped to a page URL, so unrelated pages never share state.
    #[must_use]
    pub fn for_url(href: &str) -> Self {
        Self { storage_key: format!("{href}{STORAGE_KEY}") }
    }

    /// Parse host-supplied JSON configuration. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
