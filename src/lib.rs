//! Session-scoped UI state persistence.
//!
//! Pages keep small pieces of state (scroll offsets, open panels, loaded list
//! pages) across a back/forward navigation by writing them through a
//! [`store::StateStore`]. The store serializes one JSON object into one
//! session storage slot, discards it on a fresh page load, and falls back to
//! transient in-memory state when the host lacks storage or the slot is
//! corrupt. No operation ever fails toward the caller.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | The state store: hydration, get/set/reset, reset policy |
//! | [`capability`] | Storage, codec, and navigation traits plus in-process implementations |
//! | [`config`] | Storage slot key configuration |
//! | [`legacy`] | Call-shape adapter for the old single-callable API |
//! | [`error`] | Capability failure types |
//! | [`consts`] | Shared key constants |
//! | `browser` | `web-sys` bindings and the JS export (feature `browser`) |

#[cfg(feature = "browser")]
pub mod browser;
pub mod capability;
pub mod config;
pub mod consts;
pub mod error;
pub mod legacy;
pub mod store;

pub use capability::{Capabilities, Codec, JsonCodec, MemoryStorage, NavigationClassifier, StorageProvider};
pub use config::StoreConfig;
pub use store::{Hydration, StateStore};
