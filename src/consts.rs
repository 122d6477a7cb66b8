//! Shared string constants for the persist crate.

/// Default storage slot key.
pub const STORAGE_KEY: &str = "___persist___";

/// Key the legacy callable reads and writes when no key is given.
pub const GLOBAL_KEY: &str = "KEY___persist___";

/// Separator for nested paths addressed through a `PersistHandle`.
pub const PATH_SEPARATOR: char = '.';
