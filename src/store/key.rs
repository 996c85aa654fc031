//! Composite storage keys
//!
//! Every record is addressed as `<namespace>_<id>`. There is no other
//! index: a document is recovered by scanning the `<namespace>` prefix.

use std::fmt;

/// Separator between namespace and record id
pub const KEY_SEPARATOR: u8 = b'_';

/// A composed `namespace_id` key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StorageKey(Vec<u8>);

impl StorageKey {
    /// Builds `namespace + "_" + id`.
    pub fn compose(namespace: &str, id: &str) -> Self {
        let mut key = Vec::with_capacity(namespace.len() + id.len() + 1);
        key.extend_from_slice(namespace.as_bytes());
        key.push(KEY_SEPARATOR);
        key.extend_from_slice(id.as_bytes());
        Self(key)
    }

    /// Wraps raw key bytes read back from the engine.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Recovers the record id by stripping `prefix + "_"`.
    ///
    /// Returns `None` when the key is not longer than `prefix + "_"`, or
    /// when the byte after `prefix` is not the separator (the key belongs
    /// to a longer namespace such as `DOCX` under prefix `DOC`).
    pub fn split_id(&self, prefix: &[u8]) -> Option<&[u8]> {
        split_id(&self.0, prefix)
    }
}

/// Slice form of [`StorageKey::split_id`].
pub fn split_id<'k>(key: &'k [u8], prefix: &[u8]) -> Option<&'k [u8]> {
    if key.len() <= prefix.len() + 1 || !key.starts_with(prefix) {
        return None;
    }
    if key[prefix.len()] != KEY_SEPARATOR {
        return None;
    }
    Some(&key[prefix.len() + 1..])
}

impl AsRef<[u8]> for StorageKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// A key with its stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEntry {
    pub key: StorageKey,
    pub value: Vec<u8>,
}

impl StorageEntry {
    pub fn new(key: StorageKey, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}
