use std::path::PathBuf;

use thiserror::Error;

use crate::models::store::{PersistedState, Store};

pub mod json;
pub mod migrations;

/// Current schema version of every persisted key
pub const CURRENT_VERSION: u32 = 1;

/// The four logical keys of the persisted state. Each key is stored
/// independently; a save is atomic per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    Tasks,
    Tags,
    Groups,
    SelectedGroup,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Tasks => "todo-tasks",
            StoreKey::Tags => "todo-tags",
            StoreKey::Groups => "todo-groups",
            StoreKey::SelectedGroup => "todo-selected-group",
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to load '{key}' from '{path}': {source}")]
    LoadFailed {
        key: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON for '{key}' from '{path}': {source}")]
    ParseFailed {
        key: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to save '{key}' to '{path}': {source}")]
    SaveFailed {
        key: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize '{key}' to JSON: {source}")]
    SerializeFailed {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to acquire the store lock at '{path}': {source}")]
    LockFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Key '{key}' has a non-numeric version field: {found}")]
    InvalidVersion { key: &'static str, found: String },

    #[error(
        "Key '{key}' was written by a newer version of tablo (version {version}). Please upgrade tablo to open this store."
    )]
    FutureVersion { key: &'static str, version: u32 },

    #[error("Key '{key}' has unsupported version {version}. This version of tablo cannot read it.")]
    UnsupportedVersion { key: &'static str, version: u32 },
}

pub trait Storage {
    fn load(&self) -> Result<PersistedState, StorageError>;
    fn save(&self, store: &Store) -> Result<(), StorageError>;
}
