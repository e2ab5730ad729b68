use std::{
    fs::{self, OpenOptions, rename, write},
    path::PathBuf,
};

use fs2::FileExt;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    models::store::{PersistedState, Store},
    storage::{
        CURRENT_VERSION, Storage, StorageError, StoreKey,
        migrations::{apply_migrations, detect_version, unwrap_payload, wrap_payload},
    },
};

/// Stores each logical key as its own JSON file under one directory,
/// e.g. `todo-tasks.json`. Writes go through a unique temp file and a
/// rename so a concurrent load never sees a partial write.
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn key_path(&self, key: StoreKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join("store.lock")
    }

    fn load_key<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>, StorageError> {
        let path = self.key_path(key);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::LoadFailed {
                    key: key.as_str(),
                    path,
                    source: e,
                });
            }
        };

        let document: Value =
            serde_json::from_str(&content).map_err(|e| StorageError::ParseFailed {
                key: key.as_str(),
                path: path.clone(),
                source: e,
            })?;

        let file_version = detect_version(key, &document)?;
        if file_version > CURRENT_VERSION {
            return Err(StorageError::FutureVersion {
                key: key.as_str(),
                version: file_version,
            });
        }

        let mut data = unwrap_payload(document);
        if file_version < CURRENT_VERSION {
            data = apply_migrations(key, data, file_version, CURRENT_VERSION)?;
        }

        let value = serde_json::from_value(data).map_err(|e| StorageError::ParseFailed {
            key: key.as_str(),
            path,
            source: e,
        })?;
        Ok(Some(value))
    }

    fn save_key<T: Serialize>(&self, key: StoreKey, payload: &T) -> Result<(), StorageError> {
        let data = serde_json::to_value(payload).map_err(|e| StorageError::SerializeFailed {
            key: key.as_str(),
            source: e,
        })?;
        let json =
            serde_json::to_string_pretty(&wrap_payload(data)).map_err(|e| StorageError::SerializeFailed {
                key: key.as_str(),
                source: e,
            })?;

        let path = self.key_path(key);
        let temp_path = PathBuf::from(format!("{}.tmp.{}", path.display(), Uuid::new_v4()));
        write(&temp_path, json).map_err(|e| StorageError::SaveFailed {
            key: key.as_str(),
            path: temp_path.clone(),
            source: e,
        })?;

        rename(&temp_path, &path).map_err(|e| StorageError::SaveFailed {
            key: key.as_str(),
            path,
            source: e,
        })
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<PersistedState, StorageError> {
        Ok(PersistedState {
            tasks: self.load_key(StoreKey::Tasks)?,
            tags: self.load_key(StoreKey::Tags)?,
            groups: self.load_key(StoreKey::Groups)?,
            selected_group_id: self.load_key(StoreKey::SelectedGroup)?,
        })
    }

    fn save(&self, store: &Store) -> Result<(), StorageError> {
        let lock_path = self.lock_path();
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| StorageError::LockFailed {
                path: lock_path.clone(),
                source: e,
            })?;
        lock_file
            .lock_exclusive()
            .map_err(|e| StorageError::LockFailed {
                path: lock_path.clone(),
                source: e,
            })?;

        let result = self
            .save_key(StoreKey::Tasks, &store.tasks)
            .and_then(|_| self.save_key(StoreKey::Tags, &store.tags))
            .and_then(|_| self.save_key(StoreKey::Groups, &store.groups))
            .and_then(|_| self.save_key(StoreKey::SelectedGroup, &store.selected_group_id));

        lock_file.unlock().map_err(|e| StorageError::LockFailed {
            path: lock_path,
            source: e,
        })?;

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::models::{
        store::{PersistedState, Store},
        tag::Tag,
        task::Task,
    };

    fn test_dir(name: &str) -> PathBuf {
        let dir = PathBuf::from("/tmp").join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn seeded_store() -> Store {
        Store::from_persisted(PersistedState::default()).0
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let storage = JsonFileStorage::new(test_dir("tablo_round_trip"));

        let mut store = seeded_store();
        store.tasks.push(Task {
            id: String::from("abc123def"),
            title: String::from("Review PR"),
            tag: store.tags[0].clone(),
            group_id: store.groups[0].id.clone(),
            date: String::from("2024-03-10T09:00:00"),
            time: 30,
            points: 2,
            ..Task::default()
        });

        storage.save(&store).unwrap();
        let state = storage.load().unwrap();

        let tasks = state.tasks.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "abc123def");
        assert_eq!(tasks[0].tag.id, store.tags[0].id);
        assert_eq!(state.tags.unwrap().len(), 3);
        assert_eq!(state.groups.unwrap().len(), 3);
        assert_eq!(
            state.selected_group_id.unwrap(),
            store.selected_group_id
        );
    }

    #[test]
    fn test_load_empty_dir_reports_all_keys_absent() {
        let storage = JsonFileStorage::new(test_dir("tablo_empty_dir"));

        let state = storage.load().unwrap();

        assert!(state.tasks.is_none());
        assert!(state.tags.is_none());
        assert!(state.groups.is_none());
        assert!(state.selected_group_id.is_none());
    }

    #[test]
    fn test_load_legacy_bare_array() {
        let dir = test_dir("tablo_legacy_array");
        // The color token contains `"#`, so the delimiter needs two hashes.
        let legacy = r##"[
            { "id": "1", "name": "Dev", "color": "#5252FF" }
        ]"##;
        fs::write(dir.join("todo-tags.json"), legacy).unwrap();

        let storage = JsonFileStorage::new(dir);
        let state = storage.load().unwrap();

        let tags: Vec<Tag> = state.tags.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "Dev");
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = test_dir("tablo_invalid_json");
        fs::write(dir.join("todo-tasks.json"), "{ this is not valid json }").unwrap();

        let storage = JsonFileStorage::new(dir);
        let result = storage.load();

        match result {
            Err(StorageError::ParseFailed { key, .. }) => assert_eq!(key, "todo-tasks"),
            _ => panic!("Expected ParseFailed error, got something else"),
        }
    }

    #[test]
    fn test_load_future_version() {
        let dir = test_dir("tablo_future_version");
        let future = r#"{ "version": 999, "data": [] }"#;
        fs::write(dir.join("todo-groups.json"), future).unwrap();

        let storage = JsonFileStorage::new(dir);
        let result = storage.load();

        match result {
            Err(StorageError::FutureVersion { version: 999, .. }) => {}
            _ => panic!("Expected FutureVersion(999) error"),
        }
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = test_dir("tablo_no_temp_files");
        let storage = JsonFileStorage::new(dir.clone());

        storage.save(&seeded_store()).unwrap();

        let leftovers = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().to_string_lossy().contains(".tmp."))
            .count();
        assert_eq!(leftovers, 0);
    }
}
