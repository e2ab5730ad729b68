use serde_json::{Value, json};

use crate::storage::{CURRENT_VERSION, StorageError, StoreKey};

type MigrationFn = fn(StoreKey, Value) -> Result<Value, StorageError>;

fn get_migrations() -> Vec<MigrationFn> {
    vec![
        // Future migrations will be added here
    ]
}

/// Wrap a key's payload in the versioned on-disk envelope.
pub fn wrap_payload(payload: Value) -> Value {
    json!({ "version": CURRENT_VERSION, "data": payload })
}

/// Version of a key's on-disk document. A bare array or string is the
/// legacy shape written before envelopes existed and is read as v1.
pub fn detect_version(key: StoreKey, document: &Value) -> Result<u32, StorageError> {
    match document.get("version") {
        Some(version) => {
            version
                .as_u64()
                .map(|n| n as u32)
                .ok_or_else(|| StorageError::InvalidVersion {
                    key: key.as_str(),
                    found: version.to_string(),
                })
        }
        None => Ok(1),
    }
}

/// Extract a key's payload from its on-disk document, tolerating the
/// legacy unversioned shape (payload at the top level).
pub fn unwrap_payload(document: Value) -> Value {
    match document {
        Value::Object(mut fields) if fields.contains_key("data") => {
            fields.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Migrations are applied sequentially: v1 -> v2 -> ... -> target
pub fn apply_migrations(
    key: StoreKey,
    mut data: Value,
    from_version: u32,
    to_version: u32,
) -> Result<Value, StorageError> {
    if from_version == to_version {
        return Ok(data);
    }

    if from_version > to_version {
        return Err(StorageError::FutureVersion {
            key: key.as_str(),
            version: from_version,
        });
    }

    let migrations = get_migrations();

    for version in from_version..to_version {
        let migration_idx = (version - 1) as usize; // v1 -> v2 is at index 0

        if migration_idx >= migrations.len() {
            return Err(StorageError::UnsupportedVersion {
                key: key.as_str(),
                version,
            });
        }

        data = migrations[migration_idx](key, data)?;
    }

    Ok(data)
}
