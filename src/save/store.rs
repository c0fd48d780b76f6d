use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored data in {0} is not a key/value object")]
    NotAnObject(PathBuf),
    #[error("storage is unavailable")]
    Unavailable,
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<&Value>;

    fn put(&mut self, key: &str, value: Value);

    fn flush(&mut self) -> Result<(), PersistenceError>;

    fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    fn get_u32(&self, key: &str) -> Option<u32> {
        self.get_u64(key).and_then(|value| u32::try_from(value).ok())
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
    flushes: usize,
    fail_flush: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            fail_flush: true,
            ..Self::default()
        }
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn put(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<(), PersistenceError> {
        if self.fail_flush {
            return Err(PersistenceError::Unavailable);
        }
        self.flushes += 1;
        Ok(())
    }
}

/// One JSON object on disk. Writes stay in memory until `flush`, which
/// replaces the file through a sibling temp file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Value>(&raw)? {
                Value::Object(values) => values,
                _ => return Err(PersistenceError::NotAnObject(path)),
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Map::new(),
            Err(source) => return Err(PersistenceError::Io { path, source }),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn put(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<(), PersistenceError> {
        let io_error = |source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, json).map_err(io_error)?;
        fs::rename(&temp_path, &self.path).map_err(io_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::{JsonFileStore, KeyValueStore, MemoryStore, PersistenceError};

    #[test]
    fn typed_getters_reject_mismatched_values() {
        let mut store = MemoryStore::new();
        store.put("count", json!(3));
        store.put("name", json!("imo"));
        store.put("huge", json!(u64::MAX));

        assert_eq!(store.get_u32("count"), Some(3));
        assert_eq!(store.get_u32("name"), None);
        assert_eq!(store.get_u32("huge"), None);
        assert_eq!(store.get_u64("huge"), Some(u64::MAX));
        assert_eq!(store.get_str("name"), Some("imo"));
        assert_eq!(store.get_str("missing"), None);
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("save.json");

        let mut store = JsonFileStore::open(&path).expect("missing file opens empty");
        assert!(store.get("points").is_none());
        store.put("points", json!(42));
        store.flush().expect("flush");

        let reopened = JsonFileStore::open(&path).expect("reopen");
        assert_eq!(reopened.get_u64("points"), Some(42));
    }

    #[test]
    fn file_store_rejects_non_object_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("save.json");
        fs::write(&path, "[1, 2, 3]").expect("write");

        assert!(matches!(
            JsonFileStore::open(&path),
            Err(PersistenceError::NotAnObject(_))
        ));
    }
}
