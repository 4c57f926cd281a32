//! Whole-collection persistence over a string key-value capability.
//!
//! Values are serialized as JSON and overwritten in full on every save.
//! Reads never fail: a missing, unreadable or corrupt entry yields the
//! caller's default, and the corruption is only reported to the log.

use super::files::{atomic_write, read_file};
use anyhow::{Context, Result};
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Storage keys used by the task store
pub const TASKS_KEY: &str = "tasks";
pub const TAGS_KEY: &str = "tags";

/// Opaque string key-value capability
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        read_file(self.path_for(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;
        atomic_write(self.path_for(key), &value)
    }
}

/// Process-local store, used by tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Load the value stored under `key`, or `default` when it is absent or unusable
pub fn load<S, V>(store: &S, key: &str, default: V) -> V
where
    S: KeyValueStore + ?Sized,
    V: DeserializeOwned,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default,
        Err(err) => {
            warn!("event=store_read module=persistence status=error key={} err={:#}", key, err);
            return default;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                "event=store_parse module=persistence status=corrupt key={} err={}",
                key, err
            );
            default
        }
    }
}

/// Overwrite the value under `key`. Failures are logged and swallowed.
pub fn save<S, V>(store: &mut S, key: &str, value: &V) -> bool
where
    S: KeyValueStore + ?Sized,
    V: Serialize + ?Sized,
{
    let result = serde_json::to_string_pretty(value)
        .context("Failed to serialize value")
        .and_then(|json| store.set(key, json));

    match result {
        Ok(()) => true,
        Err(err) => {
            error!("event=store_write module=persistence status=error key={} err={:#}", key, err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            anyhow::bail!("disk on fire")
        }

        fn set(&mut self, _key: &str, _value: String) -> Result<()> {
            anyhow::bail!("disk on fire")
        }
    }

    #[test]
    fn test_load_missing_returns_default() {
        let store = MemoryStore::new();
        let tasks: Vec<String> = load(&store, TASKS_KEY, Vec::new());
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_load_corrupt_returns_default() {
        let store = MemoryStore::new().with_entry(TASKS_KEY, "{not json");
        let tasks: Vec<String> = load(&store, TASKS_KEY, vec!["fallback".to_string()]);
        assert_eq!(tasks, vec!["fallback".to_string()]);
    }

    #[test]
    fn test_load_wrong_shape_returns_default() {
        let store = MemoryStore::new().with_entry(TASKS_KEY, "{\"a\": 1}");
        let tasks: Vec<String> = load(&store, TASKS_KEY, Vec::new());
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        assert!(save(&mut store, TAGS_KEY, &vec!["a", "b"]));

        let loaded: Vec<String> = load(&store, TAGS_KEY, Vec::new());
        assert_eq!(loaded, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_broken_store_is_not_fatal() {
        let mut store = BrokenStore;
        let loaded: Vec<u32> = load(&store, TASKS_KEY, vec![7]);
        assert_eq!(loaded, vec![7]);
        assert!(!save(&mut store, TASKS_KEY, &vec![1, 2]));
    }

    #[test]
    fn test_file_store_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(temp_dir.path().join("data"));

        assert_eq!(store.get(TASKS_KEY).unwrap(), None);
        store.set(TASKS_KEY, "[]".to_string()).unwrap();
        assert_eq!(store.get(TASKS_KEY).unwrap().as_deref(), Some("[]"));
        assert!(temp_dir.path().join("data").join("tasks.json").exists());
    }
}
