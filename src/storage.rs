use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::StorageError;
use crate::models::Task;

pub const TASKS_KEY: &str = "tasks";
pub const SETTINGS_KEY: &str = "settings";

/// Abstract persistence. Values are opaque strings (JSON in practice).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key under `root`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn ensure_dirs(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn write_atomic(&self, path: PathBuf, bytes: &[u8]) -> Result<(), StorageError> {
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        fs::rename(temp_path, path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut file = match File::open(self.path_for(key)) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mut buf = String::new();
        file.read_to_string(&mut buf)?;
        Ok(Some(buf))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write_atomic(self.path_for(key), value.as_bytes())
    }
}

/// In-process store. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.entries.lock().expect("store poisoned");
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self.entries.lock().expect("store poisoned");
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads the task list. Any record that fails to parse, has blank text or reuses
/// an id abandons the whole load.
pub fn load_tasks(store: &dyn KeyValueStore) -> Result<Vec<Task>, StorageError> {
    let Some(raw) = store.get(TASKS_KEY)? else {
        return Ok(Vec::new());
    };
    let tasks: Vec<Task> = serde_json::from_str(&raw).map_err(|source| StorageError::Parse {
        key: TASKS_KEY.to_string(),
        source,
    })?;
    check_tasks(&tasks)?;
    Ok(tasks)
}

fn check_tasks(tasks: &[Task]) -> Result<(), StorageError> {
    let mut seen = HashSet::new();
    for task in tasks {
        let reason = if task.text.trim().is_empty() {
            format!("task {} has empty text", task.id)
        } else if !seen.insert(task.id.as_str()) {
            format!("duplicate task id {}", task.id)
        } else {
            continue;
        };
        return Err(StorageError::Invalid {
            key: TASKS_KEY.to_string(),
            reason,
        });
    }
    Ok(())
}

pub fn save_tasks(store: &dyn KeyValueStore, tasks: &[Task]) -> Result<(), StorageError> {
    let json = serde_json::to_string(tasks)?;
    store.set(TASKS_KEY, &json)
}
