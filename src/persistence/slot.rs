//! Durable key-value slots
//!
//! The interface mirrors the Web Storage API: whole string values under
//! string keys, replaced wholesale on every write.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::PersistenceError;

/// Key-value storage holding serialized record lists
pub trait SlotStorage {
    /// Read the value under `key`, `None` if it was never written
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the value under `key`
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError>;
}

impl<S: SlotStorage + ?Sized> SlotStorage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError> {
        (**self).remove_item(key)
    }
}

/// In-process slot storage
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    items: HashMap<String, String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot with existing contents
    pub fn with_item(key: &str, value: &str) -> Self {
        let mut items = HashMap::new();
        items.insert(key.to_string(), value.to_string());
        Self { items }
    }
}

impl SlotStorage for MemorySlot {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.items.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
///
/// Writes go to `<key>.json.tmp` first and are renamed over `<key>.json`,
/// so readers never observe a partially written slot.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SlotStorage for FileSlot {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::Io(e)),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::Io(e)),
        }
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug)]
pub struct LocalStorageSlot {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageSlot {
    /// Open the window's LocalStorage
    pub fn open() -> Result<Self, PersistenceError> {
        let storage = web_sys::window()
            .ok_or_else(|| PersistenceError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|e| PersistenceError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| PersistenceError::Unavailable("LocalStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl SlotStorage for LocalStorageSlot {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.storage
            .get_item(key)
            .map_err(|e| PersistenceError::Read(format!("{e:?}")))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| PersistenceError::Write(format!("{e:?}")))
    }

    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.storage
            .remove_item(key)
            .map_err(|e| PersistenceError::Write(format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_slot() {
        let mut slot = MemorySlot::new();
        assert_eq!(slot.get_item("k").unwrap(), None);
        slot.set_item("k", "[]").unwrap();
        assert_eq!(slot.get_item("k").unwrap().as_deref(), Some("[]"));
        slot.remove_item("k").unwrap();
        slot.remove_item("k").unwrap();
        assert_eq!(slot.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_file_slot_replaces_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let mut slot = FileSlot::new(dir.path().join("nested"));
        assert_eq!(slot.get_item("fishList").unwrap(), None);

        slot.set_item("fishList", r#"[{"a":1},{"b":2}]"#).unwrap();
        slot.set_item("fishList", "[]").unwrap();
        assert_eq!(slot.get_item("fishList").unwrap().as_deref(), Some("[]"));
        assert!(!slot.dir().join("fishList.json.tmp").exists());

        slot.remove_item("fishList").unwrap();
        slot.remove_item("fishList").unwrap();
        assert_eq!(slot.get_item("fishList").unwrap(), None);
    }
}
