//! String key/value persistence backing the bet services.
//!
//! Values are opaque strings (the services store JSON). Writes are last-write-wins.

use crate::error::StorageError;
use redb::{Database, ReadableTable, TableDefinition};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Every key lives in this one table: key (String) → JSON value (String)
const ITEMS: TableDefinition<&str, &str> = TableDefinition::new("items");

pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;

    /// Write several keys together. Transactional backends commit them all or none.
    fn set_items(&mut self, items: Vec<(&str, String)>) -> Result<(), StorageError> {
        for (key, value) in items {
            self.set_item(key, value)?;
        }
        Ok(())
    }

    fn remove_items(&mut self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.remove_item(key)?;
        }
        Ok(())
    }
}

impl<T: Storage + ?Sized> Storage for &mut T {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }

    fn set_items(&mut self, items: Vec<(&str, String)>) -> Result<(), StorageError> {
        (**self).set_items(items)
    }

    fn remove_items(&mut self, keys: &[&str]) -> Result<(), StorageError> {
        (**self).remove_items(keys)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// An embedded redb database file. Each write is its own ACID transaction,
/// and `set_items`/`remove_items` commit a whole batch at once.
pub struct FileStorage {
    path: PathBuf,
    db: Database,
}

impl FileStorage {
    /// Create or open the database, creating missing parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let db = create_database(&path)?;
        debug!("Opened storage at {}", path.display());
        Ok(Self { path, db })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self, key: &str) -> Result<Option<String>, redb::Error> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ITEMS)?;
        let value = table.get(key)?.map(|guard| guard.value().to_string());
        Ok(value)
    }

    fn commit_writes(&self, items: &[(&str, String)]) -> Result<(), redb::Error> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ITEMS)?;
            for (key, value) in items {
                table.insert(*key, value.as_str())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    fn commit_removals(&self, keys: &[&str]) -> Result<(), redb::Error> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ITEMS)?;
            for key in keys {
                table.remove(*key)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }
}

fn create_database(path: &Path) -> Result<Database, redb::Error> {
    let db = Database::create(path)?;

    // Make sure the table exists before the first read transaction
    let write_txn = db.begin_write()?;
    {
        let _ = write_txn.open_table(ITEMS)?;
    }
    write_txn.commit()?;
    Ok(db)
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read(key)?)
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        Ok(self.commit_writes(&[(key, value)])?)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        Ok(self.commit_removals(&[key])?)
    }

    fn set_items(&mut self, items: Vec<(&str, String)>) -> Result<(), StorageError> {
        self.commit_writes(&items)?;
        debug!("Committed {} keys to {}", items.len(), self.path.display());
        Ok(())
    }

    fn remove_items(&mut self, keys: &[&str]) -> Result<(), StorageError> {
        Ok(self.commit_removals(keys)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        storage.set_item("k", "v".to_string()).unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
        storage.remove_item("k").unwrap();
        assert!(storage.get_item("k").unwrap().is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_file_storage_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("store.redb");

        {
            let mut storage = FileStorage::open(&path).unwrap();
            storage.set_item("betapp_bets", "[]".to_string()).unwrap();
            storage.set_item("groupBets", "[1]".to_string()).unwrap();
            storage.remove_item("groupBets").unwrap();
            storage.remove_item("never-written").unwrap();
        }

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get_item("betapp_bets").unwrap().as_deref(), Some("[]"));
        assert!(storage.get_item("groupBets").unwrap().is_none());
    }

    #[test]
    fn test_batched_writes_land_together() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.redb");

        {
            let mut storage = FileStorage::open(&path).unwrap();
            storage
                .set_items(vec![
                    ("betapp_bets", "[\"a\"]".to_string()),
                    ("betapp_user_bets", "[]".to_string()),
                    ("betapp_user_created_bets", "[\"a\"]".to_string()),
                ])
                .unwrap();
        }

        let mut storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get_item("betapp_user_bets").unwrap().as_deref(), Some("[]"));
        assert_eq!(
            storage.get_item("betapp_user_created_bets").unwrap().as_deref(),
            Some("[\"a\"]")
        );

        storage.remove_items(&["betapp_bets", "betapp_user_bets"]).unwrap();
        assert!(storage.get_item("betapp_bets").unwrap().is_none());
        assert!(storage.get_item("betapp_user_created_bets").unwrap().is_some());
    }

    #[test]
    fn test_borrowed_storage_writes_through() {
        fn write<S: Storage>(mut storage: S) {
            storage.set_item("groupBets", "[]".to_string()).unwrap();
            storage.set_items(vec![("a", "1".to_string()), ("b", "2".to_string())]).unwrap();
        }

        let mut storage = MemoryStorage::new();
        write(&mut storage);
        assert_eq!(storage.len(), 3);
    }

    #[test]
    fn test_file_storage_rejects_garbage_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.redb");
        fs::write(&path, "not a database ".repeat(512)).unwrap();
        assert!(matches!(FileStorage::open(&path), Err(StorageError::Db(_))));
    }
}
