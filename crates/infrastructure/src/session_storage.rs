//! 本地会话存储

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use application::{SessionStorage, StorageError};

/// 每个键保存为目录下的一个 `<key>.json` 文件
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StorageError(format!("invalid storage key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError(format!("{}: {err}", path.display()))),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        fs::create_dir_all(&self.dir)
            .map_err(|err| StorageError(format!("{}: {err}", self.dir.display())))?;
        fs::write(&path, value).map_err(|err| StorageError(format!("{}: {err}", path.display())))?;
        tracing::debug!(path = %path.display(), "会话已保存");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError(format!("{}: {err}", path.display()))),
        }
    }
}

/// 进程内存储，进程退出即丢失
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|err| StorageError(err.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(|err| StorageError(err.to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(|err| StorageError(err.to_string()))?
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::SESSION_STORAGE_KEY;

    #[test]
    fn file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("sessions"));

        assert_eq!(storage.load(SESSION_STORAGE_KEY).unwrap(), None);

        storage.save(SESSION_STORAGE_KEY, r#"{"a":1}"#).unwrap();
        assert_eq!(
            storage.load(SESSION_STORAGE_KEY).unwrap().as_deref(),
            Some(r#"{"a":1}"#)
        );
        assert!(dir
            .path()
            .join("sessions")
            .join("odie-supabase-auth-token.json")
            .exists());

        storage.remove(SESSION_STORAGE_KEY).unwrap();
        assert_eq!(storage.load(SESSION_STORAGE_KEY).unwrap(), None);
        // 重复删除不报错
        storage.remove(SESSION_STORAGE_KEY).unwrap();
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path());
        assert!(storage.save("../escape", "x").is_err());
        assert!(storage.load("").is_err());
    }

    #[test]
    fn memory_storage() {
        let storage = MemorySessionStorage::default();
        storage.save("k", "v").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("v"));
        storage.remove("k").unwrap();
        assert_eq!(storage.load("k").unwrap(), None);
    }
}
