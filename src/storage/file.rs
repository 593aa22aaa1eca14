use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use super::{KeyValueStore, StorageError};

/// One file per key inside `dir`. Writes go through a temporary sibling and a
/// rename so a value is either the old one or the new one, never a torn mix.
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

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.starts_with('.') || key.contains(['/', '\\']) {
            return Err(StorageError::Unavailable(format!("invalid key `{}`", key)));
        }
        Ok(self.dir.join(key))
    }

    async fn write_atomic(path: &Path, tmp_path: &Path, value: &str) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let result = async {
            let mut file = tokio::fs::File::create(tmp_path).await?;
            file.write_all(value.as_bytes()).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(tmp_path, path).await
        }
        .await;
        if result.is_err() {
            // The temp file may not exist if `create` failed.
            let _ = tokio::fs::remove_file(tmp_path).await;
        }
        result
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp_path = self.dir.join(format!("{}.tmp", key));
        Self::write_atomic(&path, &tmp_path, value)
            .await
            .map_err(|e| StorageError::io(key, e))?;
        log::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{THEME_KEY, TODO_KEY};

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get(TODO_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        store.set(THEME_KEY, "dark").await.unwrap();
        assert_eq!(store.get(THEME_KEY).await.unwrap().as_deref(), Some("dark"));

        store.set(THEME_KEY, "light").await.unwrap();
        assert_eq!(store.get(THEME_KEY).await.unwrap().as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn keys_are_independent_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set(TODO_KEY, "[]").await.unwrap();
        store.set(THEME_KEY, "dark").await.unwrap();

        assert_eq!(std::fs::read_to_string(dir.path().join("my-todo")).unwrap(), "[]");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("theme-preference")).unwrap(),
            "dark"
        );
    }

    #[tokio::test]
    async fn no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set(TODO_KEY, "[]").await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["my-todo".to_string()]);
    }

    #[tokio::test]
    async fn dotted_keys_do_not_share_a_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("a.b", "first").await.unwrap();
        store.set("a.c", "second").await.unwrap();

        assert_eq!(store.get("a.b").await.unwrap().as_deref(), Some("first"));
        assert_eq!(store.get("a.c").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn failed_write_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // Renaming onto a non-empty directory fails after the temp file is written.
        std::fs::create_dir(dir.path().join(TODO_KEY)).unwrap();
        std::fs::write(dir.path().join(TODO_KEY).join("inner"), "x").unwrap();
        let store = FileStore::new(dir.path());

        assert!(matches!(
            store.set(TODO_KEY, "[]").await,
            Err(StorageError::Io { .. })
        ));
        assert!(!dir.path().join("my-todo.tmp").exists());
    }

    #[tokio::test]
    async fn rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.set("../escape", "x").await,
            Err(StorageError::Unavailable(_))
        ));
        assert!(store.get("").await.is_err());
    }

    #[tokio::test]
    async fn unreadable_value_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the value file should be cannot be read as a string.
        std::fs::create_dir(dir.path().join(TODO_KEY)).unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.get(TODO_KEY).await,
            Err(StorageError::Io { .. })
        ));
    }
}
