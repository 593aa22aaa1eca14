pub mod file;
#[cfg(test)]
pub mod memory;

use std::future::Future;

pub use file::FileStore;
#[cfg(test)]
pub use memory::MemoryStore;

/// Key holding the serialized to-do list.
pub const TODO_KEY: &str = "my-todo";

/// Key holding the last stored list that could not be parsed, kept so the next
/// write to `TODO_KEY` does not destroy it.
pub const TODO_BACKUP_KEY: &str = "my-todo.bak";

/// Key holding `"light"` or `"dark"`.
pub const THEME_KEY: &str = "theme-preference";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("i/o error on `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed value under `{key}`: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn io(key: &str, source: std::io::Error) -> Self {
        Self::Io {
            key: key.to_string(),
            source,
        }
    }

    pub fn malformed(key: &str, source: serde_json::Error) -> Self {
        Self::Malformed {
            key: key.to_string(),
            source,
        }
    }
}

/// String-keyed, string-valued persistence. There is no transaction across
/// keys; each `set` replaces one value.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}
