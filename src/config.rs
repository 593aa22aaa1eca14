use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::storage::FileStore;

pub const APP_ID: &str = "dev.tasklight.app";
pub const CONFIG_VERSION: u64 = 1;

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("tasklight")
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, CosmicConfigEntry)]
pub struct TasklightConfig {
    /// Directory holding one file per storage key.
    pub data_directory: PathBuf,
    pub debug_logging: bool,
}

impl Default for TasklightConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_dir(),
            debug_logging: false,
        }
    }
}

impl TasklightConfig {
    pub fn open_store(&self) -> FileStore {
        FileStore::new(self.data_directory.clone())
    }
}
