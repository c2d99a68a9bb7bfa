use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFIG_VERSION: u64 = 1;

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("fichario")
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, CosmicConfigEntry)]
pub struct FicharioConfig {
    pub data_directory: PathBuf,
    pub browser_command: String,
    pub debug_logging: bool,
}

impl Default for FicharioConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_dir(),
            browser_command: "xdg-open".into(),
            debug_logging: false,
        }
    }
}

impl FicharioConfig {
    /// Ensure the data directory exists. The card collection and backup
    /// files are created lazily on first write.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_directory)
    }

    /// Where exports land; falls back to the data directory when the
    /// platform has no download directory.
    pub fn export_dir(&self) -> PathBuf {
        dirs::download_dir().unwrap_or_else(|| self.data_directory.clone())
    }

    /// Fixed import location: `fichario-export.json` in the export dir.
    pub fn import_path(&self) -> PathBuf {
        self.export_dir().join("fichario-export.json")
    }
}
