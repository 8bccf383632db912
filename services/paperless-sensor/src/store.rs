//! Config entry storage backed by a JSON file

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::host::{ConfigEntry, ConfigEntryData, ConfigEntrySink, DOMAIN};
use crate::PaperlessError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    entries: Vec<ConfigEntry>,
}

/// Persistent list of config entries
#[derive(Debug)]
pub struct EntryStore {
    path: PathBuf,
    entries: Vec<ConfigEntry>,
}

impl EntryStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> crate::Result<Self> {
        let entries = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                PaperlessError::Store(format!("Failed to read entry store {:?}: {}", path, e))
            })?;
            let file: StoreFile = serde_json::from_str(&content)?;
            file.entries
        } else {
            tracing::debug!("Entry store {:?} does not exist yet", path);
            Vec::new()
        };

        tracing::debug!("Loaded {} config entries from {:?}", entries.len(), path);
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    /// Remove an entry, returning whether it existed
    pub fn remove(&mut self, entry_id: &str) -> crate::Result<bool> {
        let Some(index) = self.entries.iter().position(|e| e.entry_id == entry_id) else {
            return Ok(false);
        };
        let removed = self.entries.remove(index);
        if let Err(e) = self.save() {
            self.entries.insert(index, removed);
            return Err(e);
        }
        tracing::info!("Removed config entry {}", entry_id);
        Ok(true)
    }

    fn save(&self) -> crate::Result<()> {
        let file = StoreFile {
            entries: self.entries.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, content).map_err(|e| {
            PaperlessError::Store(format!(
                "Failed to write entry store {:?}: {}",
                self.path, e
            ))
        })
    }
}

impl ConfigEntrySink for EntryStore {
    fn create_entry(&mut self, title: &str, data: ConfigEntryData) -> crate::Result<ConfigEntry> {
        let entry = ConfigEntry {
            entry_id: uuid::Uuid::new_v4().to_string(),
            domain: DOMAIN.to_string(),
            title: title.to_string(),
            data,
        };
        self.entries.push(entry.clone());
        if let Err(e) = self.save() {
            self.entries.pop();
            return Err(e);
        }
        tracing::info!("Created config entry {} for {}", entry.entry_id, entry.data.url);
        Ok(entry)
    }
}
