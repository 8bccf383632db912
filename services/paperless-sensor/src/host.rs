//! Host-platform capabilities the wizard and the sensor plug into

use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// Integration domain the config entries are keyed under
pub const DOMAIN: &str = "paperless_ngx";

/// Display name of the service
pub const TITLE: &str = "Paperless-ngx";

/// Settings collected by the setup wizard
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntryData {
    pub url: String,
    pub api_token: String,
}

impl std::fmt::Debug for ConfigEntryData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigEntryData")
            .field("url", &self.url)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// A persisted integration instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub entry_id: String,
    pub domain: String,
    pub title: String,
    pub data: ConfigEntryData,
}

/// Accepts a config-data mapping and persists it as a new entry
pub trait ConfigEntrySink {
    fn create_entry(&mut self, title: &str, data: ConfigEntryData) -> crate::Result<ConfigEntry>;
}

/// Accepts a sequence of entities to register for display and polling
pub trait AddEntities {
    fn add_entities(&mut self, entities: Vec<Box<dyn Entity>>);
}

/// Collects registered entities until the scheduler takes them over
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: Vec<Box<dyn Entity>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.entities.iter().map(|e| e.name().to_string()).collect()
    }

    pub fn into_entities(self) -> Vec<Box<dyn Entity>> {
        self.entities
    }
}

impl AddEntities for EntityRegistry {
    fn add_entities(&mut self, entities: Vec<Box<dyn Entity>>) {
        for entity in &entities {
            tracing::debug!("Registering entity '{}'", entity.name());
        }
        self.entities.extend(entities);
    }
}
