//! Shared state holding the latest displayed value of each entity

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::entity::Attributes;

/// Displayed status of a single entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStatus {
    pub name: String,
    pub state: Option<u64>,
    pub attributes: Attributes,
    pub last_update_epoch_ms: u64,
    pub consecutive_failures: u32,
    pub scan_interval_ms: u64,
}

/// Shared state accessible by scheduler and dashboard
#[derive(Debug, Default)]
pub struct SharedState {
    pub entities: Vec<EntityStatus>,
}

impl SharedState {
    pub fn new(entities: Vec<(String, u64)>) -> Self {
        let entities = entities
            .into_iter()
            .map(|(name, scan_interval_ms)| EntityStatus {
                name,
                state: None,
                attributes: Attributes::new(),
                last_update_epoch_ms: 0,
                consecutive_failures: 0,
                scan_interval_ms,
            })
            .collect();

        Self { entities }
    }

    /// Replace the entity's displayed value, returning the consecutive failure
    /// count after the update, or `None` for an unregistered entity
    pub fn record_update(
        &mut self,
        index: usize,
        state: Option<u64>,
        attributes: Attributes,
        now_ms: u64,
    ) -> Option<u32> {
        let status = self.entities.get_mut(index)?;
        status.state = state;
        status.attributes = attributes;
        status.last_update_epoch_ms = now_ms;
        if state.is_none() {
            status.consecutive_failures += 1;
        } else {
            status.consecutive_failures = 0;
        }
        Some(status.consecutive_failures)
    }

    pub fn get(&self, name: &str) -> Option<&EntityStatus> {
        self.entities.iter().find(|e| e.name == name)
    }
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<SharedState>>;

pub fn new_state_handle(entities: Vec<(String, u64)>) -> StateHandle {
    Arc::new(RwLock::new(SharedState::new(entities)))
}
