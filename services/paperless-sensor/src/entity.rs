//! Entity trait: the displayed object the scheduler refreshes

use std::collections::BTreeMap;

use async_trait::async_trait;

/// Extra attributes shown next to an entity's state
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// A displayed object with a name, a current value and extra attributes
#[async_trait]
pub trait Entity: Send + Sync + std::fmt::Debug {
    /// Display name
    fn name(&self) -> &str;

    /// Current state, `None` when unknown
    fn state(&self) -> Option<u64>;

    /// Extra state attributes
    fn extra_state_attributes(&self) -> Attributes;

    /// Refresh the state. Never fails; failures surface as an unknown state.
    async fn update(&mut self);
}
