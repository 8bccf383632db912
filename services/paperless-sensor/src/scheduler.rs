//! Scheduler: refreshes every registered entity on a fixed interval

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio_util::sync::CancellationToken;

use crate::entity::Entity;
use crate::state::StateHandle;

/// Consecutive failures after which a warning is logged
const FAILURE_WARNING_THRESHOLD: u32 = 5;

/// Owns the entities and drives their `update()` calls
pub struct Scheduler {
    entities: Vec<Box<dyn Entity>>,
    interval: Duration,
    state: StateHandle,
    cancel: CancellationToken,
}

impl Scheduler {
    /// `state` must list the entities in the same order as `entities`
    pub fn new(
        entities: Vec<Box<dyn Entity>>,
        interval: Duration,
        state: StateHandle,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            entities,
            interval,
            state,
            cancel,
        }
    }

    /// Poll all entities. Returns when the cancellation token is triggered.
    pub async fn run(self) {
        let mut handles = Vec::new();

        for (index, entity) in self.entities.into_iter().enumerate() {
            let state = Arc::clone(&self.state);
            let cancel = self.cancel.clone();
            let interval = self.interval;

            handles.push(tokio::spawn(async move {
                update_loop(index, entity, state, interval, cancel).await;
            }));
        }

        self.cancel.cancelled().await;

        for handle in handles {
            let _ = handle.await;
        }
    }
}

async fn update_loop(
    index: usize,
    mut entity: Box<dyn Entity>,
    state: StateHandle,
    interval: Duration,
    cancel: CancellationToken,
) {
    let name = entity.name().to_string();
    loop {
        // The next update only starts once this one has finished
        tokio::select! {
            _ = entity.update() => {}
            _ = cancel.cancelled() => {
                tracing::debug!("Update of '{}' cancelled", name);
                break;
            }
        }

        let new_state = entity.state();
        let attributes = entity.extra_state_attributes();
        let now_ms = current_epoch_ms();

        let failures = state
            .write()
            .await
            .record_update(index, new_state, attributes, now_ms);
        if failures == Some(FAILURE_WARNING_THRESHOLD) {
            tracing::warn!(
                "Entity '{}' has {} consecutive failed updates",
                name,
                FAILURE_WARNING_THRESHOLD
            );
        }

        tracing::debug!("Updated '{}': state={:?}", name, new_state);

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = cancel.cancelled() => {
                tracing::debug!("Update loop for '{}' cancelled", name);
                break;
            }
        }
    }
}

fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
