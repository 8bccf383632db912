//! JSON endpoints exposing the displayed entity states

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::state::StateHandle;

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardState {
    pub state: StateHandle,
}

/// Build the dashboard axum router
pub fn build_router(state: StateHandle) -> Router {
    let dashboard_state = DashboardState { state };

    Router::new()
        .route("/api/states", get(states_handler))
        .route("/health", get(health_handler))
        .with_state(dashboard_state)
}

async fn states_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.state.read().await;

    let statuses: Vec<serde_json::Value> = state
        .entities
        .iter()
        .map(|e| {
            serde_json::json!({
                "name": e.name,
                "state": e.state,
                "attributes": e.attributes,
                "last_update_epoch_ms": e.last_update_epoch_ms,
                "consecutive_failures": e.consecutive_failures,
                "scan_interval_ms": e.scan_interval_ms,
            })
        })
        .collect();

    axum::Json(statuses)
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
