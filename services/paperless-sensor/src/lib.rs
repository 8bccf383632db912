//! Paperless-ngx sensor
//!
//! Polls a Paperless-ngx server for its document list and exposes the document
//! count and the newest document's title, with a setup wizard that stores the
//! server URL and API token.

pub mod api;
pub mod config;
pub mod config_flow;
pub mod dashboard;
pub mod entity;
pub mod error;
pub mod host;
pub mod io;
pub mod scheduler;
pub mod sensor;
pub mod state;
pub mod store;

pub use config::{load_config, Config};
pub use error::{PaperlessError, Result};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::host::EntityRegistry;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::scheduler::Scheduler;
use crate::store::EntryStore;

/// Register one sensor per stored config entry and per platform block
pub fn register_entities(
    config: &Config,
    store: &EntryStore,
    http: Arc<dyn HttpClient>,
) -> EntityRegistry {
    let mut registry = EntityRegistry::new();

    for entry in store.entries() {
        sensor::setup_entry(entry, Arc::clone(&http), &mut registry);
    }
    for platform in &config.sensor {
        sensor::setup_platform(platform, Arc::clone(&http), &mut registry);
    }

    registry
}

/// Run the sensor service with the given configuration
pub async fn run(config: Config) -> Result<()> {
    config.validate()?;

    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let store = EntryStore::open(&config.entries_path)?;
    let registry = register_entities(&config, &store, http);

    if registry.is_empty() {
        tracing::warn!("No sensors configured; run the setup command or add a sensor block");
    }

    let scan_interval_ms = config.scan_interval.as_millis() as u64;
    let state = state::new_state_handle(
        registry
            .names()
            .into_iter()
            .map(|name| (name, scan_interval_ms))
            .collect(),
    );
    let cancel = CancellationToken::new();

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    if config.dashboard.enabled {
        let dashboard_port = config.dashboard.port;
        let dashboard_state = Arc::clone(&state);
        let cancel_for_dashboard = cancel.clone();

        tokio::spawn(async move {
            let router = dashboard::build_router(dashboard_state);
            let addr = SocketAddr::from(([0, 0, 0, 0], dashboard_port));
            tracing::info!("Dashboard listening on http://{}", addr);

            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(l) => l,
                Err(e) => {
                    tracing::error!(
                        "Failed to bind dashboard to port {}: {}. Continuing without dashboard.",
                        dashboard_port,
                        e
                    );
                    return;
                }
            };

            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    cancel_for_dashboard.cancelled().await;
                })
                .await
                .ok();

            tracing::debug!("Dashboard stopped");
        });
    }

    tracing::info!(
        "Polling {} sensor(s) every {}",
        registry.len(),
        humantime::format_duration(config.scan_interval)
    );

    Scheduler::new(
        registry.into_entities(),
        config.scan_interval,
        state,
        cancel,
    )
    .run()
    .await;

    tracing::info!("Sensor service stopped");
    Ok(())
}
