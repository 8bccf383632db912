//! BDD test world for the Paperless-ngx sensor

use cucumber::World;
use paperless_sensor::config::PlatformConfig;
use paperless_sensor::config_flow::{ConfigFlow, FlowResult};
use paperless_sensor::host::EntityRegistry;
use paperless_sensor::sensor::PaperlessSensor;

#[derive(Debug, Default, World)]
pub struct SensorWorld {
    // Setup wizard
    pub flow: Option<ConfigFlow>,
    pub flow_result: Option<FlowResult>,

    // Polling
    pub sensor: Option<PaperlessSensor>,

    // Platform setup
    pub platform: Option<PlatformConfig>,
    pub registry: Option<EntityRegistry>,
}
