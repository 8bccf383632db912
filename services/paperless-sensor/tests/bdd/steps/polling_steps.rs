//! BDD step definitions for the document polling feature

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use cucumber::{given, then, when};

use paperless_sensor::config::PlatformConfig;
use paperless_sensor::entity::Entity;
use paperless_sensor::host::EntityRegistry;
use paperless_sensor::io::{HttpClient, HttpResponse};
use paperless_sensor::sensor::{setup_platform, PaperlessSensor, ATTR_LATEST_DOCUMENT};
use paperless_sensor::PaperlessError;

use crate::world::SensorWorld;

const BASE_URL: &str = "http://paperless.local:8000";

/// An HTTP client that plays back scripted replies; the last one repeats
struct ScriptedClient {
    replies: Mutex<VecDeque<Result<HttpResponse, String>>>,
}

impl ScriptedClient {
    fn new(replies: Vec<Result<HttpResponse, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }

    fn ok(body: String) -> Result<HttpResponse, String> {
        Ok(HttpResponse { status: 200, body })
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedClient {
    async fn get(
        &self,
        _url: &str,
        _headers: &[(&str, &str)],
    ) -> paperless_sensor::Result<HttpResponse> {
        let reply = {
            let mut replies = self.replies.lock().expect("replies lock poisoned");
            if replies.len() > 1 {
                replies.pop_front()
            } else {
                replies.front().cloned()
            }
        };
        match reply.expect("no scripted reply") {
            Ok(r) => Ok(r),
            Err(msg) => Err(PaperlessError::Http(msg)),
        }
    }
}

fn use_client(world: &mut SensorWorld, client: ScriptedClient) {
    world.sensor = Some(PaperlessSensor::new(BASE_URL, "abc123", Arc::new(client)));
}

fn page(titles: &[&str]) -> String {
    let results: Vec<serde_json::Value> = titles
        .iter()
        .map(|t| serde_json::json!({ "title": t }))
        .collect();
    serde_json::json!({ "count": results.len(), "results": results }).to_string()
}

#[given(expr = "a server returning titles {string}")]
fn server_returning_titles(world: &mut SensorWorld, titles: String) {
    let titles: Vec<&str> = titles.split(", ").collect();
    use_client(world, ScriptedClient::new(vec![ScriptedClient::ok(page(&titles))]));
}

#[given("a server returning no documents")]
fn server_returning_nothing(world: &mut SensorWorld) {
    use_client(world, ScriptedClient::new(vec![ScriptedClient::ok(page(&[]))]));
}

#[given("a server returning a page without results")]
fn server_returning_bad_page(world: &mut SensorWorld) {
    use_client(
        world,
        ScriptedClient::new(vec![ScriptedClient::ok(r#"{"count": 3}"#.to_string())]),
    );
}

#[given("an unreachable server")]
fn unreachable_server(world: &mut SensorWorld) {
    use_client(
        world,
        ScriptedClient::new(vec![Err("connection refused".to_string())]),
    );
}

#[given(expr = "a server answering with status {int}")]
fn server_with_status(world: &mut SensorWorld, status: u16) {
    use_client(
        world,
        ScriptedClient::new(vec![Ok(HttpResponse {
            status,
            body: r#"{"detail": "error"}"#.to_string(),
        })]),
    );
}

#[given("a server that succeeds once and then fails")]
fn server_succeeds_then_fails(world: &mut SensorWorld) {
    use_client(
        world,
        ScriptedClient::new(vec![
            ScriptedClient::ok(page(&["Only"])),
            Err("timed out".to_string()),
        ]),
    );
}

#[when("the sensor updates")]
async fn sensor_updates(world: &mut SensorWorld) {
    let sensor = world.sensor.as_mut().expect("sensor not set");
    sensor.update().await;
}

#[then(expr = "the sensor state is {int}")]
fn state_is(world: &mut SensorWorld, expected: u64) {
    let sensor = world.sensor.as_ref().expect("sensor not set");
    assert_eq!(sensor.state(), Some(expected));
}

#[then("the sensor state is unknown")]
fn state_is_unknown(world: &mut SensorWorld) {
    let sensor = world.sensor.as_ref().expect("sensor not set");
    assert_eq!(sensor.state(), None);
}

#[then(expr = "the latest document is {string}")]
fn latest_document_is(world: &mut SensorWorld, expected: String) {
    let sensor = world.sensor.as_ref().expect("sensor not set");
    let attributes = sensor.extra_state_attributes();
    assert_eq!(
        attributes.get(ATTR_LATEST_DOCUMENT),
        Some(&serde_json::Value::String(expected))
    );
}

#[then("the latest document is null")]
fn latest_document_is_null(world: &mut SensorWorld) {
    let sensor = world.sensor.as_ref().expect("sensor not set");
    let attributes = sensor.extra_state_attributes();
    assert_eq!(
        attributes.get(ATTR_LATEST_DOCUMENT),
        Some(&serde_json::Value::Null)
    );
}

#[then("the sensor has no attributes")]
fn no_attributes(world: &mut SensorWorld) {
    let sensor = world.sensor.as_ref().expect("sensor not set");
    assert!(sensor.extra_state_attributes().is_empty());
}

#[given(expr = "a sensor block with url {string} and no token")]
fn block_without_token(world: &mut SensorWorld, url: String) {
    world.platform = Some(PlatformConfig {
        url: Some(url),
        api_token: None,
    });
}

#[given(expr = "a sensor block with url {string} and token {string}")]
fn block_with_token(world: &mut SensorWorld, url: String, token: String) {
    world.platform = Some(PlatformConfig {
        url: Some(url),
        api_token: Some(token),
    });
}

#[when("the platform is set up")]
fn platform_set_up(world: &mut SensorWorld) {
    let platform = world.platform.as_ref().expect("platform not set");
    let mut registry = EntityRegistry::new();
    setup_platform(
        platform,
        Arc::new(ScriptedClient::new(vec![])),
        &mut registry,
    );
    world.registry = Some(registry);
}

#[then(expr = "{int} sensors are registered")]
fn sensors_registered(world: &mut SensorWorld, expected: usize) {
    let registry = world.registry.as_ref().expect("registry not set");
    assert_eq!(registry.len(), expected);
}
