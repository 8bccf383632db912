//! BDD step definitions for the setup wizard feature

use cucumber::{given, then, when};

use paperless_sensor::config_flow::{ConfigFlow, FlowResult};
use paperless_sensor::host::ConfigEntryData;

use crate::world::SensorWorld;

fn created_data(world: &SensorWorld) -> &ConfigEntryData {
    match world.flow_result.as_ref().expect("no flow result") {
        FlowResult::CreateEntry { data, .. } => data,
        other => panic!("expected an entry, got {:?}", other),
    }
}

#[given("a new setup wizard")]
fn new_wizard(world: &mut SensorWorld) {
    world.flow = Some(ConfigFlow::new());
}

#[when("the user step runs without input")]
fn step_without_input(world: &mut SensorWorld) {
    let flow = world.flow.as_mut().expect("flow not set");
    world.flow_result = Some(flow.step_user(None));
}

#[when(expr = "the user submits url {string} and token {string}")]
fn submit(world: &mut SensorWorld, url: String, token: String) {
    let flow = world.flow.as_mut().expect("flow not set");
    world.flow_result = Some(flow.step_user(Some(ConfigEntryData {
        url,
        api_token: token,
    })));
}

#[then(expr = "a form with step id {string} is shown")]
fn form_shown(world: &mut SensorWorld, expected: String) {
    match world.flow_result.as_ref().expect("no flow result") {
        FlowResult::ShowForm { step_id, .. } => assert_eq!(*step_id, expected),
        other => panic!("expected a form, got {:?}", other),
    }
}

#[then(expr = "the form requires the fields {string} and {string}")]
fn form_fields(world: &mut SensorWorld, first: String, second: String) {
    match world.flow_result.as_ref().expect("no flow result") {
        FlowResult::ShowForm { data_schema, .. } => {
            let required: Vec<&str> = data_schema
                .fields
                .iter()
                .filter(|f| f.required)
                .map(|f| f.name)
                .collect();
            assert_eq!(required, vec![first.as_str(), second.as_str()]);
        }
        other => panic!("expected a form, got {:?}", other),
    }
}

#[then("the form has no errors")]
fn form_without_errors(world: &mut SensorWorld) {
    match world.flow_result.as_ref().expect("no flow result") {
        FlowResult::ShowForm { errors, .. } => assert!(errors.is_empty()),
        other => panic!("expected a form, got {:?}", other),
    }
}

#[then(expr = "an entry titled {string} is created")]
fn entry_created(world: &mut SensorWorld, expected: String) {
    match world.flow_result.as_ref().expect("no flow result") {
        FlowResult::CreateEntry { title, .. } => assert_eq!(*title, expected),
        other => panic!("expected an entry, got {:?}", other),
    }
}

#[then(expr = "the entry url is {string}")]
fn entry_url(world: &mut SensorWorld, expected: String) {
    assert_eq!(created_data(world).url, expected);
}

#[then(expr = "the entry token is {string}")]
fn entry_token(world: &mut SensorWorld, expected: String) {
    assert_eq!(created_data(world).api_token, expected);
}

#[then(expr = "the wizard aborts with reason {string}")]
fn wizard_aborts(world: &mut SensorWorld, expected: String) {
    match world.flow_result.as_ref().expect("no flow result") {
        FlowResult::Abort { reason } => assert_eq!(*reason, expected),
        other => panic!("expected an abort, got {:?}", other),
    }
}
