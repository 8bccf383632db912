//! Setup wizard: a single form step collecting the service URL and API token

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::host::{ConfigEntry, ConfigEntryData, ConfigEntrySink, TITLE};
use crate::PaperlessError;

/// Field errors keyed by field name
pub type FormErrors = BTreeMap<String, String>;

/// Value type accepted by a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
}

/// One field of a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// Declared shape of a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSchema {
    pub fields: Vec<FieldSchema>,
}

impl DataSchema {
    /// Schema of the user step: `url` and `api_token`, both required strings
    pub fn user() -> Self {
        Self {
            fields: vec![
                FieldSchema {
                    name: "url",
                    kind: FieldKind::String,
                    required: true,
                },
                FieldSchema {
                    name: "api_token",
                    kind: FieldKind::String,
                    required: true,
                },
            ],
        }
    }

    /// Check a submitted form the way the form engine does before handing it
    /// back to the flow. Only presence and type are checked; values are
    /// passed through untouched.
    pub fn validate(&self, input: &Map<String, Value>) -> Result<ConfigEntryData, FormErrors> {
        let mut errors = FormErrors::new();
        for field in &self.fields {
            let present = match input.get(field.name) {
                Some(Value::String(s)) => !s.is_empty(),
                _ => false,
            };
            if field.required && !present {
                errors.insert(field.name.to_string(), "required".to_string());
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        serde_json::from_value(Value::Object(input.clone())).map_err(|e| {
            let mut errors = FormErrors::new();
            errors.insert("base".to_string(), e.to_string());
            errors
        })
    }
}

/// What the flow asks the host to do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowResult {
    ShowForm {
        step_id: &'static str,
        data_schema: DataSchema,
        errors: FormErrors,
    },
    CreateEntry {
        title: String,
        data: ConfigEntryData,
    },
    Abort {
        reason: &'static str,
    },
}

/// Position of the flow in its two-state lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    AwaitingInput,
    Submitted,
}

/// The setup wizard for one integration instance
#[derive(Debug)]
pub struct ConfigFlow {
    step: FlowStep,
}

impl Default for ConfigFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigFlow {
    pub const VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            step: FlowStep::AwaitingInput,
        }
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    /// Run the user step: show the form when no input is given, otherwise
    /// finish with an entry carrying the input verbatim.
    pub fn step_user(&mut self, user_input: Option<ConfigEntryData>) -> FlowResult {
        if self.step == FlowStep::Submitted {
            return FlowResult::Abort {
                reason: "already_submitted",
            };
        }

        match user_input {
            Some(data) => {
                tracing::debug!("Setup wizard submitted for {}", data.url);
                self.step = FlowStep::Submitted;
                FlowResult::CreateEntry {
                    title: TITLE.to_string(),
                    data,
                }
            }
            None => FlowResult::ShowForm {
                step_id: "user",
                data_schema: DataSchema::user(),
                errors: FormErrors::new(),
            },
        }
    }
}

/// Drive a fresh flow to completion and persist the entry.
///
/// `prompt` is asked for every field of the form, together with the error
/// reported for that field on the previous attempt. The form is shown again
/// until it validates; `prompt` ends the loop by returning an error.
pub fn run_setup<P>(sink: &mut dyn ConfigEntrySink, mut prompt: P) -> crate::Result<ConfigEntry>
where
    P: FnMut(&FieldSchema, Option<&str>) -> crate::Result<String>,
{
    let mut flow = ConfigFlow::new();
    let (data_schema, mut errors) = match flow.step_user(None) {
        FlowResult::ShowForm {
            data_schema,
            errors,
            ..
        } => (data_schema, errors),
        other => {
            return Err(PaperlessError::Config(format!(
                "Unexpected setup step: {:?}",
                other
            )))
        }
    };

    loop {
        let mut form = Map::new();
        for field in &data_schema.fields {
            let value = prompt(field, errors.get(field.name).map(String::as_str))?;
            form.insert(field.name.to_string(), Value::String(value));
        }

        let data = match data_schema.validate(&form) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!("Setup form rejected: {:?}", e);
                errors = e;
                continue;
            }
        };

        return match flow.step_user(Some(data)) {
            FlowResult::CreateEntry { title, data } => sink.create_entry(&title, data),
            other => Err(PaperlessError::Config(format!(
                "Unexpected setup step: {:?}",
                other
            ))),
        };
    }
}
