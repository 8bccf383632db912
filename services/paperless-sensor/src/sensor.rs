//! Paperless-ngx document count sensor

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::Instrument;

use crate::api::{auth_headers, documents_url, DocumentPage};
use crate::config::PlatformConfig;
use crate::entity::{Attributes, Entity};
use crate::host::{AddEntities, ConfigEntry};
use crate::io::HttpClient;
use crate::PaperlessError;

/// Display name of the sensor
pub const SENSOR_NAME: &str = "Paperless-ngx Documents";

/// Attribute holding the title of the newest document
pub const ATTR_LATEST_DOCUMENT: &str = "latest_document";

/// How often the sensor is refreshed
pub const SCAN_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Last observed value. Count and title always come from the same response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Snapshot {
    #[default]
    Unknown,
    Known {
        document_count: u64,
        latest_document: Option<String>,
    },
}

/// Sensor reporting the number of documents on the first page of the
/// document list and the title of the newest one
pub struct PaperlessSensor {
    url: String,
    api_token: String,
    http: Arc<dyn HttpClient>,
    snapshot: Snapshot,
    span: tracing::Span,
}

impl std::fmt::Debug for PaperlessSensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaperlessSensor")
            .field("url", &self.url)
            .field("snapshot", &self.snapshot)
            .finish()
    }
}

impl PaperlessSensor {
    pub fn new(url: &str, api_token: &str, http: Arc<dyn HttpClient>) -> Self {
        let span = tracing::info_span!("paperless_sensor", url = %url);
        span.in_scope(|| tracing::debug!("Created sensor '{}'", SENSOR_NAME));

        Self {
            url: url.to_string(),
            api_token: api_token.to_string(),
            http,
            snapshot: Snapshot::Unknown,
            span,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    async fn fetch(&self) -> crate::Result<Snapshot> {
        let url = documents_url(&self.url);
        let headers = auth_headers(&self.api_token);
        let headers: Vec<(&str, &str)> = headers.iter().map(|(k, v)| (*k, v.as_str())).collect();

        tracing::debug!("Polling {}", url);
        let response = self.http.get(&url, &headers).await?;
        if !response.is_success() {
            return Err(PaperlessError::Status(response.status));
        }

        let page = DocumentPage::parse(&response.body)?;
        if let Some(total) = page.count {
            if total != page.page_len() {
                tracing::debug!(
                    "Server reports {} documents in total, first page holds {}",
                    total,
                    page.page_len()
                );
            }
        }

        let latest_document = page.latest_title()?.map(str::to_string);
        Ok(Snapshot::Known {
            document_count: page.page_len(),
            latest_document,
        })
    }
}

#[async_trait]
impl Entity for PaperlessSensor {
    fn name(&self) -> &str {
        SENSOR_NAME
    }

    fn state(&self) -> Option<u64> {
        match &self.snapshot {
            Snapshot::Known { document_count, .. } => Some(*document_count),
            Snapshot::Unknown => None,
        }
    }

    fn extra_state_attributes(&self) -> Attributes {
        let mut attributes = Attributes::new();
        if let Snapshot::Known {
            latest_document, ..
        } = &self.snapshot
        {
            let value = latest_document
                .clone()
                .map(serde_json::Value::String)
                .unwrap_or(serde_json::Value::Null);
            attributes.insert(ATTR_LATEST_DOCUMENT.to_string(), value);
        }
        attributes
    }

    async fn update(&mut self) {
        let span = self.span.clone();
        let result = self.fetch().instrument(span.clone()).await;

        self.snapshot = span.in_scope(|| match result {
            Ok(snapshot) => {
                tracing::debug!("Updated: {:?}", snapshot);
                snapshot
            }
            Err(e) => {
                tracing::error!("Error fetching data from Paperless-ngx: {}", e);
                Snapshot::Unknown
            }
        });
    }
}

/// Register the sensor for a config entry created by the setup wizard
pub fn setup_entry(
    entry: &ConfigEntry,
    http: Arc<dyn HttpClient>,
    add_entities: &mut dyn AddEntities,
) {
    tracing::debug!("Setting up sensor for entry {}", entry.entry_id);
    let sensor = PaperlessSensor::new(&entry.data.url, &entry.data.api_token, http);
    add_entities.add_entities(vec![Box::new(sensor)]);
}

/// Register the sensor for a platform block from the config file. Nothing is
/// registered when the URL or the token is missing.
pub fn setup_platform(
    config: &PlatformConfig,
    http: Arc<dyn HttpClient>,
    add_entities: &mut dyn AddEntities,
) {
    let url = config.url.as_deref().filter(|s| !s.is_empty());
    let api_token = config.api_token.as_deref().filter(|s| !s.is_empty());

    let (Some(url), Some(api_token)) = (url, api_token) else {
        tracing::error!("URL and API token are required");
        return;
    };

    let sensor = PaperlessSensor::new(url, api_token, http);
    add_entities.add_entities(vec![Box::new(sensor)]);
}
