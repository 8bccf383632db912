//! Paperless-ngx REST API contract

use serde::Deserialize;
use serde_json::Value;

use crate::PaperlessError;

/// Path of the document list endpoint, appended to the configured base URL
pub const DOCUMENTS_PATH: &str = "/api/documents/";

/// Build the document list URL. The base URL is used exactly as configured.
pub fn documents_url(base_url: &str) -> String {
    format!("{}{}", base_url, DOCUMENTS_PATH)
}

/// Request headers for token authentication
pub fn auth_headers(api_token: &str) -> [(&'static str, String); 2] {
    [
        ("Authorization", format!("Token {}", api_token)),
        ("Content-Type", "application/json".to_string()),
    ]
}

/// One page of the document list envelope
#[derive(Debug, Deserialize)]
pub struct DocumentPage {
    /// Total number of documents on the server, across all pages
    #[serde(default)]
    pub count: Option<u64>,
    pub results: Vec<Value>,
}

impl DocumentPage {
    pub fn parse(body: &str) -> crate::Result<Self> {
        serde_json::from_str(body).map_err(|e| PaperlessError::Payload(e.to_string()))
    }

    /// Number of documents on this page
    pub fn page_len(&self) -> u64 {
        self.results.len() as u64
    }

    /// Title of the first document, or `None` for an empty page or a `null`
    /// title
    pub fn latest_title(&self) -> crate::Result<Option<&str>> {
        let Some(first) = self.results.first() else {
            return Ok(None);
        };
        match first.get("title") {
            Some(Value::String(title)) => Ok(Some(title.as_str())),
            Some(Value::Null) => Ok(None),
            Some(other) => Err(PaperlessError::Payload(format!(
                "first document has a non-string title: {}",
                other
            ))),
            None => Err(PaperlessError::Payload(
                "first document has no title".to_string(),
            )),
        }
    }
}
