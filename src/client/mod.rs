//! Notion HTTP API backend.
//!
//! Blocking `reqwest` client implementing the library's [`Backend`]
//! contract. Each call is one request; nothing is retried or paginated.

pub mod decode;
pub mod filter;

use std::time::{Duration, Instant};

use notion_issues_lib::model::{ContentNode, Row, TableSchema};
use notion_issues_lib::query::Filter;
use notion_issues_lib::{Backend, BackendError};
use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::{NOTION_API_VERSION, Settings};
use crate::error::Result;

/// Authenticated client for one integration token.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: Client,
    base_url: String,
    token: String,
}

impl NotionClient {
    /// # Errors
    ///
    /// Returns `Http` if the underlying client cannot be built.
    pub fn new(token: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns `MissingToken` without a configured token, or `Http` if the
    /// client cannot be built.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.require_token()?,
            &settings.api_base_url,
            settings.timeout,
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get(&self, path: &str) -> std::result::Result<Value, BackendError> {
        self.send("GET", path, self.http.get(self.url(path)))
    }

    fn post(&self, path: &str, body: &Value) -> std::result::Result<Value, BackendError> {
        self.send("POST", path, self.http.post(self.url(path)).json(body))
    }

    fn send(
        &self,
        method: &str,
        path: &str,
        request: RequestBuilder,
    ) -> std::result::Result<Value, BackendError> {
        let start = Instant::now();
        let response = request
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Notion-Version", NOTION_API_VERSION)
            .send()
            .map_err(|e| BackendError::new(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| BackendError::new(e.to_string()))?;
        debug!(method, path, status = status.as_u16(), elapsed = ?start.elapsed(), "Request took");
        trace!(body = %body, "Response body");

        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(|e| BackendError::new(format!("Invalid JSON response: {e}")))
    }
}

/// Build a [`BackendError`] from an error response body.
#[must_use]
pub fn error_from_body(status: u16, body: &str) -> BackendError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let field = |key: &str| {
        parsed
            .as_ref()
            .and_then(|value| value.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let message = field("message").unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            "request failed".to_string()
        } else {
            trimmed.to_string()
        }
    });
    BackendError::with_status(status, field("code"), message)
}

impl Backend for NotionClient {
    fn table_schema(&self, table_id: &str) -> std::result::Result<TableSchema, BackendError> {
        decode::decode_schema(&self.get(&format!("/databases/{table_id}"))?)
    }

    fn query_table(
        &self,
        table_id: &str,
        filter: Option<&Filter>,
        page_size: usize,
    ) -> std::result::Result<Vec<Row>, BackendError> {
        let body = filter::query_body(filter, page_size);
        decode::decode_rows(&self.post(&format!("/databases/{table_id}/query"), &body)?)
    }

    fn get_row(&self, row_id: &str) -> std::result::Result<Row, BackendError> {
        decode::decode_row(&self.get(&format!("/pages/{row_id}"))?)
    }

    fn children(&self, row_id: &str) -> std::result::Result<Vec<ContentNode>, BackendError> {
        decode::decode_children(&self.get(&format!("/blocks/{row_id}/children"))?)
    }

    fn current_user(&self) -> std::result::Result<String, BackendError> {
        decode::decode_current_user(&self.get("/users/me")?)
    }
}
