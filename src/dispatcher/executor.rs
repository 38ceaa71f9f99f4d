//! HTTP executor, the pluggable capability that performs one network call.

use std::collections::HashMap;

use crate::config::DispatchConfig;
use crate::error::{Result, TaskError};
use crate::types::{RequestDescriptor, Response};

/// Abstraction over sending one request, enabling testability.
///
/// Implementations are shared across concurrently running tasks, so any
/// connection pool they hold must be safe for concurrent use.
#[async_trait::async_trait]
pub trait HttpExecutor: Send + Sync {
    /// Send `request` and return what the remote answered
    async fn execute(&self, request: &RequestDescriptor) -> std::result::Result<Response, TaskError>;
}

/// Production [`HttpExecutor`] that POSTs each body with a shared reqwest client.
pub struct ReqwestExecutor {
    client: reqwest::Client,
    content_type: String,
    fail_on_error_status: bool,
}

impl ReqwestExecutor {
    /// Build an executor from dispatch settings
    pub fn new(config: &DispatchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Build an executor around an existing client (timeouts are the client's own)
    pub fn with_client(client: reqwest::Client, config: &DispatchConfig) -> Self {
        Self {
            client,
            content_type: config.content_type.clone(),
            fail_on_error_status: config.fail_on_error_status,
        }
    }
}

#[async_trait::async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn execute(&self, request: &RequestDescriptor) -> std::result::Result<Response, TaskError> {
        let response = self
            .client
            .post(request.url())
            .header(reqwest::header::CONTENT_TYPE, self.content_type.as_str())
            .body(request.body().to_string())
            .send()
            .await?;

        let status = response.status();
        let headers = collect_headers(response.headers());
        // text() consumes the response, so status and headers are read first
        let body = response.text().await?;

        if self.fail_on_error_status && !status.is_success() {
            tracing::debug!(url = %request.url(), status = status.as_u16(), "non-success status");
            return Err(TaskError::status(
                status.as_u16(),
                format!("remote returned status {}", status),
            ));
        }

        Ok(Response {
            http_status_code: status.as_u16(),
            body,
            headers,
        })
    }
}

fn collect_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
    let mut map = HashMap::with_capacity(headers.len());
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            map.entry(name.as_str().to_string())
                .or_insert_with(|| value.to_string());
        }
    }
    map
}
