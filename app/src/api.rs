use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::QueryError;
use crate::validation::Identifier;

/// Source of tax records. The session only talks to this seam, so the
/// worker can be driven by a fake in tests.
#[async_trait]
pub trait TaxRegistry: Send + Sync {
    async fn execute(&self, identificacion: &Identifier) -> Result<Value, QueryError>;
}

/// Client for the public `fe/ae` endpoint of the Ministerio de Hacienda.
#[derive(Debug, Clone)]
pub struct HaciendaClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HaciendaClient {
    pub fn new(config: ClientConfig) -> Result<Self, QueryError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| QueryError::TransportError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn classify(&self, err: reqwest::Error) -> QueryError {
        if err.is_timeout() {
            QueryError::Timeout {
                after: self.config.timeout,
            }
        } else if err.is_connect() {
            QueryError::ConnectionFailed {
                detail: err.to_string(),
            }
        } else {
            QueryError::TransportError(err.to_string())
        }
    }
}

#[async_trait]
impl TaxRegistry for HaciendaClient {
    async fn execute(&self, identificacion: &Identifier) -> Result<Value, QueryError> {
        let url = self.config.lookup_url(identificacion.as_str());
        tracing::debug!(%url, "querying Hacienda");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Hacienda responded");

        match status {
            StatusCode::OK => {
                let body = response.bytes().await.map_err(|e| self.classify(e))?;
                serde_json::from_slice(&body).map_err(|e| QueryError::MalformedResponse(e.to_string()))
            }
            StatusCode::NOT_FOUND => Err(QueryError::NotFound),
            other => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|e| format!("<body unreadable: {e}>"));
                Err(QueryError::HttpError {
                    status: other.as_u16(),
                    body,
                })
            }
        }
    }
}
