//! HTTP naming network client.
//!
//! - `GET {api_base}/name/{name}` returns the current [`NameRecord`] as JSON,
//!   or `404` when the name has never been published
//! - `POST {api_base}/name/{name}` submits a signed revision

use std::time::Duration;

use async_trait::async_trait;
use cfgpin_types::Name;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NameError, NameResult};
use crate::record::NameRecord;
use crate::traits::NamingNetwork;

/// Default naming API base URL.
const DEFAULT_API_BASE: &str = "https://name.web3.storage";

/// Configuration for [`HttpNameNetwork`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpNamingConfig {
    /// API base URL, without a trailing slash.
    pub api_base: String,
    /// Per-request timeout. `None` leaves timing to the transport.
    pub request_timeout: Option<Duration>,
}

impl Default for HttpNamingConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: None,
        }
    }
}

/// Naming network reached over HTTPS.
pub struct HttpNameNetwork {
    client: Client,
    api_base: String,
}

impl HttpNameNetwork {
    pub fn new(config: HttpNamingConfig) -> NameResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| NameError::Unreachable(format!("http client: {e}")))?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn name_url(&self, name: &Name) -> String {
        format!("{}/name/{}", self.api_base, name)
    }

    async fn error_for(response: Response) -> NameError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = if body.is_empty() {
            status.to_string()
        } else {
            format!("{status}: {}", body.chars().take(200).collect::<String>())
        };
        if status.is_client_error() {
            NameError::Rejected(detail)
        } else {
            NameError::Unreachable(detail)
        }
    }
}

#[async_trait]
impl NamingNetwork for HttpNameNetwork {
    async fn resolve(&self, name: &Name) -> NameResult<Option<NameRecord>> {
        let response = self
            .client
            .get(self.name_url(name))
            .send()
            .await
            .map_err(|e| NameError::Unreachable(e.to_string()))?;
        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!(name = %name, "name not yet published");
                Ok(None)
            }
            status if status.is_success() => {
                let record: NameRecord = response
                    .json()
                    .await
                    .map_err(|e| NameError::InvalidRecord(e.to_string()))?;
                Ok(Some(record))
            }
            _ => Err(Self::error_for(response).await),
        }
    }

    async fn publish(&self, record: &NameRecord) -> NameResult<()> {
        let response = self
            .client
            .post(self.name_url(&record.name))
            .json(record)
            .send()
            .await
            .map_err(|e| NameError::Unreachable(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_for(response).await)
        }
    }
}

impl std::fmt::Debug for HttpNameNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpNameNetwork")
            .field("api_base", &self.api_base)
            .finish()
    }
}
