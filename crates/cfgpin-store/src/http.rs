//! HTTP pinning service client.
//!
//! Speaks the common pinning API shape:
//! - `GET {api_base}/data/testAuthentication` checks a bearer token
//! - `POST {api_base}/pinning/pinFileToIPFS` uploads a multipart file and
//!   answers with `{"IpfsHash": "..."}`

use std::time::Duration;

use async_trait::async_trait;
use cfgpin_types::{ContentId, ServiceCredential};
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::metadata::UploadMetadata;
use crate::traits::ContentUploader;

/// Default pinning API base URL.
const DEFAULT_API_BASE: &str = "https://api.pinata.cloud";

/// Configuration for [`HttpPinningService`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpPinningConfig {
    /// API base URL, without a trailing slash.
    pub api_base: String,
    /// Per-request timeout. `None` leaves timing to the transport.
    pub request_timeout: Option<Duration>,
}

impl Default for HttpPinningConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: None,
        }
    }
}

#[derive(Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// Pinning service reached over HTTPS.
pub struct HttpPinningService {
    client: Client,
    api_base: String,
}

impl HttpPinningService {
    pub fn new(config: HttpPinningConfig) -> StoreResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| StoreError::Configuration(format!("http client: {e}")))?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    fn bearer(credential: &ServiceCredential) -> String {
        format!("Bearer {}", credential.expose())
    }

    /// Map a non-success response to a store error.
    async fn error_for(response: Response) -> StoreError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = if body.is_empty() {
            status.to_string()
        } else {
            format!("{status}: {}", body.chars().take(200).collect::<String>())
        };
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Authentication(detail),
            _ => StoreError::Transfer(detail),
        }
    }
}

#[async_trait]
impl ContentUploader for HttpPinningService {
    async fn authenticate(&self, credential: &ServiceCredential) -> StoreResult<()> {
        let response = self
            .client
            .get(self.url("data/testAuthentication"))
            .header(AUTHORIZATION, Self::bearer(credential))
            .send()
            .await
            .map_err(|e| StoreError::Transfer(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_for(response).await)
        }
    }

    async fn store(
        &self,
        data: &[u8],
        label: &str,
        credential: &ServiceCredential,
        metadata: &UploadMetadata,
    ) -> StoreResult<ContentId> {
        let file = Part::bytes(data.to_vec())
            .file_name(label.to_string())
            .mime_str("application/json")
            .map_err(|e| StoreError::Transfer(e.to_string()))?;
        let pin_metadata = serde_json::json!({
            "name": label,
            "keyvalues": metadata.keyvalues(),
        });
        let form = Form::new()
            .part("file", file)
            .text("pinataMetadata", pin_metadata.to_string());

        debug!(label, bytes = data.len(), "pinning blob");
        let response = self
            .client
            .post(self.url("pinning/pinFileToIPFS"))
            .header(AUTHORIZATION, Self::bearer(credential))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StoreError::Transfer(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        let pinned: PinResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Transfer(format!("unreadable pin response: {e}")))?;
        let id = ContentId::parse(&pinned.ipfs_hash)
            .map_err(|e| StoreError::Transfer(format!("service returned {e}")))?;
        info!(label, content_id = %id, "blob pinned");
        Ok(id)
    }
}

impl std::fmt::Debug for HttpPinningService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPinningService")
            .field("api_base", &self.api_base)
            .finish()
    }
}
