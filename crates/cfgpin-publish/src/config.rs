use cfgpin_types::{ContentId, Name};
use serde::{Deserialize, Serialize};

/// Default public gateway.
const DEFAULT_GATEWAY: &str = "https://w3s.link";

/// Publisher settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// Gateway used to build human-facing URLs.
    pub gateway_url: String,
    /// Appended to the environment label to form the upload filename.
    pub filename_suffix: String,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY.to_string(),
            filename_suffix: "-config.json".to_string(),
        }
    }
}

impl PublisherConfig {
    pub fn with_gateway(mut self, gateway_url: impl Into<String>) -> Self {
        self.gateway_url = gateway_url.into();
        self
    }

    /// Filename the snapshot is uploaded under, e.g. `production-config.json`.
    pub fn filename_for(&self, label: &str) -> String {
        format!("{label}{}", self.filename_suffix)
    }

    /// URL that always serves the latest snapshot for `name`.
    pub fn name_url(&self, name: &Name) -> String {
        format!("{}/ipns/{name}", self.gateway())
    }

    /// URL of one immutable snapshot.
    pub fn content_url(&self, id: &ContentId) -> String {
        format!("{}/ipfs/{id}", self.gateway())
    }

    fn gateway(&self) -> &str {
        self.gateway_url.trim_end_matches('/')
    }
}
