use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Descriptive metadata attached to a pinned blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadMetadata {
    /// Environment label the blob was published for.
    pub environment: String,
    /// Blob type tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// When the upload was requested.
    pub timestamp: DateTime<Utc>,
}

impl UploadMetadata {
    /// Type tag used for configuration snapshots.
    pub const SNAPSHOT_KIND: &'static str = "config-snapshot";

    /// Metadata for a configuration snapshot, stamped now.
    pub fn snapshot(environment: impl Into<String>) -> Self {
        Self::snapshot_at(environment, Utc::now())
    }

    /// Metadata for a configuration snapshot with a fixed timestamp.
    pub fn snapshot_at(environment: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            environment: environment.into(),
            kind: Self::SNAPSHOT_KIND.to_string(),
            timestamp,
        }
    }

    /// Flat string key/values, as pinning services expect them.
    pub fn keyvalues(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert("environment".into(), self.environment.clone().into());
        map.insert("type".into(), self.kind.clone().into());
        map.insert(
            "timestamp".into(),
            self.timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true)
                .into(),
        );
        map
    }
}
