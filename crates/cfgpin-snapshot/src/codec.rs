use std::collections::BTreeMap;

use crate::error::{SnapshotError, SnapshotResult};
use crate::snapshot::Snapshot;

/// Canonical byte codec for snapshots.
///
/// The encoding is compact JSON with keys in byte-wise sorted order and no
/// trailing newline. It is a pure function of the key/value set.
pub struct SnapshotCodec;

impl SnapshotCodec {
    /// Encode a snapshot into its canonical bytes.
    pub fn encode(snapshot: &Snapshot) -> SnapshotResult<Vec<u8>> {
        let mut sorted = BTreeMap::new();
        for (key, value) in snapshot.iter() {
            if key.is_empty() {
                return Err(SnapshotError::EmptyKey);
            }
            sorted.insert(key, value);
        }
        serde_json::to_vec(&sorted).map_err(|e| SnapshotError::Encoding(e.to_string()))
    }

    /// Decode canonical bytes back into a snapshot.
    ///
    /// Keys come back in sorted order. Values must be strings.
    pub fn decode(data: &[u8]) -> SnapshotResult<Snapshot> {
        let sorted: BTreeMap<String, String> =
            serde_json::from_slice(data).map_err(|e| SnapshotError::Encoding(e.to_string()))?;
        let mut snapshot = Snapshot::new();
        for (key, value) in sorted {
            snapshot.insert(key, value)?;
        }
        Ok(snapshot)
    }
}
