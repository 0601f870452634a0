use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Prefix for identifiers minted from a local BLAKE3 digest.
const DIGEST_PREFIX: &str = "b3";

/// Content-addressed identifier for a stored snapshot.
///
/// A `ContentId` is produced by the content-addressed store and is treated
/// as opaque everywhere else. Identical bytes always map to the same
/// identifier; two different identifiers never name the same bytes.
///
/// Remote stores hand back their own identifier format (for example a CID),
/// so the only structural requirement is a non-empty ASCII alphanumeric
/// string.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId(String);

impl ContentId {
    /// Parse an identifier returned by a store.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TypeError::InvalidContentId("empty identifier".into()));
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(TypeError::InvalidContentId(format!(
                "unexpected character in {s:?}"
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Mint an identifier from a locally computed 32-byte digest.
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        Self(format!("{DIGEST_PREFIX}{}", hex::encode(digest)))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form (first 12 characters) for display.
    pub fn short_id(&self) -> &str {
        let end = self.0.len().min(12);
        &self.0[..end]
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.short_id())
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContentId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContentId> for String {
    fn from(id: ContentId) -> Self {
        id.0
    }
}
