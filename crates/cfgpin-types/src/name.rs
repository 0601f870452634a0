use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Leading character of every encoded name.
const NAME_PREFIX: char = 'k';

/// Mutable public name under which snapshots are published over time.
///
/// A `Name` embeds the ed25519 public key that owns it, so anyone holding
/// the name can verify a signed revision without a key directory. The same
/// public key always produces the same name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name {
    key: [u8; 32],
}

impl Name {
    /// Build the name owned by a raw ed25519 public key.
    pub fn from_public_key_bytes(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// The embedded public key bytes.
    pub fn public_key_bytes(&self) -> &[u8; 32] {
        &self.key
    }

    /// Parse the textual form (`k` followed by 64 hex characters).
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let s = s.trim();
        let hex_part = s
            .strip_prefix(NAME_PREFIX)
            .ok_or_else(|| TypeError::InvalidName(format!("missing '{NAME_PREFIX}' prefix")))?;
        let bytes = hex::decode(hex_part).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        Ok(Self { key })
    }

    /// Short identifier (prefix plus first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("{NAME_PREFIX}{}", hex::encode(&self.key[..4]))
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.short_id())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{NAME_PREFIX}{}", hex::encode(self.key))
    }
}

impl FromStr for Name {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Name {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.to_string()
    }
}
