//! Signed name revisions.

use cfgpin_crypto::{ContentHasher, OwningCredential, PublicKey, Signature};
use cfgpin_types::{ContentId, Name};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{NameError, NameResult};

/// One revision of a mutable name.
///
/// The signature covers the name, value, sequence and validity, so a record
/// cannot be replayed under another name or with another value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    /// The name this revision belongs to.
    pub name: Name,
    /// Content identifier the name points at.
    pub value: ContentId,
    /// Revision number; the first revision is 0.
    pub sequence: u64,
    /// Expiry of this revision.
    pub validity: DateTime<Utc>,
    /// Signature by the key embedded in `name`.
    pub signature: Signature,
}

impl NameRecord {
    /// Build and sign a revision with the owning credential.
    pub fn sign(
        credential: &OwningCredential,
        value: ContentId,
        sequence: u64,
        validity: DateTime<Utc>,
    ) -> Self {
        let name = credential.name();
        let payload = signing_payload(&name, &value, sequence, &validity);
        let signature = credential.sign(&payload);
        Self {
            name,
            value,
            sequence,
            validity,
            signature,
        }
    }

    /// Check the signature against the key embedded in the name.
    pub fn verify(&self) -> NameResult<()> {
        let key = PublicKey::from_name(&self.name)
            .map_err(|e| NameError::InvalidRecord(format!("name key: {e}")))?;
        let payload = signing_payload(&self.name, &self.value, self.sequence, &self.validity);
        key.verify(&payload, &self.signature)
            .map_err(|e| NameError::InvalidRecord(e.to_string()))
    }

    /// Returns `true` if the revision is past its validity at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.validity <= now
    }
}

/// Digest that gets signed for a revision.
fn signing_payload(
    name: &Name,
    value: &ContentId,
    sequence: u64,
    validity: &DateTime<Utc>,
) -> [u8; 32] {
    let canonical = format!(
        "{name}\n{value}\n{sequence}\n{}",
        validity.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    ContentHasher::NAME_RECORD.digest(canonical.as_bytes())
}
