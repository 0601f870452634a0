use cfgpin_types::ContentId;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag that is prepended to every hash
/// computation, so a snapshot and a name record with identical bytes never
/// produce the same digest.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for encoded snapshots.
    pub const SNAPSHOT: Self = Self {
        domain: "cfgpin-snapshot-v1",
    };
    /// Hasher for name revision records.
    pub const NAME_RECORD: Self = Self {
        domain: "cfgpin-name-record-v1",
    };

    /// Hash raw bytes with domain separation.
    pub fn digest(&self, data: &[u8]) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        *hasher.finalize().as_bytes()
    }

    /// Content identifier for `data` under this domain.
    pub fn content_id(&self, data: &[u8]) -> ContentId {
        ContentId::from_digest(&self.digest(data))
    }

    /// Verify that data produces the expected content identifier.
    pub fn verify(&self, data: &[u8], expected: &ContentId) -> bool {
        self.content_id(data) == *expected
    }
}
