//! A single configured environment.

use cfgpin_crypto::OwningCredential;
use cfgpin_types::{Name, ServiceCredential};

/// Everything the publisher needs to know about one environment.
///
/// `Debug` never shows secret material: the owning credential and the
/// service credential both redact themselves.
#[derive(Clone, Debug)]
pub struct EnvironmentRecord {
    /// Environment label, e.g. `production`.
    pub label: String,
    /// The name consumers resolve to find this environment's snapshot.
    pub public_name: Name,
    /// Present when this process may update `public_name`.
    pub credential: Option<OwningCredential>,
    /// Credential for the pinning service, after `_env` fallback.
    pub service_credential: Option<ServiceCredential>,
}

impl EnvironmentRecord {
    /// A record that can only be read, never published to.
    pub fn read_only(label: impl Into<String>, public_name: Name) -> Self {
        Self {
            label: label.into(),
            public_name,
            credential: None,
            service_credential: None,
        }
    }

    pub fn with_credential(mut self, credential: OwningCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn with_service_credential(mut self, credential: ServiceCredential) -> Self {
        self.service_credential = Some(credential);
        self
    }

    /// Returns `true` if this process holds the owning credential.
    pub fn can_update_name(&self) -> bool {
        self.credential.is_some()
    }

    /// The name derived from the credential, when it differs from the
    /// configured `public_name`.
    pub fn name_mismatch(&self) -> Option<Name> {
        let derived = self.credential.as_ref()?.name();
        (derived != self.public_name).then_some(derived)
    }

    /// The name a publish will actually update: the credential's name when
    /// one is held, otherwise the configured public name.
    pub fn effective_name(&self) -> Name {
        self.credential
            .as_ref()
            .map_or_else(|| self.public_name.clone(), OwningCredential::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_uses_public_name() {
        let cred = OwningCredential::generate();
        let record = EnvironmentRecord::read_only("staging", cred.name());
        assert!(!record.can_update_name());
        assert_eq!(record.effective_name(), cred.name());
        assert!(record.name_mismatch().is_none());
    }

    #[test]
    fn matching_credential_has_no_mismatch() {
        let cred = OwningCredential::generate();
        let record = EnvironmentRecord::read_only("prod", cred.name()).with_credential(cred.clone());
        assert!(record.can_update_name());
        assert!(record.name_mismatch().is_none());
    }

    #[test]
    fn credential_governs_on_mismatch() {
        let configured = OwningCredential::generate();
        let held = OwningCredential::generate();
        let record =
            EnvironmentRecord::read_only("prod", configured.name()).with_credential(held.clone());
        assert_eq!(record.name_mismatch(), Some(held.name()));
        assert_eq!(record.effective_name(), held.name());
    }

    #[test]
    fn debug_hides_secrets() {
        let cred = OwningCredential::generate();
        let seed = cred.to_hex();
        let record = EnvironmentRecord::read_only("prod", cred.name())
            .with_credential(cred)
            .with_service_credential(ServiceCredential::new("tok-very-secret").unwrap());
        let dbg = format!("{record:?}");
        assert!(!dbg.contains(&seed));
        assert!(!dbg.contains("tok-very-secret"));
    }
}
