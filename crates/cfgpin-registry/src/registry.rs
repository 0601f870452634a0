//! Loading the environment registry from TOML or JSON.

use std::collections::BTreeMap;
use std::path::Path;

use cfgpin_crypto::OwningCredential;
use cfgpin_types::{Name, ServiceCredential};
use serde::Deserialize;
use tracing::debug;

use crate::environment::EnvironmentRecord;
use crate::error::{RegistryError, RegistryResult};

/// Reserved entry holding defaults shared by every environment.
pub const DEFAULTS_KEY: &str = "_env";

/// One entry exactly as written in the file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEnvironment {
    #[serde(default, rename = "publicName", alias = "public_name")]
    public_name: Option<String>,
    #[serde(default)]
    credential: Option<String>,
    #[serde(default, rename = "serviceCredential", alias = "service_credential")]
    service_credential: Option<String>,
}

/// Blank strings count as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// All configured environments, keyed by label.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    environments: BTreeMap<String, EnvironmentRecord>,
}

impl Registry {
    /// Parse a TOML document.
    pub fn from_toml_str(input: &str) -> RegistryResult<Self> {
        // `message()` leaves out the source excerpt, which may hold a secret.
        let raw: BTreeMap<String, RawEnvironment> =
            toml::from_str(input).map_err(|e| RegistryError::Parse(e.message().to_string()))?;
        Self::from_raw(raw)
    }

    /// Parse a JSON document.
    pub fn from_json_str(input: &str) -> RegistryResult<Self> {
        let raw: BTreeMap<String, RawEnvironment> =
            serde_json::from_str(input).map_err(|e| RegistryError::Parse(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Read a registry file, choosing the format by extension.
    pub fn load(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> RegistryResult<Self> = match format.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => return Err(RegistryError::UnsupportedFormat(path.to_path_buf())),
        };
        let contents = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = parse(&contents)?;
        debug!(path = %path.display(), environments = registry.len(), "loaded registry");
        Ok(registry)
    }

    fn from_raw(mut raw: BTreeMap<String, RawEnvironment>) -> RegistryResult<Self> {
        let defaults = raw.remove(DEFAULTS_KEY).unwrap_or_default();
        if present(&defaults.public_name).is_some() || present(&defaults.credential).is_some() {
            return Err(RegistryError::Configuration {
                environment: DEFAULTS_KEY.to_string(),
                reason: "only serviceCredential may be shared".into(),
            });
        }
        let shared_service = present(&defaults.service_credential);

        let mut environments = BTreeMap::new();
        for (label, entry) in raw {
            let record = build_record(&label, &entry, shared_service)?;
            environments.insert(label, record);
        }
        Ok(Self { environments })
    }

    /// Environment labels in sorted order. Never includes `_env`.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.environments.keys().map(String::as_str)
    }

    /// Look up one environment.
    pub fn record(&self, label: &str) -> RegistryResult<&EnvironmentRecord> {
        self.environments
            .get(label)
            .ok_or_else(|| RegistryError::UnknownEnvironment(label.to_string()))
    }

    pub fn records(&self) -> impl Iterator<Item = &EnvironmentRecord> {
        self.environments.values()
    }

    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }
}

fn build_record(
    label: &str,
    entry: &RawEnvironment,
    shared_service: Option<&str>,
) -> RegistryResult<EnvironmentRecord> {
    let invalid = |reason: &str| RegistryError::Configuration {
        environment: label.to_string(),
        reason: reason.to_string(),
    };

    let credential = present(&entry.credential)
        .map(OwningCredential::from_hex)
        .transpose()
        .map_err(|_| invalid("credential is not a 32-byte hex seed"))?;

    let public_name = match (present(&entry.public_name), &credential) {
        (Some(name), _) => Name::parse(name).map_err(|e| invalid(&format!("publicName: {e}")))?,
        (None, Some(credential)) => credential.name(),
        (None, None) => return Err(invalid("needs a publicName or a credential")),
    };

    let service_credential = present(&entry.service_credential)
        .or(shared_service)
        .map(ServiceCredential::new)
        .transpose()
        .map_err(|_| invalid("serviceCredential is empty"))?;

    Ok(EnvironmentRecord {
        label: label.to_string(),
        public_name,
        credential,
        service_credential,
    })
}
