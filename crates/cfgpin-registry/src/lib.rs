//! Environment registry for cfgpin.
//!
//! Maps each configured environment label to an [`EnvironmentRecord`]: the
//! public name consumers resolve, the optional owning credential that may
//! update it, and the pinning service credential.
//!
//! # File shape
//!
//! ```toml
//! [_env]
//! serviceCredential = "shared-token"
//!
//! [production]
//! publicName = "k…"
//! credential = "…64 hex characters…"
//! serviceCredential = "prod-only-token"
//! ```
//!
//! The reserved `_env` table holds shared defaults. A value set on an
//! environment always wins over the `_env` value.

pub mod environment;
pub mod error;
pub mod registry;

pub use environment::EnvironmentRecord;
pub use error::{RegistryError, RegistryResult};
pub use registry::{Registry, DEFAULTS_KEY};
