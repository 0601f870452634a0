//! Mutable name management for cfgpin.
//!
//! A [`Name`](cfgpin_types::Name) is a stable public handle whose current
//! value is the content identifier of the latest published snapshot. Each
//! update is a signed [`NameRecord`] revision with a strictly increasing
//! sequence number.
//!
//! # Architecture
//!
//! - **Resolution** reads the current revision of a name, either from an
//!   owning credential (which also proves the right to publish) or from the
//!   bare name (read-only).
//! - **Publishing** resolves by credential, signs the next revision, and
//!   submits it. Concurrent publishers race; the last accepted revision wins.
//!
//! # Modules
//!
//! - [`error`] — Error types for naming operations
//! - [`record`] — Signed revision records
//! - [`traits`] — The [`NamingNetwork`] trait defining the network interface
//! - [`resolver`] — [`NameResolver`] and the [`ResolutionRequest`] variants
//! - [`memory`] — In-memory [`InMemoryNameNetwork`] for tests
//! - [`http`] — [`HttpNameNetwork`] client

pub mod error;
pub mod http;
pub mod memory;
pub mod record;
pub mod resolver;
pub mod traits;

pub use error::{NameError, NameResult, NameUpdateError, ResolutionError};
pub use http::{HttpNameNetwork, HttpNamingConfig};
pub use memory::InMemoryNameNetwork;
pub use record::NameRecord;
pub use resolver::{NameResolver, NameUpdate, Resolution, ResolutionRequest, ResolutionStatus};
pub use traits::NamingNetwork;
