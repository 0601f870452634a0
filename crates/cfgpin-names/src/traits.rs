//! The [`NamingNetwork`] trait defining the naming network interface.

use async_trait::async_trait;
use cfgpin_types::Name;

use crate::error::NameResult;
use crate::record::NameRecord;

/// A network that stores the current revision of mutable names.
///
/// Implementations must be thread-safe (`Send + Sync`). There is no
/// compare-and-swap: a network may refuse revisions older than the one it
/// holds, but two publishers that build the same next sequence race and the
/// last accepted write wins.
#[async_trait]
pub trait NamingNetwork: Send + Sync {
    /// Fetch the current revision of `name`.
    ///
    /// Returns `Ok(None)` if the name has never been published.
    async fn resolve(&self, name: &Name) -> NameResult<Option<NameRecord>>;

    /// Submit a signed revision.
    async fn publish(&self, record: &NameRecord) -> NameResult<()>;
}
