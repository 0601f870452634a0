use std::fmt;

use crate::error::TypeError;

/// Opaque access token for the pinning service.
///
/// The token is never printed: `Debug` is redacted and there is no
/// `Display` implementation.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceCredential(String);

impl ServiceCredential {
    /// Wrap a token. Leading and trailing whitespace is removed; an empty
    /// token is rejected.
    pub fn new(token: impl Into<String>) -> Result<Self, TypeError> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(TypeError::EmptyCredential);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The raw token, for building request headers.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ServiceCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceCredential(<redacted>)")
    }
}
