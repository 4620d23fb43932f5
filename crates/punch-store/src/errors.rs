//! Store and identity error types.

use thiserror::Error;

/// Errors returned by [`DocumentStore`](crate::DocumentStore) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A field update targeted a document that does not exist.
    #[error("document {collection}/{key} not found")]
    NotFound {
        /// Collection path.
        collection: String,
        /// Document key.
        key: String,
    },
    /// The store could not be reached or refused the write.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// A value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Convenience constructor for [`StoreError::NotFound`].
    pub fn not_found(collection: &str, key: &str) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            key: key.to_string(),
        }
    }
}

/// Errors returned by [`IdentityProvider`](crate::IdentityProvider) sign-in.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The token was blank or rejected.
    #[error("invalid sign-in token")]
    InvalidToken,
    /// The identity service could not be reached.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = StoreError::not_found("ns/units", "A-1");
        assert_eq!(err.to_string(), "document ns/units/A-1 not found");
    }

    #[test]
    fn serialization_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: StoreError = json_err.into();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn identity_error_display() {
        assert_eq!(IdentityError::InvalidToken.to_string(), "invalid sign-in token");
    }
}
