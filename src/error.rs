//! Error handling for the account inspector
//!
//! This module provides idiomatic Rust error types using thiserror for
//! better error messages and proper error chain handling.
//!
//! "Account not found" is deliberately NOT part of this taxonomy: a
//! resolution that matches zero rows returns `Ok(None)` so callers can
//! distinguish an empty result from a failed query.

use thiserror::Error;

/// Failures at the store boundary.
///
/// All variants are fatal to the current invocation; the inspector
/// performs no partial-failure recovery and no retries (retry policy,
/// if any, belongs to the store client).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The connection could not be established or was lost mid-query.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// The store rejected or failed the query for a non-transport reason.
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// The aggregated hierarchy payload did not match the snapshot schema
    /// contract.
    #[error("snapshot decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    /// Classify a sqlx error: transport-shaped failures become
    /// `Unavailable`, everything else `Query`.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => StoreError::Unavailable(err),
            other => StoreError::Query(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_classify_as_unavailable() {
        let io = sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert!(matches!(
            StoreError::from_sqlx(io),
            StoreError::Unavailable(_)
        ));

        assert!(matches!(
            StoreError::from_sqlx(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            StoreError::from_sqlx(sqlx::Error::PoolClosed),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn row_not_found_classifies_as_query() {
        assert!(matches!(
            StoreError::from_sqlx(sqlx::Error::RowNotFound),
            StoreError::Query(_)
        ));
    }

    #[test]
    fn display_carries_source_message() {
        let err = StoreError::from_sqlx(sqlx::Error::PoolTimedOut);
        let msg = err.to_string();
        assert!(msg.starts_with("store unavailable:"), "got: {msg}");
    }
}
