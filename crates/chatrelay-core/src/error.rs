//! Error types for the relay core

use thiserror::Error;

/// Failures raised by [`crate::services::directory::UserDirectory`].
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The store could not be opened or a transaction could not begin.
    #[error("store unavailable: {0}")]
    StoreUnavailable(anyhow::Error),

    /// A read, write, or record decode failed against an open store.
    #[error("store operation failed: {0}")]
    StoreOperationFailed(anyhow::Error),
}

impl DirectoryError {
    /// Classify a storage-layer error into the directory taxonomy.
    ///
    /// Database-open and transaction-begin failures mean the store itself is
    /// unreachable; anything that fails after a transaction started is an
    /// operation failure.
    pub fn from_store(err: anyhow::Error) -> Self {
        let unavailable = err.chain().any(|cause| {
            cause.is::<redb::DatabaseError>() || cause.is::<redb::TransactionError>()
        });
        if unavailable {
            Self::StoreUnavailable(err)
        } else {
            Self::StoreOperationFailed(err)
        }
    }

    pub fn decode(err: serde_json::Error) -> Self {
        Self::StoreOperationFailed(anyhow::Error::new(err).context("failed to decode user record"))
    }
}

/// Failures raised by [`crate::services::relay::AgentRelay`].
#[derive(Error, Debug)]
pub enum RelayError {
    /// The remote call exceeded the configured timeout window.
    #[error("agent service timeout")]
    Timeout,

    /// The remote was unreachable or answered with a non-success status.
    #[error("agent service error: {detail}")]
    Transport {
        /// HTTP status from the remote, when one was received.
        status: Option<u16>,
        detail: String,
    },

    /// Anything else that went wrong during the call.
    #[error("agent communication failed: {0}")]
    Unexpected(anyhow::Error),
}

impl RelayError {
    /// Map a reqwest failure onto the relay taxonomy.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() || err.is_request() || err.is_body() || err.is_decode() {
            Self::Transport {
                status: err.status().map(|s| s.as_u16()),
                detail: err.to_string(),
            }
        } else {
            Self::Unexpected(err.into())
        }
    }
}
