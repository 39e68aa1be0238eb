//! Error types for Star Notary.

use starnotary_core::CoreError;
use starnotary_store::StoreError;
use thiserror::Error;

/// Errors that can occur during chain and registry operations.
#[derive(Debug, Error)]
pub enum NotaryError {
    /// The challenge is older than the acceptance window.
    #[error("challenge expired: issued {elapsed_secs}s ago, window is {window_secs}s")]
    ExpiredChallenge { elapsed_secs: u64, window_secs: u64 },

    /// The signature does not prove control of the claimed address.
    #[error("signature does not match the claimed address")]
    InvalidSignature,

    /// The challenge message could not be parsed, or was issued in the future.
    #[error("malformed challenge: {0}")]
    MalformedChallenge(String),

    /// The challenge was issued for another address or protocol.
    #[error("challenge was not issued for this address and protocol")]
    ChallengeMismatch,

    /// The star data is not registrable.
    #[error("invalid star: {0}")]
    InvalidStar(String),

    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A payload failed to encode or decode.
    #[error("codec error: {0}")]
    Codec(#[from] CoreError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The store holds no chain to resume.
    #[error("chain not initialized: store is empty")]
    ChainNotInitialized,
}

impl NotaryError {
    /// Check if this error rejects a caller's request, as opposed to a
    /// fault in the system itself.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            NotaryError::ExpiredChallenge { .. }
                | NotaryError::InvalidSignature
                | NotaryError::MalformedChallenge(_)
                | NotaryError::ChallengeMismatch
                | NotaryError::InvalidStar(_)
        )
    }
}

/// Result type for Star Notary operations.
pub type Result<T> = std::result::Result<T, NotaryError>;
