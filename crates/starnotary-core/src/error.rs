//! Error types for Star Notary core.

use thiserror::Error;

use crate::types::BlockHash;

/// Core errors that can occur while encoding, decoding or verifying.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("malformed challenge: {0}")]
    MalformedChallenge(String),

    #[error("invalid star: {0}")]
    InvalidStar(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Reasons a sealed block fails an integrity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum FaultKind {
    /// The stored hash does not match a recomputation from the block's fields.
    #[error("stored hash does not match recomputed hash")]
    HashMismatch,

    /// The declared predecessor hash does not resolve to any block.
    #[error("predecessor not found in chain")]
    MissingPredecessor,

    /// The declared predecessor exists but not at `height - 1`.
    #[error("predecessor is not the block at height - 1")]
    LinkMismatch,

    /// A non-genesis block without a predecessor hash.
    #[error("non-genesis block has no predecessor")]
    MissingLink,

    /// The genesis block declares a predecessor.
    #[error("genesis block declares a predecessor")]
    GenesisHasPredecessor,
}

/// An integrity fault reported by chain validation.
///
/// Faults are data, not errors: validation enumerates every failing block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityFault {
    /// Height of the failing block.
    pub height: u64,
    /// Stored hash of the failing block.
    pub hash: BlockHash,
    /// Every check the block failed.
    pub kinds: Vec<FaultKind>,
}

impl IntegrityFault {
    /// Check whether this fault includes the given kind.
    pub fn has(&self, kind: FaultKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
