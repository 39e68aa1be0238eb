//! Block: the sealed, immutable unit of the chain.
//!
//! A block is created from a payload only ([`Candidate`]). The chain engine
//! assigns height, timestamp and linkage, then seals it: the hash is computed
//! over every other field exactly once. There is no way to change a field
//! after sealing; corrections are new blocks.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::canonical::{canonical_header_bytes, compute_block_hash};
use crate::error::Result;
use crate::payload::BlockPayload;
use crate::types::BlockHash;

/// An unsealed block: payload only. Everything else is assigned at append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    payload: Bytes,
}

impl Candidate {
    /// Create a candidate from raw payload bytes.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Create a candidate by encoding a typed payload.
    pub fn from_payload(payload: &BlockPayload) -> Result<Self> {
        Ok(Self::new(payload.to_bytes()?))
    }

    /// The genesis candidate.
    pub fn genesis() -> Result<Self> {
        Self::from_payload(&BlockPayload::genesis())
    }

    /// Get the payload bytes.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Consume into payload bytes.
    pub fn into_payload(self) -> Bytes {
        self.payload
    }
}

/// A sealed block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    height: u64,
    timestamp: i64,
    previous_hash: Option<BlockHash>,
    payload: Bytes,
    hash: BlockHash,
}

impl Block {
    /// Seal a block: compute its hash from the given fields.
    pub fn seal(
        height: u64,
        timestamp: i64,
        previous_hash: Option<BlockHash>,
        candidate: Candidate,
    ) -> Self {
        let payload = candidate.into_payload();
        let hash = compute_block_hash(height, timestamp, previous_hash.as_ref(), &payload);
        Self {
            height,
            timestamp,
            previous_hash,
            payload,
            hash,
        }
    }

    /// Rehydrate a block from stored fields without recomputing the hash.
    ///
    /// Stores use this to load blocks. A stored hash that no longer matches
    /// the fields is preserved as-is so validation can report it.
    pub fn from_parts(
        height: u64,
        timestamp: i64,
        previous_hash: Option<BlockHash>,
        payload: impl Into<Bytes>,
        hash: BlockHash,
    ) -> Self {
        Self {
            height,
            timestamp,
            previous_hash,
            payload: payload.into(),
            hash,
        }
    }

    /// Zero-based position in the chain.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Seal time (Unix milliseconds).
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Hash of the block at `height - 1`; `None` for genesis.
    pub fn previous_hash(&self) -> Option<&BlockHash> {
        self.previous_hash.as_ref()
    }

    /// Raw payload bytes.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// The stored seal.
    pub fn hash(&self) -> &BlockHash {
        &self.hash
    }

    /// Check if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }

    /// Recompute the hash from the block's non-hash fields.
    pub fn compute_hash(&self) -> BlockHash {
        compute_block_hash(
            self.height,
            self.timestamp,
            self.previous_hash.as_ref(),
            &self.payload,
        )
    }

    /// Check that the stored hash matches a recomputation.
    pub fn is_seal_intact(&self) -> bool {
        self.compute_hash() == self.hash
    }

    /// The canonical bytes the seal is computed over.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        canonical_header_bytes(
            self.height,
            self.timestamp,
            self.previous_hash.as_ref(),
            &self.payload,
        )
    }

    /// Decode the payload.
    pub fn decode_payload(&self) -> Result<BlockPayload> {
        BlockPayload::from_bytes(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_computes_hash() {
        let block = Block::seal(0, 1000, None, Candidate::new(b"hello".to_vec()));
        assert_eq!(block.height(), 0);
        assert!(block.is_genesis());
        assert!(block.previous_hash().is_none());
        assert!(block.is_seal_intact());
        assert_eq!(*block.hash(), block.compute_hash());
    }

    #[test]
    fn test_seal_deterministic() {
        let a = Block::seal(1, 1000, Some(BlockHash::from_bytes([9; 32])), Candidate::new(b"x".to_vec()));
        let b = Block::seal(1, 1000, Some(BlockHash::from_bytes([9; 32])), Candidate::new(b"x".to_vec()));
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn test_from_parts_keeps_stored_hash() {
        let sealed = Block::seal(2, 1000, Some(BlockHash::from_bytes([1; 32])), Candidate::new(b"a".to_vec()));

        let tampered = Block::from_parts(
            sealed.height(),
            sealed.timestamp(),
            sealed.previous_hash().copied(),
            b"b".to_vec(),
            *sealed.hash(),
        );

        assert_eq!(tampered.hash(), sealed.hash());
        assert!(!tampered.is_seal_intact());
    }

    #[test]
    fn test_genesis_candidate_decodes() {
        let block = Block::seal(0, 0, None, Candidate::genesis().unwrap());
        let payload = block.decode_payload().unwrap();
        assert!(payload.owner().is_none());
        assert!(matches!(payload, BlockPayload::Genesis { .. }));
    }
}
