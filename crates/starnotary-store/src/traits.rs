//! BlockStore trait: the abstract interface for block persistence.
//!
//! This trait lets the chain engine stay storage-agnostic. Implementations
//! include SQLite (persistent) and in-memory (tests, ephemeral chains).

use starnotary_core::{Block, BlockHash};

use crate::error::Result;

/// The BlockStore trait: ordered, append-only block persistence.
///
/// # Design Notes
///
/// - **Append-only**: there is no update or delete.
/// - **Dense heights**: `push` only accepts a block whose height equals the
///   current length, so the stored sequence never has gaps or duplicates.
/// - **Publish whole blocks**: a block is visible to readers only after it
///   has been fully written.
pub trait BlockStore: Send + Sync {
    /// Append a sealed block.
    ///
    /// Fails with `HeightConflict` unless `block.height() == self.len()`.
    fn push(&self, block: &Block) -> Result<()>;

    /// Number of stored blocks.
    fn len(&self) -> Result<u64>;

    /// Check if the store holds no blocks.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Get the block at a height.
    fn get_by_height(&self, height: u64) -> Result<Option<Block>>;

    /// Get the lowest block whose stored hash equals `hash`.
    fn get_by_hash(&self, hash: &BlockHash) -> Result<Option<Block>>;

    /// Get blocks with `start <= height < end`, ordered by height.
    fn range(&self, start: u64, end: u64) -> Result<Vec<Block>>;
}

/// Extension trait for common store patterns.
pub trait BlockStoreExt: BlockStore {
    /// The highest block, if any.
    fn tip(&self) -> Result<Option<Block>> {
        match self.len()? {
            0 => Ok(None),
            len => self.get_by_height(len - 1),
        }
    }

    /// Every block, ordered by height.
    fn all_blocks(&self) -> Result<Vec<Block>> {
        let len = self.len()?;
        self.range(0, len)
    }
}

impl<S: BlockStore + ?Sized> BlockStoreExt for S {}

impl<S: BlockStore + ?Sized> BlockStore for std::sync::Arc<S> {
    fn push(&self, block: &Block) -> Result<()> {
        (**self).push(block)
    }

    fn len(&self) -> Result<u64> {
        (**self).len()
    }

    fn get_by_height(&self, height: u64) -> Result<Option<Block>> {
        (**self).get_by_height(height)
    }

    fn get_by_hash(&self, hash: &BlockHash) -> Result<Option<Block>> {
        (**self).get_by_hash(hash)
    }

    fn range(&self, start: u64, end: u64) -> Result<Vec<Block>> {
        (**self).range(start, end)
    }
}
