//! In-memory implementation of the BlockStore trait.
//!
//! Same semantics as SQLite but nothing survives a drop. Used for tests
//! and for chains that live only as long as the process.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use starnotary_core::{Block, BlockHash};

use crate::error::{Result, StoreError};
use crate::traits::BlockStore;

/// In-memory store implementation.
///
/// Thread-safe via RwLock: any number of readers, one writer.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Blocks in height order; index == height.
    blocks: Vec<Block>,

    /// Hash index: hash -> lowest height carrying it.
    by_hash: HashMap<BlockHash, u64>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockStore for MemoryStore {
    fn push(&self, block: &Block) -> Result<()> {
        let mut inner = self.write()?;

        let expected = inner.blocks.len() as u64;
        if block.height() != expected {
            return Err(StoreError::HeightConflict {
                expected,
                got: block.height(),
            });
        }

        inner.by_hash.entry(*block.hash()).or_insert(expected);
        inner.blocks.push(block.clone());
        Ok(())
    }

    fn len(&self) -> Result<u64> {
        Ok(self.read()?.blocks.len() as u64)
    }

    fn get_by_height(&self, height: u64) -> Result<Option<Block>> {
        let inner = self.read()?;
        Ok(usize::try_from(height)
            .ok()
            .and_then(|h| inner.blocks.get(h))
            .cloned())
    }

    fn get_by_hash(&self, hash: &BlockHash) -> Result<Option<Block>> {
        let inner = self.read()?;
        Ok(inner
            .by_hash
            .get(hash)
            .and_then(|&h| inner.blocks.get(h as usize))
            .cloned())
    }

    fn range(&self, start: u64, end: u64) -> Result<Vec<Block>> {
        let inner = self.read()?;
        let len = inner.blocks.len() as u64;
        let end = end.min(len);
        if start >= end {
            return Ok(Vec::new());
        }
        Ok(inner.blocks[start as usize..end as usize].to_vec())
    }
}
