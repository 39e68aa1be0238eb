//! The Chain: an ordered, hash-linked sequence of sealed blocks.
//!
//! The chain owns sequencing. It assigns height, timestamp and linkage to
//! every block, seals it, and pushes it to a [`BlockStore`]. Nothing else
//! mutates the sequence: external callers append through the
//! [`Registry`](crate::Registry).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use starnotary_core::validation;
use starnotary_core::{fault_report, Block, BlockHash, Candidate, FaultKind, IntegrityFault};
use starnotary_store::{BlockStore, BlockStoreExt, StoreError};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{NotaryError, Result};

/// A hash-linked chain of blocks backed by a store.
///
/// Share it across threads with `Arc<Chain<S>>`. Appends are serialized by
/// an internal lock; reads go straight to the store.
///
/// The store is not reachable through the chain, so a block can only be
/// added by the [`Registry`](crate::Registry):
///
/// ```compile_fail
/// use starnotary::store::{BlockStore, MemoryStore};
/// use starnotary::Chain;
///
/// let chain = Chain::open_with_system_clock(MemoryStore::new()).unwrap();
/// let _ = chain.store().len();
/// ```
pub struct Chain<S: BlockStore> {
    store: S,
    clock: Arc<dyn Clock>,
    /// Held across read-tip, seal and push.
    append_lock: Mutex<()>,
}

impl<S: BlockStore> Chain<S> {
    /// Open a chain over a store.
    ///
    /// An empty store gets a genesis block; a non-empty one is resumed as-is.
    pub fn open(store: S, clock: impl Clock + 'static) -> Result<Self> {
        let chain = Self::unopened(store, clock);

        match chain.store.tip()? {
            Some(tip) => {
                info!(height = tip.height(), hash = %tip.hash(), "resumed chain");
            }
            None => {
                let genesis = chain.seal_and_push(Candidate::genesis()?)?;
                info!(hash = %genesis.hash(), "genesis block created");
            }
        }

        Ok(chain)
    }

    /// Open a chain stamped by the system clock.
    pub fn open_with_system_clock(store: S) -> Result<Self> {
        Self::open(store, SystemClock)
    }

    /// Resume an existing chain, refusing to create a genesis block.
    pub fn resume(store: S, clock: impl Clock + 'static) -> Result<Self> {
        let chain = Self::unopened(store, clock);
        let tip = chain.store.tip()?.ok_or(NotaryError::ChainNotInitialized)?;
        info!(height = tip.height(), hash = %tip.hash(), "resumed chain");
        Ok(chain)
    }

    fn unopened(store: S, clock: impl Clock + 'static) -> Self {
        Self {
            store,
            clock: Arc::new(clock),
            append_lock: Mutex::new(()),
        }
    }

    /// The backing store.
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    /// The clock stamping this chain.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Highest assigned height, `None` if the chain holds no blocks.
    pub fn height(&self) -> Result<Option<u64>> {
        Ok(self.store.len()?.checked_sub(1))
    }

    /// Number of blocks.
    pub fn len(&self) -> Result<u64> {
        Ok(self.store.len()?)
    }

    /// Check if the chain holds no blocks.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.store.is_empty()?)
    }

    /// The highest block.
    pub fn tip(&self) -> Result<Option<Block>> {
        Ok(self.store.tip()?)
    }

    /// Get the block at a height.
    pub fn get_by_height(&self, height: u64) -> Result<Option<Block>> {
        let block = self.store.get_by_height(height)?;
        debug!(height, found = block.is_some(), "block lookup by height");
        Ok(block)
    }

    /// Get the lowest block whose stored hash equals `hash`.
    pub fn get_by_hash(&self, hash: &BlockHash) -> Result<Option<Block>> {
        let block = self.store.get_by_hash(hash)?;
        debug!(%hash, found = block.is_some(), "block lookup by hash");
        Ok(block)
    }

    /// Every block, ordered by height.
    pub fn blocks(&self) -> Result<Vec<Block>> {
        Ok(self.store.all_blocks()?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Append
    // ─────────────────────────────────────────────────────────────────────────

    /// Seal a candidate on top of the current tip and store it.
    pub(crate) fn append(&self, candidate: Candidate) -> Result<Block> {
        let _guard = self
            .append_lock
            .lock()
            .map_err(|_| NotaryError::Store(StoreError::LockPoisoned))?;

        let block = self.seal_and_push(candidate)?;
        info!(height = block.height(), hash = %block.hash(), "block appended");
        Ok(block)
    }

    /// Caller must hold the append lock or own the chain exclusively.
    fn seal_and_push(&self, candidate: Candidate) -> Result<Block> {
        let (height, previous_hash) = match self.store.tip()? {
            Some(tip) => (tip.height() + 1, Some(*tip.hash())),
            None => (0, None),
        };

        let block = Block::seal(height, self.clock.now_millis(), previous_hash, candidate);
        self.store.push(&block)?;
        Ok(block)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────────────────────

    /// Scan the whole chain and report every block failing an integrity
    /// check. An empty result means the chain is sound.
    pub fn validate(&self) -> Result<Vec<IntegrityFault>> {
        let blocks = self.store.all_blocks()?;

        let mut by_hash: HashMap<BlockHash, usize> = HashMap::with_capacity(blocks.len());
        for (index, block) in blocks.iter().enumerate() {
            by_hash.entry(*block.hash()).or_insert(index);
        }

        let mut faults = Vec::new();
        for block in &blocks {
            let predecessor = if block.is_genesis() {
                None
            } else {
                block
                    .previous_hash()
                    .and_then(|hash| by_hash.get(hash))
                    .map(|&index| &blocks[index])
            };

            let kinds = validation::validate_block(block, predecessor);
            if let Some(fault) = fault_report(block, kinds) {
                warn!(
                    height = fault.height,
                    hash = %fault.hash,
                    kinds = ?fault.kinds,
                    "integrity fault"
                );
                faults.push(fault);
            }
        }

        debug!(blocks = blocks.len(), faults = faults.len(), "chain validated");
        Ok(faults)
    }

    /// Check a single block. `None` if there is no block at `height`.
    pub fn validate_block(&self, height: u64) -> Result<Option<Vec<FaultKind>>> {
        let Some(block) = self.store.get_by_height(height)? else {
            return Ok(None);
        };

        let predecessor = match block.previous_hash() {
            Some(hash) if !block.is_genesis() => self.store.get_by_hash(hash)?,
            _ => None,
        };

        let kinds = validation::validate_block(&block, predecessor.as_ref());
        if !kinds.is_empty() {
            warn!(height, kinds = ?kinds, "integrity fault");
        }
        Ok(Some(kinds))
    }
}
