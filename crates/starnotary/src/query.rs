//! Ownership queries over the chain.

use starnotary_core::{Address, Block, StarRecord};
use starnotary_store::BlockStore;
use tracing::debug;

use crate::chain::Chain;
use crate::error::Result;

impl<S: BlockStore> Chain<S> {
    /// Every block registered by `owner`, in chain order.
    ///
    /// The genesis block is never included. A stored payload that fails to
    /// decode is a [`Codec`](crate::NotaryError::Codec) error.
    pub fn blocks_owned_by(&self, owner: &Address) -> Result<Vec<Block>> {
        let mut owned = Vec::new();
        for block in self.registrations()? {
            if block.decode_payload()?.owner() == Some(owner) {
                owned.push(block);
            }
        }

        debug!(%owner, count = owned.len(), "blocks owned by address");
        Ok(owned)
    }

    /// Every star registered by `owner`, in chain order, with stories
    /// decoded.
    pub fn stars_owned_by(&self, owner: &Address) -> Result<Vec<StarRecord>> {
        let mut stars = Vec::new();
        for block in self.registrations()? {
            if let Some(record) = block.decode_payload()?.into_star_record() {
                if record.owner == *owner {
                    stars.push(record);
                }
            }
        }

        debug!(%owner, count = stars.len(), "stars owned by address");
        Ok(stars)
    }

    /// Blocks above genesis.
    fn registrations(&self) -> Result<Vec<Block>> {
        let len = self.store().len()?;
        Ok(self.store().range(1, len)?)
    }
}
