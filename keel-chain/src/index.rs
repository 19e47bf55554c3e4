//! The chain index trait.

use keel_core::Hash;

use crate::block::{Block, BlockHeader, Transaction};
use crate::error::Result;

/// Read access to the active chain.
///
/// All methods answer from a consistent view taken under the
/// implementation's internal read lock. `Ok(None)` means "not present in the
/// current view": a height beyond the tip, an unknown hash, or (for
/// [`read_block`](Self::read_block)) a block whose body has been pruned while
/// its header remains indexed.
pub trait ChainIndex {
    /// Height of the chain tip, or `None` before genesis.
    fn tip_height(&self) -> Result<Option<u64>>;

    /// Hash of the block at `height` on the active chain.
    fn block_hash_at(&self, height: u64) -> Result<Option<Hash>>;

    /// Header of the block with the given hash.
    fn header_by_hash(&self, block_hash: &Hash) -> Result<Option<BlockHeader>>;

    /// Header of the block at `height` on the active chain.
    fn header_at(&self, height: u64) -> Result<Option<BlockHeader>> {
        match self.block_hash_at(height)? {
            Some(h) => self.header_by_hash(&h),
            None => Ok(None),
        }
    }

    /// Full block body for the given hash.
    ///
    /// `Ok(None)` for an unknown hash, or for a known header whose body has
    /// been pruned from local storage.
    fn read_block(&self, block_hash: &Hash) -> Result<Option<Block>>;

    /// A confirmed transaction together with its confirming block header.
    fn tx_confirmed(&self, txid: &Hash) -> Result<Option<(Transaction, BlockHeader)>>;

    /// A transaction by id, confirmed or not.
    ///
    /// The second element is the confirming block hash, `None` while the
    /// transaction is still in the mempool.
    fn transaction(&self, txid: &Hash) -> Result<Option<(Transaction, Option<Hash>)>>;
}
