//! In-memory reference chain.

use std::collections::{HashMap, HashSet};

use keel_core::Hash;
use parking_lot::RwLock;

use crate::block::{Block, BlockHeader, Transaction};
use crate::error::Result;
use crate::index::ChainIndex;

/// Interior chain state, guarded as one unit so every read is consistent.
#[derive(Debug, Default)]
struct ChainInner {
    /// Blocks by height. Index == height.
    blocks: Vec<Block>,
    /// Block hash -> height.
    by_hash: HashMap<Hash, u64>,
    /// Txid -> (height, position in block).
    tx_index: HashMap<Hash, (u64, usize)>,
    /// Unconfirmed transactions.
    mempool: HashMap<Hash, Transaction>,
    /// Heights whose block bodies have been dropped.
    pruned: HashSet<u64>,
}

/// A lock-guarded in-memory chain.
///
/// Serves tests and embedders that keep their real index elsewhere. Blocks
/// connect at the tip and may be disconnected again, mirroring what the
/// consensus engine does underneath a live proof construction.
#[derive(Debug, Default)]
pub struct MemoryChain {
    inner: RwLock<ChainInner>,
}

impl MemoryChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a block at the tip.
    ///
    /// # Panics
    ///
    /// Panics if the block's height is not the next height. Fixture misuse,
    /// not a runtime condition.
    pub fn push_block(&self, block: Block) -> Hash {
        let mut inner = self.inner.write();
        let next = inner.blocks.len() as u64;
        assert_eq!(block.header.height, next, "blocks must connect in order");

        let block_hash = block.hash();
        inner.by_hash.insert(block_hash, next);
        for (pos, tx) in block.txs.iter().enumerate() {
            let txid = tx.hash();
            inner.mempool.remove(&txid);
            inner.tx_index.insert(txid, (next, pos));
        }
        inner.blocks.push(block);
        block_hash
    }

    /// Build and connect a block at the tip from the given transactions.
    pub fn push_txs(&self, txs: Vec<Transaction>) -> Hash {
        let (height, parent) = {
            let inner = self.inner.read();
            let height = inner.blocks.len() as u64;
            let parent = inner
                .blocks
                .last()
                .map(|b| b.hash())
                .unwrap_or(Hash::ZERO);
            (height, parent)
        };
        self.push_block(Block::build(height, parent, txs))
    }

    /// Disconnect the tip block, returning it.
    ///
    /// Its transactions go back to the mempool.
    pub fn disconnect_tip(&self) -> Option<Block> {
        let mut inner = self.inner.write();
        let block = inner.blocks.pop()?;
        let height = block.header.height;
        inner.by_hash.remove(&block.hash());
        inner.pruned.remove(&height);
        for tx in &block.txs {
            let txid = tx.hash();
            inner.tx_index.remove(&txid);
            inner.mempool.insert(txid, tx.clone());
        }
        Some(block)
    }

    /// Add an unconfirmed transaction to the mempool.
    pub fn add_mempool_tx(&self, tx: Transaction) -> Hash {
        let txid = tx.hash();
        self.inner.write().mempool.insert(txid, tx);
        txid
    }

    /// Drop the block body at `height`, keeping its header indexed.
    pub fn prune_block(&self, height: u64) {
        self.inner.write().pruned.insert(height);
    }

    /// Merkle root of the block at `height`, if on chain.
    pub fn merkle_root_at(&self, height: u64) -> Option<Hash> {
        let inner = self.inner.read();
        inner
            .blocks
            .get(height as usize)
            .map(|b| b.header.merkle_root)
    }
}

impl ChainIndex for MemoryChain {
    fn tip_height(&self) -> Result<Option<u64>> {
        let inner = self.inner.read();
        Ok(inner.blocks.len().checked_sub(1).map(|h| h as u64))
    }

    fn block_hash_at(&self, height: u64) -> Result<Option<Hash>> {
        let inner = self.inner.read();
        Ok(inner.blocks.get(height as usize).map(|b| b.hash()))
    }

    fn header_by_hash(&self, block_hash: &Hash) -> Result<Option<BlockHeader>> {
        let inner = self.inner.read();
        let height = match inner.by_hash.get(block_hash) {
            Some(h) => *h,
            None => return Ok(None),
        };
        Ok(inner
            .blocks
            .get(height as usize)
            .map(|b| b.header.clone()))
    }

    fn read_block(&self, block_hash: &Hash) -> Result<Option<Block>> {
        let inner = self.inner.read();
        let height = match inner.by_hash.get(block_hash) {
            Some(h) => *h,
            None => return Ok(None),
        };
        if inner.pruned.contains(&height) {
            return Ok(None);
        }
        Ok(inner.blocks.get(height as usize).cloned())
    }

    fn tx_confirmed(&self, txid: &Hash) -> Result<Option<(Transaction, BlockHeader)>> {
        let inner = self.inner.read();
        let (height, pos) = match inner.tx_index.get(txid) {
            Some(entry) => *entry,
            None => return Ok(None),
        };
        let block = match inner.blocks.get(height as usize) {
            Some(b) => b,
            None => return Ok(None),
        };
        Ok(Some((block.txs[pos].clone(), block.header.clone())))
    }

    fn transaction(&self, txid: &Hash) -> Result<Option<(Transaction, Option<Hash>)>> {
        let inner = self.inner.read();
        if let Some((height, pos)) = inner.tx_index.get(txid) {
            if let Some(block) = inner.blocks.get(*height as usize) {
                return Ok(Some((block.txs[*pos].clone(), Some(block.hash()))));
            }
        }
        Ok(inner
            .mempool
            .get(txid)
            .map(|tx| (tx.clone(), None)))
    }
}
