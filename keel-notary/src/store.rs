//! Notarisation store abstraction.

use std::collections::HashMap;

use keel_core::Hash;
use parking_lot::RwLock;

use crate::error::Result;
use crate::notarisation::{Notarisation, NotarisationsInBlock};

/// Read access to the notarisation index.
///
/// Discovery order within a block is the deterministic order the index
/// returns for that block hash.
pub trait NotaryStore {
    /// Notarisations discovered in the block with the given hash.
    ///
    /// `Ok(None)` when the block carries no notarisations.
    fn block_notarisations(&self, block_hash: &Hash) -> Result<Option<NotarisationsInBlock>>;

    /// The backnotarisation that a hub notarisation produced locally.
    ///
    /// Keyed by the hub-side notarisation transaction id.
    fn back_notarisation(&self, hub_txid: &Hash) -> Result<Option<Notarisation>>;
}

/// An in-memory notarisation index for tests and externally indexed
/// embedders.
#[derive(Debug, Default)]
pub struct MemoryNotaryStore {
    by_block: RwLock<HashMap<Hash, NotarisationsInBlock>>,
    back: RwLock<HashMap<Hash, Notarisation>>,
}

impl MemoryNotaryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a notarisation as discovered in the given block, after any
    /// already recorded there.
    pub fn insert(&self, block_hash: Hash, nota: Notarisation) {
        self.by_block
            .write()
            .entry(block_hash)
            .or_default()
            .push(nota);
    }

    /// Link a hub notarisation txid to its local backnotarisation.
    pub fn link_back(&self, hub_txid: Hash, backnotarisation: Notarisation) {
        self.back.write().insert(hub_txid, backnotarisation);
    }
}

impl NotaryStore for MemoryNotaryStore {
    fn block_notarisations(&self, block_hash: &Hash) -> Result<Option<NotarisationsInBlock>> {
        Ok(self.by_block.read().get(block_hash).cloned())
    }

    fn back_notarisation(&self, hub_txid: &Hash) -> Result<Option<Notarisation>> {
        Ok(self.back.read().get(hub_txid).cloned())
    }
}
