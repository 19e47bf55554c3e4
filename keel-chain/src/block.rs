//! Block and transaction types.

use keel_core::{hash, merkle_root, Hash};
use serde::{Deserialize, Serialize};

/// A transaction with an opaque payload.
///
/// The engine never interprets payloads; it only needs stable transaction
/// ids and the ability to locate a transaction inside its confirming block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Raw transaction bytes.
    pub payload: Vec<u8>,
}

impl Transaction {
    /// Create a transaction from raw bytes.
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// The transaction id: double SHA-256 of the payload.
    pub fn hash(&self) -> Hash {
        hash(&self.payload)
    }
}

/// A block header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Height of the block in the active chain.
    pub height: u64,
    /// Hash of the parent block.
    pub parent: Hash,
    /// Merkle root over the block's transaction ids.
    pub merkle_root: Hash,
}

impl BlockHeader {
    /// The block hash: double SHA-256 of the encoded header.
    pub fn hash(&self) -> Hash {
        let encoded = bincode::serialize(self).expect("header encoding is infallible");
        hash(&encoded)
    }
}

/// A block: header plus ordered transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// The block header.
    pub header: BlockHeader,
    /// Transactions in consensus order.
    pub txs: Vec<Transaction>,
}

impl Block {
    /// Build a block at `height` on `parent` from the given transactions.
    ///
    /// The header merkle root is computed from the transaction ids.
    pub fn build(height: u64, parent: Hash, txs: Vec<Transaction>) -> Self {
        let ids: Vec<Hash> = txs.iter().map(|tx| tx.hash()).collect();
        Self {
            header: BlockHeader {
                height,
                parent,
                merkle_root: merkle_root(&ids),
            },
            txs,
        }
    }

    /// The block hash.
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    /// Transaction ids in block order.
    pub fn tx_ids(&self) -> Vec<Hash> {
        self.txs.iter().map(|tx| tx.hash()).collect()
    }

    /// Position of a transaction within the block, if present.
    pub fn position_of(&self, txid: &Hash) -> Option<usize> {
        self.txs.iter().position(|tx| &tx.hash() == txid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_hash_is_stable() {
        let tx = Transaction::new(b"transfer".to_vec());
        assert_eq!(tx.hash(), Transaction::new(b"transfer".to_vec()).hash());
        assert_ne!(tx.hash(), Transaction::new(b"other".to_vec()).hash());
    }

    #[test]
    fn test_block_root_covers_txs() {
        let txs = vec![Transaction::new(b"a".to_vec()), Transaction::new(b"b".to_vec())];
        let block = Block::build(5, Hash::ZERO, txs.clone());

        let ids: Vec<Hash> = txs.iter().map(|t| t.hash()).collect();
        assert_eq!(block.header.merkle_root, merkle_root(&ids));
    }

    #[test]
    fn test_position_of() {
        let txs = vec![
            Transaction::new(b"a".to_vec()),
            Transaction::new(b"b".to_vec()),
            Transaction::new(b"c".to_vec()),
        ];
        let block = Block::build(0, Hash::ZERO, txs.clone());

        assert_eq!(block.position_of(&txs[2].hash()), Some(2));
        assert_eq!(block.position_of(&hash(b"missing")), None);
    }

    #[test]
    fn test_header_hash_changes_with_root() {
        let a = Block::build(1, Hash::ZERO, vec![Transaction::new(b"a".to_vec())]);
        let b = Block::build(1, Hash::ZERO, vec![Transaction::new(b"b".to_vec())]);
        assert_ne!(a.hash(), b.hash());
    }
}
