//! Merkle branches and transaction proofs.
//!
//! A [`MerkleBranch`] carries the sibling hashes and leaf index needed to
//! fold a leaf up to a root. Branches compose: a path from a transaction to
//! a block root, followed by a path from that root into a higher tree,
//! concatenates into a single path from the transaction to the higher root.

use serde::{Deserialize, Serialize};

use crate::crypto::Hash;
use crate::merkle::{check_merkle_branch, safe_check_merkle_branch};

/// An ordered sequence of sibling hashes paired with a leaf index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleBranch {
    /// Index of the leaf within its tree. Bit `k` gives the side at level `k`.
    pub index: u64,
    /// Sibling hashes, leaf level first.
    pub hashes: Vec<Hash>,
}

impl MerkleBranch {
    /// Create a branch from an index and sibling hashes.
    pub fn new(index: u64, hashes: Vec<Hash>) -> Self {
        Self { index, hashes }
    }

    /// A branch with no siblings: the leaf is its own root.
    pub fn trivial() -> Self {
        Self {
            index: 0,
            hashes: Vec::new(),
        }
    }

    /// Fold `leaf` through the branch, returning the implied root.
    pub fn exec(&self, leaf: Hash) -> Hash {
        check_merkle_branch(leaf, &self.hashes, self.index)
    }

    /// Like [`exec`](Self::exec), but `None` when the index cannot address a
    /// leaf of a tree this deep.
    pub fn exec_checked(&self, leaf: Hash) -> Option<Hash> {
        safe_check_merkle_branch(leaf, &self.hashes, self.index)
    }

    /// Compose with a branch in a higher tree whose leaf is this branch's
    /// root.
    ///
    /// Siblings concatenate (this branch's first) and the indices combine as
    /// `(upper.index << self.hashes.len()) | self.index`. Composition is
    /// associative.
    pub fn then(mut self, upper: MerkleBranch) -> MerkleBranch {
        self.index |= upper.index << self.hashes.len();
        self.hashes.extend(upper.hashes);
        self
    }

    /// Number of tree levels this branch spans.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// True when the branch has no siblings.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// A proof that a transaction folds to the root committed by a notarisation.
///
/// `branch.exec(tx_hash)` yields the `MoM` (or `MoMoM`) committed by the
/// notarisation named by `notarisation_txid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxProof {
    /// Hub transaction id of the notarisation that commits to the root.
    pub notarisation_txid: Hash,
    /// Path from the transaction hash to the committed root.
    pub branch: MerkleBranch,
}

impl TxProof {
    /// Create a proof from its parts.
    pub fn new(notarisation_txid: Hash, branch: MerkleBranch) -> Self {
        Self {
            notarisation_txid,
            branch,
        }
    }
}
