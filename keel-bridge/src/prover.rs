//! Assetchain-side proof construction.

use keel_chain::ChainIndex;
use keel_core::{
    build_merkle_tree, merkle_branch, safe_check_merkle_branch, Hash, MerkleBranch, TxProof,
};
use keel_notary::{Notarisation, NotaryStore};
use tracing::{debug, warn};

use crate::error::{BridgeError, Result};
use crate::policy::ScanPolicy;
use crate::scan::{is_symbol, scan_notarisations_from_height};

/// Builds proofs from a local transaction up to a notarised `MoM`.
///
/// Runs on an assetchain. The resulting [`TxProof`] names the hub
/// notarisation transaction that committed the `MoM`, so the hub can extend
/// the branch further.
pub struct AssetchainProver<'a, C, N> {
    chain: &'a C,
    notary: &'a N,
    symbol: String,
    policy: ScanPolicy,
}

impl<'a, C, N> AssetchainProver<'a, C, N>
where
    C: ChainIndex,
    N: NotaryStore,
{
    /// Create a prover for the local assetchain identified by `symbol`.
    pub fn new(chain: &'a C, notary: &'a N, symbol: impl Into<String>) -> Self {
        Self {
            chain,
            notary,
            symbol: symbol.into(),
            policy: ScanPolicy::default(),
        }
    }

    /// Override the scan policy.
    pub fn with_policy(mut self, policy: ScanPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The local chain's symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Prove that a local transaction is covered by a notarised `MoM`.
    ///
    /// The returned branch folds `tx_hash` through its block's transaction
    /// tree and then through the `MoM` leaf window; executing it on
    /// `tx_hash` reproduces the `MoM` committed by the named notarisation.
    pub fn prove_local(&self, tx_hash: Hash) -> Result<TxProof> {
        // Pin the tip once; every lookup below is bounded by this snapshot.
        let tip = self
            .chain
            .tip_height()?
            .ok_or(BridgeError::TxNotFound(tx_hash))?;

        let (_, block_hash) = self
            .chain
            .transaction(&tx_hash)?
            .ok_or(BridgeError::TxNotFound(tx_hash))?;
        let block_hash = block_hash.ok_or(BridgeError::TxInMempool(tx_hash))?;
        let header = self
            .chain
            .header_by_hash(&block_hash)?
            .ok_or(BridgeError::TxNotFound(tx_hash))?;
        let tx_height = header.height;

        // The first own-symbol notarisation pinning a height at or above the
        // transaction's block carries the MoM that covers it.
        let nota = self.first_covering_notarisation(tx_height, tip)?;
        let n_index = nota.body.height - tx_height;

        let mom_branch = self.branch_into_mom(&nota, n_index, header.merkle_root)?;
        let (tx_index, tx_branch) = self.branch_into_block(&block_hash, tx_hash, header.merkle_root)?;

        // One composed path: tx -> block root -> MoM.
        let branch = MerkleBranch::new(tx_index as u64, tx_branch)
            .then(MerkleBranch::new(n_index, mom_branch));
        if branch.exec(tx_hash) != nota.body.mom {
            return Err(BridgeError::ProofSelfCheck);
        }

        debug!(
            tx = %tx_hash,
            notarisation = %nota.body.tx_hash,
            mom = %nota.body.mom,
            index = branch.index,
            "assetchain proof constructed"
        );
        Ok(TxProof::new(nota.body.tx_hash, branch))
    }

    /// The backnotarisation that follows the one produced by the given hub
    /// notarisation, the record that will carry the matching `MoMoM`.
    pub fn next_backnotarisation(&self, hub_notarisation_txid: Hash) -> Result<Notarisation> {
        let bn = self
            .notary
            .back_notarisation(&hub_notarisation_txid)?
            .ok_or(BridgeError::BacknotarisationPending(hub_notarisation_txid))?;

        let tip = self
            .chain
            .tip_height()?
            .ok_or(BridgeError::BacknotarisationPending(hub_notarisation_txid))?;
        let (_, header) = self
            .chain
            .tx_confirmed(&bn.txid)?
            .ok_or(BridgeError::BacknotarisationPending(hub_notarisation_txid))?;

        scan_notarisations_from_height(
            self.chain,
            self.notary,
            &self.policy,
            header.height + 1,
            tip,
            is_symbol(&self.symbol),
        )?
        .map(|(_, nota)| nota)
        .ok_or(BridgeError::BacknotarisationPending(hub_notarisation_txid))
    }

    fn first_covering_notarisation(&self, tx_height: u64, tip: u64) -> Result<Notarisation> {
        scan_notarisations_from_height(
            self.chain,
            self.notary,
            &self.policy,
            tx_height,
            tip,
            |nota| nota.symbol() == self.symbol && nota.body.height >= tx_height,
        )?
        .map(|(_, nota)| nota)
        .ok_or_else(|| BridgeError::NotarisationNotConfirmed {
            symbol: self.symbol.clone(),
            height: tx_height,
        })
    }

    /// Rebuild the notarisation's MoM window from local block merkle roots
    /// and derive the branch for leaf `n_index`.
    ///
    /// Leaves run from the notarised height backwards: leaf 0 is the root at
    /// `nota.body.height`, leaf `mom_depth - 1` the oldest in the window.
    fn branch_into_mom(
        &self,
        nota: &Notarisation,
        n_index: u64,
        tx_block_root: Hash,
    ) -> Result<Vec<Hash>> {
        let mut leaves = Vec::with_capacity(nota.body.mom_depth as usize);
        for i in 0..nota.body.mom_depth {
            let height = nota.body.height.checked_sub(i).ok_or_else(|| {
                BridgeError::MerkleInconsistency(format!(
                    "MoM depth {} underruns genesis at notarised height {}",
                    nota.body.mom_depth, nota.body.height
                ))
            })?;
            let header = self.chain.header_at(height)?.ok_or_else(|| {
                BridgeError::NotarisationNotConfirmed {
                    symbol: self.symbol.clone(),
                    height,
                }
            })?;
            leaves.push(header.merkle_root);
        }

        let (tree, mutated) = build_merkle_tree(&leaves);
        if mutated {
            warn!(height = nota.body.height, "mutated MoM leaf window");
        }
        let branch = merkle_branch(n_index as usize, leaves.len(), &tree);

        match safe_check_merkle_branch(tx_block_root, &branch, n_index) {
            Some(root) if root == nota.body.mom => Ok(branch),
            _ => Err(BridgeError::MerkleInconsistency(format!(
                "reconstructed window disagrees with notarised MoM {}",
                nota.body.mom
            ))),
        }
    }

    /// Derive the transaction's branch inside its confirming block and check
    /// it against the block's merkle root.
    fn branch_into_block(
        &self,
        block_hash: &Hash,
        tx_hash: Hash,
        block_root: Hash,
    ) -> Result<(usize, Vec<Hash>)> {
        let block = self
            .chain
            .read_block(block_hash)?
            .ok_or(BridgeError::BlockPruned(*block_hash))?;

        // A disconnect underneath us can race the earlier resolution.
        let tx_index = block
            .position_of(&tx_hash)
            .ok_or(BridgeError::TxNotFound(tx_hash))?;

        let ids = block.tx_ids();
        let (tree, _) = build_merkle_tree(&ids);
        let branch = merkle_branch(tx_index, ids.len(), &tree);

        match safe_check_merkle_branch(tx_hash, &branch, tx_index as u64) {
            Some(root) if root == block_root => Ok((tx_index, branch)),
            _ => Err(BridgeError::MerkleInconsistency(
                "transaction branch disagrees with block merkle root".into(),
            )),
        }
    }
}
