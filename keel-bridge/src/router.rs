//! Hub-side proof extension.

use keel_chain::ChainIndex;
use keel_core::{build_merkle_tree, merkle_branch, merkle_root, Hash, MerkleBranch, TxProof};
use keel_notary::{AuthorityRegistry, NotaryStore, MIN_CROSS_CHAIN_ID};
use tracing::{debug, trace};

use crate::error::{BridgeError, Result};
use crate::policy::ScanPolicy;
use crate::scan::{is_symbol, scan_notarisations_from_height};

/// The outcome of a proof-root computation.
///
/// Either fully determined, or fully null: when the backward scan cannot
/// close the bracket (fewer than two own notarisations in the window), every
/// field is discarded so callers never observe a partial window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofRoot {
    /// Merkle root over the collected `MoM`s.
    pub momom: Hash,
    /// The collected `MoM`s, in discovery order.
    pub moms: Vec<Hash>,
    /// Txid of the most recent own-symbol notarisation in the window; the
    /// notarisation the target chain will recognize the root under.
    pub dest_notarisation_txid: Hash,
}

impl ProofRoot {
    /// The null outcome: under-confirmed window.
    pub fn null() -> Self {
        Self {
            momom: Hash::ZERO,
            moms: Vec::new(),
            dest_notarisation_txid: Hash::ZERO,
        }
    }

    /// Whether the computation produced a determinate root.
    pub fn is_null(&self) -> bool {
        self.momom.is_zero()
    }
}

/// Extends assetchain proofs to a `MoMoM` the target chain has received.
///
/// Runs on the hub. Consumes a [`TxProof`] terminating at a `MoM`, finds the
/// bracket of target-chain notarisations enclosing it, and emits a proof
/// terminating at the bracket's `MoMoM`.
pub struct HubProofRouter<'a, C, N> {
    chain: &'a C,
    notary: &'a N,
    authorities: &'a AuthorityRegistry,
    policy: ScanPolicy,
}

impl<'a, C, N> HubProofRouter<'a, C, N>
where
    C: ChainIndex,
    N: NotaryStore,
{
    /// Create a router over the hub's chain and notarisation index.
    pub fn new(chain: &'a C, notary: &'a N, authorities: &'a AuthorityRegistry) -> Self {
        Self {
            chain,
            notary,
            authorities,
            policy: ScanPolicy::default(),
        }
    }

    /// Override the scan policy.
    pub fn with_policy(mut self, policy: ScanPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Extend an assetchain proof to the `MoMoM` of the target chain.
    ///
    /// `asset_proof` must fold `tx_hash` to a `MoM` committed on the hub by
    /// the notarisation it names. The returned proof folds `tx_hash` all the
    /// way to the `MoMoM` that the target's next backnotarisation commits
    /// to, and names the target-chain notarisation the root travels under.
    pub fn extend_to_momom(
        &self,
        tx_hash: Hash,
        target_symbol: &str,
        target_cc_id: u32,
        asset_proof: &TxProof,
    ) -> Result<TxProof> {
        let mom = asset_proof.branch.exec(tx_hash);

        // Anchor: the hub height at which the source notarisation confirmed.
        let (_, src_header) = self
            .chain
            .tx_confirmed(&asset_proof.notarisation_txid)?
            .ok_or(BridgeError::SourceNotarisationMissing(
                asset_proof.notarisation_txid,
            ))?;

        let tip = self
            .chain
            .tip_height()?
            .ok_or(BridgeError::SourceNotarisationMissing(
                asset_proof.notarisation_txid,
            ))?;

        // A backward scan from the source height might close the target's
        // bracket below the source MoM and miss it entirely. Scan forward
        // for the first target notarisation at or above the source, so the
        // window computed from there is inclusive of the source.
        let (target_height, _) = scan_notarisations_from_height(
            self.chain,
            self.notary,
            &self.policy,
            src_header.height,
            tip,
            is_symbol(target_symbol),
        )?
        .ok_or_else(|| BridgeError::TargetNotarisationNotFound(target_symbol.to_string()))?;

        let root = self.calculate_proof_root(target_symbol, target_cc_id, target_height)?;
        if root.is_null() {
            return Err(BridgeError::EmptyProofRoot(target_symbol.to_string()));
        }
        debug!(
            symbol = target_symbol,
            momom = %root.momom,
            window = root.moms.len(),
            "proof root computed"
        );

        let n_index = root
            .moms
            .iter()
            .position(|m| *m == mom)
            .ok_or(BridgeError::MomNotInWindow)?;

        let (tree, _) = build_merkle_tree(&root.moms);
        let momom_branch = merkle_branch(n_index, root.moms.len(), &tree);

        let branch = asset_proof
            .branch
            .clone()
            .then(MerkleBranch::new(n_index as u64, momom_branch));
        if branch.exec(tx_hash) != root.momom {
            return Err(BridgeError::ProofSelfCheck);
        }

        Ok(TxProof::new(root.dest_notarisation_txid, branch))
    }

    /// Compute the `MoMoM` window for `symbol` at a hub height.
    ///
    /// Scans backwards from `hub_height` until two own-symbol notarisations
    /// bracket the window. `MoM`s are collected, in discovery order, from
    /// every notarisation between them (the bracket-opening block included)
    /// whose symbol shares the target's authority and whose cross-chain id
    /// matches. The bracket guarantees the window is one the target's next
    /// backnotarisation commits to in full.
    ///
    /// Reserved cross-chain ids, an out-of-range height, or a window the
    /// scan limit cannot close all yield [`ProofRoot::null`].
    pub fn calculate_proof_root(
        &self,
        symbol: &str,
        target_cc_id: u32,
        hub_height: u64,
    ) -> Result<ProofRoot> {
        if target_cc_id < MIN_CROSS_CHAIN_ID {
            return Ok(ProofRoot::null());
        }
        match self.chain.tip_height()? {
            Some(tip) if hub_height <= tip => {}
            _ => return Ok(ProofRoot::null()),
        }

        let authority = self.authorities.authority_of(symbol);

        let mut moms: Vec<Hash> = Vec::new();
        let mut dest_notarisation_txid = Hash::ZERO;
        let mut seen_own = 0u32;

        for i in 0..self.policy.scan_limit_blocks {
            if i > hub_height {
                break;
            }
            let height = hub_height - i;
            let Some(block_hash) = self.chain.block_hash_at(height)? else {
                continue;
            };
            let Some(notarisations) = self.notary.block_notarisations(&block_hash)? else {
                continue;
            };

            // Bracket pass: count own-symbol notarisations. The second one
            // closes the window immediately; nothing after it in this block
            // is consumed.
            for nota in &notarisations {
                if nota.symbol() == symbol {
                    seen_own += 1;
                    if seen_own == 1 {
                        dest_notarisation_txid = nota.txid;
                        trace!(height, txid = %nota.txid, "bracket opened");
                    } else {
                        trace!(height, txid = %nota.txid, "bracket closed");
                        return Ok(ProofRoot {
                            momom: merkle_root(&moms),
                            moms,
                            dest_notarisation_txid,
                        });
                    }
                }
            }

            // Collection pass over the same block: while exactly one own
            // notarisation has been seen, every same-authority notarisation
            // with the matching cross-chain id contributes its MoM. The
            // block that opened the bracket contributes too.
            if seen_own == 1 {
                for nota in &notarisations {
                    if self.authorities.authority_of(nota.symbol()) == authority
                        && nota.body.cc_id == target_cc_id
                    {
                        trace!(height, mom = %nota.body.mom, symbol = nota.symbol(), "MoM collected");
                        moms.push(nota.body.mom);
                    }
                }
            }
        }

        // Window exhausted with the bracket open: no determinate root.
        Ok(ProofRoot::null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_chain::{MemoryChain, Transaction};
    use keel_core::hash;
    use keel_notary::{MemoryNotaryStore, Notarisation, NotarisationBody};

    fn nota(symbol: &str, cc_id: u32, tag: &str) -> Notarisation {
        Notarisation::new(
            hash(format!("{tag}-txid").as_bytes()),
            NotarisationBody {
                symbol: symbol.into(),
                cc_id,
                height: 0,
                mom: hash(format!("{tag}-mom").as_bytes()),
                mom_depth: 1,
                tx_hash: hash(format!("{tag}-txid").as_bytes()),
                momom: Hash::ZERO,
            },
        )
    }

    fn hub_with_blocks(n: u64) -> (MemoryChain, MemoryNotaryStore, AuthorityRegistry) {
        let chain = MemoryChain::new();
        for i in 0..n {
            chain.push_txs(vec![Transaction::new(format!("hub-{i}").into_bytes())]);
        }
        (chain, MemoryNotaryStore::new(), AuthorityRegistry::new())
    }

    fn insert_at(chain: &MemoryChain, store: &MemoryNotaryStore, height: u64, nota: Notarisation) {
        let block_hash = chain.block_hash_at(height).unwrap().unwrap();
        store.insert(block_hash, nota);
    }

    #[test]
    fn test_reserved_cc_id_yields_null() {
        let (chain, store, auth) = hub_with_blocks(10);
        let router = HubProofRouter::new(&chain, &store, &auth);

        for cc_id in [0, 1] {
            let root = router.calculate_proof_root("BETA", cc_id, 5).unwrap();
            assert_eq!(root, ProofRoot::null());
        }
    }

    #[test]
    fn test_height_beyond_tip_yields_null() {
        let (chain, store, auth) = hub_with_blocks(10);
        let router = HubProofRouter::new(&chain, &store, &auth);

        let root = router.calculate_proof_root("BETA", 2, 10).unwrap();
        assert!(root.is_null());
    }

    #[test]
    fn test_single_own_notarisation_yields_null() {
        let (chain, store, auth) = hub_with_blocks(10);
        insert_at(&chain, &store, 6, nota("BETA", 2, "b0"));
        let router = HubProofRouter::new(&chain, &store, &auth);

        let root = router.calculate_proof_root("BETA", 2, 8).unwrap();
        assert_eq!(root, ProofRoot::null());
    }

    #[test]
    fn test_bracket_collects_window() {
        let (chain, store, auth) = hub_with_blocks(12);
        insert_at(&chain, &store, 3, nota("BETA", 2, "b-close"));
        insert_at(&chain, &store, 5, nota("ALPHA", 2, "a-mid"));
        insert_at(&chain, &store, 8, nota("BETA", 2, "b-open"));
        let router = HubProofRouter::new(&chain, &store, &auth);

        let root = router.calculate_proof_root("BETA", 2, 8).unwrap();
        assert!(!root.is_null());
        // Discovery order: the bracket-opening block first, then downward.
        assert_eq!(
            root.moms,
            vec![nota("BETA", 2, "b-open").body.mom, nota("ALPHA", 2, "a-mid").body.mom]
        );
        assert_eq!(root.momom, merkle_root(&root.moms));
        assert_eq!(root.dest_notarisation_txid, nota("BETA", 2, "b-open").txid);
    }

    #[test]
    fn test_scan_origin_notarisation_accepted() {
        let (chain, store, auth) = hub_with_blocks(12);
        insert_at(&chain, &store, 4, nota("BETA", 2, "b-close"));
        insert_at(&chain, &store, 9, nota("BETA", 2, "b-open"));
        let router = HubProofRouter::new(&chain, &store, &auth);

        // The own notarisation sits exactly at the queried height.
        let root = router.calculate_proof_root("BETA", 2, 9).unwrap();
        assert_eq!(root.dest_notarisation_txid, nota("BETA", 2, "b-open").txid);
    }

    #[test]
    fn test_deterministic_over_fixed_history() {
        let (chain, store, auth) = hub_with_blocks(12);
        insert_at(&chain, &store, 2, nota("BETA", 2, "b-close"));
        insert_at(&chain, &store, 4, nota("GAMMA", 2, "g-mid"));
        insert_at(&chain, &store, 7, nota("BETA", 2, "b-open"));
        let router = HubProofRouter::new(&chain, &store, &auth);

        let first = router.calculate_proof_root("BETA", 2, 7).unwrap();
        let second = router.calculate_proof_root("BETA", 2, 7).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_mismatched_cc_id_not_collected() {
        let (chain, store, auth) = hub_with_blocks(12);
        insert_at(&chain, &store, 3, nota("BETA", 3, "b-close"));
        insert_at(&chain, &store, 5, nota("ALPHA", 2, "a-wrong-cc"));
        insert_at(&chain, &store, 8, nota("BETA", 3, "b-open"));
        let router = HubProofRouter::new(&chain, &store, &auth);

        let root = router.calculate_proof_root("BETA", 3, 8).unwrap();
        assert_eq!(root.moms, vec![nota("BETA", 3, "b-open").body.mom]);
    }

    #[test]
    fn test_foreign_authority_not_collected() {
        let (chain, store, auth) = hub_with_blocks(12);
        auth.register("OTHER", 7);
        insert_at(&chain, &store, 3, nota("BETA", 2, "b-close"));
        insert_at(&chain, &store, 5, nota("OTHER", 2, "o-mid"));
        insert_at(&chain, &store, 8, nota("BETA", 2, "b-open"));
        let router = HubProofRouter::new(&chain, &store, &auth);

        let root = router.calculate_proof_root("BETA", 2, 8).unwrap();
        assert_eq!(root.moms, vec![nota("BETA", 2, "b-open").body.mom]);
    }

    #[test]
    fn test_two_own_in_one_block_close_the_bracket() {
        let (chain, store, auth) = hub_with_blocks(12);
        insert_at(&chain, &store, 8, nota("BETA", 2, "b-open"));
        insert_at(&chain, &store, 8, nota("BETA", 2, "b-close"));
        let router = HubProofRouter::new(&chain, &store, &auth);

        let root = router.calculate_proof_root("BETA", 2, 8).unwrap();
        // Bracket opened and closed before any collection pass ran.
        assert!(root.moms.is_empty());
        assert!(root.momom.is_zero());
    }

    #[test]
    fn test_closing_block_entries_not_collected() {
        let (chain, store, auth) = hub_with_blocks(12);
        // The closing block also carries a collectable MoM; it must not
        // enter the window.
        insert_at(&chain, &store, 3, nota("ALPHA", 2, "a-too-low"));
        insert_at(&chain, &store, 3, nota("BETA", 2, "b-close"));
        insert_at(&chain, &store, 8, nota("BETA", 2, "b-open"));
        let router = HubProofRouter::new(&chain, &store, &auth);

        let root = router.calculate_proof_root("BETA", 2, 8).unwrap();
        assert_eq!(root.moms, vec![nota("BETA", 2, "b-open").body.mom]);
    }

    #[test]
    fn test_scan_limit_exhaustion_yields_null() {
        let (chain, store, auth) = hub_with_blocks(12);
        insert_at(&chain, &store, 1, nota("BETA", 2, "b-close"));
        insert_at(&chain, &store, 9, nota("BETA", 2, "b-open"));
        let router =
            HubProofRouter::new(&chain, &store, &auth).with_policy(ScanPolicy::with_limit(4));

        // Heights 9..=6 are inside the limit; the closer at 1 is not.
        let root = router.calculate_proof_root("BETA", 2, 9).unwrap();
        assert_eq!(root, ProofRoot::null());
    }

    #[test]
    fn test_extend_rejects_unknown_source_notarisation() {
        let (chain, store, auth) = hub_with_blocks(6);
        let router = HubProofRouter::new(&chain, &store, &auth);

        let stub = TxProof::new(hash(b"unknown"), MerkleBranch::trivial());
        let err = router
            .extend_to_momom(hash(b"tx"), "BETA", 2, &stub)
            .unwrap_err();
        assert!(matches!(err, BridgeError::SourceNotarisationMissing(_)));
    }

    #[test]
    fn test_extend_requires_target_notarisation_above_source() {
        let (chain, store, auth) = hub_with_blocks(8);
        // Confirm a source notarisation tx at height 4 with no target
        // notarisation anywhere above it.
        let src_tx = Transaction::new(b"src-nota".to_vec());
        let src_txid = src_tx.hash();
        chain.disconnect_tip();
        chain.disconnect_tip();
        chain.disconnect_tip();
        chain.disconnect_tip();
        chain.push_txs(vec![src_tx]);
        for i in 0..3 {
            chain.push_txs(vec![Transaction::new(format!("pad-{i}").into_bytes())]);
        }
        let router = HubProofRouter::new(&chain, &store, &auth);

        let stub = TxProof::new(src_txid, MerkleBranch::trivial());
        let err = router
            .extend_to_momom(hash(b"tx"), "BETA", 2, &stub)
            .unwrap_err();
        assert!(matches!(err, BridgeError::TargetNotarisationNotFound(_)));
    }
}
