//! Forward notarisation scan shared by the prover and the router.

use keel_chain::ChainIndex;
use keel_notary::{Notarisation, NotaryStore};
use tracing::trace;

use crate::error::Result;
use crate::policy::ScanPolicy;

/// Scan forward from `from` (inclusive) for the first notarisation matching
/// `pred`, examining at most the policy's block limit and never beyond the
/// pinned `tip`.
///
/// Returns the height the match was discovered at together with the record.
/// The limit is counted in blocks, so blocks without notarisations still
/// advance the scan.
pub(crate) fn scan_notarisations_from_height<C, N, F>(
    chain: &C,
    notary: &N,
    policy: &ScanPolicy,
    from: u64,
    tip: u64,
    pred: F,
) -> Result<Option<(u64, Notarisation)>>
where
    C: ChainIndex,
    N: NotaryStore,
    F: Fn(&Notarisation) -> bool,
{
    let Some(end) = policy.forward_end(from, tip) else {
        return Ok(None);
    };

    for height in from..=end {
        let Some(block_hash) = chain.block_hash_at(height)? else {
            // Tip moved back underneath us; nothing further to scan.
            return Ok(None);
        };
        let Some(notarisations) = notary.block_notarisations(&block_hash)? else {
            continue;
        };
        for nota in notarisations {
            if pred(&nota) {
                trace!(height, txid = %nota.txid, symbol = nota.symbol(), "notarisation matched");
                return Ok(Some((height, nota)));
            }
        }
    }

    Ok(None)
}

/// Predicate: the notarisation is for the given symbol.
pub(crate) fn is_symbol(symbol: &str) -> impl Fn(&Notarisation) -> bool + '_ {
    move |nota: &Notarisation| nota.symbol() == symbol
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_chain::{MemoryChain, Transaction};
    use keel_core::{hash, Hash};
    use keel_notary::{MemoryNotaryStore, NotarisationBody};

    fn nota(symbol: &str, tag: &[u8]) -> Notarisation {
        Notarisation::new(
            hash(tag),
            NotarisationBody {
                symbol: symbol.into(),
                cc_id: 2,
                height: 0,
                mom: hash(tag),
                mom_depth: 1,
                tx_hash: hash(tag),
                momom: Hash::ZERO,
            },
        )
    }

    fn chain_with_blocks(n: u64) -> MemoryChain {
        let chain = MemoryChain::new();
        for i in 0..n {
            chain.push_txs(vec![Transaction::new(format!("block-{i}").into_bytes())]);
        }
        chain
    }

    #[test]
    fn test_finds_first_match_in_order() {
        let chain = chain_with_blocks(10);
        let store = MemoryNotaryStore::new();
        let b3 = chain.block_hash_at(3).unwrap().unwrap();
        let b5 = chain.block_hash_at(5).unwrap().unwrap();
        store.insert(b3, nota("BETA", b"early-other"));
        store.insert(b5, nota("ALPHA", b"target"));

        let (height, found) = scan_notarisations_from_height(
            &chain,
            &store,
            &ScanPolicy::default(),
            0,
            9,
            is_symbol("ALPHA"),
        )
        .unwrap()
        .unwrap();
        assert_eq!(height, 5);
        assert_eq!(found.symbol(), "ALPHA");
    }

    #[test]
    fn test_match_at_scan_origin() {
        let chain = chain_with_blocks(4);
        let store = MemoryNotaryStore::new();
        let b2 = chain.block_hash_at(2).unwrap().unwrap();
        store.insert(b2, nota("ALPHA", b"origin"));

        let found = scan_notarisations_from_height(
            &chain,
            &store,
            &ScanPolicy::default(),
            2,
            3,
            is_symbol("ALPHA"),
        )
        .unwrap();
        assert_eq!(found.unwrap().0, 2);
    }

    #[test]
    fn test_limit_bounds_scan() {
        let chain = chain_with_blocks(20);
        let store = MemoryNotaryStore::new();
        let b15 = chain.block_hash_at(15).unwrap().unwrap();
        store.insert(b15, nota("ALPHA", b"far"));

        // Limit of 10 covers heights 0..=9 only.
        let found = scan_notarisations_from_height(
            &chain,
            &store,
            &ScanPolicy::with_limit(10),
            0,
            19,
            is_symbol("ALPHA"),
        )
        .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_empty_blocks_are_skipped() {
        let chain = chain_with_blocks(6);
        let store = MemoryNotaryStore::new();
        let tip_hash = chain.block_hash_at(5).unwrap().unwrap();
        store.insert(tip_hash, nota("ALPHA", b"at-tip"));

        // The tip itself is inside the window.
        let found = scan_notarisations_from_height(
            &chain,
            &store,
            &ScanPolicy::default(),
            0,
            5,
            is_symbol("ALPHA"),
        )
        .unwrap();
        assert_eq!(found.unwrap().0, 5);
    }
}
