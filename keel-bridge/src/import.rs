//! Import transactions and their completion.
//!
//! An import transaction travels from a source assetchain to a target chain
//! carrying a burn transaction, the payouts it funds, and a proof that the
//! burn is part of the source's notarised history. The proof arrives as a
//! stub terminating at the source's `MoM`; on the hub it is extended to the
//! `MoMoM` the target recognizes, and the transaction is rewrapped with the
//! burn and payouts untouched.

use keel_chain::ChainIndex;
use keel_core::{hash, Hash, TxProof};
use keel_notary::NotaryStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BridgeError, Result};
use crate::router::HubProofRouter;

/// A payout funded by a burn on another chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    /// Amount in base units.
    pub amount: u64,
    /// Destination script.
    pub script: Vec<u8>,
}

/// A burn transaction: value destroyed on the source chain, committed to a
/// target chain and a set of payouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnTx {
    /// Symbol of the chain the value moves to.
    pub target_symbol: String,
    /// Cross-chain id of the transfer.
    pub target_cc_id: u32,
    /// Commitment to the payouts the import must recreate.
    pub payouts_hash: Hash,
    /// Total amount burned.
    pub amount: u64,
}

impl BurnTx {
    /// The burn transaction id: double SHA-256 of its encoding.
    pub fn hash(&self) -> Hash {
        hash(&bincode::serialize(self).expect("burn encoding is infallible"))
    }
}

/// An import transaction: proof, burn, payouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportTx {
    /// Proof that the burn is part of the source's notarised history. A stub
    /// terminating at a `MoM` before completion, a full path to a `MoMoM`
    /// after.
    pub proof: TxProof,
    /// The burn being imported.
    pub burn: BurnTx,
    /// Payouts the import recreates on the target chain.
    pub payouts: Vec<Payout>,
}

/// Commitment over a payout set: double SHA-256 of its encoding.
pub fn payouts_hash(payouts: &[Payout]) -> Hash {
    hash(&bincode::serialize(payouts).expect("payout encoding is infallible"))
}

/// Decode an import transaction from raw bytes.
pub fn unmarshal_import_tx(raw: &[u8]) -> Result<ImportTx> {
    bincode::deserialize(raw).map_err(|e| BridgeError::MalformedImport(e.to_string()))
}

/// Decode a burn transaction from raw bytes.
pub fn unmarshal_burn_tx(raw: &[u8]) -> Result<BurnTx> {
    bincode::deserialize(raw).map_err(|e| BridgeError::MalformedBurn(e.to_string()))
}

/// Assemble an import transaction around a proof, encoded for transport.
///
/// The burn and payouts are carried over unchanged.
pub fn make_import_coin_transaction(
    proof: TxProof,
    burn: BurnTx,
    payouts: Vec<Payout>,
) -> Vec<u8> {
    let import = ImportTx {
        proof,
        burn,
        payouts,
    };
    bincode::serialize(&import).expect("import encoding is infallible")
}

/// Completes import transactions on the hub.
///
/// Unwraps the import, extends its stub proof to the target's `MoMoM`, and
/// rewraps with the burn and payouts preserved byte-for-byte.
pub struct ImportCompleter<'a, C, N> {
    router: HubProofRouter<'a, C, N>,
}

impl<'a, C, N> ImportCompleter<'a, C, N>
where
    C: ChainIndex,
    N: NotaryStore,
{
    /// Create a completer over the hub router.
    pub fn new(router: HubProofRouter<'a, C, N>) -> Self {
        Self { router }
    }

    /// Complete an encoded import transaction.
    ///
    /// Returns the re-encoded import whose proof now terminates at the
    /// `MoMoM` named by the target's notarisation.
    pub fn complete_import(&self, raw_import: &[u8]) -> Result<Vec<u8>> {
        let import = unmarshal_import_tx(raw_import)?;

        if import.burn.target_symbol.is_empty() {
            return Err(BridgeError::MalformedBurn("empty target symbol".into()));
        }
        if import.burn.payouts_hash != payouts_hash(&import.payouts) {
            return Err(BridgeError::MalformedBurn(
                "burn does not commit to the carried payouts".into(),
            ));
        }

        let full_proof = self.router.extend_to_momom(
            import.burn.hash(),
            &import.burn.target_symbol,
            import.burn.target_cc_id,
            &import.proof,
        )?;
        debug!(
            symbol = %import.burn.target_symbol,
            notarisation = %full_proof.notarisation_txid,
            "import proof extended"
        );

        Ok(make_import_coin_transaction(
            full_proof,
            import.burn,
            import.payouts,
        ))
    }
}
