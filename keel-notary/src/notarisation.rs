//! Notarisation record types.

use keel_core::Hash;
use serde::{Deserialize, Serialize};

/// Cross-chain ids below this value are reserved and never eligible for
/// proof assembly.
pub const MIN_CROSS_CHAIN_ID: u32 = 2;

/// The payload of a notarisation transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotarisationBody {
    /// Assetchain identifier (short ASCII string).
    pub symbol: String,
    /// Numeric cross-chain id. Values below [`MIN_CROSS_CHAIN_ID`] are
    /// reserved.
    pub cc_id: u32,
    /// Source-chain block height this notarisation pins.
    pub height: u64,
    /// Merkle root over [`mom_depth`](Self::mom_depth) consecutive
    /// source-chain block merkle roots, ending at
    /// [`height`](Self::height).
    pub mom: Hash,
    /// Window length used to build [`mom`](Self::mom).
    pub mom_depth: u64,
    /// Hash of the notarisation transaction on the chain that published it.
    pub tx_hash: Hash,
    /// Merkle root over a window of notarised `MoM`s. Only meaningful on
    /// backnotarisations; [`Hash::ZERO`] otherwise.
    pub momom: Hash,
}

impl NotarisationBody {
    /// Whether this record is eligible for cross-chain proof assembly.
    pub fn is_cross_chain(&self) -> bool {
        self.cc_id >= MIN_CROSS_CHAIN_ID
    }
}

/// A notarisation: the transaction id it was discovered under, plus its
/// decoded body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notarisation {
    /// Transaction id of the notarisation on the chain it was found on.
    pub txid: Hash,
    /// Decoded notarisation payload.
    pub body: NotarisationBody,
}

impl Notarisation {
    /// Create a notarisation record.
    pub fn new(txid: Hash, body: NotarisationBody) -> Self {
        Self { txid, body }
    }

    /// The assetchain symbol this notarisation is for.
    pub fn symbol(&self) -> &str {
        &self.body.symbol
    }
}

/// The ordered sequence of notarisations discovered within one block,
/// preserving discovery order.
pub type NotarisationsInBlock = Vec<Notarisation>;
