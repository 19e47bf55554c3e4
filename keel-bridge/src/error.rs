//! Error types for proof composition.

use keel_core::Hash;
use thiserror::Error;

/// Result type for proof composition.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that abort an in-flight proof construction.
///
/// All are fatal to the proof and surface to the caller; the engine never
/// recovers locally.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The transaction is not known to the chain index.
    #[error("transaction not found: {0}")]
    TxNotFound(Hash),

    /// The transaction exists but is not yet confirmed in a block.
    #[error("transaction still in mempool: {0}")]
    TxInMempool(Hash),

    /// No own-symbol notarisation within the scan window.
    #[error("notarisation for {symbol} not yet confirmed above height {height}")]
    NotarisationNotConfirmed {
        /// The symbol scanned for.
        symbol: String,
        /// The height the scan started at.
        height: u64,
    },

    /// The asset proof references a notarisation txid unknown to the hub.
    #[error("source notarisation not found: {0}")]
    SourceNotarisationMissing(Hash),

    /// The target chain has no notarisation within the scan window.
    #[error("no notarisation for target {0} inclusive of source")]
    TargetNotarisationNotFound(String),

    /// The proof root is under-confirmed: fewer than two own notarisations
    /// bracket the window.
    #[error("no determinate proof root for {0}")]
    EmptyProofRoot(String),

    /// The source `MoM` does not appear in the computed window.
    #[error("source MoM not present in proof root window")]
    MomNotInWindow,

    /// Locally reconstructed merkle data disagrees with the notarised
    /// commitment.
    #[error("merkle inconsistency: {0}")]
    MerkleInconsistency(String),

    /// The composed branch failed its final self-check. Must never occur on
    /// honest input.
    #[error("composed proof failed self-check")]
    ProofSelfCheck,

    /// The import transaction could not be decoded.
    #[error("malformed import transaction: {0}")]
    MalformedImport(String),

    /// The burn transaction could not be decoded or fails its commitments.
    #[error("malformed burn transaction: {0}")]
    MalformedBurn(String),

    /// Block data has been pruned from local storage.
    #[error("block not available (pruned data): {0}")]
    BlockPruned(Hash),

    /// No backnotarisation is available yet for the requested hub
    /// notarisation.
    #[error("backnotarisation pending for hub txid {0}")]
    BacknotarisationPending(Hash),

    /// Chain index failure.
    #[error("chain index error: {0}")]
    Chain(#[from] keel_chain::ChainError),

    /// Notarisation store failure.
    #[error("notarisation store error: {0}")]
    Notary(#[from] keel_notary::NotaryError),
}
