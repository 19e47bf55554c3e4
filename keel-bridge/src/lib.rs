//! Keel Bridge - the cross-chain proof composition engine.
//!
//! Three chains take part in a cross-chain claim: a source assetchain, the
//! hub, and a target assetchain. A transaction confirmed on the source is
//! proven to the target through three nested merkle inclusions:
//!
//! ```text
//! source:        TX ──▶ block root ──▶ MoM          (AssetchainProver)
//!                                       │
//! hub:            notarisation commits MoM
//!                 MoMs in bracket ──▶ MoMoM          (HubProofRouter)
//!                                       │
//! target:         backnotarisation carries MoMoM
//! ```
//!
//! The prover runs on the source chain and emits a [`TxProof`] whose branch
//! folds the transaction hash to a notarised `MoM`. The router runs on the
//! hub, locates the bracket of target-chain notarisations that encloses the
//! source `MoM`, and extends the branch to the `MoMoM` the target will
//! receive. [`ImportCompleter`] is the transport wrapper that performs the
//! extension inside an import transaction.
//!
//! Proof construction is a pure read over consensus-confirmed state: the tip
//! height is pinned once at entry, every scan is bounded by
//! [`ScanPolicy::scan_limit_blocks`], and a block disappearing mid-proof
//! (disconnect race) degrades to a lookup failure rather than a panic.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod error;
pub mod import;
pub mod policy;
pub mod prover;
pub mod router;

mod scan;

pub use error::{BridgeError, Result};
pub use import::{
    make_import_coin_transaction, payouts_hash, unmarshal_burn_tx, unmarshal_import_tx, BurnTx,
    ImportCompleter, ImportTx, Payout,
};
pub use keel_core::TxProof;
pub use policy::ScanPolicy;
pub use prover::AssetchainProver;
pub use router::{HubProofRouter, ProofRoot};
