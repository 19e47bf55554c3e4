//! Keel Chain - the chain index consumed by the proof engine.
//!
//! The engine is a read-mostly consumer of consensus-confirmed state. This
//! crate defines that surface:
//!
//! - [`block`] - [`Transaction`], [`BlockHeader`] and [`Block`] types
//! - [`index`] - the [`ChainIndex`] trait: tip height, hash-at-height,
//!   header lookups, block reads and transaction resolution
//! - [`memory`] - [`MemoryChain`], a lock-guarded in-memory implementation
//!   used by tests and by embedders that index elsewhere
//!
//! The active chain may advance (or disconnect blocks) concurrently with a
//! proof construction. Implementations must answer each call consistently
//! under an internal read lock; callers pin the tip height once at entry and
//! bound every scan by that snapshot.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod block;
pub mod error;
pub mod index;
pub mod memory;

pub use block::{Block, BlockHeader, Transaction};
pub use error::{ChainError, Result};
pub use index::ChainIndex;
pub use memory::MemoryChain;
