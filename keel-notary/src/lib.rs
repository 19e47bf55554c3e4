//! Keel Notary - notarisation records and their lookup surface.
//!
//! Every assetchain in the federation periodically commits a digest of its
//! recent state (a `MoM`) to the hub; the hub in turn commits digests of
//! digests (`MoMoM`s) back to each assetchain. This crate holds the record
//! types and the read surface the proof engine scans:
//!
//! - [`notarisation`] - [`Notarisation`], [`NotarisationBody`],
//!   [`NotarisationsInBlock`]
//! - [`store`] - the [`NotaryStore`] trait plus [`MemoryNotaryStore`]
//! - [`authority`] - the [`AuthorityRegistry`] partitioning symbols into
//!   trust domains
//!
//! Notarisations are immutable once published; the engine holds them
//! by-value for the duration of one proof construction.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod authority;
pub mod error;
pub mod notarisation;
pub mod store;

pub use authority::{AuthorityRegistry, DEFAULT_AUTHORITY};
pub use error::{NotaryError, Result};
pub use notarisation::{Notarisation, NotarisationBody, NotarisationsInBlock, MIN_CROSS_CHAIN_ID};
pub use store::{MemoryNotaryStore, NotaryStore};
