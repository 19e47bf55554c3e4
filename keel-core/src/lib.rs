//! Keel Core - hash and merkle primitives for the Keel federation.
//!
//! This crate provides the building blocks shared by every chain in the
//! federation:
//!
//! - [`crypto`] - the 32-byte [`Hash`] newtype and double-SHA-256 hashing
//! - [`merkle`] - binary merkle trees in the Bitcoin convention
//!   (odd nodes pair with themselves)
//! - [`proof`] - [`MerkleBranch`] paths that fold a leaf to a root and
//!   compose across nested trees
//!
//! # Example
//!
//! ```rust
//! use keel_core::{hash, merkle, MerkleBranch};
//!
//! let leaves: Vec<_> = (0u8..4).map(|i| hash(&[i])).collect();
//! let (tree, _) = merkle::build_merkle_tree(&leaves);
//! let root = *tree.last().unwrap();
//!
//! let siblings = merkle::merkle_branch(2, leaves.len(), &tree);
//! let branch = MerkleBranch::new(2, siblings);
//! assert_eq!(branch.exec(leaves[2]), root);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod crypto;
pub mod error;
pub mod merkle;
pub mod proof;

pub use crypto::{hash, hash_pair, Hash};
pub use error::{CoreError, Result};
pub use merkle::{
    build_merkle_tree, check_merkle_branch, merkle_branch, merkle_root, safe_check_merkle_branch,
};
pub use proof::{MerkleBranch, TxProof};
