//! # mssmt: Merkle-Sum Sparse Merkle Tree in Rust
//!
//! A Rust implementation of a Merkle-Sum Sparse Merkle Tree (MS-SMT): an
//! authenticated key -> (value, sum) map whose root commits simultaneously
//! to the set of entries and to the arithmetic sum of their associated
//! weights.
//!
//! ## Features
//!
//! - **Efficient storage**: store and retrieve key/value/sum triples via a
//!   sparse binary trie keyed on the bits of a 32-byte key.
//! - **Merkle proofs**: generate and verify inclusion proofs that also
//!   authenticate the summed weight of the whole tree.
//! - **Customizable storage backend**: an in-memory [`DefaultStore`] is
//!   provided; the [`TreeStore`] trait is the seam a persistent backend
//!   would implement.
//! - **Typed errors**: absence, key collision, and precondition failures
//!   are distinguished via [`TreeError`] rather than panics.
//!
//! ## Example
//!
//! ```rust
//! use mssmt::{DefaultStore, FullTree};
//! use mssmt::hash_utils::to_array;
//! use sha2::{Digest, Sha256};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut tree = FullTree::new(DefaultStore::new());
//!
//!     let key = to_array(&Sha256::digest(b"key1"));
//!     let value = b"value1".to_vec();
//!     let sum = 10;
//!
//!     tree.insert(key, value.clone(), sum)?;
//!
//!     let (retrieved_value, retrieved_sum) = tree.get(&key)?;
//!     assert_eq!(retrieved_value, value);
//!     assert_eq!(retrieved_sum, sum);
//!
//!     let proof = tree.merkle_proof(&key)?;
//!     let root_hash = tree.root_hash();
//!     assert!(proof.verify(&key, &value, sum, root_hash));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`hash_utils`]: byte-array helpers shared across the other modules.
//! - [`node`]: node definitions (`LeafNode`, `BranchNode`, `ComputedNode`)
//!   and the bit-extraction helper the tree dispatches on.
//! - [`error`]: the crate's typed error enum.
//! - [`proof`]: Merkle proof structure and verification.
//! - [`store`]: storage interfaces and the default in-memory implementation.
//! - [`tree`]: the main MS-SMT tree implementation.
//!
//! ## Crate exports
//!
//! The most commonly used types are re-exported at the crate root:
//!
//! - [`FullTree`]: the main tree structure.
//! - [`DefaultStore`]: the default in-memory storage backend.
//! - [`LeafNode`], [`BranchNode`]: node types in the tree.
//! - [`Proof`]: Merkle proof structure.
//! - [`TreeError`]: the crate's error type.
//!
//! ## License
//!
//! This project is licensed under the MIT License.
//!
//! [`hash_utils`]: crate::hash_utils
//! [`node`]: crate::node
//! [`error`]: crate::error
//! [`proof`]: crate::proof
//! [`store`]: crate::store
//! [`tree`]: crate::tree
//! [`FullTree`]: crate::tree::FullTree
//! [`DefaultStore`]: crate::store::DefaultStore
//! [`LeafNode`]: crate::node::LeafNode
//! [`BranchNode`]: crate::node::BranchNode
//! [`Proof`]: crate::proof::Proof
//! [`TreeError`]: crate::error::TreeError

pub mod error;
pub mod hash_utils;
pub mod node;
pub mod proof;
pub mod store;
pub mod tree;

pub use crate::error::TreeError;
pub use crate::node::{BranchNode, LeafNode, Node, NodeHash};
pub use crate::proof::Proof;
pub use crate::store::{DefaultStore, TreeStore};
pub use crate::tree::FullTree;
