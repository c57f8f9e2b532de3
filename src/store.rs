//! Storage interfaces and default implementations for the Merkle-Sum Sparse Merkle Tree.
//!
//! This module defines the `TreeStore` trait, which specifies the storage backend
//! interface for the tree, and provides the `DefaultStore`, an in-memory
//! implementation suitable for testing and small datasets.
//!
//! `FullTree` builds each new version of the tree as an ordinary, in-memory
//! persistent value (see [`crate::node::Link`]) and only consults the store for the
//! current root and to commit a new one. `get_branch`/`get_leaf`/`insert_branch`/
//! `insert_leaf`/`delete_branch`/`delete_leaf` are not on `FullTree`'s hot path today;
//! they exist so that a disk-backed `TreeStore` has a place to persist or evict
//! individual nodes by digest, the way a production deployment of this tree would.

use crate::error::TreeError;
use crate::node::{BranchNode, LeafNode, Link, Node, NodeHash};
use std::collections::HashMap;
use std::sync::Arc;

/// A trait defining the storage backend interface for the Merkle-Sum Sparse Merkle
/// Tree.
///
/// Implementors of this trait provide methods for storing and retrieving nodes in
/// the tree. This abstraction allows the tree to use various storage mechanisms,
/// such as in-memory stores, databases, or key-value stores.
pub trait TreeStore {
    /// Returns the current root of the tree, or `None` for the empty tree.
    fn root_node(&self) -> Result<Link, TreeError>;

    /// Gets a branch node by its digest.
    fn get_branch(&self, key: &NodeHash) -> Result<Option<Arc<BranchNode>>, TreeError>;

    /// Gets a leaf node by its digest.
    fn get_leaf(&self, key: &NodeHash) -> Result<Option<Arc<LeafNode>>, TreeError>;

    /// Inserts or updates a branch node.
    fn insert_branch(&mut self, branch: Arc<BranchNode>) -> Result<(), TreeError>;

    /// Inserts or updates a leaf node.
    fn insert_leaf(&mut self, leaf: Arc<LeafNode>) -> Result<(), TreeError>;

    /// Deletes a branch node.
    fn delete_branch(&mut self, key: &NodeHash) -> Result<(), TreeError>;

    /// Deletes a leaf node.
    fn delete_leaf(&mut self, key: &NodeHash) -> Result<(), TreeError>;

    /// Updates the root of the tree.
    fn update_root(&mut self, root: Link) -> Result<(), TreeError>;
}

/// An in-memory implementation of `TreeStore` using hash maps.
///
/// `DefaultStore` is suitable for testing, examples, and small datasets. It stores
/// nodes in memory using `HashMap` collections, keyed by digest.
#[derive(Default)]
pub struct DefaultStore {
    pub branches: HashMap<NodeHash, Arc<BranchNode>>,
    pub leaves: HashMap<NodeHash, Arc<LeafNode>>,
    pub root: Link,
}

impl DefaultStore {
    /// Creates a new, empty `DefaultStore`.
    pub fn new() -> Self {
        Self {
            branches: HashMap::new(),
            leaves: HashMap::new(),
            root: None,
        }
    }
}

impl TreeStore for DefaultStore {
    fn root_node(&self) -> Result<Link, TreeError> {
        Ok(self.root.clone())
    }

    fn get_branch(&self, key: &NodeHash) -> Result<Option<Arc<BranchNode>>, TreeError> {
        Ok(self.branches.get(key).cloned())
    }

    fn get_leaf(&self, key: &NodeHash) -> Result<Option<Arc<LeafNode>>, TreeError> {
        Ok(self.leaves.get(key).cloned())
    }

    fn insert_branch(&mut self, branch: Arc<BranchNode>) -> Result<(), TreeError> {
        self.branches.insert(branch.node_hash(), branch);
        Ok(())
    }

    fn insert_leaf(&mut self, leaf: Arc<LeafNode>) -> Result<(), TreeError> {
        self.leaves.insert(leaf.node_hash(), leaf);
        Ok(())
    }

    fn delete_branch(&mut self, key: &NodeHash) -> Result<(), TreeError> {
        self.branches.remove(key);
        Ok(())
    }

    fn delete_leaf(&mut self, key: &NodeHash) -> Result<(), TreeError> {
        self.leaves.remove(key);
        Ok(())
    }

    fn update_root(&mut self, root: Link) -> Result<(), TreeError> {
        self.root = root;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_has_no_root() {
        let store = DefaultStore::new();
        assert!(store.root_node().unwrap().is_none());
    }

    #[test]
    fn update_root_round_trips() {
        let mut store = DefaultStore::new();
        let leaf: Arc<dyn Node> = Arc::new(LeafNode::new([0u8; 32], b"v".to_vec(), 1));
        store.update_root(Some(leaf.clone())).unwrap();
        let root = store.root_node().unwrap().unwrap();
        assert_eq!(root.node_hash(), leaf.node_hash());
    }
}
