//! The canonical (non-compacted) Merkle-Sum Sparse Merkle Tree.
//!
//! `FullTree` is a persistent, immutable value: every `insert`/`delete` returns
//! (internally) a brand-new root built out of `Arc`-shared subtrees, and only the
//! unchanged-path structural sharing makes this cheap. The tree never compresses
//! empty runs of bit-levels into a single skip pointer — every divergence is
//! materialised as an explicit chain of branches, one per bit consumed, down to the
//! depth at which two keys actually differ.
//!
//! # Examples
//!
//! ```rust
//! use mssmt::{DefaultStore, FullTree};
//! use mssmt::hash_utils::to_array;
//! use sha2::{Digest, Sha256};
//!
//! let mut tree = FullTree::new(DefaultStore::new());
//! let key = to_array(&Sha256::digest(b"key1"));
//! tree.insert(key, b"value1".to_vec(), 10).unwrap();
//!
//! let (value, sum) = tree.get(&key).unwrap();
//! assert_eq!(value, b"value1");
//! assert_eq!(sum, 10);
//! assert_eq!(tree.total_sum(), 10);
//! ```

use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::TreeError;
use crate::node::{bit_index, BranchNode, LeafNode, Link, Node, NodeHash, MAX_TREE_LEVELS};
use crate::proof::{computed_sibling, Proof};
use crate::store::TreeStore;

/// A Merkle-Sum Sparse Merkle Tree backed by a [`TreeStore`].
///
/// The store is only consulted for the current root and to commit a new one —
/// see the note on [`crate::store`] for why the rest of the `TreeStore` surface
/// sits unused on this hot path.
pub struct FullTree<S: TreeStore> {
    store: S,
}

impl<S: TreeStore> FullTree<S> {
    /// Creates a new `FullTree` backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the root link of the tree, or `None` for the empty tree.
    pub fn root(&self) -> Result<Link, TreeError> {
        self.store.root_node()
    }

    /// Returns the root digest of the tree: the conventional zero digest for the
    /// empty tree.
    pub fn root_hash(&self) -> NodeHash {
        match self.store.root_node() {
            Ok(Some(node)) => node.node_hash(),
            _ => NodeHash::zero(),
        }
    }

    /// Returns the total sum committed to by the tree: zero for the empty tree.
    pub fn total_sum(&self) -> u64 {
        match self.store.root_node() {
            Ok(Some(node)) => node.node_sum(),
            _ => 0,
        }
    }

    /// Inserts `(key, value, sum)`, or replaces the value/sum of an already-present
    /// key. There is no separate "update" operation: insertion of an existing key
    /// is how updates happen.
    pub fn insert(&mut self, key: [u8; 32], value: Vec<u8>, sum: u64) -> Result<(), TreeError> {
        let root = self.store.root_node()?;
        trace!(sum, "inserting leaf");
        let new_root = insert_rec(&root, 0, &key, value, sum)?;
        self.store.update_root(new_root)?;
        debug!(root_hash = %self.root_hash(), "insert committed");
        Ok(())
    }

    /// Looks up the value and sum stored under `key`.
    ///
    /// Returns [`TreeError::NotFound`] if the key is absent — a normal, expected
    /// outcome, not a defect.
    pub fn get(&self, key: &[u8; 32]) -> Result<(Vec<u8>, u64), TreeError> {
        let root = self.store.root_node()?;
        let leaf = get_rec(&root, 0, key)?;
        trace!(found = leaf.is_some(), "get");
        leaf.map(|l| (l.value().to_vec(), l.node_sum()))
            .ok_or(TreeError::NotFound)
    }

    /// Removes `key` from the tree, collapsing any branch whose content
    /// disappears as a result, restoring the tree's canonical shape.
    ///
    /// Returns [`TreeError::NotFound`] if the key is absent.
    pub fn delete(&mut self, key: &[u8; 32]) -> Result<(), TreeError> {
        let root = self.store.root_node()?;
        let new_root = delete_rec(&root, 0, key)?;
        self.store.update_root(new_root)?;
        debug!(root_hash = %self.root_hash(), "delete committed");
        Ok(())
    }

    /// Builds an inclusion proof for `key`.
    ///
    /// Walks from the root to `key`'s leaf, or to the empty slot where it would
    /// live if absent — either way this always succeeds and returns a sibling
    /// list, per §4.4.5 and §6: `merkle_proof` has no `NOT_FOUND` outcome of its
    /// own, unlike `get`/`delete`. The empty tree's proof is the empty sequence.
    pub fn merkle_proof(&self, key: &[u8; 32]) -> Result<Proof, TreeError> {
        let root = self.store.root_node()?;
        let mut siblings = Vec::new();
        proof_rec(&root, 0, key, &mut siblings);
        trace!(len = siblings.len(), "built merkle proof");
        Ok(Proof::new(siblings))
    }
}

/// Finds the first bit depth at or after `start_depth` at which `a` and `b`
/// differ.
///
/// Always succeeds for two genuinely distinct keys, since a fixed-width key that
/// agreed on all `MAX_TREE_LEVELS` bits would be byte-for-byte identical.
/// `MAX_TREE_LEVELS` is returned if none is found, which `insert_rec` treats as
/// `TreeError::KeyCollision` — unreachable for `a != b`, kept as a defensive
/// guard rather than an `unwrap`.
fn divergence_depth(a: &[u8; 32], b: &[u8; 32], start_depth: usize) -> usize {
    for depth in start_depth..MAX_TREE_LEVELS {
        if bit_index(depth, a) != bit_index(depth, b) {
            return depth;
        }
    }
    MAX_TREE_LEVELS
}

fn insert_rec(
    link: &Link,
    depth: usize,
    key: &[u8; 32],
    value: Vec<u8>,
    sum: u64,
) -> Result<Link, TreeError> {
    match link {
        None => Ok(Some(Arc::new(LeafNode::new(*key, value, sum)))),
        Some(node) => {
            if let Some(leaf) = node.as_any().downcast_ref::<LeafNode>() {
                if leaf.key == *key {
                    return Ok(Some(Arc::new(LeafNode::new(*key, value, sum))));
                }

                let divergence = divergence_depth(&leaf.key, key, depth);
                if divergence == MAX_TREE_LEVELS {
                    return Err(TreeError::KeyCollision);
                }

                let new_leaf: Arc<dyn Node> = Arc::new(LeafNode::new(*key, value, sum));
                let existing: Arc<dyn Node> = node.clone();
                let new_bit = bit_index(divergence, key);
                let mut current: Link = Some(Arc::new(if new_bit == 0 {
                    BranchNode::new(Some(new_leaf), Some(existing))?
                } else {
                    BranchNode::new(Some(existing), Some(new_leaf))?
                }));

                // Materialise the pass-through chain from `depth` down to the
                // divergence point: both keys agree on every bit in this range, so
                // each wrapper branch has exactly one non-empty child.
                for d in (depth..divergence).rev() {
                    let bit = bit_index(d, key);
                    current = Some(Arc::new(if bit == 0 {
                        BranchNode::new(current, None)?
                    } else {
                        BranchNode::new(None, current)?
                    }));
                }

                Ok(current)
            } else {
                let branch = node
                    .as_any()
                    .downcast_ref::<BranchNode>()
                    .expect("node is either a LeafNode or a BranchNode");
                let bit = bit_index(depth, key);
                if bit == 0 {
                    let new_left = insert_rec(&branch.left, depth + 1, key, value, sum)?;
                    Ok(Some(Arc::new(BranchNode::new(new_left, branch.right.clone())?)))
                } else {
                    let new_right = insert_rec(&branch.right, depth + 1, key, value, sum)?;
                    Ok(Some(Arc::new(BranchNode::new(branch.left.clone(), new_right)?)))
                }
            }
        }
    }
}

fn get_rec(link: &Link, depth: usize, key: &[u8; 32]) -> Result<Option<Arc<LeafNode>>, TreeError> {
    match link {
        None => Ok(None),
        Some(node) => {
            if let Some(leaf) = node.as_any().downcast_ref::<LeafNode>() {
                if leaf.key == *key {
                    Ok(Some(Arc::new(leaf.clone())))
                } else {
                    Ok(None)
                }
            } else {
                let branch = node
                    .as_any()
                    .downcast_ref::<BranchNode>()
                    .expect("node is either a LeafNode or a BranchNode");
                let bit = bit_index(depth, key);
                if bit == 0 {
                    get_rec(&branch.left, depth + 1, key)
                } else {
                    get_rec(&branch.right, depth + 1, key)
                }
            }
        }
    }
}

/// Rebuilds a branch's link after one child's subtree changed underneath it.
///
/// A branch whose surviving child is a bare leaf collapses away entirely —
/// the leaf takes the branch's place, per invariant B1. A branch whose
/// surviving child is itself a branch is NOT collapsed: that inner branch
/// may be a pass-through node materialised by `divergence_depth` to hold a
/// deeper divergence at the correct bit depth, and promoting it up a level
/// would shift which key bit its own children dispatch on. Keeping the
/// empty-sibling wrapper here is what makes deletion exactly undo insertion
/// (inserting a new key into a tree, then deleting it, reproduces the
/// original tree bit-for-bit).
fn collapse(left: Link, right: Link) -> Result<Link, TreeError> {
    match (left, right) {
        (None, None) => Ok(None),
        (Some(only), None) => {
            if only.as_any().downcast_ref::<LeafNode>().is_some() {
                Ok(Some(only))
            } else {
                Ok(Some(Arc::new(BranchNode::new(Some(only), None)?)))
            }
        }
        (None, Some(only)) => {
            if only.as_any().downcast_ref::<LeafNode>().is_some() {
                Ok(Some(only))
            } else {
                Ok(Some(Arc::new(BranchNode::new(None, Some(only))?)))
            }
        }
        (left @ Some(_), right @ Some(_)) => Ok(Some(Arc::new(BranchNode::new(left, right)?))),
    }
}

fn delete_rec(link: &Link, depth: usize, key: &[u8; 32]) -> Result<Link, TreeError> {
    match link {
        None => Err(TreeError::NotFound),
        Some(node) => {
            if let Some(leaf) = node.as_any().downcast_ref::<LeafNode>() {
                if leaf.key == *key {
                    Ok(None)
                } else {
                    Err(TreeError::NotFound)
                }
            } else {
                let branch = node
                    .as_any()
                    .downcast_ref::<BranchNode>()
                    .expect("node is either a LeafNode or a BranchNode");
                let bit = bit_index(depth, key);
                if bit == 0 {
                    let new_left = delete_rec(&branch.left, depth + 1, key)?;
                    collapse(new_left, branch.right.clone())
                } else {
                    let new_right = delete_rec(&branch.right, depth + 1, key)?;
                    collapse(branch.left.clone(), new_right)
                }
            }
        }
    }
}

/// Walks from `link` down to `key`'s leaf, or to the empty slot it would
/// occupy, collecting the untaken sibling at each branch along the way.
///
/// Unlike `get_rec`/`delete_rec`, absence is not an error here: an empty
/// child or a leaf with a different key both just end the descent with
/// whatever siblings have been collected so far, per §4.4.5.
fn proof_rec(link: &Link, depth: usize, key: &[u8; 32], siblings: &mut Vec<Arc<dyn Node>>) {
    match link {
        None => {}
        Some(node) => {
            if node.as_any().downcast_ref::<LeafNode>().is_some() {
                // Either the target leaf itself, or a different leaf occupying
                // the slot the target key would diverge from — both end the walk.
            } else {
                let branch = node
                    .as_any()
                    .downcast_ref::<BranchNode>()
                    .expect("node is either a LeafNode or a BranchNode");
                let bit = bit_index(depth, key);
                if bit == 0 {
                    proof_rec(&branch.left, depth + 1, key, siblings);
                    siblings.push(computed_sibling(&branch.right));
                } else {
                    proof_rec(&branch.right, depth + 1, key, siblings);
                    siblings.push(computed_sibling(&branch.left));
                }
            }
        }
    }
}
