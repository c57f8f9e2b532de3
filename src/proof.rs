//! Merkle proof structures and verification for the Merkle-Sum Sparse Merkle Tree.
//!
//! A [`Proof`] carries the sibling digests and sums needed to recompute a candidate
//! root from a claimed `(key, value, sum)` triple. Siblings are ordered leaf-ward
//! first: index 0 sits next to the leaf, the last entry sits next to the root.
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
//! let proof = tree.merkle_proof(&key).unwrap();
//! let root_hash = tree.root_hash();
//! assert!(proof.verify(&key, b"value1", 10, root_hash));
//! ```

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::hash_utils::to_array;
use crate::node::{bit_index, ComputedNode, LeafNode, Link, Node, NodeHash, HASH_SIZE};

/// An inclusion proof: the ordered sibling digests/sums along the authenticated
/// path for a key, leaf-ward first.
#[derive(Clone)]
pub struct Proof {
    pub nodes: Vec<Arc<dyn Node>>,
}

impl Proof {
    /// Creates a new `Proof` from an ordered (leaf-ward first) sibling list.
    pub fn new(nodes: Vec<Arc<dyn Node>>) -> Self {
        Self { nodes }
    }

    /// The number of siblings in this proof.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether this proof carries no siblings (the empty-tree / singleton-tree proof).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Reconstructs the candidate root digest for `(key, value, sum)` against this
    /// proof.
    ///
    /// Sibling `i` sits at bit depth `n - 1 - i`, where `n` is the proof length;
    /// `bit_index(depth, key)` at each step decides whether the accumulated hash is
    /// the left or right child of the next branch up.
    pub fn root_hash(&self, key: &[u8; HASH_SIZE], value: &[u8], sum: u64) -> NodeHash {
        let leaf = LeafNode::new(*key, value.to_vec(), sum);
        let mut hash = leaf.node_hash();
        let mut running_sum = sum;
        let n = self.nodes.len();

        for (i, sibling) in self.nodes.iter().enumerate() {
            let depth = n - 1 - i;
            let bit = bit_index(depth, key);
            let sibling_hash = sibling.node_hash();
            let sibling_sum = sibling.node_sum();

            running_sum = match running_sum.checked_add(sibling_sum) {
                Some(s) => s,
                None => return NodeHash::new([0xffu8; HASH_SIZE]),
            };

            hash = if bit == 0 {
                hash_branch(&hash, &sibling_hash, running_sum)
            } else {
                hash_branch(&sibling_hash, &hash, running_sum)
            };
        }

        hash
    }

    /// Verifies this proof against a previously observed root digest.
    pub fn verify(&self, key: &[u8; HASH_SIZE], value: &[u8], sum: u64, root_hash: NodeHash) -> bool {
        self.root_hash(key, value, sum) == root_hash
    }
}

fn hash_branch(left: &NodeHash, right: &NodeHash, sum: u64) -> NodeHash {
    let mut hasher = Sha256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    hasher.update(sum.to_le_bytes());
    NodeHash::new(to_array(&hasher.finalize()))
}

/// Verifies an inclusion proof against a claimed root.
pub fn verify_proof(
    root_hash: NodeHash,
    key: &[u8; HASH_SIZE],
    value: &[u8],
    sum: u64,
    proof: &Proof,
) -> bool {
    proof.verify(key, value, sum, root_hash)
}

/// Builds a `ComputedNode` sibling entry summarising a child link, for use by
/// [`crate::tree::FullTree::merkle_proof`].
pub(crate) fn computed_sibling(link: &Link) -> Arc<dyn Node> {
    Arc::new(ComputedNode::from_link(link))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::BranchNode;

    #[test]
    fn empty_proof_verifies_singleton_root() {
        let key = {
            let mut k = [0u8; HASH_SIZE];
            k[HASH_SIZE - 1] = 1;
            k
        };
        let leaf = LeafNode::new(key, b"a".to_vec(), 5);
        let proof = Proof::new(vec![]);
        assert!(proof.verify(&key, b"a", 5, leaf.node_hash()));
    }

    #[test]
    fn two_leaf_proof_round_trips() {
        let key_a = [0u8; HASH_SIZE];
        let mut key_b = [0u8; HASH_SIZE];
        key_b[0] = 0b1000_0000;

        let leaf_a = Arc::new(LeafNode::new(key_a, b"x".to_vec(), 3));
        let leaf_b = Arc::new(LeafNode::new(key_b, b"y".to_vec(), 7));
        let branch = BranchNode::new(Some(leaf_a.clone()), Some(leaf_b.clone())).unwrap();

        let proof_a = Proof::new(vec![leaf_b.clone()]);
        assert!(proof_a.verify(&key_a, b"x", 3, branch.node_hash()));

        let proof_b = Proof::new(vec![leaf_a]);
        assert!(proof_b.verify(&key_b, b"y", 7, branch.node_hash()));
    }

    #[test]
    fn tampered_sibling_rejected() {
        let key_a = [0u8; HASH_SIZE];
        let mut key_b = [0u8; HASH_SIZE];
        key_b[0] = 0b1000_0000;

        let leaf_a = Arc::new(LeafNode::new(key_a, b"x".to_vec(), 3));
        let leaf_b = Arc::new(LeafNode::new(key_b, b"y".to_vec(), 7));
        let branch = BranchNode::new(Some(leaf_a), Some(leaf_b)).unwrap();

        let mut tampered_hash = LeafNode::new(key_b, b"y".to_vec(), 7).node_hash();
        tampered_hash.0[0] ^= 0x01;
        let tampered_sibling: Arc<dyn Node> = Arc::new(ComputedNode::new(tampered_hash, 7));
        let proof = Proof::new(vec![tampered_sibling]);
        assert!(!proof.verify(&key_a, b"x", 3, branch.node_hash()));
    }

    #[test]
    fn tampered_sum_rejected() {
        let key_a = [0u8; HASH_SIZE];
        let mut key_b = [0u8; HASH_SIZE];
        key_b[0] = 0b1000_0000;

        let leaf_a = Arc::new(LeafNode::new(key_a, b"x".to_vec(), 3));
        let leaf_b = Arc::new(LeafNode::new(key_b, b"y".to_vec(), 7));
        let branch = BranchNode::new(Some(leaf_a), Some(leaf_b)).unwrap();

        let proof = Proof::new(vec![leaf_b]);
        assert!(!proof.verify(&key_a, b"x", 4, branch.node_hash()));
    }

    #[test]
    fn tampered_key_changes_descent_and_is_rejected() {
        let key_a = [0u8; HASH_SIZE];
        let mut key_b = [0u8; HASH_SIZE];
        key_b[0] = 0b1000_0000;
        let mut other_key = [0u8; HASH_SIZE];
        other_key[0] = 0b0100_0000;

        let leaf_a = Arc::new(LeafNode::new(key_a, b"x".to_vec(), 3));
        let leaf_b = Arc::new(LeafNode::new(key_b, b"y".to_vec(), 7));
        let branch = BranchNode::new(Some(leaf_a), Some(leaf_b)).unwrap();

        let proof = Proof::new(vec![Arc::new(LeafNode::new(key_b, b"y".to_vec(), 7))]);
        assert!(!proof.verify(&other_key, b"x", 3, branch.node_hash()));
    }
}
