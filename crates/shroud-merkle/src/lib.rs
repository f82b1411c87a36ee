#![forbid(unsafe_code)]

//! shroud-merkle: a binary SHA-256 Merkle tree over opaque byte leaves.
//!
//! Leaves are pre-hashed; internal nodes hash `left || right`; a level with
//! an odd node count duplicates its last node. Paths are sibling digests
//! ordered bottom-up, and verification picks the concatenation order from the
//! parity of the running index.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// Sibling hashes from leaf level to just below the root.
pub type MerklePath = Vec<Hash>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MerkleError {
    #[error("cannot build a tree over zero leaves")]
    Empty,
    #[error("leaf index {index} out of bounds for {leaves} leaves")]
    IndexOutOfBounds { index: usize, leaves: usize },
}

/// All levels of the tree, leaf hashes first. `levels.last()` is the root
/// level and always holds exactly one digest.
#[derive(Debug)]
pub struct MerkleTree {
    levels: Vec<Vec<Hash>>,
}

impl MerkleTree {
    /// Hashes every leaf and folds the levels up to the root.
    pub fn new<L: AsRef<[u8]>>(leaves: &[L]) -> Result<MerkleTree, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::Empty);
        }

        let mut level: Vec<Hash> = leaves.iter().map(|l| hash_leaf(l.as_ref())).collect();
        let mut levels = vec![level.clone()];
        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            for pair in level.chunks(2) {
                let left = pair[0];
                let right = if pair.len() == 2 { pair[1] } else { pair[0] };
                next.push(hash_nodes(&left, &right));
            }
            levels.push(next.clone());
            level = next;
        }

        Ok(MerkleTree { levels })
    }

    pub fn root(&self) -> Hash {
        self.levels.last().expect("tree has at least one level")[0]
    }

    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Sibling hashes for `index`, bottom-up. Empty for a single-leaf tree.
    pub fn path(&self, index: usize) -> Result<MerklePath, MerkleError> {
        let leaves = self.leaf_count();
        if index >= leaves {
            return Err(MerkleError::IndexOutOfBounds { index, leaves });
        }

        let mut path = Vec::with_capacity(self.levels.len() - 1);
        let mut idx = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = idx ^ 1;
            // A duplicated last node is its own sibling.
            let sibling = if sibling < level.len() { sibling } else { idx };
            path.push(level[sibling]);
            idx /= 2;
        }
        Ok(path)
    }
}

/// Recomputes the root from `leaf` and `path`, comparing against `root` in
/// constant time.
pub fn verify_path(leaf: &[u8], path: &[Hash], root: &Hash, index: usize) -> bool {
    let mut current = hash_leaf(leaf);
    let mut idx = index;
    for sibling in path {
        current = if idx % 2 == 0 {
            hash_nodes(&current, sibling)
        } else {
            hash_nodes(sibling, &current)
        };
        idx /= 2;
    }
    current.ct_eq(root).unwrap_u8() == 1
}

/// Number of path elements for a tree over `leaf_count` leaves.
pub fn path_depth(leaf_count: usize) -> usize {
    assert!(leaf_count > 0, "leaf count must be positive");
    usize::BITS as usize - (leaf_count - 1).leading_zeros() as usize
}

fn hash_leaf(leaf: &[u8]) -> Hash {
    Sha256::digest(leaf).into()
}

fn hash_nodes(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}
