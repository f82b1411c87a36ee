//! Committer parameters and the commit phase.

use shroud_fhe::FheBackend;
use shroud_merkle::{Hash, MerkleTree};
use tracing::{debug, instrument};

use crate::encode::encode_ciphertexts;
use crate::error::{LigeroError, Result};
use crate::workers::parallel_map;

/// The public shape of a commitment: matrix dimensions, code rate inverse,
/// and the number of spot-check queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LigeroMetadata {
    pub rows: usize,
    pub cols: usize,
    pub rho_inv: usize,
    pub queries: usize,
}

impl LigeroMetadata {
    /// Codeword length `cols * rho_inv`.
    pub fn ext_cols(&self) -> usize {
        self.cols * self.rho_inv
    }
}

/// Validated commitment parameters.
pub struct LigeroCommitter {
    meta: LigeroMetadata,
}

impl LigeroCommitter {
    /// Derives the query count for the wanted security level and validates
    /// the dimension invariants: positive sizes, `rows` and `cols * rho_inv`
    /// powers of two (the InnerSum aggregation and the NTT require them), and
    /// enough codeword columns to answer every query.
    pub fn new(
        security_bits: f64,
        rows: usize,
        cols: usize,
        rho_inv: usize,
    ) -> Result<LigeroCommitter> {
        if rows == 0 || cols == 0 {
            return Err(LigeroError::Dimension("matrix dimensions must be positive"));
        }
        if !rows.is_power_of_two() {
            return Err(LigeroError::Dimension("rows must be a power of two"));
        }
        if rho_inv < 2 {
            return Err(LigeroError::Dimension("code rate inverse must be at least 2"));
        }
        if !(cols * rho_inv).is_power_of_two() {
            return Err(LigeroError::Dimension("codeword length must be a power of two"));
        }
        if security_bits <= 0.0 {
            return Err(LigeroError::Dimension("security bits must be positive"));
        }

        let log_term = (1.0 + 1.0 / rho_inv as f64).log2();
        if 1.0 - log_term <= 0.0 {
            return Err(LigeroError::Dimension("code rate admits no queries"));
        }
        let queries = (security_bits / (1.0 - log_term)).ceil() as usize;
        if queries == 0 {
            return Err(LigeroError::Dimension("query count must be positive"));
        }
        if queries > cols * rho_inv {
            return Err(LigeroError::Dimension("more queries than codeword columns"));
        }

        Ok(LigeroCommitter {
            meta: LigeroMetadata { rows, cols, rho_inv, queries },
        })
    }

    pub fn metadata(&self) -> &LigeroMetadata {
        &self.meta
    }

    /// Commits to `matrix` (one ciphertext per column): Reed-Solomon extends
    /// it, mod-switches a copy of every codeword column down to level 1, and
    /// hashes those serializations into a Merkle tree.
    #[instrument(level = "debug", skip_all, fields(cols = matrix.len()))]
    pub fn commit<B: FheBackend>(
        &self,
        matrix: Vec<B::Ciphertext>,
        backend: &B,
    ) -> Result<(LigeroProver<'_, B>, Hash)> {
        if matrix.len() != self.meta.cols {
            return Err(LigeroError::Dimension("matrix width does not match committer"));
        }
        if self.meta.ext_cols() > backend.field().n() {
            return Err(LigeroError::Dimension("codeword length exceeds the field's NTT bound"));
        }

        let encoded = encode_ciphertexts(&matrix, self.meta.rows, self.meta.rho_inv, backend)?;
        debug!(encoded_cols = encoded.len(), "matrix encoded");

        let leaves = parallel_map(&encoded, backend, |worker, ct| {
            let mut leaf = ct.clone();
            while worker.level(&leaf) > 1 {
                worker.rescale(&mut leaf)?;
            }
            let mut bytes = Vec::new();
            worker.write_ciphertext(&leaf, &mut bytes)?;
            Ok(bytes)
        })?;

        let tree = MerkleTree::new(&leaves)?;
        let root = tree.root();
        debug!("merkle tree built");

        Ok((
            LigeroProver {
                committer: self,
                matrix,
                encoded_matrix: encoded,
                tree,
            },
            root,
        ))
    }
}

/// Server-side state between commit and prove. [`LigeroProver::prove`]
/// consumes it, so the matrix, its encoding, and the tree are all released
/// when the proof is out.
pub struct LigeroProver<'c, B: FheBackend> {
    pub(crate) committer: &'c LigeroCommitter,
    pub(crate) matrix: Vec<B::Ciphertext>,
    pub(crate) encoded_matrix: Vec<B::Ciphertext>,
    pub(crate) tree: MerkleTree,
}
