//! The plaintext reference prover.
//!
//! A mirror of commit-then-prove over clear field elements, used as an oracle
//! for the encrypted pipeline. Row-combination challenges are sampled as
//! `u64`s and mapped into the field, so the transcript evolves exactly as it
//! does on the encrypted side; Merkle leaves are the little-endian bytes of
//! each codeword column.

use shroud_fhe::ColumnInstance;
use shroud_math::{encode, Field, F};
use shroud_merkle::MerkleTree;
use shroud_transcript::Transcript;
use tracing::instrument;

use crate::committer::LigeroCommitter;
use crate::error::{LigeroError, Result};
use crate::proof::Proof;
use crate::prover::sample_query_indices;

impl LigeroCommitter {
    /// Commits to the row-major clear `matrix` and opens it at `point`,
    /// producing a proof interchangeable with the decrypted encrypted one.
    #[instrument(level = "debug", skip_all)]
    pub fn prove_reference(
        &self,
        matrix: &[Vec<F>],
        point: F,
        field: &Field,
        transcript: &mut Transcript,
    ) -> Result<Proof> {
        let meta = *self.metadata();
        if matrix.len() != meta.rows || matrix.iter().any(|row| row.len() != meta.cols) {
            return Err(LigeroError::Dimension("matrix shape does not match committer"));
        }
        if meta.ext_cols() > field.n() {
            return Err(LigeroError::Dimension("codeword length exceeds the field's NTT bound"));
        }

        // Commit: encode every row, then gather codeword columns.
        let encoded_rows: Vec<Vec<F>> = matrix
            .iter()
            .map(|row| encode(row, meta.rho_inv, field))
            .collect();
        let mut columns = vec![vec![F::ZERO; meta.rows]; meta.ext_cols()];
        for (i, encoded_row) in encoded_rows.iter().enumerate() {
            for (j, &v) in encoded_row.iter().enumerate() {
                columns[j][i] = v;
            }
        }

        let leaves: Vec<Vec<u8>> = columns
            .iter()
            .map(|column| column.iter().flat_map(|e| e.to_le_bytes()).collect())
            .collect();
        let tree = MerkleTree::new(&leaves)?;
        let root = tree.root();

        transcript.append_bytes(b"root", &root);

        let mut r_raw = vec![0u64; meta.rows];
        transcript.sample_u64s(b"r", &mut r_raw);
        let r: Vec<F> = r_raw.iter().map(|&v| field.element(v)).collect();

        let mat_r: Vec<F> = (0..meta.cols)
            .map(|j| {
                let mut sum = F::ZERO;
                for (i, row) in matrix.iter().enumerate() {
                    sum = field.add(sum, field.mul(row[j], r[i]));
                }
                sum
            })
            .collect();

        let z_pow = field.pow(point, meta.cols as u64);
        let mut b = vec![F::ZERO; meta.rows];
        let mut pow_b = F::ONE;
        for slot in &mut b {
            *slot = pow_b;
            pow_b = field.mul(pow_b, z_pow);
        }

        let mat_z: Vec<F> = (0..meta.cols)
            .map(|j| {
                let mut sum = F::ZERO;
                for (i, row) in matrix.iter().enumerate() {
                    sum = field.add(sum, field.mul(row[j], b[i]));
                }
                sum
            })
            .collect();

        transcript.append_field(b"point", point);

        let indices = sample_query_indices(transcript, meta.queries, meta.ext_cols());
        let mut queried_cols = Vec::with_capacity(meta.queries);
        let mut merkle_paths = Vec::with_capacity(meta.queries);
        for &column in &indices {
            queried_cols.push(ColumnInstance {
                ciphertext: leaves[column].clone(),
                values: columns[column].clone(),
            });
            merkle_paths.push(tree.path(column)?);
        }

        Ok(Proof {
            metadata: meta,
            root,
            mat_r,
            mat_z,
            queried_cols,
            merkle_paths,
        })
    }
}
