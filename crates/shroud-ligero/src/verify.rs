//! Clear verification of a decrypted proof.

use shroud_math::{encode, inner_product, Field, F};
use shroud_merkle::verify_path;
use shroud_transcript::Transcript;
use tracing::instrument;

use crate::error::{LigeroError, Result, VerifyError};
use crate::proof::Proof;
use crate::prover::sample_query_indices;

impl Proof {
    /// Checks the opening at `point` against the claimed `value`.
    ///
    /// The verifier replays the prover's transcript schedule (root, `r`,
    /// point, queries), re-encodes both combination vectors, and then per
    /// query checks the Merkle path and the two inner products before the
    /// final evaluation check. Each failing check reports its own error.
    #[instrument(level = "debug", skip_all, fields(queries = self.metadata.queries))]
    pub fn verify(
        &self,
        point: F,
        value: F,
        field: &Field,
        transcript: &mut Transcript,
    ) -> Result<()> {
        let meta = self.metadata;
        meta.validate()?;
        if self.mat_r.len() != meta.cols || self.mat_z.len() != meta.cols {
            return Err(LigeroError::Dimension("combination length does not match metadata"));
        }
        if self.queried_cols.len() != meta.queries || self.merkle_paths.len() != meta.queries {
            return Err(LigeroError::Dimension("query count does not match metadata"));
        }
        if meta.ext_cols() > field.n() {
            return Err(LigeroError::Dimension("codeword length exceeds the field's NTT bound"));
        }

        transcript.append_bytes(b"root", &self.root);

        let mut r = vec![F::ZERO; meta.rows];
        transcript.sample_fields(b"r", field, &mut r);

        let encoded_mat_r = encode(&self.mat_r, meta.rho_inv, field);
        let encoded_mat_z = encode(&self.mat_z, meta.rho_inv, field);

        transcript.append_field(b"point", point);

        // a = [1, z, z^2, ...]
        let mut a = vec![F::ZERO; meta.cols];
        let mut pow_a = F::ONE;
        for slot in &mut a {
            *slot = pow_a;
            pow_a = field.mul(pow_a, point);
        }

        // b = [1, z^m, z^(2m), ...] with m = cols
        let z_pow = field.pow(point, meta.cols as u64);
        debug_assert_eq!(z_pow, pow_a, "z^cols disagrees with the power ladder");
        let mut b = vec![F::ZERO; meta.rows];
        let mut pow_b = F::ONE;
        for slot in &mut b {
            *slot = pow_b;
            pow_b = field.mul(pow_b, z_pow);
        }

        let indices = sample_query_indices(transcript, meta.queries, meta.ext_cols());
        for (query, &column) in indices.iter().enumerate() {
            let instance = &self.queried_cols[query];
            if instance.values.len() != meta.rows {
                return Err(LigeroError::Dimension("queried column has the wrong height"));
            }

            if !verify_path(&instance.ciphertext, &self.merkle_paths[query], &self.root, column) {
                return Err(VerifyError::Merkle { query, column }.into());
            }
            if inner_product(&instance.values, &r, field) != encoded_mat_r[column] {
                return Err(VerifyError::RowCombination { column }.into());
            }
            if inner_product(&instance.values, &b, field) != encoded_mat_z[column] {
                return Err(VerifyError::PointCombination { column }.into());
            }
        }

        if inner_product(&self.mat_z, &a, field) != value {
            return Err(VerifyError::FinalValue.into());
        }

        Ok(())
    }
}
