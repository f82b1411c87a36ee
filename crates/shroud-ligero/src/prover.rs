//! The prove phase: two homomorphic inner-product reductions and the column
//! spot-checks.

use shroud_fhe::FheBackend;
use shroud_math::F;
use shroud_transcript::Transcript;
use tracing::{debug, instrument};

use crate::committer::LigeroProver;
use crate::error::Result;
use crate::proof::EncryptedProof;
use crate::workers::parallel_map;

impl<B: FheBackend> LigeroProver<'_, B> {
    /// Produces the encrypted proof for an evaluation at `point`.
    ///
    /// Transcript order is fixed: the Merkle root, the row-combination
    /// challenges `r`, the evaluation point, then the query indices. The
    /// root goes in before any challenge is derived.
    #[instrument(level = "debug", skip_all)]
    pub fn prove(
        mut self,
        point: F,
        backend: &B,
        transcript: &mut Transcript,
    ) -> Result<EncryptedProof<B>> {
        let meta = *self.committer.metadata();
        let field = backend.field();
        let root = self.tree.root();

        transcript.append_bytes(b"root", &root);

        let mut r = vec![0u64; meta.rows];
        transcript.sample_u64s(b"r", &mut r);
        let r_pt = backend.encode(&r, backend.max_level())?;

        // b = [1, z^m, z^(2m), ...] with m = cols, so that together with
        // a[j] = z^j the two reductions factor P(z).
        let z_pow = field.pow(point, meta.cols as u64);
        let mut b = vec![0u64; meta.rows];
        let mut pow_b = F::ONE;
        for slot in &mut b {
            *slot = pow_b.as_u64();
            pow_b = field.mul(pow_b, z_pow);
        }
        let b_pt = backend.encode(&b, backend.max_level())?;

        let (mat_r, mat_z) = rayon::join(
            || matrix_inner_sum_eval(&self.matrix, &r_pt, meta.rows, &backend.fork()),
            || matrix_inner_sum_eval(&self.matrix, &b_pt, meta.rows, &backend.fork()),
        );
        let (mat_r, mat_z) = (mat_r?, mat_z?);
        debug!(cols = mat_r.len(), "row combinations computed");

        // The matrix is not needed past this point; release it before the
        // query phase.
        self.matrix = Vec::new();

        transcript.append_field(b"point", point);

        let indices = sample_query_indices(transcript, meta.queries, meta.ext_cols());
        let mut queried_cols = Vec::with_capacity(meta.queries);
        let mut merkle_paths = Vec::with_capacity(meta.queries);
        for &column in &indices {
            let mut ct = self.encoded_matrix[column].clone();
            while backend.level(&ct) > 1 {
                backend.rescale(&mut ct)?;
            }
            queried_cols.push(ct);
            merkle_paths.push(self.tree.path(column)?);
        }
        debug!(queries = indices.len(), "columns opened");

        Ok(EncryptedProof {
            metadata: meta,
            root,
            mat_r,
            mat_z,
            queried_cols,
            merkle_paths,
        })
    }
}

/// One pooled pass over the matrix columns: ciphertext-plaintext product,
/// InnerSum over the row slots, mod-switch down to level 1, and the optional
/// ring switch to shed garbage slots.
fn matrix_inner_sum_eval<B: FheBackend>(
    matrix: &[B::Ciphertext],
    pt: &B::Plaintext,
    rows: usize,
    backend: &B,
) -> Result<Vec<B::Ciphertext>> {
    parallel_map(matrix, backend, |worker, ct| {
        let mut col = worker.mul_plain(ct, pt)?;
        worker.inner_sum(&mut col, 1, rows)?;
        while worker.level(&col) > 1 {
            worker.rescale(&mut col)?;
        }
        Ok(worker.ring_switch(col)?)
    })
}

/// Query indices drawn from the transcript, each reduced into the codeword
/// width.
pub(crate) fn sample_query_indices(
    transcript: &mut Transcript,
    queries: usize,
    ext_cols: usize,
) -> Vec<usize> {
    (0..queries)
        .map(|_| (transcript.sample_u64(b"query") % ext_cols as u64) as usize)
        .collect()
}
