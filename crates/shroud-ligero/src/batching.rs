//! Random-linear-combination batching of queried columns.
//!
//! A verifiable-decryption prover pays per ciphertext, so the client folds
//! all queried columns into a single instance first: transcript-derived
//! weight vectors combine the columns slot-wise, homomorphically on the
//! ciphertext side and in the clear on the decrypted side. Both sides land
//! on the same batched column, which is what the external prover attests to.

use shroud_fhe::{ColumnInstance, FheBackend};
use shroud_math::{Field, F};
use shroud_transcript::Transcript;

use crate::error::{LigeroError, Result};

/// Per-column weight vectors, one `u64` per row slot.
pub type BatchWeights = Vec<Vec<u64>>;

/// Folds the decrypted columns into one: samples a weight vector per column
/// under `"alpha"` and returns `batched[j] = Σ_i alpha_i[j] · col_i[j]`
/// together with the weights (the ciphertext side reuses them).
pub fn batch_columns(
    instances: &[ColumnInstance],
    field: &Field,
    transcript: &mut Transcript,
) -> Result<(Vec<F>, BatchWeights)> {
    let rows = match instances.first() {
        Some(instance) => instance.values.len(),
        None => return Err(LigeroError::Dimension("no columns to batch")),
    };
    if instances.iter().any(|instance| instance.values.len() != rows) {
        return Err(LigeroError::Dimension("queried columns differ in height"));
    }

    let mut alphas = Vec::with_capacity(instances.len());
    for _ in instances {
        let mut alpha = vec![0u64; rows];
        transcript.sample_u64s(b"alpha", &mut alpha);
        alphas.push(alpha);
    }

    let mut batched = vec![F::ZERO; rows];
    for (instance, alpha) in instances.iter().zip(&alphas) {
        for (j, slot) in batched.iter_mut().enumerate() {
            let weighted = field.mul(instance.values[j], field.element(alpha[j]));
            *slot = field.add(*slot, weighted);
        }
    }

    Ok((batched, alphas))
}

/// The homomorphic mirror of [`batch_columns`]: multiplies every ciphertext
/// by its weight plaintext and accumulates. Decrypting the result yields the
/// batched column.
pub fn batch_ciphertexts<B: FheBackend>(
    cts: &[B::Ciphertext],
    alphas: &[Vec<u64>],
    backend: &B,
) -> Result<B::Ciphertext> {
    if cts.is_empty() {
        return Err(LigeroError::Dimension("no ciphertexts to batch"));
    }
    if cts.len() != alphas.len() {
        return Err(LigeroError::Dimension("weight count does not match ciphertexts"));
    }

    let alpha_pt = backend.encode(&alphas[0], backend.level(&cts[0]))?;
    let mut batched = backend.mul_plain(&cts[0], &alpha_pt)?;
    for (ct, alpha) in cts.iter().zip(alphas).skip(1) {
        let alpha_pt = backend.encode(alpha, backend.level(ct))?;
        let weighted = backend.mul_plain(ct, &alpha_pt)?;
        batched = backend.add(&batched, &weighted)?;
    }

    Ok(batched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shroud_fhe::{ClearBackend, MockParams};

    fn setup() -> ClearBackend {
        let params = MockParams::new(65537, 8, 4).unwrap();
        let field = Field::new(65537, 8).unwrap();
        ClearBackend::new(params, field).unwrap()
    }

    fn instance(backend: &ClearBackend, values: &[u64]) -> (ColumnInstance, <ClearBackend as FheBackend>::Ciphertext) {
        let pt = backend.encode(values, backend.max_level()).unwrap();
        let ct = backend.encrypt(&pt).unwrap();
        let mut bytes = Vec::new();
        backend.write_ciphertext(&ct, &mut bytes).unwrap();
        let values = values.iter().map(|&v| backend.field().element(v)).collect();
        (ColumnInstance { ciphertext: bytes, values }, ct)
    }

    #[test]
    fn clear_and_encrypted_batches_agree() {
        let backend = setup();
        let columns: Vec<Vec<u64>> = vec![
            vec![1, 2, 3, 4, 5, 6, 7, 8],
            vec![9, 8, 7, 6, 5, 4, 3, 2],
            vec![100, 0, 200, 0, 300, 0, 400, 0],
        ];
        let (instances, cts): (Vec<_>, Vec<_>) =
            columns.iter().map(|c| instance(&backend, c)).unzip();

        let mut transcript = Transcript::new(b"batch");
        let (batched, alphas) =
            batch_columns(&instances, backend.field(), &mut transcript).unwrap();
        assert_eq!(alphas.len(), 3);

        let batch_ct = batch_ciphertexts(&cts, &alphas, &backend).unwrap();
        let pt = backend.decrypt(&batch_ct).unwrap();
        let mut slots = vec![0u64; 8];
        backend.decode(&pt, &mut slots).unwrap();

        for (j, &slot) in slots.iter().enumerate() {
            assert_eq!(backend.field().element(slot), batched[j], "slot {j}");
        }
    }

    #[test]
    fn batching_is_transcript_deterministic() {
        let backend = setup();
        let (inst, _) = instance(&backend, &[5, 6, 7, 8, 1, 2, 3, 4]);

        let mut a = Transcript::new(b"batch");
        let mut b = Transcript::new(b"batch");
        let (col_a, alphas_a) = batch_columns(std::slice::from_ref(&inst), backend.field(), &mut a).unwrap();
        let (col_b, alphas_b) = batch_columns(std::slice::from_ref(&inst), backend.field(), &mut b).unwrap();
        assert_eq!(col_a, col_b);
        assert_eq!(alphas_a, alphas_b);
    }

    #[test]
    fn rejects_empty_and_ragged_input() {
        let backend = setup();
        let mut transcript = Transcript::new(b"batch");
        assert!(matches!(
            batch_columns(&[], backend.field(), &mut transcript),
            Err(LigeroError::Dimension("no columns to batch"))
        ));

        let (mut short, _) = instance(&backend, &[1, 2, 3, 4, 5, 6, 7, 8]);
        short.values.truncate(4);
        let (full, _) = instance(&backend, &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(matches!(
            batch_columns(&[full, short], backend.field(), &mut transcript),
            Err(LigeroError::Dimension("queried columns differ in height"))
        ));

        assert!(matches!(
            batch_ciphertexts::<ClearBackend>(&[], &[], &backend),
            Err(LigeroError::Dimension("no ciphertexts to batch"))
        ));
    }
}
