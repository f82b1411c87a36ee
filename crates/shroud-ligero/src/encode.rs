//! Reed-Solomon extension of an encrypted matrix.

use shroud_fhe::{BackendError, FheBackend};

use crate::ntt::ntt_ciphertexts;

/// Extends `matrix` (one ciphertext per column, rows packed in slots) to
/// `cols * rho_inv` ciphertexts by appending encryptions of the zero column
/// and transforming the whole vector. Fresh zero encryptions keep the level
/// and form of their neighbours.
pub fn encode_ciphertexts<B: FheBackend>(
    matrix: &[B::Ciphertext],
    rows: usize,
    rho_inv: usize,
    backend: &B,
) -> Result<Vec<B::Ciphertext>, BackendError> {
    let cols = matrix.len();
    let encoded_cols = cols * rho_inv;

    let mut encoded = Vec::with_capacity(encoded_cols);
    encoded.extend(matrix.iter().cloned());

    let zero_pt = backend.encode(&vec![0u64; rows], backend.max_level())?;
    let zero_col = backend.encrypt(&zero_pt)?;
    encoded.resize(encoded_cols, zero_col);

    ntt_ciphertexts(&mut encoded, encoded_cols, backend)?;
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shroud_fhe::{ClearBackend, MockParams};
    use shroud_math::{encode, Field, F};

    #[test]
    fn matches_rowwise_plaintext_encoding() {
        let rows = 4usize;
        let cols = 4usize;
        let q = 65537u64;
        let params = MockParams::for_ntt(cols * 2, rows, q).unwrap();
        let field = Field::new(q, 8).unwrap();
        let backend = ClearBackend::new(params, field).unwrap();

        // Column-major matrix with distinct entries.
        let columns: Vec<Vec<u64>> = (0..cols as u64)
            .map(|j| (0..rows as u64).map(|i| i * 10 + j + 1).collect())
            .collect();
        let cts: Vec<_> = columns
            .iter()
            .map(|col| {
                let pt = backend.encode(col, backend.max_level()).unwrap();
                backend.encrypt(&pt).unwrap()
            })
            .collect();

        let encoded = encode_ciphertexts(&cts, rows, 2, &backend).unwrap();
        assert_eq!(encoded.len(), cols * 2);

        // Every row of the encrypted result must be the plaintext encoding of
        // the corresponding message row.
        for i in 0..rows {
            let row: Vec<F> = (0..cols)
                .map(|j| backend.field().element(columns[j][i]))
                .collect();
            let expected = encode(&row, 2, backend.field());

            for (k, ct) in encoded.iter().enumerate() {
                let pt = backend.decrypt(ct).unwrap();
                let mut slots = vec![0u64; rows];
                backend.decode(&pt, &mut slots).unwrap();
                assert_eq!(
                    backend.field().element(slots[i]),
                    expected[k],
                    "row {i}, codeword position {k}"
                );
            }
        }
    }
}
