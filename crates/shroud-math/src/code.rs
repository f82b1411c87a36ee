//! Reed-Solomon row encoding: zero-pad to the codeword length, then NTT.

use crate::field::{Field, F};
use crate::ntt::ntt;

/// Encodes one message row into a codeword of length `row.len() * rho_inv`.
/// Panics on an empty row.
pub fn encode(row: &[F], rho_inv: usize, field: &Field) -> Vec<F> {
    assert!(!row.is_empty(), "row is empty");
    let cols = row.len();
    let encoded_cols = cols * rho_inv;

    let mut encoded = vec![F::ZERO; encoded_cols];
    encoded[..cols].copy_from_slice(row);

    ntt(&mut encoded, encoded_cols, field);
    encoded
}
