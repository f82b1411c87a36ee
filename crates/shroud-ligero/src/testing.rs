//! Deterministic random matrices for tests and benchmarks.

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use shroud_math::{Field, F};

/// A seeded random matrix in both shapes the pipeline wants: row-major field
/// elements for the reference prover, and per-column `u64` slot vectors ready
/// for batching into plaintexts.
pub fn random_matrix(
    rows: usize,
    cols: usize,
    field: &Field,
    seed: u64,
) -> (Vec<Vec<F>>, Vec<Vec<u64>>) {
    let mut seed_bytes = [0u8; 32];
    seed_bytes[..8].copy_from_slice(&seed.to_le_bytes());
    let mut rng = ChaCha20Rng::from_seed(seed_bytes);

    let matrix: Vec<Vec<F>> = (0..rows)
        .map(|_| (0..cols).map(|_| field.element(rng.next_u64())).collect())
        .collect();

    let columns: Vec<Vec<u64>> = (0..cols)
        .map(|j| (0..rows).map(|i| matrix[i][j].as_u64()).collect())
        .collect();

    (matrix, columns)
}
