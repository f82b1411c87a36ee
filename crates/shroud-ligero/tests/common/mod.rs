//! Shared setup for the integration suites.

use shroud_fhe::{ClearBackend, FheBackend, MockCiphertext, MockParams};
use shroud_ligero::LigeroCommitter;
use shroud_math::Field;

pub struct TestContext {
    pub backend: ClearBackend,
    pub committer: LigeroCommitter,
}

/// Builds a mock backend whose slot count equals `rows` (so ciphertext bytes
/// line up with reference-prover leaves) and a committer for the given shape.
pub fn setup(
    security_bits: f64,
    rows: usize,
    cols: usize,
    rho_inv: usize,
    ntt_bound: usize,
    modulus: u64,
) -> TestContext {
    let params = MockParams::for_ntt(cols * rho_inv, rows, modulus).unwrap();
    let field = Field::new(modulus, ntt_bound).unwrap();
    let backend = ClearBackend::new(params, field).unwrap();
    let committer = LigeroCommitter::new(security_bits, rows, cols, rho_inv).unwrap();
    TestContext { backend, committer }
}

/// Encrypts per-column slot vectors into the matrix the committer expects.
pub fn encrypt_columns(backend: &ClearBackend, columns: &[Vec<u64>]) -> Vec<MockCiphertext> {
    columns
        .iter()
        .map(|column| {
            let pt = backend.encode(column, backend.max_level()).unwrap();
            backend.encrypt(&pt).unwrap()
        })
        .collect()
}
