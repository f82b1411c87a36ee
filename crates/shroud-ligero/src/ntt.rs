//! NTT over ciphertexts.
//!
//! Structurally identical to the plaintext transform in `shroud-math`: same
//! chunk boundaries, same twiddle indices. Field add/sub become homomorphic
//! ciphertext add/sub, and twiddle multiplication becomes a plaintext-scalar
//! multiply with the twiddle as a `u64`. The 2/4/8-point cases are expanded
//! forms of the same butterfly sequence to keep ciphertext copies down. No
//! rescaling happens in here; levels are the committer's business.

use shroud_fhe::{BackendError, FheBackend};
use shroud_math::{sqrt_factor, transpose};

/// In-place ciphertext NTT of each `size`-chunk of `values`.
pub fn ntt_ciphertexts<B: FheBackend>(
    values: &mut [B::Ciphertext],
    size: usize,
    backend: &B,
) -> Result<(), BackendError> {
    if size > 1 {
        assert!(
            size <= backend.field().n(),
            "NTT size {size} exceeds the field bound {}",
            backend.field().n()
        );
        assert_eq!(
            values.len() % size,
            0,
            "input length is not a multiple of the NTT size"
        );
    }
    ntt_inner(values, size, backend)
}

fn butterfly<B: FheBackend>(
    v: &mut [B::Ciphertext],
    i: usize,
    j: usize,
    backend: &B,
) -> Result<(), BackendError> {
    let sum = backend.add(&v[i], &v[j])?;
    let diff = backend.sub(&v[i], &v[j])?;
    v[i] = sum;
    v[j] = diff;
    Ok(())
}

fn ntt_inner<B: FheBackend>(
    v: &mut [B::Ciphertext],
    size: usize,
    backend: &B,
) -> Result<(), BackendError> {
    let n = backend.field().n();
    match size {
        0 | 1 => {}
        2 => {
            for start in (0..v.len()).step_by(2) {
                butterfly(v, start, start + 1, backend)?;
            }
        }
        4 => {
            let w4 = backend.field().twiddle(n / 4).as_u64();
            for start in (0..v.len()).step_by(4) {
                let chunk = &mut v[start..start + 4];
                butterfly(chunk, 0, 2, backend)?;
                butterfly(chunk, 1, 3, backend)?;

                backend.mul_scalar(&mut chunk[3], w4)?;

                butterfly(chunk, 0, 1, backend)?;
                butterfly(chunk, 2, 3, backend)?;

                chunk.swap(1, 2);
            }
        }
        8 => {
            let field = backend.field();
            let w8 = field.twiddle(n / 8);
            let w4 = field.twiddle(n / 4);
            let w8_3 = field.mul(w8, w4);
            for start in (0..v.len()).step_by(8) {
                let chunk = &mut v[start..start + 8];

                // First level
                for k in 0..4 {
                    butterfly(chunk, k, k + 4, backend)?;
                }

                backend.mul_scalar(&mut chunk[5], w8.as_u64())?;
                backend.mul_scalar(&mut chunk[6], w4.as_u64())?;
                backend.mul_scalar(&mut chunk[7], w8_3.as_u64())?;

                // Second level
                butterfly(chunk, 0, 2, backend)?;
                butterfly(chunk, 1, 3, backend)?;
                backend.mul_scalar(&mut chunk[3], w4.as_u64())?;

                // Third level
                butterfly(chunk, 0, 1, backend)?;
                butterfly(chunk, 2, 3, backend)?;
                butterfly(chunk, 4, 6, backend)?;
                butterfly(chunk, 5, 7, backend)?;
                backend.mul_scalar(&mut chunk[7], w4.as_u64())?;

                // Fourth level
                butterfly(chunk, 4, 5, backend)?;
                butterfly(chunk, 6, 7, backend)?;

                chunk.swap(1, 4);
                chunk.swap(3, 6);
            }
        }
        _ => {
            let n1 = sqrt_factor(size);
            let n2 = size / n1;
            let step = n / size;

            for start in (0..v.len()).step_by(size) {
                let chunk = &mut v[start..start + size];

                transpose(chunk, n1, n2);
                ntt_inner(chunk, n1, backend)?;
                transpose(chunk, n2, n1);

                for i in 1..n1 {
                    let row_step = (i * step) % n;
                    let mut idx = row_step;
                    for j in 1..n2 {
                        let twiddle = backend.field().twiddle(idx).as_u64();
                        backend.mul_scalar(&mut chunk[i * n2 + j], twiddle)?;
                        idx = (idx + row_step) % n;
                    }
                }

                ntt_inner(chunk, n2, backend)?;
                transpose(chunk, n1, n2);
            }
        }
    }
    Ok(())
}

/// Scalar multiplications performed when transforming one `size`-chunk.
/// Deterministic by construction; the cost tests pin the prover's counter to
/// this.
pub fn ntt_scalar_muls(size: usize) -> u64 {
    match size {
        0 | 1 | 2 => 0,
        4 => 1,
        8 => 3,
        _ => {
            let n1 = sqrt_factor(size);
            let n2 = size / n1;
            (size / n1) as u64 * ntt_scalar_muls(n1)
                + ((n1 - 1) * (n2 - 1)) as u64
                + (size / n2) as u64 * ntt_scalar_muls(n2)
        }
    }
}
