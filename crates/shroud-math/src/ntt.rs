//! Forward NTT over field elements, plus its structural inverse.
//!
//! The transform works on every `size`-aligned chunk of the input slice.
//! Sizes 1/2/4/8 are hardwired butterfly sequences; larger power-of-two sizes
//! run the six-step decomposition with `n1 = sqrt_factor(size)` and
//! `n2 = size / n1`. The inter-stage twiddle for position `(i, j)` is
//! `ω^(i·j·step)` with `step = N/size`, indexed into the field's forward
//! table. The hardwired cases are exact expansions of the same recursion.

use crate::field::{Field, F};

/// In-place NTT of each `size`-chunk of `values`.
///
/// `values.len()` must be a positive multiple of `size`, and `size` a power
/// of two at most `field.n()`. Sizes 0 and 1 are no-ops.
pub fn ntt(values: &mut [F], size: usize, field: &Field) {
    check_ntt_args(values.len(), size, field);
    ntt_inner(values, size, field);
}

fn check_ntt_args(len: usize, size: usize, field: &Field) {
    if size > 1 {
        assert!(
            size <= field.n(),
            "NTT size {size} exceeds the field bound {}",
            field.n()
        );
        assert_eq!(len % size, 0, "input length is not a multiple of the NTT size");
    }
}

fn ntt_inner(v: &mut [F], size: usize, field: &Field) {
    match size {
        0 | 1 => {}
        2 => {
            for chunk in v.chunks_exact_mut(2) {
                let (a, b) = (chunk[0], chunk[1]);
                chunk[0] = field.add(a, b);
                chunk[1] = field.sub(a, b);
            }
        }
        4 => {
            let w4 = field.twiddle(field.n() / 4);
            for chunk in v.chunks_exact_mut(4) {
                // (v0, v2) = (v0 + v2, v0 - v2); (v1, v3) likewise
                let (a, b) = (chunk[0], chunk[2]);
                chunk[0] = field.add(a, b);
                chunk[2] = field.sub(a, b);
                let (a, b) = (chunk[1], chunk[3]);
                chunk[1] = field.add(a, b);
                chunk[3] = field.sub(a, b);

                chunk[3] = field.mul(chunk[3], w4);

                let (a, b) = (chunk[0], chunk[1]);
                chunk[0] = field.add(a, b);
                chunk[1] = field.sub(a, b);
                let (a, b) = (chunk[2], chunk[3]);
                chunk[2] = field.add(a, b);
                chunk[3] = field.sub(a, b);

                chunk.swap(1, 2);
            }
        }
        8 => {
            let w8 = field.twiddle(field.n() / 8);
            let w4 = field.twiddle(field.n() / 4);
            let w8_3 = field.mul(w8, w4);
            for chunk in v.chunks_exact_mut(8) {
                // First level
                for k in 0..4 {
                    let (a, b) = (chunk[k], chunk[k + 4]);
                    chunk[k] = field.add(a, b);
                    chunk[k + 4] = field.sub(a, b);
                }

                chunk[5] = field.mul(chunk[5], w8);
                chunk[6] = field.mul(chunk[6], w4);
                chunk[7] = field.mul(chunk[7], w8_3);

                // Second level
                let (a, b) = (chunk[0], chunk[2]);
                chunk[0] = field.add(a, b);
                chunk[2] = field.sub(a, b);
                let (a, b) = (chunk[1], chunk[3]);
                chunk[1] = field.add(a, b);
                chunk[3] = field.sub(a, b);
                chunk[3] = field.mul(chunk[3], w4);

                // Third level
                let (a, b) = (chunk[0], chunk[1]);
                chunk[0] = field.add(a, b);
                chunk[1] = field.sub(a, b);
                let (a, b) = (chunk[2], chunk[3]);
                chunk[2] = field.add(a, b);
                chunk[3] = field.sub(a, b);
                let (a, b) = (chunk[4], chunk[6]);
                chunk[4] = field.add(a, b);
                chunk[6] = field.sub(a, b);
                let (a, b) = (chunk[5], chunk[7]);
                chunk[5] = field.add(a, b);
                chunk[7] = field.sub(a, b);
                chunk[7] = field.mul(chunk[7], w4);

                // Fourth level
                let (a, b) = (chunk[4], chunk[5]);
                chunk[4] = field.add(a, b);
                chunk[5] = field.sub(a, b);
                let (a, b) = (chunk[6], chunk[7]);
                chunk[6] = field.add(a, b);
                chunk[7] = field.sub(a, b);

                chunk.swap(1, 4);
                chunk.swap(3, 6);
            }
        }
        _ => {
            let n1 = sqrt_factor(size);
            let n2 = size / n1;
            let step = field.n() / size;

            for chunk in v.chunks_exact_mut(size) {
                transpose(chunk, n1, n2);
                ntt_inner(chunk, n1, field);
                transpose(chunk, n2, n1);

                for i in 1..n1 {
                    let row_step = (i * step) % field.n();
                    let mut idx = row_step;
                    for j in 1..n2 {
                        chunk[i * n2 + j] = field.mul(chunk[i * n2 + j], field.twiddle(idx));
                        idx = (idx + row_step) % field.n();
                    }
                }

                ntt_inner(chunk, n2, field);
                transpose(chunk, n1, n2);
            }
        }
    }
}

/// Inverse of [`ntt`]: runs the six-step stages backwards with backward
/// twiddles, dividing by two in the base butterflies.
pub fn intt(values: &mut [F], size: usize, field: &Field) {
    check_ntt_args(values.len(), size, field);
    intt_inner(values, size, field);
}

fn intt_inner(v: &mut [F], size: usize, field: &Field) {
    match size {
        0 | 1 => {}
        2 => {
            let half = field.inv_two();
            for chunk in v.chunks_exact_mut(2) {
                let (a, b) = (chunk[0], chunk[1]);
                chunk[0] = field.mul(field.add(a, b), half);
                chunk[1] = field.mul(field.sub(a, b), half);
            }
        }
        _ => {
            let n1 = sqrt_factor(size);
            let n2 = size / n1;
            let step = field.n() / size;

            for chunk in v.chunks_exact_mut(size) {
                transpose(chunk, n2, n1);
                intt_inner(chunk, n2, field);

                for i in 1..n1 {
                    let row_step = (i * step) % field.n();
                    let mut idx = row_step;
                    for j in 1..n2 {
                        chunk[i * n2 + j] = field.mul(chunk[i * n2 + j], field.twiddle_inv(idx));
                        idx = (idx + row_step) % field.n();
                    }
                }

                transpose(chunk, n1, n2);
                intt_inner(chunk, n1, field);
                transpose(chunk, n2, n1);
            }
        }
    }
}

/// Largest power-of-two factor at most sqrt(n). Panics unless `n` is a
/// positive power of two.
pub fn sqrt_factor(n: usize) -> usize {
    assert!(
        n > 0 && n.is_power_of_two(),
        "unsupported NTT size: {n} is not a positive power of two"
    );
    let log2n = n.trailing_zeros() as usize;
    1 << (log2n / 2)
}

/// Transposes a row-major `rows x cols` matrix stored in a flat slice.
/// Square matrices transpose in place; rectangular ones go through a scratch
/// copy. Panics if `matrix.len() != rows * cols`.
pub fn transpose<T: Clone>(matrix: &mut [T], rows: usize, cols: usize) {
    assert_eq!(matrix.len(), rows * cols, "matrix size does not match rows*cols");
    if rows == cols {
        for i in 0..rows {
            for j in i + 1..cols {
                matrix.swap(i * cols + j, j * rows + i);
            }
        }
    } else {
        let scratch = matrix.to_vec();
        for i in 0..rows {
            for j in 0..cols {
                matrix[j * rows + i] = scratch[i * cols + j].clone();
            }
        }
    }
}
