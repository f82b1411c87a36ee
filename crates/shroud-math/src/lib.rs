#![forbid(unsafe_code)]

//! shroud-math: prime field F_q with q ≡ 1 (mod 2N), forward/inverse NTT,
//! Reed-Solomon row encoding, and dense polynomial evaluation.
//!
//! Everything here is plaintext arithmetic; the ciphertext mirror of the NTT
//! lives in `shroud-ligero` and follows the exact same recursion shape.

mod code;
mod field;
mod ntt;
mod poly;

pub use code::encode;
pub use field::{Field, FieldError, F};
pub use ntt::{intt, ntt, sqrt_factor, transpose};
pub use poly::{inner_product, DensePoly};
