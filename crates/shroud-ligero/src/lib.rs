#![forbid(unsafe_code)]

//! shroud-ligero: a Ligero polynomial commitment evaluated under homomorphic
//! encryption.
//!
//! The server holds encrypted columns of a data matrix. It commits by
//! Reed-Solomon extending the columns (an NTT over ciphertexts) and hashing
//! mod-switched serializations into a Merkle tree, then proves an evaluation
//! at a challenge point with two homomorphic inner-product reductions plus
//! column spot-checks. The client decrypts the proof and verifies everything
//! in the clear. A plaintext reference prover mirrors the pipeline for tests.
//!
//! The whole crate is parametric in [`shroud_fhe::FheBackend`], so the
//! encrypted path runs identically over a real BFV/BGV library or the clear
//! mock backend.

mod batching;
mod client;
mod committer;
mod encode;
mod error;
mod ntt;
mod proof;
mod prover;
mod reference;
pub mod testing;
mod verify;
mod workers;

pub use batching::{batch_ciphertexts, batch_columns, BatchWeights};
pub use committer::{LigeroCommitter, LigeroMetadata, LigeroProver};
pub use encode::encode_ciphertexts;
pub use error::{LigeroError, Result, VerifyError};
pub use ntt::{ntt_ciphertexts, ntt_scalar_muls};
pub use proof::{EncryptedProof, Proof};
pub use workers::determine_optimal_workers;
