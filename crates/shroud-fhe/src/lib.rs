#![forbid(unsafe_code)]

//! shroud-fhe: the backend capability the commitment pipeline is built over.
//!
//! The pipeline never touches a concrete BFV/BGV library; it goes through
//! [`FheBackend`]. This crate ships the trait, validated mock parameters, a
//! clear-evaluation [`ClearBackend`] for tests and reference runs, and the
//! hook for an external verifiable-decryption prover.

mod backend;
mod error;
mod mock;
mod params;
mod vdec;

pub use backend::FheBackend;
pub use error::{BackendError, ParamError};
pub use mock::{ClearBackend, MockCiphertext, MockPlaintext};
pub use params::MockParams;
pub use vdec::{ColumnInstance, DecryptionProver, RecordingProver};
