//! Hook for an external verifiable-decryption system.
//!
//! The lattice ZK machinery that proves a batch of decryptions correct is an
//! external collaborator; the client only needs a way to hand it the
//! decrypted columns. Implementations own their keys and transcript.

use std::sync::atomic::{AtomicUsize, Ordering};

use shroud_math::F;

use crate::error::BackendError;

/// A queried column: the serialized (mod-switched) ciphertext together with
/// its decrypted slot values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnInstance {
    /// Canonical ciphertext bytes, exactly as hashed into the Merkle leaf.
    pub ciphertext: Vec<u8>,
    /// Decrypted column, one element per matrix row.
    pub values: Vec<F>,
}

/// Opaque proving call for a batch of decrypted columns.
pub trait DecryptionProver {
    fn prove_batched(&self, instances: &[ColumnInstance]) -> Result<(), BackendError>;
}

/// Test double that records what it was asked to prove.
#[derive(Debug, Default)]
pub struct RecordingProver {
    columns: AtomicUsize,
    calls: AtomicUsize,
}

impl RecordingProver {
    pub fn new() -> RecordingProver {
        RecordingProver::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn columns(&self) -> usize {
        self.columns.load(Ordering::Relaxed)
    }
}

impl DecryptionProver for RecordingProver {
    fn prove_batched(&self, instances: &[ColumnInstance]) -> Result<(), BackendError> {
        if instances.is_empty() {
            return Err(BackendError::Decryption("no columns to prove".into()));
        }
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.columns.fetch_add(instances.len(), Ordering::Relaxed);
        Ok(())
    }
}
