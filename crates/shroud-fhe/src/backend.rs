//! The FHE backend capability consumed by the commitment pipeline.

use std::io::Read;

use shroud_math::Field;

use crate::error::BackendError;

/// Everything the committer, prover, and client need from a BFV/BGV
/// implementation. The pipeline is parametric in this trait so a real lattice
/// backend and the clear mock are interchangeable.
///
/// Backends are not assumed internally thread-safe: parallel regions call
/// [`FheBackend::fork`] once per worker and hand each worker its own handle.
/// A fork shares the immutable key material (and the multiplication counter)
/// but owns any scratch state.
pub trait FheBackend: Send + Sync + Sized {
    type Ciphertext: Clone + Send + Sync;
    type Plaintext: Clone + Send + Sync;

    /// The plaintext prime field (the committer's algebra lives here).
    fn field(&self) -> &Field;

    /// Top of the modulus chain; freshly encrypted ciphertexts start here.
    fn max_level(&self) -> usize;

    /// Packs `values` into plaintext slots at the given level.
    fn encode(&self, values: &[u64], level: usize) -> Result<Self::Plaintext, BackendError>;

    /// Unpacks the first `out.len()` slots.
    fn decode(&self, pt: &Self::Plaintext, out: &mut [u64]) -> Result<(), BackendError>;

    fn encrypt(&self, pt: &Self::Plaintext) -> Result<Self::Ciphertext, BackendError>;

    fn decrypt(&self, ct: &Self::Ciphertext) -> Result<Self::Plaintext, BackendError>;

    fn add(
        &self,
        a: &Self::Ciphertext,
        b: &Self::Ciphertext,
    ) -> Result<Self::Ciphertext, BackendError>;

    fn sub(
        &self,
        a: &Self::Ciphertext,
        b: &Self::Ciphertext,
    ) -> Result<Self::Ciphertext, BackendError>;

    /// Ciphertext-plaintext product. Counted by [`FheBackend::mul_count`].
    fn mul_plain(
        &self,
        ct: &Self::Ciphertext,
        pt: &Self::Plaintext,
    ) -> Result<Self::Ciphertext, BackendError>;

    /// Slot-wise product with a plaintext scalar (an NTT twiddle). Counted by
    /// [`FheBackend::mul_count`].
    fn mul_scalar(&self, ct: &mut Self::Ciphertext, scalar: u64) -> Result<(), BackendError>;

    /// Homomorphically sums slots `0, step, ..., (count-1)·step` into slot 0.
    /// Slots other than 0 end up carrying rotation garbage.
    fn inner_sum(
        &self,
        ct: &mut Self::Ciphertext,
        step: usize,
        count: usize,
    ) -> Result<(), BackendError>;

    /// Drops one modulus level.
    fn rescale(&self, ct: &mut Self::Ciphertext) -> Result<(), BackendError>;

    fn level(&self, ct: &Self::Ciphertext) -> usize;

    /// Whether a ring-switch transformer is attached to this backend.
    fn has_ring_switch(&self) -> bool {
        false
    }

    /// Applies the attached ring switch, shrinking the ciphertext to the
    /// smaller ring. Identity when no switch is attached.
    fn ring_switch(&self, ct: Self::Ciphertext) -> Result<Self::Ciphertext, BackendError> {
        Ok(ct)
    }

    /// Canonical little-endian serialization.
    fn write_ciphertext(
        &self,
        ct: &Self::Ciphertext,
        out: &mut Vec<u8>,
    ) -> Result<(), BackendError>;

    /// Reads one main-ring ciphertext, allocated at [`FheBackend::max_level`].
    fn read_ciphertext(&self, reader: &mut dyn Read) -> Result<Self::Ciphertext, BackendError>;

    /// Reads one ciphertext in the ring the attached switch targets. Falls
    /// back to the main ring when no switch is attached.
    fn read_switched_ciphertext(
        &self,
        reader: &mut dyn Read,
    ) -> Result<Self::Ciphertext, BackendError> {
        self.read_ciphertext(reader)
    }

    /// Shallow clone for a worker thread.
    fn fork(&self) -> Self;

    /// Total ciphertext multiplications performed by this backend and all of
    /// its forks.
    fn mul_count(&self) -> u64;
}
