//! Validated parameter sets for the mock backend.
//!
//! The level heuristic mirrors BGV parameter generation for an NTT circuit:
//! a transform of size `2^k` consumes one modulus level per halving, so the
//! chain carries `k` levels and tops out at level `k - 1`.

use crate::error::ParamError;

/// Parameters of the mock scheme: a plaintext modulus, a slot count standing
/// in for the ring degree, and a modulus-chain length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockParams {
    plaintext_modulus: u64,
    num_slots: usize,
    levels: usize,
}

impl MockParams {
    /// Validates `T ≡ 1 (mod 2·num_slots)` (the batching congruence) along
    /// with the slot and level bounds.
    pub fn new(plaintext_modulus: u64, num_slots: usize, levels: usize) -> Result<MockParams, ParamError> {
        if num_slots < 2 || !num_slots.is_power_of_two() {
            return Err(ParamError::BadSlotCount(num_slots));
        }
        if levels < 2 {
            return Err(ParamError::TooFewLevels(levels));
        }
        let two_n = 2 * num_slots as u64;
        if plaintext_modulus % two_n != 1 {
            return Err(ParamError::BadCongruence { t: plaintext_modulus, two_n });
        }
        Ok(MockParams {
            plaintext_modulus,
            num_slots,
            levels,
        })
    }

    /// Parameters sized for an NTT of `ntt_size` points: `log2(ntt_size)`
    /// levels, so rescale-to-level-1 is always reachable.
    pub fn for_ntt(ntt_size: usize, num_slots: usize, plaintext_modulus: u64) -> Result<MockParams, ParamError> {
        if ntt_size < 4 || !ntt_size.is_power_of_two() {
            return Err(ParamError::BadNttSize(ntt_size));
        }
        let levels = ntt_size.trailing_zeros() as usize;
        MockParams::new(plaintext_modulus, num_slots, levels)
    }

    pub fn plaintext_modulus(&self) -> u64 {
        self.plaintext_modulus
    }

    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn max_level(&self) -> usize {
        self.levels - 1
    }
}
