//! Error types for backend operations and parameter generation.

use shroud_math::FieldError;
use thiserror::Error;

/// Errors surfaced by an [`crate::FheBackend`] implementation.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("ciphertext level mismatch: {left} vs {right}")]
    LevelMismatch { left: usize, right: usize },
    #[error("cannot rescale below level zero")]
    LevelExhausted,
    #[error("level {level} exceeds maximum level {max}")]
    LevelOutOfRange { level: usize, max: usize },
    #[error("{needed} values exceed the {slots} available slots")]
    SlotOverflow { needed: usize, slots: usize },
    #[error("slot count mismatch: {left} vs {right}")]
    SlotMismatch { left: usize, right: usize },
    #[error("no ring switch attached to this backend")]
    NoRingSwitch,
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("verifiable decryption failed: {0}")]
    Decryption(String),
}

/// Errors from parameter generation and backend construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("plaintext modulus {t} != 1 (mod {two_n})")]
    BadCongruence { t: u64, two_n: u64 },
    #[error("ntt size {0} must be a power of two >= 4")]
    BadNttSize(usize),
    #[error("slot count {0} must be a power of two >= 2")]
    BadSlotCount(usize),
    #[error("level count {0} must be >= 2")]
    TooFewLevels(usize),
    #[error("field modulus {field} does not match plaintext modulus {plaintext}")]
    ModulusMismatch { field: u64, plaintext: u64 },
    #[error("ring switch target {target} must be a power of two below {slots}")]
    BadRingSwitchTarget { target: usize, slots: usize },
    #[error(transparent)]
    Field(#[from] FieldError),
}
