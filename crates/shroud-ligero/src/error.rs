//! Error taxonomy for the commitment pipeline.
//!
//! Nothing is recovered locally: every failure is fatal to the proof at hand
//! and carries enough context to name the failing check or wire field.

use shroud_fhe::{BackendError, ParamError};
use shroud_merkle::MerkleError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LigeroError>;

#[derive(Debug, Error)]
pub enum LigeroError {
    /// rows/cols/rate violate the committer invariants.
    #[error("invalid dimensions: {0}")]
    Dimension(&'static str),

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Truncated frame or short read, with the wire field being processed.
    #[error("i/o while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Merkle(#[from] MerkleError),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error("worker pool: {0}")]
    Pool(String),
}

impl LigeroError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> LigeroError {
        LigeroError::Io { context, source }
    }
}

/// One variant per verification step, naming the offending column.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("merkle path verification failed for column {column} (query {query})")]
    Merkle { query: usize, column: usize },
    #[error("row-combination check failed for column {column}")]
    RowCombination { column: usize },
    #[error("point-combination check failed for column {column}")]
    PointCombination { column: usize },
    #[error("claimed value does not match the evaluation of the committed polynomial")]
    FinalValue,
}
