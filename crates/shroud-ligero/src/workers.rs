//! Worker-pool sizing and the index-preserving parallel map used by every
//! parallel region in the pipeline.

use rayon::prelude::*;
use shroud_fhe::FheBackend;

use crate::error::{LigeroError, Result};

/// Pool size for `n` independent work items: small batches get one worker per
/// item, medium batches one per core, large batches at most twice the cores
/// to bound context switching.
pub fn determine_optimal_workers(n: usize) -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|c| c.get())
        .unwrap_or(1);
    if n < cpus {
        return n.max(1);
    }
    if n <= cpus * 4 {
        return cpus;
    }
    (cpus * 2).min(n)
}

/// Maps `op` over `items` on a dedicated pool, giving each worker its own
/// backend fork. Results come back in input order; the first error aborts the
/// collection and the remaining workers drain without side effects.
pub(crate) fn parallel_map<B, T, U, Op>(items: &[T], backend: &B, op: Op) -> Result<Vec<U>>
where
    B: FheBackend,
    T: Sync,
    U: Send,
    Op: Fn(&B, &T) -> Result<U> + Send + Sync,
{
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(determine_optimal_workers(items.len()))
        .build()
        .map_err(|e| LigeroError::Pool(e.to_string()))?;
    pool.install(|| {
        items
            .par_iter()
            .map_init(|| backend.fork(), |worker, item| op(worker, item))
            .collect()
    })
}
