//! Declarative parallel/sequential execution utilities.
//!
//! Block fan-out goes through these helpers so that the choice between rayon
//! and a plain iterator is made by the `parallel` feature flag here, and
//! nowhere else in the workspace.
//!
//! # Runtime Override
//!
//! All functions accept a `force_sequential` parameter. When `true`, execution
//! is sequential even if the `parallel` feature is enabled. The block executor
//! uses this to prove that parallel and sequential runs are identical.
//!
//! # Ordering
//!
//! Every helper returns results in input order regardless of which worker
//! produced them.
//!
//! # Example
//!
//! ```ignore
//! let results = parallel::map_slice(&specs, |spec| simulate(spec), false);
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Map `f` over `slice`, on the rayon pool unless `force_sequential` is set.
#[inline]
pub fn map_slice<T, F, R>(slice: &[T], f: F, force_sequential: bool) -> Vec<R>
where
    T: Sync,
    F: Fn(&T) -> R + Sync + Send,
    R: Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            slice.iter().map(f).collect()
        } else {
            slice.par_iter().map(f).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        slice.iter().map(f).collect()
    }
}

/// Number of worker threads the parallel helpers will use.
pub fn worker_count(force_sequential: bool) -> usize {
    #[cfg(feature = "parallel")]
    {
        if force_sequential { 1 } else { rayon::current_num_threads() }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        1
    }
}
