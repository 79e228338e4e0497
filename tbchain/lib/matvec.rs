//! Parallel evaluation of the Schrödinger right-hand side `-i H ψ`.
//!
//! The rows of `H` are split into contiguous, non-overlapping ranges, one per
//! worker. For `N` rows and `W` workers, the first `W - 1` workers receive
//! `N / W` rows each (rounded down) and the last worker receives everything
//! that remains:
//! ```text
//! start[k] = k * (N / W)
//! end[k]   = (k + 1) * (N / W)    for k < W - 1
//! end[k]   = N                    for k = W - 1
//! ```
//! When `W > N`, every worker but the last receives an empty range and does no
//! work.
//!
//! Each worker writes only into its own slice of the output, so the output
//! buffer is shared without locking. `H` and `ψ` are read-only for the
//! duration of a call, and a call returns only after every worker has
//! finished.

use std::ops::Range;
use log::trace;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    Arr2,
    error::{ ChainError, LengthError },
    timedep::ChainResult,
    utils::real_dot,
};

/// Compute the row-range partition of `n` rows over `workers` workers.
///
/// The returned ranges are in worker order, contiguous, and cover `0..n`
/// exactly.
pub fn row_ranges(n: usize, workers: usize) -> ChainResult<Vec<Range<usize>>> {
    ChainError::check_workers(workers)?;
    let step = n / workers;
    let ranges: Vec<Range<usize>>
        = (0..workers)
        .map(|k| {
            let start = k * step;
            let end = if k == workers - 1 { n } else { start + step };
            start..end
        })
        .collect();
    Ok(ranges)
}

/// A fixed-size pool of worker threads used to evaluate `-i H ψ` over
/// row-range partitions.
///
/// The pool is built once and reused for every product; see [`par_rhs`] for a
/// one-off version that creates and tears down its own threads.
pub struct Workers {
    pool: rayon::ThreadPool,
    count: usize,
    threads: usize,
}

impl std::fmt::Debug for Workers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workers")
            .field("count", &self.count)
            .field("threads", &self.threads)
            .finish()
    }
}

impl Workers {
    /// Start a pool of exactly `count` threads.
    pub fn new(count: usize) -> ChainResult<Self> {
        Self::with_threads(count, count)
    }

    /// Partition rows over `count` workers for products with `rows` rows.
    ///
    /// Only `min(count, rows)` ranges can ever be non-empty, so no more threads
    /// than that are started; the partition itself still uses all `count`
    /// workers.
    pub fn for_rows(count: usize, rows: usize) -> ChainResult<Self> {
        Self::with_threads(count, count.min(rows).max(1))
    }

    fn with_threads(count: usize, threads: usize) -> ChainResult<Self> {
        ChainError::check_workers(count)?;
        let pool
            = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|k| format!("tbchain-worker-{k}"))
            .build()?;
        Ok(Self { pool, count, threads })
    }

    /// Number of workers, and hence of row ranges per product.
    pub fn count(&self) -> usize { self.count }

    /// Number of OS threads backing the pool.
    pub fn threads(&self) -> usize { self.threads }

    /// Compute `-i H q`, with each worker handling one row range.
    ///
    /// Blocks until every worker has written its slice of the result. A panic
    /// in any worker is propagated to the caller.
    pub fn rhs<S, T>(&self, H: &Arr2<S>, q: &Arr1<T>)
        -> ChainResult<nd::Array1<C64>>
    where
        S: nd::Data<Elem = f64> + Sync,
        T: nd::Data<Elem = C64> + Sync,
    {
        LengthError::check_shape(H, q)?;
        let n = q.len();
        let ranges = row_ranges(n, self.count)?;
        let mut out: nd::Array1<C64> = nd::Array1::zeros(n);
        let rest = out.view_mut();
        self.pool.scope(move |s| {
            let mut rest = rest;
            for range in ranges {
                let (chunk, tail) = rest.split_at(nd::Axis(0), range.len());
                rest = tail;
                if chunk.is_empty() { continue; }
                let rows = H.slice(nd::s![range.clone(), ..]);
                s.spawn(move |_| {
                    trace!("rows {}..{} on {:?}",
                        range.start, range.end, std::thread::current().name());
                    rhs_rows(&rows, q, chunk);
                });
            }
        });
        Ok(out)
    }
}

// write `-i H[rows, :] q` into `out`, whose length must match the number of
// rows
fn rhs_rows<T>(
    rows: &nd::ArrayView2<'_, f64>,
    q: &Arr1<T>,
    mut out: nd::ArrayViewMut1<'_, C64>,
)
where T: nd::Data<Elem = C64>
{
    nd::Zip::from(&mut out).and(rows.rows())
        .for_each(|ok, row| { *ok = -C64::i() * real_dot(&row, q); });
}

/// Compute `-i H q` over `workers` row ranges, on threads that exist only for
/// the duration of the call.
///
/// At most `min(workers, N)` threads are started.
///
/// Prefer [`Workers::rhs`] when computing many products.
pub fn par_rhs<S, T>(H: &Arr2<S>, q: &Arr1<T>, workers: usize)
    -> ChainResult<nd::Array1<C64>>
where
    S: nd::Data<Elem = f64> + Sync,
    T: nd::Data<Elem = C64> + Sync,
{
    Workers::for_rows(workers, q.len())?.rhs(H, q)
}
