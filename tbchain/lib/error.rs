//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use thiserror::Error;

/// Returned when an operation requiring equal-length arrays encounters arrays
/// with unequal length.
#[derive(Debug, Error)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check_shape<S, A, T, B>(
        m: &nd::ArrayBase<S, nd::Ix2>,
        v: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let (nr, nc) = m.dim();
        let nv = v.len();
        (nr == nc).then_some(()).ok_or(Self(nr, nc))?;
        (nc == nv).then_some(()).ok_or(Self(nc, nv))
    }
}

/// Returned from lattice construction, the parallel product, and the time
/// evolution driver.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Returned when lattice parameters are empty or have incompatible
    /// lengths.
    #[error("invalid lattice dimensions: {0}")]
    InvalidDimension(String),

    /// Returned when a worker count of zero is requested.
    #[error("worker count must be at least 1; got {0}")]
    InvalidWorkerCount(usize),

    /// Returned when time samples are not strictly increasing.
    #[error("time grid must be strictly increasing; t[{0}] = {1} does not exceed t[{2}] = {3}")]
    NonMonotonicTimeGrid(usize, f64, usize, f64),

    /// Returned under [`GridPolicy::Strict`][crate::timedep::GridPolicy] when
    /// a spacing deviates from the first one.
    #[error("time grid must be uniform; spacing {1} at index {0} differs from dt = {2}")]
    NonUniformTimeGrid(usize, f64, f64),

    /// Returned when a time grid has fewer than two samples.
    #[error("time grid must contain at least 2 samples; got {0}")]
    TooFewSamples(usize),

    /// [`LengthError`]
    #[error("array length error: {0}")]
    Length(#[from] LengthError),

    /// Returned when the worker pool cannot be started.
    #[error("thread pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl ChainError {
    pub(crate) fn check_workers(workers: usize) -> Result<(), Self> {
        (workers != 0).then_some(()).ok_or(Self::InvalidWorkerCount(workers))
    }

    pub(crate) fn check_sites(n: usize) -> Result<(), Self> {
        (n != 0).then_some(())
            .ok_or_else(|| {
                Self::InvalidDimension(
                    "on-site energy array must be non-empty".to_string())
            })
    }
}
