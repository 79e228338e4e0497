//! Provides functions to compute solutions to the time-dependent Schrödinger
//! equation (TDSE) on a tight-binding chain with a time-independent
//! Hamiltonian,
//! ```text
//! dψ/dt = -i H ψ
//! ```
//! via fixed-step, fourth-order Runge-Kutta integration.
//!
//! The step size is taken to be the spacing between the first two samples of
//! the time grid and held fixed for the whole run. For a non-uniform grid this
//! means every snapshot after the first interval is only approximately placed
//! in time; see [`GridPolicy`].
//!
//! In all 2D arrays, the first (or zero-th) axis indexes time.

use log::{ debug, trace, warn };
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    Arr2,
    DEF_GRID_RTOL,
    error::ChainError,
    lattice::{ initial_state, LatticeParameters },
    matvec::Workers,
    utils::{ array_diff, array_step, density, rhs_serial },
};

pub type ChainResult<T> = Result<T, ChainError>;

/// How to treat a strictly increasing time grid whose spacings are not all
/// equal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GridPolicy {
    /// Accept the grid, logging a warning that only the first spacing is used
    /// as the step size.
    #[default]
    Lenient,
    /// Reject the grid with [`ChainError::NonUniformTimeGrid`].
    Strict,
}

/// A validated, strictly increasing sequence of sample times with a fixed step
/// size.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeGrid {
    t: nd::Array1<f64>,
    dt: f64,
}

impl TimeGrid {
    /// Validate a sequence of sample times.
    ///
    /// Fails if there are fewer than two samples or if the samples are not
    /// strictly increasing. Non-uniform spacing is handled according to
    /// `policy`.
    pub fn new<S>(t: &Arr1<S>, policy: GridPolicy) -> ChainResult<Self>
    where S: nd::Data<Elem = f64>
    {
        let m = t.len();
        if m < 2 { return Err(ChainError::TooFewSamples(m)); }
        let diffs = array_diff(t);
        if let Some(k) = diffs.iter().position(|dk| !(*dk > 0.0)) {
            return Err(
                ChainError::NonMonotonicTimeGrid(k + 1, t[k + 1], k, t[k]));
        }
        let dt = diffs[0];
        // spacings carry rounding error on the order of the samples themselves
        let nonuniform
            = diffs.iter().enumerate()
            .find(|(k, dk)| {
                let scale = t[*k].abs().max(t[*k + 1].abs());
                (*dk - dt).abs() > DEF_GRID_RTOL * dt + 4.0 * f64::EPSILON * scale
            });
        if let Some((k, &dk)) = nonuniform {
            match policy {
                GridPolicy::Strict => {
                    return Err(ChainError::NonUniformTimeGrid(k, dk, dt));
                },
                GridPolicy::Lenient => {
                    warn!(
                        "time grid is non-uniform (spacing {dk} at index {k}); \
                        integrating with fixed dt = {dt}"
                    );
                },
            }
        }
        Ok(Self { t: t.to_owned(), dt })
    }

    /// Create a uniform grid of `samples` points over `[start, end]`.
    pub fn linspace(start: f64, end: f64, samples: usize) -> ChainResult<Self> {
        if samples < 2 { return Err(ChainError::TooFewSamples(samples)); }
        let t: nd::Array1<f64> = nd::Array1::linspace(start, end, samples);
        Self::new(&t, GridPolicy::Strict)
    }

    /// Sample times.
    pub fn times(&self) -> nd::ArrayView1<'_, f64> { self.t.view() }

    /// Fixed step size.
    pub fn dt(&self) -> f64 { self.dt }

    /// Number of samples.
    pub fn len(&self) -> usize { self.t.len() }

    /// Always `false`; a valid grid holds at least two samples.
    pub fn is_empty(&self) -> bool { self.t.is_empty() }
}

/// Output of a single simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct Evolution {
    /// Probability densities, with `densities[[k, i]] = |ψ_i(t_k)|²`.
    pub densities: nd::Array2<f64>,
    /// State after the final step.
    pub final_state: nd::Array1<C64>,
    /// Step size used.
    pub dt: f64,
}

impl Evolution {
    /// Density snapshot for the `k`-th sample time.
    ///
    /// *Panics if `k` is out of bounds*.
    pub fn snapshot(&self, k: usize) -> nd::ArrayView1<'_, f64> {
        self.densities.row(k)
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize { self.densities.nrows() }

    /// `true` if no snapshots were recorded.
    pub fn is_empty(&self) -> bool { self.densities.nrows() == 0 }
}

// take a single RK4 step, returning the new state
//
// `f` evaluates the right-hand side `-i H q`; each call is a full barrier, so
// the four stages run strictly in sequence
fn rk4_step_with<F, S>(mut f: F, q: &Arr1<S>, dt: f64)
    -> ChainResult<nd::Array1<C64>>
where
    F: FnMut(&nd::Array1<C64>) -> ChainResult<nd::Array1<C64>>,
    S: nd::Data<Elem = C64>,
{
    let q0 = q.to_owned();
    let k1 = f(&q0)? * dt;
    let k2 = f(&array_step(&q0, 0.5, &k1))? * dt;
    let k3 = f(&array_step(&q0, 0.5, &k2))? * dt;
    let k4 = f(&array_step(&q0, 1.0, &k3))? * dt;
    let mut q_new = q0;
    nd::Zip::from(&mut q_new).and(&k1).and(&k2).and(&k3).and(&k4)
        .for_each(|qk, k1k, k2k, k3k, k4k| {
            *qk += (k1k + 2.0 * k2k + 2.0 * k3k + k4k) / 6.0;
        });
    Ok(q_new)
}

/// Take a single RK4 step of size `dt`, evaluating each stage on `workers`.
///
/// The input state is left untouched.
pub fn rk4_step<S, T>(workers: &Workers, H: &Arr2<S>, q: &Arr1<T>, dt: f64)
    -> ChainResult<nd::Array1<C64>>
where
    S: nd::Data<Elem = f64> + Sync,
    T: nd::Data<Elem = C64>,
{
    rk4_step_with(|v| workers.rhs(H, v), q, dt)
}

/// Like [`rk4_step`], but evaluating each stage on the calling thread.
pub fn rk4_step_serial<S, T>(H: &Arr2<S>, q: &Arr1<T>, dt: f64)
    -> ChainResult<nd::Array1<C64>>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = C64>,
{
    rk4_step_with(|v| rhs_serial(H, v), q, dt)
}

/// Drives the outer time loop for a fixed lattice and worker pool.
///
/// The Hamiltonian is built and the worker pool started once, at
/// construction; both are reused by every call to [`Self::evolve`].
#[derive(Debug)]
pub struct Simulator {
    lattice: LatticeParameters,
    H: nd::Array2<f64>,
    workers: Workers,
}

impl Simulator {
    /// Build the Hamiltonian for `lattice` and partition its rows over
    /// `workers` workers.
    ///
    /// At most `min(workers, N)` threads are started; workers beyond the
    /// number of sites only ever receive empty row ranges.
    pub fn new(lattice: LatticeParameters, workers: usize) -> ChainResult<Self> {
        let workers = Workers::for_rows(workers, lattice.sites())?;
        let H = lattice.hamiltonian();
        Ok(Self { lattice, H, workers })
    }

    /// Lattice parameters.
    pub fn lattice(&self) -> &LatticeParameters { &self.lattice }

    /// Hamiltonian.
    pub fn hamiltonian(&self) -> nd::ArrayView2<'_, f64> { self.H.view() }

    /// Number of workers, i.e. row ranges per product.
    pub fn workers(&self) -> usize { self.workers.count() }

    /// Number of OS threads backing the worker pool.
    pub fn threads(&self) -> usize { self.workers.threads() }

    /// Evolve the state localized at the chain's center over `grid`.
    ///
    /// Exactly `grid.len()` density snapshots are produced, the `k`-th being
    /// the density of the state after `k` steps of size `grid.dt()`. The
    /// returned final state is the state after `grid.len() - 1` steps.
    pub fn evolve(&self, grid: &TimeGrid) -> ChainResult<Evolution> {
        let n = self.lattice.sites();
        let m = grid.len();
        let dt = grid.dt();
        debug!(
            "evolving {n} sites over {m} samples with dt = {dt:.6e} on {} workers",
            self.workers.count(),
        );
        let mut densities: nd::Array2<f64> = nd::Array2::zeros((m, n));
        let mut q: nd::Array1<C64> = initial_state(n)?;
        let iter = densities.axis_iter_mut(nd::Axis(0)).enumerate();
        for (k, mut rho_k) in iter {
            rho_k.assign(&density(&q));
            if k + 1 < m {
                q = rk4_step(&self.workers, &self.H, &q, dt)?;
                trace!("step {}/{}", k + 1, m - 1);
            }
        }
        Ok(Evolution { densities, final_state: q, dt })
    }
}

/// Run a complete simulation.
///
/// `hopping` may hold `N - 1` amplitudes, or `N` with the last ignored (see
/// [`LatticeParameters::new`]). All arguments are validated before any
/// computation takes place. Non-uniform time grids are accepted with a
/// warning; use [`TimeGrid::new`] with [`GridPolicy::Strict`] and
/// [`Simulator`] directly to reject them instead.
pub fn run<S, T, U>(
    epsilon: &Arr1<S>,
    hopping: &Arr1<T>,
    times: &Arr1<U>,
    workers: usize,
) -> ChainResult<Evolution>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
    U: nd::Data<Elem = f64>,
{
    let lattice = LatticeParameters::new(epsilon, hopping)?;
    ChainError::check_workers(workers)?;
    let grid = TimeGrid::new(times, GridPolicy::Lenient)?;
    Simulator::new(lattice, workers)?.evolve(&grid)
}
