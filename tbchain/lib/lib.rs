#![allow(non_snake_case)]

//! Provides functions and higher-level constructs for time evolution of a
//! single particle on a one-dimensional tight-binding chain under the
//! time-independent Schrödinger equation.
//!
//! Integration uses a fixed-step, fourth-order Runge-Kutta scheme whose
//! derivative evaluations (the dense matrix-vector product `-i H ψ`) are split
//! across a fixed pool of worker threads, each owning a contiguous range of
//! Hamiltonian rows:
//! - [`lattice`]: on-site energies, hopping amplitudes, the tridiagonal
//!   Hamiltonian, and the localized initial state
//! - [`matvec`]: row-range partitioning and the parallel product
//! - [`timedep`]: the RK4 stepper, time grids, and the outer simulation loop
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod lattice;
pub mod matvec;
pub mod timedep;
pub mod utils;

pub mod docs;

pub use timedep::{ run, Evolution };

/// Relative tolerance used to decide whether a time grid is uniform.
pub(crate) const DEF_GRID_RTOL: f64 = 1e-9;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;
