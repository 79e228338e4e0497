//! Miscellaneous tools.

use ndarray::{ self as nd, Ix1, Ix2 };
use num_complex::Complex64 as C64;
use num_traits::Zero;
use crate::{
    error::LengthError,
    timedep::ChainResult,
};

/// Compute the probability density `|q[i]|²` at each site.
pub fn density<S>(q: &nd::ArrayBase<S, Ix1>) -> nd::Array1<f64>
where S: nd::Data<Elem = C64>
{
    q.mapv(|qk| qk.norm_sqr())
}

/// Compute the total probability `Σ |q[i]|²`.
///
/// This is 1 for a normalized state and is only approximately conserved by
/// fixed-step RK4 integration.
pub fn total_probability<S>(q: &nd::ArrayBase<S, Ix1>) -> f64
where S: nd::Data<Elem = C64>
{
    q.iter().map(|qk| qk.norm_sqr()).sum()
}

/// Compute the largest element-wise distance `max_i |a[i] - b[i]|`.
///
/// *Panics if the arrays have unequal length*.
pub fn max_abs_diff<S, T>(a: &nd::ArrayBase<S, Ix1>, b: &nd::ArrayBase<T, Ix1>)
    -> f64
where
    S: nd::Data<Elem = C64>,
    T: nd::Data<Elem = C64>,
{
    nd::Zip::from(a).and(b)
        .fold(0.0_f64, |acc, ak, bk| acc.max((ak - bk).norm()))
}

// inner product of a real row with a complex state, accumulated left to right
//
// both the serial and parallel products go through here so that they agree to
// the last bit
pub(crate) fn real_dot<S, T>(
    row: &nd::ArrayBase<S, Ix1>,
    q: &nd::ArrayBase<T, Ix1>,
) -> C64
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = C64>,
{
    row.iter().zip(q)
        .fold(C64::zero(), |acc, (&hk, &qk)| acc + hk * qk)
}

// perform the operation `a + v * b` succinctly
pub(crate) fn array_step<S, T>(
    a: &nd::ArrayBase<S, Ix1>,
    v: f64,
    b: &nd::ArrayBase<T, Ix1>,
) -> nd::Array1<C64>
where
    S: nd::Data<Elem = C64>,
    T: nd::Data<Elem = C64>,
{
    nd::Zip::from(a).and(b)
        .map_collect(|ak, bk| ak + v * bk)
}

// return an array of differences between adjacent elements of a source array
pub(crate) fn array_diff<S, A>(a: &nd::ArrayBase<S, Ix1>) -> nd::Array1<A>
where
    S: nd::Data<Elem = A>,
    A: std::ops::Sub<A, Output = A> + Copy,
{
    a.iter().zip(a.iter().skip(1))
        .map(|(ak, akp1)| *akp1 - *ak)
        .collect()
}

/// Compute `-i H q` on the calling thread.
///
/// This is the reference against which
/// [`Workers::rhs`][crate::matvec::Workers::rhs] is checked.
pub fn rhs_serial<S, T>(H: &nd::ArrayBase<S, Ix2>, q: &nd::ArrayBase<T, Ix1>)
    -> ChainResult<nd::Array1<C64>>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = C64>,
{
    LengthError::check_shape(H, q)?;
    Ok(
        H.rows().into_iter()
            .map(|row| -C64::i() * real_dot(&row, q))
            .collect()
    )
}
