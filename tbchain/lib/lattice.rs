//! Lattice parameters for a one-dimensional tight-binding chain, along with
//! constructors for its Hamiltonian and the localized initial state.

use log::warn;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    error::ChainError,
    timedep::ChainResult,
};

/// On-site energies and nearest-neighbor hopping amplitudes for a chain of `N`
/// sites.
///
/// Hopping amplitudes are stored in their canonical form, with
/// `hopping[i]` coupling sites `i` and `i + 1`, so that
/// `hopping.len() == epsilon.len() - 1` always holds.
#[derive(Clone, Debug, PartialEq)]
pub struct LatticeParameters {
    epsilon: nd::Array1<f64>,
    hopping: nd::Array1<f64>,
}

impl LatticeParameters {
    /// Create a new set of lattice parameters.
    ///
    /// `hopping` may have length `N - 1` or `N`. In the latter case the final
    /// entry cannot couple anything, is dropped, and a warning is logged. Any
    /// other length is an error.
    pub fn new<S, T>(epsilon: &Arr1<S>, hopping: &Arr1<T>) -> ChainResult<Self>
    where
        S: nd::Data<Elem = f64>,
        T: nd::Data<Elem = f64>,
    {
        let n = epsilon.len();
        ChainError::check_sites(n)?;
        let hopping: nd::Array1<f64>
            = if hopping.len() == n - 1 {
                hopping.to_owned()
            } else if hopping.len() == n {
                warn!(
                    "hopping array has length {n} for {n} sites; \
                    trailing entry {} is unused",
                    hopping[n - 1],
                );
                hopping.slice(nd::s![..n - 1]).to_owned()
            } else {
                return Err(ChainError::InvalidDimension(format!(
                    "expected {} hopping amplitudes for {} sites; got {}",
                    n - 1, n, hopping.len(),
                )));
            };
        Ok(Self { epsilon: epsilon.to_owned(), hopping })
    }

    /// Create a homogeneous chain of `n` sites.
    pub fn uniform(n: usize, onsite: f64, hopping: f64) -> ChainResult<Self> {
        ChainError::check_sites(n)?;
        Ok(Self {
            epsilon: nd::Array1::from_elem(n, onsite),
            hopping: nd::Array1::from_elem(n - 1, hopping),
        })
    }

    /// Number of lattice sites.
    pub fn sites(&self) -> usize { self.epsilon.len() }

    /// On-site energies.
    pub fn epsilon(&self) -> nd::ArrayView1<'_, f64> { self.epsilon.view() }

    /// Hopping amplitudes in canonical (length `N - 1`) form.
    pub fn hopping(&self) -> nd::ArrayView1<'_, f64> { self.hopping.view() }

    /// Construct the dense, real-symmetric, tridiagonal Hamiltonian.
    ///
    /// ```text
    /// H[i, i]     = ε[i]
    /// H[i, i + 1] = H[i + 1, i] = t[i]
    /// ```
    pub fn hamiltonian(&self) -> nd::Array2<f64> {
        let n = self.sites();
        let mut H: nd::Array2<f64> = nd::Array2::zeros((n, n));
        H.diag_mut().assign(&self.epsilon);
        self.hopping.iter().enumerate()
            .for_each(|(i, &ti)| {
                H[[i, i + 1]] = ti;
                H[[i + 1, i]] = ti;
            });
        H
    }
}

/// Construct the tight-binding Hamiltonian directly from on-site energies and
/// hopping amplitudes.
///
/// See [`LatticeParameters::new`] for the accepted lengths of `hopping`.
pub fn hamiltonian<S, T>(epsilon: &Arr1<S>, hopping: &Arr1<T>)
    -> ChainResult<nd::Array2<f64>>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    Ok(LatticeParameters::new(epsilon, hopping)?.hamiltonian())
}

/// Return a state of `n` sites with unit amplitude at site `n / 2` (rounded
/// down) and zero elsewhere.
///
/// For even `n` this places the particle just right of the chain's center.
pub fn initial_state(n: usize) -> ChainResult<nd::Array1<C64>> {
    ChainError::check_sites(n)?;
    let mut q: nd::Array1<C64> = nd::Array1::zeros(n);
    q[n / 2] = C64::from(1.0);
    Ok(q)
}
