//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Time dependence](#time-dependence)
//! - [Stability](#stability)
//! - [Row partitioning](#row-partitioning)
//!
//! # Background
//! A tight-binding chain describes a single particle that may occupy any of
//! *N* discrete sites arranged in a line, hopping only between nearest
//! neighbors. In the site basis the Hamiltonian is real, symmetric, and
//! tridiagonal:
//! ```text
//!     ⎡ ε₀  t₀                  ⎤
//!     ⎢ t₀  ε₁  t₁              ⎥
//! H = ⎢     t₁  ε₂   ⋱          ⎥
//!     ⎢          ⋱   ⋱   t_{N-2}⎥
//!     ⎣             t_{N-2} ε_{N-1} ⎦
//! ```
//! where *ε*\[*i*\] is the on-site energy of site *i* and *t*\[*i*\] is the
//! amplitude for hopping between sites *i* and *i* + 1. There are *N* - 1
//! hopping amplitudes for *N* sites; the chain has open ends.
//!
//! For a homogeneous chain (*ε*\[*i*\] = *ε*, *t*\[*i*\] = *t*) the
//! eigenvalues are
//! ```text
//! E_k = ε + 2 t cos(π k / (N + 1)),  k ∊ {1, ..., N}
//! ```
//! so that the spectrum lies within *ε* ± 2|*t*|. A particle initially
//! localized on a single site spreads ballistically, with its fastest
//! components moving at 2|*t*| sites per unit time.
//!
//! # Time dependence
//! In units where *ħ* = 1, the state evolves as
//! ```text
//! dψ
//! -- = -i H ψ
//! dt
//! ```
//! which is integrated here with the classical fourth-order Runge-Kutta scheme
//! at fixed step size *dt*:
//! ```text
//! k₁ = dt f(ψ)
//! k₂ = dt f(ψ + k₁/2)
//! k₃ = dt f(ψ + k₂/2)
//! k₄ = dt f(ψ + k₃)
//! ψ(t + dt) = ψ(t) + (k₁ + 2 k₂ + 2 k₃ + k₄) / 6
//!
//! f(v) = -i H v
//! ```
//! The four stages depend on each other and so must be evaluated in order;
//! only the work *within* a stage is parallelized.
//!
//! # Stability
//! Since *H* is time-independent, one RK4 step multiplies each eigencomponent
//! of the state by the degree-4 Taylor polynomial of its exact propagator,
//! ```text
//! R(z) = 1 + z + z²/2 + z³/6 + z⁴/24,  z = -i E dt
//! ```
//! with
//! ```text
//! |R(i y)|² = 1 - y⁶/72 + y⁸/576
//! ```
//! The scheme is therefore not exactly unitary: components with |*E*| *dt* <
//! 2√2 lose a small amount of weight on each step, and components beyond that
//! bound grow without limit. The total probability Σ |ψ\[*i*\]|² thus serves
//! as a correctness check rather than a conserved quantity, and *dt* must be
//! chosen so that max |*E*| *dt* stays well below 2√2. For the homogeneous
//! chain, this means |*ε*| + 2|*t*| must be small compared to 2√2 / *dt*.
//!
//! # Row partitioning
//! The dominant cost of each stage is the dense product *H* *v*. With *W*
//! workers, the rows of *H* are split into *W* contiguous ranges: the first
//! *W* - 1 ranges hold ⌊*N*/*W*⌋ rows each and the last holds the
//! remaining *N* - (*W* - 1)⌊*N*/*W*⌋. Each worker reads all of *v* and its
//! own rows of *H*, and writes only its own entries of the result. Because the
//! ranges are disjoint and cover all rows, no two workers ever write the same
//! element and the result is assembled without locks. Each element is also
//! computed by exactly the same sequence of floating-point operations
//! regardless of *W*, so results do not depend on the number of workers or on
//! thread scheduling.
