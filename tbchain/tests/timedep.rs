#![allow(non_snake_case)]

use std::time::{ Duration, Instant };
use approx::assert_abs_diff_eq;
use ndarray as nd;
use num_complex::Complex64 as C64;
use tbchain::{
    error::ChainError,
    lattice::{ initial_state, LatticeParameters },
    matvec::Workers,
    run,
    timedep::{ rk4_step, rk4_step_serial, GridPolicy, Simulator, TimeGrid },
    utils::{ density, max_abs_diff, total_probability },
};

fn linspace(start: f64, end: f64, n: usize) -> nd::Array1<f64> {
    nd::Array1::linspace(start, end, n)
}

#[test]
fn four_site_chain_two_workers() {
    let eps = nd::array![0.0, 0.0, 0.0, 0.0];
    let t = nd::array![1.0, 1.0, 1.0, 0.0];
    let times = linspace(0.0, 1.0, 5);
    let evo = run(&eps, &t, &times, 2).unwrap();

    assert_eq!(evo.len(), 5);
    assert_eq!(evo.densities.dim(), (5, 4));
    assert_eq!(evo.snapshot(0), nd::array![0.0, 0.0, 1.0, 0.0]);
    for rho in evo.densities.rows() {
        assert_abs_diff_eq!(rho.sum(), 1.0, epsilon = 1e-3);
    }
    assert_abs_diff_eq!(evo.dt, 0.25, epsilon = 1e-15);

    // single-threaded reference
    let H = LatticeParameters::new(&eps, &t).unwrap().hamiltonian();
    let mut q = initial_state(4).unwrap();
    for k in 0..5 {
        assert_abs_diff_eq!(
            (&evo.snapshot(k) - &density(&q)).mapv(f64::abs).sum(),
            0.0,
            epsilon = 1e-10
        );
        if k < 4 { q = rk4_step_serial(&H, &q, 0.25).unwrap(); }
    }
    assert_abs_diff_eq!(max_abs_diff(&evo.final_state, &q), 0.0, epsilon = 1e-10);
}

#[test]
fn norm_is_approximately_conserved() {
    let n = 100;
    let eps = nd::Array1::from_elem(n, 0.5);
    let t = nd::Array1::from_elem(n, 1.0);
    let times = linspace(0.0, 25.0, 200);
    let evo = run(&eps, &t, &times, 4).unwrap();
    assert_eq!(evo.len(), 200);
    assert_abs_diff_eq!(total_probability(&evo.final_state), 1.0, epsilon = 1e-3);
    // the particle must actually have spread out
    assert!(evo.snapshot(199)[n / 2] < 0.5);
}

#[test]
fn results_do_not_depend_on_scheduling() {
    let n = 37;
    let lattice = LatticeParameters::uniform(n, 0.2, -0.8).unwrap();
    let grid = TimeGrid::linspace(0.0, 3.0, 31).unwrap();
    let a = Simulator::new(lattice.clone(), 3).unwrap().evolve(&grid).unwrap();
    let b = Simulator::new(lattice.clone(), 3).unwrap().evolve(&grid).unwrap();
    assert_eq!(a, b);
    for w in [1_usize, 2, 5, 8, 50] {
        let c = Simulator::new(lattice.clone(), w).unwrap().evolve(&grid).unwrap();
        assert_abs_diff_eq!(
            max_abs_diff(&a.final_state, &c.final_state), 0.0, epsilon = 1e-12);
    }
}

#[test]
fn simulator_is_reusable() {
    let lattice = LatticeParameters::uniform(9, 0.0, 1.0).unwrap();
    let sim = Simulator::new(lattice, 2).unwrap();
    assert_eq!(sim.workers(), 2);
    assert_eq!(sim.hamiltonian().dim(), (9, 9));
    let grid = TimeGrid::linspace(0.0, 1.0, 11).unwrap();
    let first = sim.evolve(&grid).unwrap();
    let second = sim.evolve(&grid).unwrap();
    assert_eq!(first, second);
}

#[test]
fn rk4_step_leaves_input_untouched() {
    let lattice = LatticeParameters::uniform(6, 0.3, 1.0).unwrap();
    let H = lattice.hamiltonian();
    let workers = Workers::new(3).unwrap();
    let q = initial_state(6).unwrap();
    let q_before = q.clone();
    let parallel = rk4_step(&workers, &H, &q, 0.1).unwrap();
    let serial = rk4_step_serial(&H, &q, 0.1).unwrap();
    assert_eq!(q, q_before);
    assert_abs_diff_eq!(max_abs_diff(&parallel, &serial), 0.0, epsilon = 1e-14);
}

#[test]
fn rk4_step_matches_taylor_polynomial_on_single_site() {
    // for H = [e], one step multiplies by 1 + z + z²/2 + z³/6 + z⁴/24, z = -i e dt
    let e = 0.7;
    let dt = 0.2;
    let H = nd::array![[e]];
    let q = nd::array![C64::from(1.0)];
    let stepped = rk4_step_serial(&H, &q, dt).unwrap();
    let z = -C64::i() * e * dt;
    let expected = 1.0 + z + z.powi(2) / 2.0 + z.powi(3) / 6.0 + z.powi(4) / 24.0;
    assert_abs_diff_eq!((stepped[0] - expected).norm(), 0.0, epsilon = 1e-15);
}

#[test]
fn time_grid_validation() {
    assert!(matches!(
        TimeGrid::new(&nd::array![0.0], GridPolicy::Lenient),
        Err(ChainError::TooFewSamples(1)),
    ));
    assert!(matches!(
        TimeGrid::new(&nd::array![0.0, 1.0, 1.0], GridPolicy::Lenient),
        Err(ChainError::NonMonotonicTimeGrid(2, _, 1, _)),
    ));
    assert!(matches!(
        TimeGrid::new(&nd::array![0.0, -1.0], GridPolicy::Lenient),
        Err(ChainError::NonMonotonicTimeGrid(1, _, 0, _)),
    ));
    let irregular = nd::array![0.0, 0.1, 0.3];
    let grid = TimeGrid::new(&irregular, GridPolicy::Lenient).unwrap();
    assert_abs_diff_eq!(grid.dt(), 0.1, epsilon = 1e-15);
    assert!(matches!(
        TimeGrid::new(&irregular, GridPolicy::Strict),
        Err(ChainError::NonUniformTimeGrid(1, _, _)),
    ));
    let grid = TimeGrid::linspace(0.0, 25.0, 200).unwrap();
    assert_eq!(grid.len(), 200);
    assert!(TimeGrid::linspace(1.0, 0.0, 10).is_err());
}

#[test]
fn linspace_accepts_grids_far_from_origin() {
    let grid = TimeGrid::linspace(1.0e4, 1.0e4 + 1.0, 10_001).unwrap();
    assert_eq!(grid.len(), 10_001);
    assert_abs_diff_eq!(grid.dt(), 1.0e-4, epsilon = 1e-10);
    let times = linspace(1.0e4, 1.0e4 + 1.0, 10_001);
    assert!(TimeGrid::new(&times, GridPolicy::Strict).is_ok());
    // a genuinely irregular grid at the same offset is still rejected
    let mut irregular = times.clone();
    irregular[5_000] += 2.0e-5;
    assert!(matches!(
        TimeGrid::new(&irregular, GridPolicy::Strict),
        Err(ChainError::NonUniformTimeGrid(4_999, _, _)),
    ));
}

#[test]
fn far_more_workers_than_sites_stays_fast() {
    let eps = nd::array![0.0, 0.0, 0.0, 0.0];
    let t = nd::array![1.0, 1.0, 1.0];
    let times = linspace(0.0, 1.0, 3);
    let start = Instant::now();
    let evo = run(&eps, &t, &times, 40_000).unwrap();
    assert!(start.elapsed() < Duration::from_secs(10), "took {:?}", start.elapsed());
    let reference = run(&eps, &t, &times, 1).unwrap();
    assert_eq!(evo, reference);

    let lattice = LatticeParameters::new(&eps, &t).unwrap();
    let sim = Simulator::new(lattice, 40_000).unwrap();
    assert_eq!(sim.workers(), 40_000);
    assert_eq!(sim.threads(), 4);
}

#[test]
fn run_rejects_bad_arguments() {
    let eps = nd::array![0.0, 0.0, 0.0];
    let t = nd::array![1.0, 1.0];
    let times = linspace(0.0, 1.0, 3);
    let empty = nd::Array1::<f64>::zeros(0);
    assert!(matches!(
        run(&empty, &empty, &times, 1),
        Err(ChainError::InvalidDimension(_)),
    ));
    assert!(matches!(
        run(&eps, &nd::array![1.0], &times, 1),
        Err(ChainError::InvalidDimension(_)),
    ));
    assert!(matches!(run(&eps, &t, &times, 0), Err(ChainError::InvalidWorkerCount(0))));
    assert!(matches!(
        run(&eps, &t, &nd::array![0.0, 0.5, 0.2], 1),
        Err(ChainError::NonMonotonicTimeGrid(..)),
    ));
    assert!(matches!(
        run(&eps, &t, &nd::array![0.0], 1),
        Err(ChainError::TooFewSamples(1)),
    ));
}
