//! End-to-end checks for the transient diffusion pipeline.

use ff_diffusion::{
    DEFAULT_MAX_ITERATIONS, DiffusionError, JacobiConfig, TransientParams, build_transient_matrix,
    build_transient_rhs, flatten_row_major, reshape_row_major, solve_transient,
    solve_transient_with, transient_alpha,
};
use std::sync::atomic::AtomicBool;

fn four_by_two() -> TransientParams {
    TransientParams {
        length: 1.0,
        total_time: 0.1,
        spatial_nodes: 4,
        time_nodes: 2,
        material_constant: 0.1,
        boundary_value: 100.0,
        initial_value: 20.0,
    }
}

#[test]
fn four_nodes_two_steps_shapes() {
    let p = four_by_two();
    let alpha = transient_alpha(
        p.length,
        p.total_time,
        p.spatial_nodes,
        p.time_nodes,
        p.material_constant,
    );
    let matrix =
        build_transient_matrix(p.length, p.total_time, p.spatial_nodes, p.time_nodes, alpha);
    let rhs = build_transient_rhs(
        p.length,
        p.total_time,
        p.spatial_nodes,
        p.time_nodes,
        p.boundary_value,
        p.initial_value,
    );
    assert_eq!(matrix.shape(), (6, 6));
    assert_eq!(rhs.len(), 6);

    let profile = solve_transient(
        p.length,
        p.total_time,
        p.spatial_nodes,
        p.time_nodes,
        p.material_constant,
        p.boundary_value,
        p.initial_value,
    )
    .unwrap();
    assert_eq!(profile.shape(), (2, 3));
}

#[test]
fn converged_profile_matches_direct_solve() {
    let p = four_by_two();
    let alpha = p.alpha();
    let matrix =
        build_transient_matrix(p.length, p.total_time, p.spatial_nodes, p.time_nodes, alpha);
    let rhs = build_transient_rhs(
        p.length,
        p.total_time,
        p.spatial_nodes,
        p.time_nodes,
        p.boundary_value,
        p.initial_value,
    );
    let direct = matrix.lu().solve(&rhs).unwrap();
    let expected = reshape_row_major(direct.as_slice(), 2, 3).unwrap();

    let solution = solve_transient_with(&p, &JacobiConfig::default(), None).unwrap();
    assert!(solution.converged);
    assert!(solution.iterations < 1000);
    assert!((&solution.profile - &expected).amax() < 1e-4);

    assert_eq!(solution.positions.len(), 3);
    assert_eq!(solution.positions[2], 1.0);
    assert_eq!(solution.display_profile()[(1, 2)], -solution.profile[(1, 2)]);
}

#[test]
fn divergent_system_stops_at_cap() {
    // dt dominates the diagonal: Jacobi diverges on this system.
    let p = TransientParams {
        total_time: 1.0,
        material_constant: 1.0,
        ..four_by_two()
    };
    let solution = solve_transient_with(&p, &JacobiConfig::default(), None).unwrap();
    assert!(!solution.converged);
    assert_eq!(solution.iterations, DEFAULT_MAX_ITERATIONS);
    assert_eq!(solution.profile.shape(), (2, 3));
}

#[test]
fn zero_diagonal_is_numerical_instability() {
    // dx = 1, dt = 2, alpha = 2 → −2 − 2 + 4 = 0 on the diagonal
    let err = solve_transient(4.0, 2.0, 4, 1, 2.0, 10.0, 5.0).unwrap_err();
    assert!(matches!(err, DiffusionError::NumericalInstability { .. }));
}

#[test]
fn invalid_parameters_are_rejected_before_assembly() {
    assert!(matches!(
        solve_transient(1.0, 1.0, 1, 2, 1.0, 10.0, 5.0),
        Err(DiffusionError::InvalidInput { .. })
    ));
    assert!(matches!(
        solve_transient(1.0, 0.0, 4, 2, 1.0, 10.0, 5.0),
        Err(DiffusionError::InvalidInput { .. })
    ));
    assert!(matches!(
        solve_transient(1.0, 1.0, 4, 0, 1.0, 10.0, 5.0),
        Err(DiffusionError::InvalidInput { .. })
    ));
}

#[test]
fn stop_flag_cancels_transient_solve() {
    let flag = AtomicBool::new(true);
    let err = solve_transient_with(&four_by_two(), &JacobiConfig::unbounded(), Some(&flag))
        .unwrap_err();
    assert!(matches!(err, DiffusionError::Cancelled { .. }));
}

#[test]
fn profile_round_trips_through_flat_layout() {
    let solution = solve_transient_with(&four_by_two(), &JacobiConfig::default(), None).unwrap();
    let flat = flatten_row_major(&solution.profile);
    assert_eq!(flat.len(), 6);
    let back = reshape_row_major(&flat, 2, 3).unwrap();
    assert_eq!(back, solution.profile);
}

#[test]
fn grid_beyond_four_thousand_unknowns_returns_full_profile() {
    // 65 spatial unknowns x 64 time slices = 4160 unknowns.
    let profile = solve_transient(1.0, 0.1, 66, 64, 0.1, 100.0, 20.0).unwrap();
    assert_eq!(profile.shape(), (64, 65));
}

#[test]
fn fine_single_slice_grid_converges() {
    // dx² ≈ 5e-8 against dt = 1: the diagonal dominates and Jacobi settles fast.
    let p = TransientParams {
        length: 1.0,
        total_time: 1.0,
        spatial_nodes: 4500,
        time_nodes: 1,
        material_constant: 0.5,
        boundary_value: 100.0,
        initial_value: 20.0,
    };
    assert_eq!(p.unknowns(), 4499);
    let solution = solve_transient_with(&p, &JacobiConfig::default(), None).unwrap();
    assert!(solution.converged);
    assert_eq!(solution.profile.shape(), (1, 4499));
    assert_eq!(solution.positions.len(), 4499);
    // First unknown: (1 − 100 − 20) / (−0.5 − 2dx²)
    assert!((solution.profile[(0, 0)] - 238.0).abs() < 1e-3);
}
