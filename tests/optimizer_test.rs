//! End-to-end route computation over stored and in-memory branches.

use std::sync::Arc;
use std::time::Duration;

use route_optimizer::database::{db_connection, insert_branch};
use route_optimizer::distance::{haversine_km, DistanceMatrix};
use route_optimizer::domain::solution::is_permutation_of;
use route_optimizer::fixtures::demo_branches;
use route_optimizer::{
    optimize_routes, optimize_routes_with, optimize_stored_routes, Branch, NewBranch,
    RouteOutcome, SolverConfig, TabuSearchSolver,
};

fn quick_config() -> SolverConfig {
    SolverConfig::default()
        .with_time_limit(Duration::from_secs(3))
        .with_max_iterations(500)
}

fn demo() -> Vec<Branch> {
    demo_branches()
        .into_iter()
        .enumerate()
        .map(|(i, b)| Branch::new(i as i64 + 1, b.name, b.latitude, b.longitude))
        .collect()
}

#[tokio::test]
async fn test_both_routes_cover_every_branch() {
    let branches = demo();
    let comparison = optimize_routes(branches.clone(), &quick_config()).await.unwrap();

    assert_eq!(comparison.branch_count, branches.len());
    assert!(is_permutation_of(&comparison.greedy, &branches));
    assert_eq!(comparison.greedy.stops[0], branches[0]);

    let solved = comparison.solver.route().expect("solver should find a tour");
    assert!(is_permutation_of(solved, &branches));
    assert_eq!(solved.stops[0], branches[0]);
    assert!(solved.closed_km > 0.0);
}

#[tokio::test]
async fn test_solver_tour_no_longer_than_greedy_round_trip() {
    let branches = demo();
    let comparison = optimize_routes(branches, &quick_config()).await.unwrap();
    let solved = comparison.solver.route().unwrap();
    // both start at the depot and the solver starts from the same nearest-neighbour tour
    assert!(solved.closed_km <= comparison.greedy.closed_km + 1e-9);
}

#[tokio::test]
async fn test_three_branch_scenario() {
    let branches = vec![
        Branch::new(1, "A", 23.8103, 90.4125),
        Branch::new(2, "B", 23.7925, 90.4078),
        Branch::new(3, "C", 23.8041, 90.3643),
    ];
    let to_b = haversine_km(branches[0].coords(), branches[1].coords());
    let to_c = haversine_km(branches[0].coords(), branches[2].coords());
    let nearer = if to_b <= to_c { 2 } else { 3 };

    let comparison = optimize_routes(branches, &quick_config()).await.unwrap();
    assert_eq!(comparison.greedy.stops[1].id, nearer);
}

#[tokio::test]
async fn test_stored_branches_are_routed_in_id_order() {
    let pool = db_connection("sqlite::memory:").await.unwrap();
    for branch in demo_branches().iter().take(5) {
        insert_branch(&pool, branch).await.unwrap();
    }

    let comparison = optimize_stored_routes(&pool, &quick_config()).await.unwrap();
    assert_eq!(comparison.branch_count, 5);
    assert_eq!(comparison.greedy.stops[0].id, 1);
    assert_eq!(comparison.solver.route().unwrap().stops[0].id, 1);
}

#[tokio::test]
async fn test_empty_store_is_no_branches_not_no_solution() {
    let pool = db_connection("sqlite::memory:").await.unwrap();
    let comparison = optimize_stored_routes(&pool, &quick_config()).await.unwrap();
    assert_eq!(comparison.solver, RouteOutcome::NoBranches);
    assert!(comparison.greedy.is_empty());
}

#[tokio::test]
async fn test_exhausted_budget_is_no_solution() {
    let comparison = optimize_routes_with(
        Arc::new(TabuSearchSolver),
        demo(),
        &quick_config(),
        Some(Duration::ZERO),
    )
    .await
    .unwrap();
    assert_eq!(comparison.solver, RouteOutcome::NoSolutionFound);
    // the greedy route does not depend on the solver budget
    assert_eq!(comparison.greedy.len(), demo().len());
}

#[tokio::test]
async fn test_request_timeout_shorter_than_time_limit_still_solves() {
    // large enough that the search runs into its deadline instead of stagnating
    let branches: Vec<Branch> = (0..300)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::TAU / 300.0;
            Branch::new(
                i as i64 + 1,
                format!("ring {}", i),
                23.8 + 0.1 * angle.sin(),
                90.4 + 0.1 * angle.cos(),
            )
        })
        .collect();
    let config = SolverConfig::default().with_max_iterations(1_000_000);

    let comparison = optimize_routes_with(
        Arc::new(TabuSearchSolver),
        branches.clone(),
        &config,
        Some(Duration::from_secs(2)),
    )
    .await
    .unwrap();

    let solved = comparison.solver.route().expect("solver tour should survive the request timeout");
    assert!(is_permutation_of(solved, &branches));
    assert_eq!(solved.stops[0], branches[0]);
}

#[tokio::test]
async fn test_matrix_is_a_pure_function_of_branches() {
    let branches = demo();
    let first = DistanceMatrix::from_branches(&branches);
    let second = DistanceMatrix::from_branches(&branches);
    assert_eq!(first, second);
    assert!(first.is_symmetric(0.0));

    let single = NewBranch::new("solo", 23.8, 90.4);
    let pool = db_connection("sqlite::memory:").await.unwrap();
    insert_branch(&pool, &single).await.unwrap();
    let comparison = optimize_stored_routes(&pool, &quick_config()).await.unwrap();
    assert_eq!(comparison.greedy.len(), 1);
    assert_eq!(comparison.solver.route().unwrap().len(), 1);
}
