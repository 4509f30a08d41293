use proptest::prelude::*;
use vimdp_core::{PolicySimulator, SolverConfig};
use vimdp_grid::{Cell, Direction, GridConfig, GridError, GridMdp};

const SCENARIO_YAML: &str = include_str!("../config/grid_3x3.yaml");

/// The 3x3 exercise grid: `r` in the top-left corner, terminal +10 top-right.
fn exercise_grid(r: f64) -> GridMdp {
    let mut grid = GridMdp::new(3, 3, 0.99).expect("valid grid");
    grid.set_terminal(0, 2).expect("in bounds");
    grid.set_reward(0, 2, 10.0).expect("in bounds");
    grid.set_reward(0, 0, r).expect("in bounds");
    grid
}

fn symbols(policy: &[Vec<Direction>]) -> Vec<String> {
    policy
        .iter()
        .map(|row| row.iter().map(|d| d.symbol()).collect())
        .collect()
}

#[test]
fn exercise_grid_converges_to_the_reference_solution() {
    let mut grid = exercise_grid(-1.0);

    let iterations = grid.value_iteration(1e-10).expect("converges");
    grid.calc_policy().expect("policy");

    assert_eq!(iterations, 46);
    assert_eq!(symbols(&grid.policy_map().expect("policy")), [">>+", "^>^", ">>^"]);

    let utility = grid.utility_map().expect("utility");
    let expected = [
        [6.965009, 8.461939, 10.0],
        [5.794111, 7.113205, 8.461939],
        [4.619926, 5.794111, 6.965009],
    ];
    for (row, expected_row) in utility.iter().zip(expected) {
        for (value, expected_value) in row.iter().zip(expected_row) {
            assert!((value - expected_value).abs() < 1e-6);
        }
    }
    assert_eq!(utility[0][2], 10.0);
}

#[test]
fn penalized_corner_steers_away_from_itself() {
    let mut grid = exercise_grid(-3.0);

    let iterations = grid.value_iteration(1e-10).expect("converges");
    grid.calc_policy().expect("policy");

    assert_eq!(iterations, 46);
    assert_eq!(symbols(&grid.policy_map().expect("policy")), [">>+", ">>^", ">>^"]);
}

#[test]
fn neighbours_of_the_goal_move_towards_it() {
    for r in [-3.0, -1.0, 0.0] {
        let mut grid = exercise_grid(r);
        grid.value_iteration(1e-10).expect("converges");
        grid.calc_policy().expect("policy");
        let policy = grid.policy_map().expect("policy");

        assert_eq!(policy[0][1], Direction::Right);
        assert_eq!(policy[1][2], Direction::Up);
        assert_eq!(policy[0][2], Direction::NoOp);
    }
}

#[test]
fn iteration_count_is_deterministic() {
    let mut first = exercise_grid(-1.0);
    let mut second = exercise_grid(-1.0);
    assert_eq!(
        first.value_iteration(1e-10).expect("converges"),
        second.value_iteration(1e-10).expect("converges")
    );
    assert_eq!(first.utility_map().expect("utility"), second.utility_map().expect("utility"));
}

#[test]
fn moves_off_the_edge_stay_in_place() {
    let grid = GridMdp::new(2, 2, 0.9).expect("valid grid");
    let corner = grid.slot(0, 0).expect("in bounds");
    let right = grid.slot(0, 1).expect("in bounds");
    let below = grid.slot(1, 0).expect("in bounds");
    let state = grid.solver().state(corner).expect("state exists");

    // Up from the corner: intended move and the left slip both clamp to the corner.
    assert!((state.outcome_prob(&Direction::Up, corner).expect("present") - 0.9).abs() < 1e-12);
    assert!((state.outcome_prob(&Direction::Up, right).expect("present") - 0.1).abs() < 1e-12);
    assert!((state.outcome_prob(&Direction::Down, below).expect("present") - 0.8).abs() < 1e-12);
    assert_eq!(grid.crop(-1, 5), (0, 1));
}

#[test]
fn terminal_slots_lead_to_the_shared_absorbing_state() {
    let mut grid = GridMdp::new(2, 3, 0.9).expect("valid grid");
    grid.set_terminal(0, 2).expect("in bounds");
    grid.set_terminal(1, 0).expect("in bounds");
    let ended = grid.ended_state();

    for (row, col) in [(0, 2), (1, 0)] {
        let state = grid
            .solver()
            .state(grid.slot(row, col).expect("in bounds"))
            .expect("state exists");
        assert!(grid.is_terminal(row, col).expect("in bounds"));
        assert_eq!(state.actions().copied().collect::<Vec<_>>(), vec![Direction::NoOp]);
        assert_eq!(state.outcome_prob(&Direction::NoOp, ended), Ok(1.0));
    }

    let absorbing = grid.solver().state(ended).expect("state exists");
    assert_eq!(absorbing.id(), &Cell::Ended);
    assert_eq!(absorbing.outcome_prob(&Direction::NoOp, ended), Ok(1.0));
    assert!(!grid.is_terminal(0, 0).expect("in bounds"));
}

#[test]
fn out_of_bounds_and_empty_grids_are_rejected() {
    assert!(matches!(
        GridMdp::new(0, 3, 0.9),
        Err(GridError::EmptyGrid { height: 0, width: 3 })
    ));

    let mut grid = GridMdp::new(2, 2, 0.9).expect("valid grid");
    assert!(matches!(
        grid.set_reward(2, 0, 1.0),
        Err(GridError::OutOfBounds { row: 2, .. })
    ));
    assert!(matches!(
        grid.policy_map(),
        Err(GridError::Mdp(vimdp_core::MdpError::PolicyNotComputed))
    ));
}

#[test]
fn scenario_yaml_builds_the_exercise_grid() {
    let config = GridConfig::from_yaml_str(SCENARIO_YAML).expect("scenario parses");
    let mut grid = config.build().expect("scenario builds");

    assert_eq!(grid.reward(0, 0).expect("in bounds"), -3.0);
    assert_eq!(grid.reward(1, 1).expect("in bounds"), -1.0);
    assert!(grid.is_terminal(0, 2).expect("in bounds"));

    let report = grid
        .solve(&SolverConfig {
            gamma: config.gamma,
            ..SolverConfig::default()
        })
        .expect("solves");
    assert_eq!(report.iterations, 46);
    assert_eq!(symbols(&grid.policy_map().expect("policy")), [">>+", ">>^", ">>^"]);
}

#[test]
fn invalid_drift_is_rejected() {
    let mut config = GridConfig::new(2, 2);
    config.correct_prob = 0.7;
    assert!(matches!(config.build(), Err(GridError::InvalidDrift { .. })));
}

#[test]
fn scenario_files_round_trip_on_disk() {
    let mut config = GridConfig::new(2, 4);
    config.terminals.push(vimdp_grid::SlotRef { row: 1, col: 3 });
    let path = std::env::temp_dir().join(format!("vimdp-grid-{}.yaml", std::process::id()));

    vimdp_grid::save_yaml(&path, &config).expect("writes");
    let grid = vimdp_grid::build_yaml(&path).expect("reads back");
    let _ = std::fs::remove_file(&path);

    assert_eq!((grid.height(), grid.width()), (2, 4));
    assert!(grid.is_terminal(1, 3).expect("in bounds"));
}

#[test]
fn policy_rollouts_reach_the_goal() {
    let mut grid = exercise_grid(-1.0);
    grid.solve(&SolverConfig::default()).expect("solves");
    let start = grid.slot(2, 0).expect("in bounds");
    let goal = grid.slot(0, 2).expect("in bounds");

    let mut sim = PolicySimulator::new(grid.solver(), 7);
    let episode = sim.rollout(start, 500).expect("rollout");

    assert!(episode.absorbed);
    assert_eq!(episode.path.last(), Some(&grid.ended_state()));
    assert!(episode.path.contains(&goal));
}

proptest! {
    #[test]
    fn every_grid_action_is_a_distribution(height in 1usize..7, width in 1usize..7, gamma in 0.0f64..0.999) {
        let grid = GridMdp::new(height, width, gamma).expect("valid grid");
        for state in grid.solver().states() {
            for action in state.actions() {
                let total = state.distribution(action).expect("registered").total();
                prop_assert!((total - 1.0).abs() < 1e-9);
            }
        }
        prop_assert!(grid.solver().validate(1e-9).is_ok());
    }

    #[test]
    fn grid_policy_extraction_is_repeatable(height in 1usize..5, width in 1usize..5, r in -5.0f64..5.0) {
        let mut grid = GridMdp::new(height, width, 0.9).expect("valid grid");
        grid.set_terminal(height - 1, width - 1).expect("in bounds");
        grid.set_reward(0, 0, r).expect("in bounds");
        grid.value_iteration(1e-6).expect("converges");

        grid.calc_policy().expect("policy");
        let first = grid.policy_map().expect("policy");
        grid.calc_policy().expect("policy");
        prop_assert_eq!(first, grid.policy_map().expect("policy"));
    }
}
