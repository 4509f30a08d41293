use proptest::prelude::*;

use crate::{OutcomeDistribution, Solver, StateArena, StateKey};

/// Random MDP shape: per state a reward and per action a list of raw weights
/// over successor indices (normalized into a distribution when wired).
fn mdp_shape() -> impl Strategy<Value = Vec<(f64, Vec<Vec<(usize, u8)>>)>> {
    (1usize..6).prop_flat_map(|n| {
        proptest::collection::vec(
            (
                -5.0f64..5.0,
                proptest::collection::vec(
                    proptest::collection::vec((0..n, 1u8..10), 1..4),
                    1..4,
                ),
            ),
            n,
        )
    })
}

fn build(shape: &[(f64, Vec<Vec<(usize, u8)>>)], gamma: f64) -> Solver<usize, usize> {
    let mut arena = StateArena::new();
    for (idx, (reward, _)) in shape.iter().enumerate() {
        arena.insert(idx, *reward).expect("unique ids");
    }

    for (idx, (_, actions)) in shape.iter().enumerate() {
        let state = arena.state_mut(StateKey::from(idx)).expect("state exists");
        for (action, weights) in actions.iter().enumerate() {
            let total: f64 = weights.iter().map(|(_, w)| f64::from(*w)).sum();
            let mut outcomes = OutcomeDistribution::new();
            for (next, weight) in weights {
                outcomes.accumulate(StateKey::from(*next), f64::from(*weight) / total);
            }
            state.add_action(action, outcomes);
        }
    }

    Solver::new(arena, gamma).expect("valid gamma")
}

proptest! {
    #[test]
    fn converged_utility_is_a_fixed_point(shape in mdp_shape(), gamma in 0.1f64..0.95) {
        let mut solver = build(&shape, gamma);
        prop_assert!(solver.validate(1e-9).is_ok());

        let eps = 1e-6;
        let iterations = solver.value_iteration(eps).expect("converges");
        prop_assert!(iterations >= 1);

        let threshold = solver.threshold(eps);
        let (previous, current) = solver.bellman_update().expect("sweep succeeds");
        prop_assert!(previous.max_abs_diff(current) < threshold);
    }

    #[test]
    fn policy_extraction_is_repeatable(shape in mdp_shape(), gamma in 0.1f64..0.95) {
        let mut solver = build(&shape, gamma);
        solver.value_iteration(1e-6).expect("converges");

        let first = solver.calc_policy().expect("policy").clone();
        let second = solver.calc_policy().expect("policy").clone();
        prop_assert_eq!(&first, &second);

        for (key, action) in first.iter() {
            let state = solver.state(key).expect("state exists");
            prop_assert_eq!(state.preferred_action().expect("written"), action);
        }
    }
}
