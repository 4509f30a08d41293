use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::mdp::{
    error::MdpError,
    ids::{Label, StateKey, describe},
    outcomes::OutcomeDistribution,
    solver::Solver,
};

/// One trajectory produced by following the extracted policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    /// Visited states, starting with the start state.
    pub path: Vec<StateKey>,
    /// `sum gamma^t * reward(path[t])`.
    pub discounted_return: f64,
    /// Whether the rollout stopped on an absorbing state rather than the step limit.
    pub absorbed: bool,
}

#[derive(Debug, Clone)]
/// Seeded simulator sampling transitions from a solver's outcome distributions.
pub struct PolicySimulator<'a, I, A> {
    solver: &'a Solver<I, A>,
    rng: ChaCha8Rng,
}

impl<'a, I: Label, A: Label> PolicySimulator<'a, I, A> {
    /// Create a simulator with deterministic RNG seed.
    pub fn new(solver: &'a Solver<I, A>, seed: u64) -> Self {
        PolicySimulator {
            solver,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn solver(&self) -> &'a Solver<I, A> {
        self.solver
    }

    /// Uniform sample in `[0, 1)`.
    fn next_sample(&mut self) -> f64 {
        (self.rng.next_u64() as f64) / ((u64::MAX as f64) + 1.0)
    }

    /// Sample the successor of `state_key` under `action`.
    pub fn step(&mut self, state_key: StateKey, action: &A) -> Result<StateKey, MdpError> {
        let sample = self.next_sample();
        let state = self.solver.state(state_key)?;
        let outcomes = state.distribution(action)?;

        sample_outcome(outcomes, sample).ok_or_else(|| MdpError::EmptyOutcomes {
            state: describe(state.id()),
            action: describe(action),
        })
    }

    /// Follow the extracted policy from `start` for at most `max_steps` transitions.
    /// Stops early on a state whose policy action loops back onto itself with certainty.
    pub fn rollout(&mut self, start: StateKey, max_steps: usize) -> Result<Episode, MdpError> {
        let solver = self.solver;
        let policy = solver.policy()?;
        let gamma = solver.gamma();

        let mut path = vec![start];
        let mut current = start;
        let mut discounted_return = 0.0;
        let mut discount = 1.0;
        let mut absorbed = false;

        for _ in 0..=max_steps {
            let state = solver.state(current)?;
            discounted_return += discount * state.reward();
            discount *= gamma;

            let action = policy.get(current).ok_or(MdpError::UnknownState {
                key: current.index(),
            })?;
            if is_absorbing(state.distribution(action)?, current) {
                absorbed = true;
                break;
            }
            if path.len() > max_steps {
                break;
            }

            current = self.step(current, action)?;
            path.push(current);
        }

        Ok(Episode {
            path,
            discounted_return,
            absorbed,
        })
    }
}

/// Pick the outcome whose cumulative probability first exceeds `sample`.
/// Rounding slack at the top of the CDF falls back to the last outcome.
fn sample_outcome(outcomes: &OutcomeDistribution, sample: f64) -> Option<StateKey> {
    if outcomes.is_empty() {
        return None;
    }

    let cdf = outcomes.cdf();
    let chosen_idx = cdf.partition_point(|p| *p <= sample).min(outcomes.len() - 1);
    outcomes.iter().nth(chosen_idx).map(|outcome| outcome.next())
}

fn is_absorbing(outcomes: &OutcomeDistribution, state_key: StateKey) -> bool {
    outcomes.len() == 1 && outcomes.prob(state_key).is_some_and(|p| p > 0.0)
}
