#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::mdp::{
    arena::StateArena,
    config::SolverConfig,
    error::MdpError,
    ids::{Label, StateKey, describe},
    outcomes::OutcomeDistribution,
    state::State,
    tables::{Policy, UtilityTable},
};

/// Metrics emitted after every Bellman sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepMetrics {
    pub iteration: usize,
    pub delta: f64,
    pub threshold: f64,
}

/// Aggregate result of a value iteration run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    /// Number of Bellman updates performed, always at least 1.
    pub iterations: usize,
    /// Largest utility change observed in the last sweep.
    pub final_delta: f64,
    /// Convergence threshold `eps * (1 - gamma) / gamma`.
    pub threshold: f64,
}

#[derive(Debug, Clone)]
/// Value iteration solver over a fixed set of states.
///
/// The solver owns the state arena. Callers keep working with states
/// through their keys (`state_mut`) until they start solving.
pub struct Solver<I, A> {
    states: StateArena<I, A>,
    gamma: f64,
    utility: UtilityTable,
    policy: Option<Policy<A>>,
}

impl<I: Label, A: Label> Solver<I, A> {
    /// Create a solver with a zero utility table.
    /// `gamma` must lie in `[0, 1)`, otherwise value iteration would never terminate.
    pub fn new(states: StateArena<I, A>, gamma: f64) -> Result<Self, MdpError> {
        if !(0.0..1.0).contains(&gamma) {
            return Err(MdpError::InvalidDiscount { gamma });
        }

        let utility = UtilityTable::zeros(states.len());
        Ok(Solver {
            states,
            gamma,
            utility,
            policy: None,
        })
    }

    /// Create a solver using the discount factor of `config`.
    pub fn from_config(states: StateArena<I, A>, config: &SolverConfig) -> Result<Self, MdpError> {
        Self::new(states, config.gamma)
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn states(&self) -> &StateArena<I, A> {
        &self.states
    }

    pub fn state(&self, key: StateKey) -> Result<&State<I, A>, MdpError> {
        self.states.state(key)
    }

    /// Mutable access to one state, e.g. to change rewards or actions before solving.
    pub fn state_mut(&mut self, key: StateKey) -> Result<&mut State<I, A>, MdpError> {
        self.states.state_mut(key)
    }

    pub fn key_of(&self, id: &I) -> Option<StateKey> {
        self.states.key_of(id)
    }

    /// Stopping threshold for a given `eps`.
    /// With `gamma == 0` this is infinite and a single sweep suffices.
    pub fn threshold(&self, eps: f64) -> f64 {
        eps * (1.0 - self.gamma) / self.gamma
    }

    /// Check that the MDP is well formed: every state has actions, every action has
    /// outcomes on known states, probabilities lie in `[0, 1]` and sum to 1 within
    /// `tolerance`, and rewards are finite.
    pub fn validate(&self, tolerance: f64) -> Result<(), MdpError> {
        for state in &self.states {
            if !state.reward().is_finite() {
                return Err(MdpError::InvalidReward {
                    state: describe(state.id()),
                    value: state.reward(),
                });
            }

            if state.num_actions() == 0 {
                return Err(MdpError::NoActions {
                    state: describe(state.id()),
                });
            }

            for (action, outcomes) in state.action_table() {
                if outcomes.is_empty() {
                    return Err(MdpError::EmptyOutcomes {
                        state: describe(state.id()),
                        action: describe(action),
                    });
                }

                for outcome in outcomes {
                    if self.states.get(outcome.next()).is_none() {
                        return Err(MdpError::UnknownState {
                            key: outcome.next().index(),
                        });
                    }

                    let prob = outcome.prob();
                    if !prob.is_finite() || !(0.0..=1.0).contains(&prob) {
                        return Err(MdpError::InvalidProbability {
                            state: describe(state.id()),
                            action: describe(action),
                            next: outcome.next().index(),
                            value: prob,
                        });
                    }
                }

                let sum = outcomes.total();
                if (sum - 1.0).abs() > tolerance {
                    return Err(MdpError::ProbabilitySum {
                        state: describe(state.id()),
                        action: describe(action),
                        sum,
                        tolerance,
                    });
                }
            }
        }

        Ok(())
    }

    /// One-step lookahead value of a state against the stored utility.
    fn backup(&self, state: &State<I, A>) -> Result<f64, MdpError> {
        let (_, best) = best_action(state, &self.utility)?;
        Ok(state.reward() + self.gamma * best)
    }

    #[cfg(not(feature = "parallel"))]
    fn sweep(&self) -> Result<Vec<f64>, MdpError> {
        self.states
            .as_slice()
            .iter()
            .map(|state| self.backup(state))
            .collect()
    }

    // States only read the previous table, so they can be evaluated independently.
    #[cfg(feature = "parallel")]
    fn sweep(&self) -> Result<Vec<f64>, MdpError> {
        self.states
            .as_slice()
            .par_iter()
            .map(|state| self.backup(state))
            .collect()
    }

    /// Perform one synchronous Bellman update.
    ///
    /// Every new utility is computed from the previous table only; the new table
    /// replaces the stored one once the whole sweep succeeded. Returns the previous
    /// table together with the freshly installed one.
    pub fn bellman_update(&mut self) -> Result<(UtilityTable, &UtilityTable), MdpError> {
        let next = UtilityTable::from(self.sweep()?);
        let previous = std::mem::replace(&mut self.utility, next);
        Ok((previous, &self.utility))
    }

    /// Run Bellman updates until the largest utility change drops below
    /// `eps * (1 - gamma) / gamma`. Returns the number of updates performed.
    pub fn value_iteration(&mut self, eps: f64) -> Result<usize, MdpError> {
        self.value_iteration_with_hook(eps, |_| {})
            .map(|report| report.iterations)
    }

    /// Value iteration that invokes a callback after each sweep.
    pub fn value_iteration_with_hook<F>(
        &mut self,
        eps: f64,
        mut on_sweep: F,
    ) -> Result<SolveReport, MdpError>
    where
        F: FnMut(&SweepMetrics),
    {
        if !eps.is_finite() || eps <= 0.0 {
            return Err(MdpError::InvalidEpsilon { eps });
        }

        let threshold = self.threshold(eps);
        let mut delta = f64::INFINITY;
        let mut iterations = 0;

        while delta >= threshold {
            iterations += 1;
            let (previous, current) = self.bellman_update()?;
            delta = previous.max_abs_diff(current);
            if delta.is_nan() {
                warn!(iteration = iterations, "utility became NaN");
                return Err(MdpError::NonFiniteUtility {
                    iteration: iterations,
                });
            }

            let metrics = SweepMetrics {
                iteration: iterations,
                delta,
                threshold,
            };
            debug!(iteration = iterations, delta, threshold, "bellman sweep");
            on_sweep(&metrics);
        }

        info!(iterations, delta, threshold, "value iteration converged");
        Ok(SolveReport {
            iterations,
            final_delta: delta,
            threshold,
        })
    }

    /// Pick the greedy action of every state against the stored utility.
    ///
    /// Ties resolve to the action registered last. The choice is also written
    /// to each state's preferred action.
    pub fn calc_policy(&mut self) -> Result<&Policy<A>, MdpError> {
        let mut chosen = Vec::with_capacity(self.states.len());
        for state in &self.states {
            let (action, _) = best_action(state, &self.utility)?;
            chosen.push(action.clone());
        }

        for (state, action) in self.states.iter_mut().zip(&chosen) {
            state.set_preferred_action(action.clone());
        }

        debug!(states = chosen.len(), "policy extracted");
        Ok(self.policy.insert(Policy::from(chosen)))
    }

    /// Validate (when `config.strict`), run value iteration with `config.eps`,
    /// then extract the policy.
    /// `config.gamma` must equal the discount factor given at construction.
    pub fn solve(&mut self, config: &SolverConfig) -> Result<SolveReport, MdpError> {
        if config.gamma != self.gamma {
            return Err(MdpError::DiscountMismatch {
                configured: config.gamma,
                solver: self.gamma,
            });
        }
        if config.strict {
            self.validate(config.tolerance)
                .inspect_err(|err| warn!(error = %err, "mdp failed validation"))?;
        }

        let report = self.value_iteration_with_hook(config.eps, |_| {})?;
        self.calc_policy()?;
        Ok(report)
    }

    /// Stored utility table. Not a copy.
    pub fn utility(&self) -> &UtilityTable {
        &self.utility
    }

    /// Mutable access to the stored utility table, e.g. to warm start value iteration.
    pub fn utility_mut(&mut self) -> &mut UtilityTable {
        &mut self.utility
    }

    /// Put every utility back to 0 and forget the policy.
    pub fn reset(&mut self) {
        self.utility = UtilityTable::zeros(self.states.len());
        self.policy = None;
    }

    /// Policy from the last `calc_policy` call.
    pub fn policy(&self) -> Result<&Policy<A>, MdpError> {
        self.policy.as_ref().ok_or(MdpError::PolicyNotComputed)
    }
}

/// Action with the highest expected utility, together with that value.
///
/// Ties resolve to the action registered last: the running best is replaced
/// whenever a candidate is greater than or equal to it. A NaN value never
/// qualifies, so a state whose every candidate is NaN has no best action.
fn best_action<'s, I: Label, A: Label>(
    state: &'s State<I, A>,
    utility: &UtilityTable,
) -> Result<(&'s A, f64), MdpError> {
    if state.num_actions() == 0 {
        return Err(MdpError::NoActions {
            state: describe(state.id()),
        });
    }

    let mut best = None;
    let mut best_value = f64::NEG_INFINITY;
    for (action, outcomes) in state.action_table() {
        let value = expected_utility(state, action, outcomes, utility)?;
        if value >= best_value {
            best_value = value;
            best = Some(action);
        }
    }

    best.map(|action| (action, best_value))
        .ok_or_else(|| MdpError::UndefinedPolicy {
            state: describe(state.id()),
        })
}

fn expected_utility<I: Label, A: Label>(
    state: &State<I, A>,
    action: &A,
    outcomes: &OutcomeDistribution,
    utility: &UtilityTable,
) -> Result<f64, MdpError> {
    if outcomes.is_empty() {
        return Err(MdpError::EmptyOutcomes {
            state: describe(state.id()),
            action: describe(action),
        });
    }
    outcomes.expected_utility(utility)
}
