use std::hash::{Hash, Hasher};

use crate::mdp::{
    error::MdpError,
    ids::{Label, StateKey, describe},
    outcomes::OutcomeDistribution,
};

#[derive(Debug, Clone)]
/// One MDP state: identity, immediate reward and the action table.
///
/// Actions keep their registration order. That order drives tie-breaking
/// during policy extraction, so it is part of the observable behavior.
pub struct State<I, A> {
    id: I,
    reward: f64,
    actions: Vec<(A, OutcomeDistribution)>,
    preferred_action: Option<A>,
}

impl<I: Label, A: Label> State<I, A> {
    /// Create a new state without any actions
    pub fn new(id: I, reward: f64) -> Self {
        State {
            id,
            reward,
            actions: Vec::new(),
            preferred_action: None,
        }
    }

    pub fn id(&self) -> &I {
        &self.id
    }

    /// Register the outcome distribution for `action`.
    /// Re-registering an action replaces its distribution but keeps its position.
    /// Probabilities are not checked here, see `Solver::validate`.
    pub fn add_action(&mut self, action: A, outcomes: OutcomeDistribution) -> &mut Self {
        match self.actions.iter().position(|(existing, _)| *existing == action) {
            Some(idx) => self.actions[idx].1 = outcomes,
            None => self.actions.push((action, outcomes)),
        }
        self
    }

    /// Replace the whole action table.
    pub fn set_actions<T>(&mut self, actions: T) -> &mut Self
    where
        T: IntoIterator<Item = (A, OutcomeDistribution)>,
    {
        self.actions.clear();
        for (action, outcomes) in actions {
            self.add_action(action, outcomes);
        }
        self
    }

    /// Iterate the registered actions in registration order
    pub fn actions(&self) -> impl Iterator<Item = &A> + '_ {
        self.actions.iter().map(|(action, _)| action)
    }

    pub fn num_actions(&self) -> usize {
        self.actions.len()
    }

    pub fn has_action(&self, action: &A) -> bool {
        self.actions.iter().any(|(existing, _)| existing == action)
    }

    /// Full outcome distribution of `action`.
    pub fn distribution(&self, action: &A) -> Result<&OutcomeDistribution, MdpError> {
        self.actions
            .iter()
            .find(|(existing, _)| existing == action)
            .map(|(_, outcomes)| outcomes)
            .ok_or_else(|| MdpError::UnknownAction {
                state: describe(&self.id),
                action: describe(action),
            })
    }

    /// Successor states reachable under `action`.
    pub fn outcomes(&self, action: &A) -> Result<impl Iterator<Item = StateKey> + '_, MdpError> {
        Ok(self.distribution(action)?.successors())
    }

    /// Probability of moving to `next` under `action`.
    pub fn outcome_prob(&self, action: &A, next: StateKey) -> Result<f64, MdpError> {
        self.distribution(action)?
            .prob(next)
            .ok_or_else(|| MdpError::UnknownOutcome {
                state: describe(&self.id),
                action: describe(action),
                next: next.index(),
            })
    }

    pub fn reward(&self) -> f64 {
        self.reward
    }

    pub fn set_reward(&mut self, reward: f64) {
        self.reward = reward;
    }

    /// Action chosen by the last policy extraction.
    pub fn preferred_action(&self) -> Result<&A, MdpError> {
        self.preferred_action
            .as_ref()
            .ok_or_else(|| MdpError::PreferredActionUnset {
                state: describe(&self.id),
            })
    }

    pub fn set_preferred_action(&mut self, action: A) {
        self.preferred_action = Some(action);
    }

    pub(crate) fn action_table(&self) -> &[(A, OutcomeDistribution)] {
        &self.actions
    }
}

/// States are identified by their id alone.
impl<I: PartialEq, A> PartialEq for State<I, A> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<I: Eq, A> Eq for State<I, A> {}

impl<I: Hash, A> Hash for State<I, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
