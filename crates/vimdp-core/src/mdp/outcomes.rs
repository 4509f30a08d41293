use std::slice::Iter;

use crate::mdp::{error::MdpError, ids::StateKey, tables::UtilityTable};

#[derive(Debug, Clone, Copy, PartialEq)]
/// One successor state together with the probability of reaching it.
pub struct Outcome {
    next: StateKey,
    prob: f64,
}

impl Outcome {
    /// Key of the successor state
    pub fn next(&self) -> StateKey {
        self.next
    }

    /// Probability of reaching the successor
    pub fn prob(&self) -> f64 {
        self.prob
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Probability distribution over successor states for a single action.
/// Successors keep the order in which they were first inserted.
pub struct OutcomeDistribution {
    outcomes: Vec<Outcome>,
}

impl OutcomeDistribution {
    /// Create a new empty distribution
    pub fn new() -> Self {
        Self::default()
    }

    /// Distribution that reaches `next` with probability 1.
    pub fn certain(next: StateKey) -> Self {
        OutcomeDistribution {
            outcomes: vec![Outcome { next, prob: 1.0 }],
        }
    }

    /// Set the probability of reaching `next`.
    /// Returns the previous probability if the successor was already present.
    pub fn insert(&mut self, next: StateKey, prob: f64) -> Option<f64> {
        match self.position(next) {
            Some(idx) => Some(std::mem::replace(&mut self.outcomes[idx].prob, prob)),
            None => {
                self.outcomes.push(Outcome { next, prob });
                None
            }
        }
    }

    /// Add `prob` to the mass already assigned to `next`.
    /// Used when several movements collapse onto the same successor.
    pub fn accumulate(&mut self, next: StateKey, prob: f64) {
        match self.position(next) {
            Some(idx) => self.outcomes[idx].prob += prob,
            None => self.outcomes.push(Outcome { next, prob }),
        }
    }

    fn position(&self, next: StateKey) -> Option<usize> {
        self.outcomes.iter().position(|outcome| outcome.next == next)
    }

    /// Probability of reaching `next`, if it is part of the distribution
    pub fn prob(&self, next: StateKey) -> Option<f64> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.next == next)
            .map(|outcome| outcome.prob)
    }

    /// Iterate the successor keys in insertion order
    pub fn successors(&self) -> impl Iterator<Item = StateKey> + '_ {
        self.outcomes.iter().map(|outcome| outcome.next)
    }

    pub fn iter(&self) -> Iter<'_, Outcome> {
        self.outcomes.iter()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Sum of all probabilities. Should be 1 for a well formed action.
    pub fn total(&self) -> f64 {
        self.outcomes.iter().map(|outcome| outcome.prob).sum()
    }

    /// Running sums of the probabilities, in insertion order.
    pub(crate) fn cdf(&self) -> Vec<f64> {
        self.outcomes
            .iter()
            .scan(0.0_f64, |cumulative, outcome| {
                *cumulative += outcome.prob;
                Some(*cumulative)
            })
            .collect()
    }

    /// Expected utility `sum P(next) * utility[next]` over this distribution.
    pub(crate) fn expected_utility(&self, utility: &UtilityTable) -> Result<f64, MdpError> {
        self.outcomes.iter().try_fold(0.0_f64, |acc, outcome| {
            let value = utility
                .get(outcome.next)
                .ok_or(MdpError::UnknownState {
                    key: outcome.next.index(),
                })?;
            Ok(acc + outcome.prob * value)
        })
    }
}

impl FromIterator<(StateKey, f64)> for OutcomeDistribution {
    fn from_iter<T: IntoIterator<Item = (StateKey, f64)>>(iter: T) -> Self {
        let mut distribution = OutcomeDistribution::new();
        for (next, prob) in iter {
            distribution.insert(next, prob);
        }
        distribution
    }
}

impl<const N: usize> From<[(StateKey, f64); N]> for OutcomeDistribution {
    fn from(value: [(StateKey, f64); N]) -> Self {
        value.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a OutcomeDistribution {
    type Item = &'a Outcome;
    type IntoIter = Iter<'a, Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}
