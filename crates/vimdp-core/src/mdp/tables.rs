use crate::mdp::ids::StateKey;

#[derive(Debug, Clone, PartialEq)]
/// Value function estimate, one entry per state key.
pub struct UtilityTable {
    values: Vec<f64>,
}

impl UtilityTable {
    /// Table with every state at utility 0.
    pub fn zeros(len: usize) -> Self {
        UtilityTable {
            values: vec![0.0; len],
        }
    }

    pub fn get(&self, key: StateKey) -> Option<f64> {
        self.values.get(key.index()).copied()
    }

    /// Overwrite the utility of one state. Returns `None` for an unknown key.
    pub fn set(&mut self, key: StateKey, value: f64) -> Option<f64> {
        self.values
            .get_mut(key.index())
            .map(|slot| std::mem::replace(slot, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateKey, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(idx, value)| (StateKey::from(idx), *value))
    }

    /// Largest per-state absolute difference between two tables of the same shape.
    /// NaN if any difference is NaN.
    pub fn max_abs_diff(&self, other: &UtilityTable) -> f64 {
        self.values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, |max, diff| if diff.is_nan() || diff > max { diff } else { max })
    }
}

impl From<Vec<f64>> for UtilityTable {
    fn from(values: Vec<f64>) -> Self {
        UtilityTable { values }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Greedy action per state key, produced by policy extraction.
pub struct Policy<A> {
    actions: Vec<A>,
}

impl<A> Policy<A> {
    pub fn get(&self, key: StateKey) -> Option<&A> {
        self.actions.get(key.index())
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateKey, &A)> + '_ {
        self.actions
            .iter()
            .enumerate()
            .map(|(idx, action)| (StateKey::from(idx), action))
    }
}

impl<A> From<Vec<A>> for Policy<A> {
    fn from(actions: Vec<A>) -> Self {
        Policy { actions }
    }
}
