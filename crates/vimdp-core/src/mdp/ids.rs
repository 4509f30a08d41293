use std::{fmt::Debug, hash::Hash};

/// A wrapper for an integer index used to address states in the arena
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(usize);

impl StateKey {
    /// Get the position of the state without exposing the internal value
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for StateKey {
    /// Allow for explicit conversion from usize to StateKey
    fn from(value: usize) -> Self {
        StateKey(value)
    }
}

/// Bounds shared by state identifiers and action identifiers.
/// Identifiers only need to be comparable, hashable and printable for error messages.
pub trait Label: Clone + Eq + Hash + Debug + Send + Sync {}

impl<T> Label for T where T: Clone + Eq + Hash + Debug + Send + Sync {}

/// Render an identifier for error messages.
pub(crate) fn describe<T: Debug>(value: &T) -> String {
    format!("{value:?}")
}
