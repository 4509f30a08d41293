use std::{
    collections::HashMap,
    slice::{Iter, IterMut},
};

use crate::mdp::{
    error::MdpError,
    ids::{Label, StateKey, describe},
    state::State,
};

/// Holds every state of an MDP and hands out dense keys.
/// Outcome tables refer to successors by key, so cyclic wiring
/// (self-loops, states reaching each other) needs no shared ownership.
#[derive(Debug, Clone)]
pub struct StateArena<I, A> {
    storage: Vec<State<I, A>>,
    id_to_key: HashMap<I, StateKey>,
}

impl<I, A> Default for StateArena<I, A> {
    fn default() -> Self {
        StateArena {
            storage: Vec::new(),
            id_to_key: HashMap::new(),
        }
    }
}

impl<I: Label, A: Label> StateArena<I, A> {
    /// Create a new empty storage
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        StateArena {
            storage: Vec::with_capacity(capacity),
            id_to_key: HashMap::with_capacity(capacity),
        }
    }

    /// Allocate a new state and return its key.
    /// Two states with equal ids are the same state, so duplicates are rejected.
    pub fn insert(&mut self, id: I, reward: f64) -> Result<StateKey, MdpError> {
        if self.id_to_key.contains_key(&id) {
            return Err(MdpError::DuplicateStateId { id: describe(&id) });
        }

        let key = StateKey::from(self.storage.len());
        self.id_to_key.insert(id.clone(), key);
        self.storage.push(State::new(id, reward));
        Ok(key)
    }

    pub fn get(&self, key: StateKey) -> Option<&State<I, A>> {
        self.storage.get(key.index())
    }

    pub fn get_mut(&mut self, key: StateKey) -> Option<&mut State<I, A>> {
        self.storage.get_mut(key.index())
    }

    /// Same as `get` but reports a missing key as an error.
    pub fn state(&self, key: StateKey) -> Result<&State<I, A>, MdpError> {
        self.get(key)
            .ok_or(MdpError::UnknownState { key: key.index() })
    }

    /// Same as `get_mut` but reports a missing key as an error.
    pub fn state_mut(&mut self, key: StateKey) -> Result<&mut State<I, A>, MdpError> {
        self.get_mut(key)
            .ok_or(MdpError::UnknownState { key: key.index() })
    }

    /// Look up the key of a state by its id
    pub fn key_of(&self, id: &I) -> Option<StateKey> {
        self.id_to_key.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = StateKey> {
        (0..self.storage.len()).map(StateKey::from)
    }

    pub fn iter(&self) -> Iter<'_, State<I, A>> {
        self.storage.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, State<I, A>> {
        self.storage.iter_mut()
    }

    pub(crate) fn as_slice(&self) -> &[State<I, A>] {
        &self.storage
    }
}

impl<'a, I, A> IntoIterator for &'a StateArena<I, A> {
    type Item = &'a State<I, A>;
    type IntoIter = Iter<'a, State<I, A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.storage.iter()
    }
}
