use serde::Serialize;

use crate::mdp::{ids::Label, solver::Solver};

const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct SolutionSnapshot<I, A> {
    pub schema_version: u32,
    pub gamma: f64,
    pub state_count: usize,
    pub policy_computed: bool,
    pub states: Vec<StateSnapshot<I, A>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot<I, A> {
    pub state_key: usize,
    pub id: I,
    pub reward: f64,
    pub utility: f64,
    pub actions: Vec<A>,
    pub preferred_action: Option<A>,
}

impl<I: Serialize, A: Serialize> SolutionSnapshot<I, A> {
    /// Render the snapshot as pretty printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<I: Label, A: Label> Solver<I, A> {
    /// Copy out the current rewards, utilities and preferred actions.
    pub fn snapshot(&self) -> SolutionSnapshot<I, A> {
        let states = self
            .states()
            .iter()
            .zip(self.utility().iter())
            .map(|(state, (key, utility))| StateSnapshot {
                state_key: key.index(),
                id: state.id().clone(),
                reward: state.reward(),
                utility,
                actions: state.actions().cloned().collect(),
                preferred_action: state.preferred_action().ok().cloned(),
            })
            .collect::<Vec<_>>();

        SolutionSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            gamma: self.gamma(),
            state_count: states.len(),
            policy_computed: self.policy().is_ok(),
            states,
        }
    }
}
