//! Turn context - Everything one handler invocation can see and produce

use std::collections::HashMap;

use crate::application::state::{CachedState, StateScope};
use crate::domain::entities::{Activity, OutboundActivity};

/// Per-turn context passed through every handler
///
/// Holds the inbound activity, the outbound activities queued so far and
/// the state transaction for each scope loaded during the turn.
#[derive(Debug)]
pub struct TurnContext {
    activity: Activity,
    outbound: Vec<OutboundActivity>,
    state: HashMap<StateScope, CachedState>,
    saved_scopes: Vec<StateScope>,
}

impl TurnContext {
    pub fn new(activity: Activity) -> Self {
        Self {
            activity,
            outbound: Vec::new(),
            state: HashMap::new(),
            saved_scopes: Vec::new(),
        }
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    /// Queue an activity for the transport
    pub fn send(&mut self, activity: OutboundActivity) {
        self.outbound.push(activity);
    }

    pub fn outbound(&self) -> &[OutboundActivity] {
        &self.outbound
    }

    pub fn into_outbound(self) -> Vec<OutboundActivity> {
        self.outbound
    }

    /// Scopes whose `save_changes` ran this turn, in call order
    pub fn saved_scopes(&self) -> &[StateScope] {
        &self.saved_scopes
    }

    pub(crate) fn cached_state(&self, scope: StateScope) -> Option<&CachedState> {
        self.state.get(&scope)
    }

    pub(crate) fn cached_state_mut(&mut self, scope: StateScope) -> Option<&mut CachedState> {
        self.state.get_mut(&scope)
    }

    pub(crate) fn insert_cached_state(&mut self, scope: StateScope, cached: CachedState) {
        self.state.insert(scope, cached);
    }

    pub(crate) fn record_save(&mut self, scope: StateScope) {
        self.saved_scopes.push(scope);
    }
}
