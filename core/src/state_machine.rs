//! Finite state machine driver bound to a single owner type.
//!
//! The machine stores only the active key and a map from key to behaviour.
//! The owner is passed into every call instead of being captured, which keeps
//! ownership acyclic: the owner may hold its machine in a sibling field and
//! lend itself mutably while the machine runs.

use std::{collections::BTreeMap, fmt, time::Duration};

use crate::StateMachineError;

/// Closed set of keys identifying the states of a machine.
pub trait StateKey: Copy + Ord + fmt::Debug + 'static {
    /// Every key a complete machine must register.
    const ALL: &'static [Self];
}

/// Behaviour associated with a single state key.
///
/// `C` is the per-tick context lent to [`State::on_update`] alongside the
/// owner.
pub trait State<K, O, C> {
    /// Runs when the machine switches to this state.
    fn on_enter(&mut self, _owner: &mut O) {}

    /// Advances the state and optionally requests a transition.
    fn on_update(&mut self, owner: &mut O, context: &mut C, dt: Duration) -> Option<K>;

    /// Runs when the machine switches away from this state.
    fn on_exit(&mut self, _owner: &mut O) {}
}

/// Boxed state behaviour stored by the machine.
pub type BoxedState<K, O, C> = Box<dyn State<K, O, C>>;

/// Transition performed by the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition<K> {
    /// State that was active before the transition.
    pub from: K,
    /// State that became active.
    pub to: K,
}

/// Assembles a state set before it is bound to an owner.
pub struct StateMachineBuilder<K, O, C> {
    states: BTreeMap<K, BoxedState<K, O, C>>,
}

impl<K: StateKey, O, C> StateMachineBuilder<K, O, C> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: BTreeMap::new(),
        }
    }

    /// Registers `state` under `key`, replacing any previous registration.
    #[must_use]
    pub fn add(mut self, key: K, state: BoxedState<K, O, C>) -> Self {
        let _ = self.states.insert(key, state);
        self
    }

    /// Verifies that every key in [`StateKey::ALL`] is registered.
    pub fn validate(&self) -> Result<(), StateMachineError> {
        match K::ALL.iter().find(|key| !self.states.contains_key(key)) {
            Some(missing) => Err(StateMachineError::MissingState {
                key: format!("{missing:?}"),
            }),
            None => Ok(()),
        }
    }

    /// Binds the machine to `owner` and enters `initial`.
    ///
    /// Fails when any key of the closed set has no registered behaviour, so
    /// later transitions can never reach an unregistered state.
    pub fn build(
        self,
        owner: &mut O,
        initial: K,
    ) -> Result<StateMachine<K, O, C>, StateMachineError> {
        self.validate()?;
        let mut machine = StateMachine {
            active: initial,
            states: self.states,
        };
        if let Some(state) = machine.states.get_mut(&initial) {
            state.on_enter(owner);
        }
        Ok(machine)
    }
}

impl<K: StateKey, O, C> Default for StateMachineBuilder<K, O, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// State machine with exactly one active state.
pub struct StateMachine<K, O, C> {
    active: K,
    states: BTreeMap<K, BoxedState<K, O, C>>,
}

impl<K: StateKey, O, C> StateMachine<K, O, C> {
    /// Key of the active state.
    #[must_use]
    pub fn state(&self) -> K {
        self.active
    }

    /// Switches to `key`, running exit and enter hooks.
    ///
    /// Requesting the already active state is ignored and returns `None`.
    pub fn set_state(&mut self, owner: &mut O, key: K) -> Option<Transition<K>> {
        if key == self.active || !self.states.contains_key(&key) {
            return None;
        }

        let from = self.active;
        if let Some(outgoing) = self.states.get_mut(&from) {
            outgoing.on_exit(owner);
        }
        self.active = key;
        if let Some(incoming) = self.states.get_mut(&key) {
            incoming.on_enter(owner);
        }
        Some(Transition { from, to: key })
    }

    /// Delegates to the active state and applies any requested transition.
    pub fn update(
        &mut self,
        owner: &mut O,
        context: &mut C,
        dt: Duration,
    ) -> Option<Transition<K>> {
        let requested = self
            .states
            .get_mut(&self.active)
            .and_then(|state| state.on_update(owner, context, dt))?;
        self.set_state(owner, requested)
    }
}

impl<K: fmt::Debug, O, C> fmt::Debug for StateMachine<K, O, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("active", &self.active)
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .finish()
    }
}
