//! Game flow and player key state machines.

use std::fmt::Debug;

use log::{debug, info};

use valsrevenge_core::enums::{GameFlowState, PlayerKeyState};

use crate::error::SimError;

/// A state that knows which states may follow it.
pub trait FlowState: Copy + Eq + Debug {
    fn is_valid_next(self, next: Self) -> bool;
}

impl FlowState for GameFlowState {
    fn is_valid_next(self, next: Self) -> bool {
        matches!(
            (self, next),
            (GameFlowState::Paused, GameFlowState::Playing)
                | (GameFlowState::Playing, GameFlowState::Paused)
        )
    }
}

impl FlowState for PlayerKeyState {
    fn is_valid_next(self, _next: Self) -> bool {
        true
    }
}

/// Single-active-state machine. Refused transitions leave it unchanged.
#[derive(Debug, Clone, Copy)]
pub struct StateMachine<S: FlowState> {
    current: S,
}

impl<S: FlowState> StateMachine<S> {
    pub fn new(initial: S) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> S {
        self.current
    }

    /// Enter `next`, returning the state that was left.
    pub fn enter(&mut self, next: S) -> Result<S, SimError> {
        if !self.current.is_valid_next(next) {
            return Err(SimError::InvalidTransition {
                from: format!("{:?}", self.current),
                to: format!("{next:?}"),
            });
        }
        let previous = self.current;
        self.current = next;
        Ok(previous)
    }
}

/// Pause/playing gate for spawning and pathfinding. Starts paused.
#[derive(Debug, Clone, Copy)]
pub struct GameFlow {
    machine: StateMachine<GameFlowState>,
}

impl Default for GameFlow {
    fn default() -> Self {
        Self {
            machine: StateMachine::new(GameFlowState::Paused),
        }
    }
}

impl GameFlow {
    pub fn state(&self) -> GameFlowState {
        self.machine.current()
    }

    pub fn is_playing(&self) -> bool {
        self.state() == GameFlowState::Playing
    }

    pub fn enter(&mut self, next: GameFlowState) -> Result<(), SimError> {
        match self.machine.enter(next) {
            Ok(previous) => {
                info!("game flow {previous:?} -> {next:?}");
                Ok(())
            }
            Err(err) => {
                debug!("game flow refused: {err}");
                Err(err)
            }
        }
    }
}

/// Key count plus the key state derived from it. The state is never set
/// directly; every count mutation re-derives it.
#[derive(Debug, Clone, Copy)]
pub struct KeyTracker {
    keys: u32,
    machine: StateMachine<PlayerKeyState>,
}

impl KeyTracker {
    pub fn new(keys: u32) -> Self {
        Self {
            keys,
            machine: StateMachine::new(PlayerKeyState::from_count(keys)),
        }
    }

    pub fn keys(&self) -> u32 {
        self.keys
    }

    pub fn state(&self) -> PlayerKeyState {
        self.machine.current()
    }

    /// Add picked-up keys. Returns the new state if it changed.
    pub fn add(&mut self, count: u32) -> Option<PlayerKeyState> {
        self.keys = self.keys.saturating_add(count);
        self.sync()
    }

    /// Spend one key if any is held. Returns whether a key was spent and
    /// the new state if it changed.
    pub fn spend(&mut self) -> (bool, Option<PlayerKeyState>) {
        if self.keys == 0 {
            return (false, None);
        }
        self.keys -= 1;
        (true, self.sync())
    }

    pub fn set(&mut self, keys: u32) -> Option<PlayerKeyState> {
        self.keys = keys;
        self.sync()
    }

    fn sync(&mut self) -> Option<PlayerKeyState> {
        let derived = PlayerKeyState::from_count(self.keys);
        if derived == self.machine.current() {
            return None;
        }
        // Key states accept any successor, so this cannot be refused.
        self.machine.enter(derived).ok().map(|_| derived)
    }
}
