//! Inputs sent from the host to the simulation.
//!
//! Commands are queued and applied at the next tick boundary.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// Host-assigned identity of one finger on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TouchId(pub u64);

/// Raw touch input, positions in scene space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase")]
pub enum TouchEvent {
    Down { touch: TouchId, position: Vec2 },
    Moved { touch: TouchId, position: Vec2 },
    Up { touch: TouchId, position: Vec2 },
}

impl TouchEvent {
    pub fn touch(&self) -> TouchId {
        match *self {
            TouchEvent::Down { touch, .. }
            | TouchEvent::Moved { touch, .. }
            | TouchEvent::Up { touch, .. } => touch,
        }
    }

    pub fn position(&self) -> Vec2 {
        match *self {
            TouchEvent::Down { position, .. }
            | TouchEvent::Moved { position, .. }
            | TouchEvent::Up { position, .. } => position,
        }
    }
}

/// All queued commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    Touch(TouchEvent),
    /// Change one goal weight of an agent's behavior.
    SetGoalWeight {
        entity: EntityId,
        goal_index: usize,
        weight: f32,
    },
    Pause,
    Resume,
    /// Explicit removal request.
    Despawn { entity: EntityId },
}
