//! Events emitted by the simulation for the host's audio, animation and UI.
//!
//! Events are fire-and-forget: the simulation never waits on the host to
//! consume them.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Play a one-shot sound.
    Sound { name: String },
    /// Game flow changed.
    FlowChanged { state: GameFlowState },
    /// Player key state changed.
    KeyStateChanged { state: PlayerKeyState, keys: u32 },
    /// A generator produced a monster.
    MonsterSpawned {
        generator: EntityId,
        monster: EntityId,
        kind: MonsterKind,
    },
    /// Non-lethal damage.
    Hit { entity: EntityId, remaining: i32 },
    /// Health reached zero; death effect started.
    Died { entity: EntityId },
    /// Player health restored after the death effect.
    Respawned { entity: EntityId, health: i32 },
    /// Health restored by a pick-up.
    Healed { entity: EntityId, health: i32 },
    /// Entity left the registry.
    Removed { entity: EntityId },
    /// Player picked up an item.
    Collected {
        entity: EntityId,
        kind: CollectibleKind,
        value: i32,
    },
    /// A projectile destroyed an item.
    CollectibleDestroyed { entity: EntityId },
    /// A key was spent on a door.
    DoorOpened { door: EntityId },
    /// Player touched a door without a key.
    DoorLocked { door: EntityId, message: String },
    /// Player threw a projectile.
    Attack { projectile: EntityId, direction: Direction },
    /// Player reached the exit; `next_level` is the level to load next.
    LevelComplete { next_level: u32 },
}
