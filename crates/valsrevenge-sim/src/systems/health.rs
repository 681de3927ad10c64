//! Hit points and the hit/death transitions.
//!
//! Alive -> Dying -> Removed. Dying is terminal: further deltas are
//! ignored. When the death effect finishes, a non-player is removed and the
//! player is restored to full health instead.

use log::debug;

use valsrevenge_core::components::{Health, Player};
use valsrevenge_core::constants::DEATH_EFFECT_SECS;
use valsrevenge_core::enums::HealthPhase;
use valsrevenge_core::events::GameEvent;
use valsrevenge_core::objects;
use valsrevenge_core::types::EntityId;

use crate::error::SimError;
use crate::registry::EntityRegistry;
use crate::timers::{TimerAction, TimerKey, TimerQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthOutcome {
    /// Nothing changed (no health, not alive, or a zero delta).
    Unchanged,
    Hit,
    Healed,
    Died,
}

/// Shared state a health change writes to.
pub struct HealthContext<'a> {
    pub registry: &'a mut EntityRegistry,
    pub timers: &'a mut TimerQueue,
    pub events: &'a mut Vec<GameEvent>,
    pub now: f64,
}

/// Apply `delta` hit points, clamped to `[0, max]`.
pub fn apply_delta(
    ctx: &mut HealthContext<'_>,
    id: EntityId,
    delta: i32,
) -> Result<HealthOutcome, SimError> {
    if !ctx.registry.contains(id) {
        return Err(SimError::UnknownEntity(id));
    }
    let is_player = ctx.registry.get::<Player>(id).is_some();
    let Some(mut health) = ctx.registry.get_mut::<Health>(id) else {
        return Ok(HealthOutcome::Unchanged);
    };
    if health.phase != HealthPhase::Alive || delta == 0 {
        return Ok(HealthOutcome::Unchanged);
    }

    let before = health.current;
    health.current = (health.current + delta).clamp(0, health.max);
    let current = health.current;

    let sounds = objects::health_sounds(is_player);
    let outcome = if delta < 0 && current == 0 {
        health.phase = HealthPhase::Dying;
        drop(health);
        ctx.events.push(GameEvent::Sound {
            name: sounds.die.to_string(),
        });
        ctx.events.push(GameEvent::Died { entity: id });
        let action = if is_player {
            TimerAction::ResetHealth(id)
        } else {
            TimerAction::Remove(id)
        };
        ctx.timers
            .schedule(TimerKey::DeathEffect(id), ctx.now + DEATH_EFFECT_SECS, action);
        HealthOutcome::Died
    } else if delta < 0 {
        drop(health);
        ctx.events.push(GameEvent::Sound {
            name: sounds.hit.to_string(),
        });
        ctx.events.push(GameEvent::Hit {
            entity: id,
            remaining: current,
        });
        HealthOutcome::Hit
    } else if current != before {
        drop(health);
        ctx.events.push(GameEvent::Healed {
            entity: id,
            health: current,
        });
        HealthOutcome::Healed
    } else {
        HealthOutcome::Unchanged
    };
    debug!("health {id}: {before} -> {current} ({outcome:?})");
    Ok(outcome)
}

/// Finish a death effect by restoring full health (player respawn).
pub fn reset_to_max(registry: &mut EntityRegistry, id: EntityId, events: &mut Vec<GameEvent>) {
    let Some(mut health) = registry.get_mut::<Health>(id) else {
        debug!("reset_to_max: {}", SimError::UnknownEntity(id));
        return;
    };
    health.current = health.max;
    health.phase = HealthPhase::Alive;
    let restored = health.current;
    drop(health);
    events.push(GameEvent::Respawned {
        entity: id,
        health: restored,
    });
}

/// Mark an entity as removed ahead of its destruction.
pub fn mark_removed(registry: &mut EntityRegistry, id: EntityId) {
    if let Some(mut health) = registry.get_mut::<Health>(id) {
        health.phase = HealthPhase::Removed;
    }
}
