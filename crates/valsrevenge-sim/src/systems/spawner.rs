//! Generator countdowns and monster spawning.
//!
//! A running generator counts its wait down by the frame delta and spawns
//! one monster when it reaches zero, then restarts the full wait. Leftover
//! time is not carried into the next wait, so consecutive spawns are always
//! at least one interval apart. Idle generators keep their remaining wait.

use glam::Vec2;
use rand::Rng;

use valsrevenge_core::components::{Generator, SpawnJob};
use valsrevenge_core::enums::{PlayerKeyState, SchedulerState};
use valsrevenge_core::events::GameEvent;
use valsrevenge_core::types::{EntityId, Position};

use crate::registry::{id_of, EntityRegistry};
use crate::world_setup;

/// Switch every generator between Idle and Running.
pub fn set_running(registry: &mut EntityRegistry, running: bool) {
    let state = if running {
        SchedulerState::Running
    } else {
        SchedulerState::Idle
    };
    for (_entity, generator) in registry.world_mut().query_mut::<&mut Generator>() {
        generator.state = state;
    }
}

/// Whether the generator still has monsters left to spawn.
pub fn has_quota(generator: &Generator) -> bool {
    generator.job.max_count == 0 || generator.spawned < generator.job.max_count
}

/// Advance countdowns by `dt` and spawn the monsters that came due.
pub fn run<R: Rng>(
    registry: &mut EntityRegistry,
    rng: &mut R,
    dt: f32,
    player: Option<EntityId>,
    key_state: PlayerKeyState,
    events: &mut Vec<GameEvent>,
) {
    let mut due: Vec<(EntityId, Vec2, SpawnJob)> = Vec::new();

    for (entity, (generator, pos)) in registry
        .world_mut()
        .query_mut::<(&mut Generator, &Position)>()
    {
        if generator.state != SchedulerState::Running || !has_quota(generator) {
            continue;
        }
        generator.remaining_secs -= dt;
        if generator.remaining_secs <= 0.0 {
            generator.remaining_secs = generator.job.interval_secs;
            generator.spawned += 1;
            due.push((id_of(entity), pos.0, generator.job));
        }
    }

    for (generator, origin, job) in due {
        let monster = world_setup::spawn_monster(registry, rng, origin, &job, player, key_state);
        events.push(GameEvent::MonsterSpawned {
            generator,
            monster,
            kind: job.monster,
        });
    }
}
