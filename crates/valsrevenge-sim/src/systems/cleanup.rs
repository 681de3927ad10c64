//! Cleanup system: removes projectiles whose flight has ended.

use valsrevenge_core::components::Projectile;
use valsrevenge_core::events::GameEvent;
use valsrevenge_core::types::EntityId;

use crate::registry::{id_of, EntityRegistry};

/// Count down projectile flight times and remove the expired ones through
/// the registry, so destroy subscribers see them. Uses a caller-owned
/// buffer to avoid per-tick allocation.
pub fn run(
    registry: &mut EntityRegistry,
    dt: f32,
    despawn_buffer: &mut Vec<EntityId>,
    events: &mut Vec<GameEvent>,
) {
    despawn_buffer.clear();

    for (entity, projectile) in registry.world_mut().query_mut::<&mut Projectile>() {
        projectile.remaining_secs -= dt;
        if projectile.remaining_secs <= 0.0 {
            despawn_buffer.push(id_of(entity));
        }
    }

    for id in despawn_buffer.drain(..) {
        if registry.destroy_entity(id).is_some() {
            events.push(GameEvent::Removed { entity: id });
        }
    }
}
