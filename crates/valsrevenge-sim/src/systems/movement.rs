//! Player input and kinematic integration.
//!
//! Integration is the fallback for hosts without a physics engine: bodies
//! move by `velocity * dt`, and a body whose collision mask includes a
//! static blocker's category is not allowed to end the step inside it.

use glam::Vec2;
use hecs::World;

use valsrevenge_core::categories::{category_bit, collision_mask};
use valsrevenge_core::components::{Bounds, Health, Physics, Player};
use valsrevenge_core::constants::{PLAYER_RUN_SPEED, SLIDE_BISECTIONS};
use valsrevenge_core::enums::{HealthPhase, PhysicsCategory};
use valsrevenge_core::types::{Position, Velocity};

use crate::systems::contacts::Body;

/// Drive the player's velocity from the held direction. A dying player
/// stands still.
pub fn apply_player_input(world: &mut World) {
    for (_entity, (player, vel, health)) in
        world.query_mut::<(&Player, &mut Velocity, Option<&Health>)>()
    {
        let alive = health.map_or(true, |h| h.phase == HealthPhase::Alive);
        vel.0 = if alive {
            player.moving.axis() * PLAYER_RUN_SPEED
        } else {
            Vec2::ZERO
        };
    }
}

/// Integrate every moving body over `dt`.
pub fn run(world: &mut World, dt: f32) {
    // Blocking categories (walls, doors) are static, so one snapshot per
    // step is enough.
    let blocking = PhysicsCategory::ALL
        .into_iter()
        .fold(0, |acc, c| acc | collision_mask(c));
    let blockers: Vec<(hecs::Entity, u32, Body)> = world
        .query::<(&Physics, &Position, &Bounds)>()
        .iter()
        .filter(|(_, (physics, _, _))| category_bit(physics.category) & blocking != 0)
        .map(|(entity, (physics, pos, bounds))| {
            (
                entity,
                category_bit(physics.category),
                Body::new(pos.0, physics.shape, bounds.0),
            )
        })
        .collect();

    for (entity, (pos, vel, physics, bounds)) in world.query_mut::<(
        &mut Position,
        &Velocity,
        Option<&Physics>,
        Option<&Bounds>,
    )>() {
        if vel.0 == Vec2::ZERO {
            continue;
        }
        let step = vel.0 * dt;
        let (Some(physics), Some(bounds)) = (physics, bounds) else {
            pos.0 += step;
            continue;
        };
        let mask = collision_mask(physics.category);
        if mask == 0 {
            pos.0 += step;
            continue;
        }

        let blocked = |center: Vec2| {
            let body = Body::new(center, physics.shape, bounds.0);
            blockers
                .iter()
                .any(|(other, bit, blocker)| *other != entity && mask & bit != 0 && body.overlaps(blocker))
        };

        // Bodies that start inside a blocker are let out freely.
        if blocked(pos.0) {
            pos.0 += step;
            continue;
        }
        // Resolve each axis on its own so bodies slide along blockers and
        // come to rest flush against them.
        for axis_step in [Vec2::new(step.x, 0.0), Vec2::new(0.0, step.y)] {
            if axis_step != Vec2::ZERO {
                let fraction = free_fraction(&blocked, pos.0, axis_step);
                pos.0 += axis_step * fraction;
            }
        }
    }
}

/// Largest fraction of `step` that can be taken from `from` without
/// ending inside a blocker.
fn free_fraction(blocked: impl Fn(Vec2) -> bool, from: Vec2, step: Vec2) -> f32 {
    if !blocked(from + step) {
        return 1.0;
    }
    let (mut lo, mut hi) = (0.0, 1.0);
    for _ in 0..SLIDE_BISECTIONS {
        let mid = (lo + hi) / 2.0;
        if blocked(from + step * mid) {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    lo
}
