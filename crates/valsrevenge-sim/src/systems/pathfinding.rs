//! Patrol pathfinding: starts with Playing, stops with Paused.
//!
//! Starting snapshots the generator obstacles once and gives each
//! pathfinder a fresh patrol agent. Stopping halts it in place.

use glam::Vec2;
use hecs::World;
use log::{debug, warn};

use valsrevenge_core::components::{Bounds, Generator, Obstacle, Pathfinding};
use valsrevenge_core::constants::PATROL_INITIAL_SPEED;
use valsrevenge_core::types::{Position, Velocity};
use valsrevenge_steering::behavior;

/// Current generator footprints as circular obstacles.
pub fn obstacle_snapshot(world: &World) -> Vec<Obstacle> {
    world
        .query::<(&Generator, &Position, &Bounds)>()
        .iter()
        .map(|(_entity, (_generator, pos, bounds))| behavior::obstacle_for(pos.0, bounds.0))
        .collect()
}

/// Start every stopped pathfinder. Returns how many started.
pub fn start(world: &mut World, patrol_nodes: &[Vec2]) -> usize {
    let mut stopped = Vec::new();
    for (entity, pathfinding) in world.query_mut::<&mut Pathfinding>() {
        if !pathfinding.running {
            pathfinding.running = true;
            stopped.push(entity);
        }
    }
    if stopped.is_empty() {
        return 0;
    }
    if patrol_nodes.is_empty() {
        warn!("pathfinding started without patrol nodes; patrollers will hold position");
    }

    let obstacles = obstacle_snapshot(world);
    debug!(
        "starting {} pathfinder(s) with {} obstacle(s)",
        stopped.len(),
        obstacles.len()
    );
    for &entity in &stopped {
        let agent = behavior::patrol_agent(behavior::patrol_behavior(
            behavior::patrol_path(patrol_nodes.to_vec()),
            obstacles.clone(),
        ));
        let _ = world.insert(entity, (agent, Velocity(Vec2::X * PATROL_INITIAL_SPEED)));
    }
    stopped.len()
}

/// Stop every running pathfinder and hold it still.
pub fn stop(world: &mut World) {
    for (_entity, (pathfinding, vel)) in world.query_mut::<(&mut Pathfinding, &mut Velocity)>() {
        pathfinding.running = false;
        vel.0 = Vec2::ZERO;
    }
}
