//! Behavior builders and goal-weight selection.

use glam::Vec2;
use valsrevenge_core::components::{Agent, Behavior, Obstacle, PatrolPath, SteeringGoal};
use valsrevenge_core::constants::*;
use valsrevenge_core::enums::PlayerKeyState;
use valsrevenge_core::types::EntityId;

/// Goal slots of a monster behavior.
pub const MONSTER_WANDER_GOAL: usize = 0;
pub const MONSTER_INTERCEPT_GOAL: usize = 1;

/// Goal slots of a patrol behavior.
pub const PATROL_FOLLOW_GOAL: usize = 0;
pub const PATROL_AVOID_GOAL: usize = 1;

/// Weights a monster's goals should carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonsterWeights {
    pub wander: f32,
    pub intercept: f32,
}

/// Monsters hunt the player only while the player holds a key.
pub fn monster_weights(key_state: PlayerKeyState) -> MonsterWeights {
    match key_state {
        PlayerKeyState::HasKey => MonsterWeights {
            wander: WANDER_WEIGHT,
            intercept: INTERCEPT_WEIGHT_ACTIVE,
        },
        PlayerKeyState::NoKey => MonsterWeights {
            wander: WANDER_WEIGHT,
            intercept: INTERCEPT_WEIGHT_IDLE,
        },
    }
}

/// Wander plus intercept-the-player, weighted for the current key state.
/// Without a player to chase, the second slot is a second wander goal so the
/// weight layout stays the same.
pub fn monster_behavior(player: Option<EntityId>, key_state: PlayerKeyState) -> Behavior {
    let weights = monster_weights(key_state);
    let chase = match player {
        Some(target) => SteeringGoal::InterceptTarget {
            target,
            max_prediction_time: INTERCEPT_PREDICTION_SECS,
        },
        None => SteeringGoal::Wander,
    };
    Behavior::new(vec![
        (SteeringGoal::Wander, weights.wander),
        (chase, weights.intercept),
    ])
}

pub fn monster_agent(behavior: Behavior) -> Agent {
    Agent {
        behavior,
        mass: MONSTER_MASS,
        max_speed: MONSTER_MAX_SPEED,
        max_acceleration: MONSTER_MAX_ACCELERATION,
        radius: MONSTER_RADIUS,
        wander_angle: 0.0,
    }
}

/// Closed-loop patrol path through the given nodes.
pub fn patrol_path(nodes: Vec<Vec2>) -> PatrolPath {
    PatrolPath {
        nodes,
        radius: PATROL_PATH_RADIUS,
        cyclical: true,
    }
}

/// Follow the patrol path while steering clear of the obstacle snapshot.
pub fn patrol_behavior(path: PatrolPath, obstacles: Vec<Obstacle>) -> Behavior {
    Behavior::new(vec![
        (
            SteeringGoal::FollowPath {
                path,
                max_prediction_time: PATROL_PREDICTION_SECS,
                forward: true,
            },
            FOLLOW_PATH_WEIGHT,
        ),
        (
            SteeringGoal::AvoidObstacles {
                obstacles,
                max_prediction_time: PATROL_PREDICTION_SECS,
            },
            AVOID_OBSTACLES_WEIGHT,
        ),
    ])
}

pub fn patrol_agent(behavior: Behavior) -> Agent {
    Agent {
        behavior,
        mass: PATROL_MASS,
        max_speed: PATROL_MAX_SPEED,
        max_acceleration: PATROL_MAX_ACCELERATION,
        radius: PATROL_RADIUS,
        wander_angle: 0.0,
    }
}

/// Obstacle for a square-ish sprite: centred on it, radius half its width.
pub fn obstacle_for(center: Vec2, size: Vec2) -> Obstacle {
    Obstacle {
        center,
        radius: size.x / 2.0,
    }
}
