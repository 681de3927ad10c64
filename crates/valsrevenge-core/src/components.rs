//! ECS components for registry entities.
//!
//! Components are plain data. Game logic lives in systems, not components.
//! Components never point at other entities directly; where a reference is
//! needed (intercept targets) they store an `EntityId` that systems resolve
//! through the registry each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

/// Visual handle for the host renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Render {
    /// Sprite/texture name, e.g. `skeleton_0`.
    pub sprite: String,
    pub scale: f32,
}

/// Sprite footprint in scene points. Physics shapes and obstacle radii are
/// derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds(pub Vec2);

/// Physics body configuration. Masks are derived from `category`, see
/// [`crate::categories`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Physics {
    pub category: PhysicsCategory,
    pub shape: PhysicsShape,
}

/// Hit points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
    pub phase: HealthPhase,
}

/// A circular obstacle captured for avoidance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center: Vec2,
    pub radius: f32,
}

/// A polyline through patrol graph nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatrolPath {
    pub nodes: Vec<Vec2>,
    /// Tolerance band around the centerline. Zero means the agent is always
    /// steered back toward the exact centerline.
    pub radius: f32,
    /// Closed loop: the last node connects back to the first.
    pub cyclical: bool,
}

/// One steering goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SteeringGoal {
    Wander,
    InterceptTarget {
        target: EntityId,
        max_prediction_time: f32,
    },
    FollowPath {
        path: PatrolPath,
        max_prediction_time: f32,
        forward: bool,
    },
    AvoidObstacles {
        /// Snapshot taken once when the behavior is built.
        obstacles: Vec<Obstacle>,
        max_prediction_time: f32,
    },
}

/// A goal with its blending weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedGoal {
    pub goal: SteeringGoal,
    pub weight: f32,
}

/// Weighted goal set attached to one agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    pub goals: Vec<WeightedGoal>,
}

impl Behavior {
    pub fn new(goals: Vec<(SteeringGoal, f32)>) -> Self {
        Self {
            goals: goals
                .into_iter()
                .map(|(goal, weight)| WeightedGoal { goal, weight })
                .collect(),
        }
    }

    /// Set the weight of the goal at `index`. Returns false if out of range.
    pub fn set_weight(&mut self, index: usize, weight: f32) -> bool {
        match self.goals.get_mut(index) {
            Some(entry) => {
                entry.weight = weight;
                true
            }
            None => false,
        }
    }

    pub fn weight(&self, index: usize) -> Option<f32> {
        self.goals.get(index).map(|g| g.weight)
    }
}

/// Steering-controlled motion proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub behavior: Behavior,
    pub mass: f32,
    pub max_speed: f32,
    pub max_acceleration: f32,
    pub radius: f32,
    /// Wander jitter state (radians).
    pub wander_angle: f32,
}

/// Pick-up item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub kind: CollectibleKind,
    pub value: i32,
}

/// Spawn configuration for a generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnJob {
    pub monster: MonsterKind,
    /// 0 = unbounded.
    pub max_count: u32,
    pub interval_secs: f32,
    pub spawned_health: i32,
}

/// Monster generator with its countdown state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    pub job: SpawnJob,
    pub state: SchedulerState,
    /// Seconds left before the next spawn. Persists across pauses.
    pub remaining_secs: f32,
    pub spawned: u32,
}

/// Patrol-path follower that runs only while the game is playing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pathfinding {
    pub running: bool,
}

/// Marks the player entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Movement direction currently held on the joystick.
    pub moving: Direction,
    /// Last non-stop direction; attacks are thrown this way.
    pub facing: Direction,
}

/// Marks a spawned monster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub kind: MonsterKind,
}

/// Thrown projectile with remaining flight time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub remaining_secs: f32,
}

/// Marks a locked door.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Door;

/// Marks the level exit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Exit;

/// Human-readable node name from the level file, used for lookups such as
/// finding the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);
