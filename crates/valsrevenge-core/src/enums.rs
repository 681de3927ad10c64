//! Enumeration types used throughout the simulation.
//!
//! The string-keyed ones (`PhysicsCategory`, `PhysicsShape`, `MonsterKind`,
//! `CollectibleKind`) parse from the attribute names used in level files and
//! reject anything unknown.

use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Physics classification of a body. Exactly one per physics component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicsCategory {
    Player,
    Wall,
    Door,
    Monster,
    Projectile,
    Collectible,
    Exit,
}

impl PhysicsCategory {
    pub const ALL: [PhysicsCategory; 7] = [
        PhysicsCategory::Player,
        PhysicsCategory::Wall,
        PhysicsCategory::Door,
        PhysicsCategory::Monster,
        PhysicsCategory::Projectile,
        PhysicsCategory::Collectible,
        PhysicsCategory::Exit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhysicsCategory::Player => "player",
            PhysicsCategory::Wall => "wall",
            PhysicsCategory::Door => "door",
            PhysicsCategory::Monster => "monster",
            PhysicsCategory::Projectile => "projectile",
            PhysicsCategory::Collectible => "collectible",
            PhysicsCategory::Exit => "exit",
        }
    }
}

impl FromStr for PhysicsCategory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PhysicsCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownCategory(s.to_string()))
    }
}

/// Shape of a physics body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicsShape {
    /// Circle with diameter equal to the sprite height.
    #[default]
    Circle,
    /// Axis-aligned rectangle the size of the sprite.
    Rect,
}

impl FromStr for PhysicsShape {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "circle" => Ok(PhysicsShape::Circle),
            "rect" => Ok(PhysicsShape::Rect),
            other => Err(ConfigError::UnknownShape(other.to_string())),
        }
    }
}

/// Monster archetype spawned by generators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonsterKind {
    #[default]
    Skeleton,
    Goblin,
}

impl MonsterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonsterKind::Skeleton => "skeleton",
            MonsterKind::Goblin => "goblin",
        }
    }
}

impl FromStr for MonsterKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skeleton" => Ok(MonsterKind::Skeleton),
            "goblin" => Ok(MonsterKind::Goblin),
            other => Err(ConfigError::UnknownMonster(other.to_string())),
        }
    }
}

/// Collectible item type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectibleKind {
    #[default]
    Key,
    Food,
    Treasure,
}

impl FromStr for CollectibleKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "key" => Ok(CollectibleKind::Key),
            "food" => Ok(CollectibleKind::Food),
            "treasure" => Ok(CollectibleKind::Treasure),
            other => Err(ConfigError::UnknownCollectible(other.to_string())),
        }
    }
}

/// Nine-way movement direction produced by the movement joystick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Stop,
    Left,
    Right,
    Up,
    Down,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Direction {
    /// Unit-per-axis step for this direction. Diagonals are (±1, ±1), not
    /// normalized, so diagonal motion is faster than axis motion.
    pub fn axis(&self) -> Vec2 {
        match self {
            Direction::Stop => Vec2::ZERO,
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Up => Vec2::new(0.0, 1.0),
            Direction::Down => Vec2::new(0.0, -1.0),
            Direction::TopLeft => Vec2::new(-1.0, 1.0),
            Direction::TopRight => Vec2::new(1.0, 1.0),
            Direction::BottomLeft => Vec2::new(-1.0, -1.0),
            Direction::BottomRight => Vec2::new(1.0, -1.0),
        }
    }

    /// Quantize an offset into one of the eight compass directions, or
    /// `Stop` when the offset is inside the dead zone.
    pub fn from_offset(offset: Vec2, dead_zone: f32) -> Self {
        if offset.length() <= dead_zone {
            return Direction::Stop;
        }
        // Sector 0 is centred on +x, counting counter-clockwise in 45° steps.
        let angle = offset.y.atan2(offset.x);
        let sector = (angle / std::f32::consts::FRAC_PI_4).round() as i32;
        match sector.rem_euclid(8) {
            0 => Direction::Right,
            1 => Direction::TopRight,
            2 => Direction::Up,
            3 => Direction::TopLeft,
            4 => Direction::Left,
            5 => Direction::BottomLeft,
            6 => Direction::Down,
            _ => Direction::BottomRight,
        }
    }
}

/// Top-level game flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameFlowState {
    #[default]
    Paused,
    Playing,
}

/// Whether the player holds at least one key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerKeyState {
    HasKey,
    #[default]
    NoKey,
}

impl PlayerKeyState {
    pub fn from_count(count: u32) -> Self {
        if count > 0 {
            PlayerKeyState::HasKey
        } else {
            PlayerKeyState::NoKey
        }
    }
}

/// Health lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthPhase {
    #[default]
    Alive,
    /// Death effect playing. Terminal: no further deltas apply.
    Dying,
    /// Removal committed; the entity is about to leave the registry.
    Removed,
}

/// Generator countdown state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    #[default]
    Idle,
    Running,
}

/// Component kinds addressable through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Render,
    Physics,
    Health,
    Agent,
    Collectible,
    Generator,
    Pathfinding,
}
