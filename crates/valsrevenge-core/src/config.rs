//! Level file records.
//!
//! A level is a JSON document listing entity specs. Each spec carries
//! string-keyed component attributes with the same names and defaults the
//! level editor exposes (`bodyCategory`, `maxMonsters`, `waitTime`, ...).
//! Every record resolves into a typed component, and unknown names or bad
//! values are rejected before anything is spawned.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::*;
use crate::constants::*;
use crate::enums::*;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhysicsConfig {
    pub body_category: String,
    pub body_shape: String,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            body_category: PhysicsCategory::Wall.as_str().to_string(),
            body_shape: "circle".to_string(),
        }
    }
}

impl PhysicsConfig {
    pub fn resolve(&self) -> Result<Physics, ConfigError> {
        Ok(Physics {
            category: self.body_category.parse()?,
            shape: self.body_shape.parse()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    pub monster_type: String,
    /// 0 = spawn forever.
    pub max_monsters: u32,
    pub wait_time: f32,
    pub monster_health: i32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            monster_type: MonsterKind::Skeleton.as_str().to_string(),
            max_monsters: GENERATOR_DEFAULT_MAX_MONSTERS,
            wait_time: GENERATOR_DEFAULT_WAIT_SECS,
            monster_health: GENERATOR_DEFAULT_MONSTER_HEALTH,
        }
    }
}

impl GeneratorConfig {
    pub fn resolve(&self) -> Result<Generator, ConfigError> {
        if !(self.wait_time.is_finite() && self.wait_time > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "waitTime",
                reason: format!("must be a positive number of seconds, got {}", self.wait_time),
            });
        }
        if self.monster_health <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "monsterHealth",
                reason: format!("must be positive, got {}", self.monster_health),
            });
        }
        let job = SpawnJob {
            monster: self.monster_type.parse()?,
            max_count: self.max_monsters,
            interval_secs: self.wait_time,
            spawned_health: self.monster_health,
        };
        Ok(Generator {
            job,
            state: SchedulerState::Idle,
            remaining_secs: job.interval_secs,
            spawned: 0,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthConfig {
    pub current_health: i32,
    pub max_health: i32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            current_health: DEFAULT_HEALTH,
            max_health: DEFAULT_HEALTH,
        }
    }
}

impl HealthConfig {
    pub fn resolve(&self) -> Result<Health, ConfigError> {
        if self.max_health <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "maxHealth",
                reason: format!("must be positive, got {}", self.max_health),
            });
        }
        Ok(Health {
            current: self.current_health.clamp(0, self.max_health),
            max: self.max_health,
            phase: HealthPhase::Alive,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectibleConfig {
    pub collectible_type: String,
    pub value: i32,
}

impl Default for CollectibleConfig {
    fn default() -> Self {
        Self {
            collectible_type: "key".to_string(),
            value: 1,
        }
    }
}

impl CollectibleConfig {
    pub fn resolve(&self) -> Result<Collectible, ConfigError> {
        Ok(Collectible {
            kind: self.collectible_type.parse()?,
            value: self.value,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    pub sprite: String,
    pub scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sprite: String::new(),
            scale: 1.0,
        }
    }
}

impl RenderConfig {
    fn resolve(&self, fallback_sprite: &str) -> Render {
        let sprite = if self.sprite.is_empty() {
            fallback_sprite.to_string()
        } else {
            self.sprite.clone()
        };
        Render {
            sprite,
            scale: self.scale,
        }
    }
}

/// Marker for a monster placed directly in the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    pub monster_type: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            monster_type: MonsterKind::Skeleton.as_str().to_string(),
        }
    }
}

/// Marker for a patrolling entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathfindingConfig {}

/// Component attributes attached to one level node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentConfigs {
    pub render: Option<RenderConfig>,
    pub physics: Option<PhysicsConfig>,
    pub health: Option<HealthConfig>,
    pub agent: Option<AgentConfig>,
    pub collectible: Option<CollectibleConfig>,
    pub generator: Option<GeneratorConfig>,
    pub pathfinding: Option<PathfindingConfig>,
}

/// One level node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    pub name: String,
    pub position: Vec2,
    #[serde(default = "default_size")]
    pub size: Vec2,
    #[serde(default)]
    pub components: ComponentConfigs,
}

fn default_size() -> Vec2 {
    Vec2::new(64.0, 64.0)
}

/// Typed components resolved from an [`EntitySpec`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntity {
    pub name: String,
    pub position: Vec2,
    pub bounds: Bounds,
    pub render: Option<Render>,
    pub physics: Option<Physics>,
    pub health: Option<Health>,
    pub monster: Option<MonsterKind>,
    pub collectible: Option<Collectible>,
    pub generator: Option<Generator>,
    pub pathfinding: bool,
}

impl EntitySpec {
    pub fn resolve(&self) -> Result<ResolvedEntity, ConfigError> {
        if !(self.size.x > 0.0 && self.size.y > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "size",
                reason: format!("{} has a non-positive size {:?}", self.name, self.size),
            });
        }
        let c = &self.components;
        Ok(ResolvedEntity {
            name: self.name.clone(),
            position: self.position,
            bounds: Bounds(self.size),
            render: c.render.as_ref().map(|r| r.resolve(&self.name)),
            physics: c.physics.as_ref().map(PhysicsConfig::resolve).transpose()?,
            health: c.health.as_ref().map(HealthConfig::resolve).transpose()?,
            monster: c
                .agent
                .as_ref()
                .map(|a| a.monster_type.parse())
                .transpose()?,
            collectible: c
                .collectible
                .as_ref()
                .map(CollectibleConfig::resolve)
                .transpose()?,
            generator: c
                .generator
                .as_ref()
                .map(GeneratorConfig::resolve)
                .transpose()?,
            pathfinding: c.pathfinding.is_some(),
        })
    }
}

/// A whole level: entity specs plus the patrol graph nodes, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelSpec {
    pub entities: Vec<EntitySpec>,
    pub patrol_path: Vec<Vec2>,
}

impl LevelSpec {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve every entity, failing on the first bad record.
    pub fn resolve(&self) -> Result<Vec<ResolvedEntity>, ConfigError> {
        self.entities.iter().map(EntitySpec::resolve).collect()
    }
}
