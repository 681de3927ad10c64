//! Entity spawn factories: level contents, generated monsters and thrown
//! projectiles.

use glam::Vec2;
use log::{debug, warn};
use rand::Rng;

use valsrevenge_core::components::*;
use valsrevenge_core::config::{LevelSpec, ResolvedEntity};
use valsrevenge_core::constants::*;
use valsrevenge_core::enums::*;
use valsrevenge_core::error::ConfigError;
use valsrevenge_core::objects;
use valsrevenge_core::types::{EntityId, Position, Velocity};
use valsrevenge_steering::behavior;

use crate::error::SimError;
use crate::registry::{Component, EntityRegistry};

/// What the engine needs to remember about a freshly loaded level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedLevel {
    pub player: Option<EntityId>,
    pub patrol_nodes: Vec<Vec2>,
    pub entities: Vec<EntityId>,
}

/// Resolve every entity spec, then spawn them. Nothing is spawned if any
/// spec is rejected.
pub fn load_level(
    registry: &mut EntityRegistry,
    level: &LevelSpec,
    key_state: PlayerKeyState,
) -> Result<LoadedLevel, ConfigError> {
    let resolved = level.resolve()?;

    let mut loaded = LoadedLevel {
        patrol_nodes: level.patrol_path.clone(),
        ..Default::default()
    };
    let mut monsters = Vec::new();

    for spec in resolved {
        let (id, monster) = spawn_resolved(registry, spec);
        if registry.get::<Player>(id).is_some() {
            if loaded.player.is_some() {
                warn!("level has more than one player; keeping the first");
            } else {
                loaded.player = Some(id);
            }
        }
        if let Some(kind) = monster {
            monsters.push(id);
            debug!("placed {} monster {id}", kind.as_str());
        }
        loaded.entities.push(id);
    }

    if loaded.player.is_none() {
        warn!("level load: {}", SimError::UnresolvedLookup("player"));
    }

    // Placed monsters chase the player, so they get their agents once the
    // player id is known.
    for id in monsters {
        let agent = behavior::monster_agent(behavior::monster_behavior(loaded.player, key_state));
        if let Err(err) = registry.add_component(id, Component::Agent(agent)) {
            debug!("placing monster agent: {err}");
        }
    }

    Ok(loaded)
}

fn spawn_resolved(
    registry: &mut EntityRegistry,
    spec: ResolvedEntity,
) -> (EntityId, Option<MonsterKind>) {
    let id = registry.spawn((
        Position(spec.position),
        Velocity::default(),
        spec.bounds,
        Name(spec.name.clone()),
    ));

    let category = spec.physics.map(|p| p.category);
    let mut components = Vec::new();
    if let Some(render) = spec.render {
        components.push(Component::Render(render));
    }
    if let Some(physics) = spec.physics {
        components.push(Component::Physics(physics));
    }
    match spec.health {
        Some(health) => components.push(Component::Health(health)),
        None if category == Some(PhysicsCategory::Player) => {
            components.push(Component::Health(Health {
                current: PLAYER_DEFAULT_HEALTH,
                max: PLAYER_DEFAULT_HEALTH,
                phase: HealthPhase::Alive,
            }));
        }
        None => {}
    }
    if let Some(collectible) = spec.collectible {
        components.push(Component::Collectible(collectible));
    }
    if let Some(generator) = spec.generator {
        components.push(Component::Generator(generator));
    }
    if spec.pathfinding {
        components.push(Component::Pathfinding(Pathfinding::default()));
    }
    for component in components {
        // The entity was spawned just above, so it is live.
        let _ = registry.add_component(id, component);
    }

    let marked = match category {
        Some(PhysicsCategory::Player) => registry.insert(
            id,
            Player {
                moving: Direction::Stop,
                facing: Direction::Stop,
            },
        ),
        Some(PhysicsCategory::Door) => registry.insert(id, Door),
        Some(PhysicsCategory::Exit) => registry.insert(id, Exit),
        _ => Ok(()),
    };
    if let Err(err) = marked {
        debug!("marking {}: {err}", spec.name);
    }

    if let Some(kind) = spec.monster {
        let _ = registry.insert(id, Monster { kind });
    }

    (id, spec.monster)
}

/// Spawn a generated monster next to `origin`, displaced sideways by one of
/// the lateral offsets.
pub fn spawn_monster<R: Rng>(
    registry: &mut EntityRegistry,
    rng: &mut R,
    origin: Vec2,
    job: &SpawnJob,
    player: Option<EntityId>,
    key_state: PlayerKeyState,
) -> EntityId {
    let offset = SPAWN_LATERAL_OFFSETS[rng.gen_range(0..SPAWN_LATERAL_OFFSETS.len())];
    let agent = behavior::monster_agent(behavior::monster_behavior(player, key_state));
    registry.spawn((
        Position(origin + Vec2::new(offset, 0.0)),
        Velocity::new(MONSTER_INITIAL_SPEED, 0.0),
        Bounds(Vec2::new(MONSTER_SIZE.0, MONSTER_SIZE.1)),
        Name(job.monster.as_str().to_string()),
        Render {
            sprite: objects::monster_sprite(job.monster),
            scale: MONSTER_SPRITE_SCALE,
        },
        Health {
            current: job.spawned_health,
            max: job.spawned_health.max(DEFAULT_HEALTH),
            phase: HealthPhase::Alive,
        },
        agent,
        Physics {
            category: PhysicsCategory::Monster,
            shape: PhysicsShape::Circle,
        },
        Monster { kind: job.monster },
    ))
}

/// Spawn a thrown projectile travelling the attack distance per axis over
/// the attack duration.
pub fn spawn_projectile(registry: &mut EntityRegistry, origin: Vec2, direction: Direction) -> EntityId {
    let speed = ATTACK_DISTANCE / ATTACK_DURATION_SECS;
    registry.spawn((
        Position(origin),
        Velocity(direction.axis() * speed),
        Bounds(Vec2::new(PROJECTILE_SIZE.0, PROJECTILE_SIZE.1)),
        Render {
            sprite: objects::PROJECTILE_SPRITE.to_string(),
            scale: 1.0,
        },
        Physics {
            category: PhysicsCategory::Projectile,
            shape: PhysicsShape::Rect,
        },
        Projectile {
            remaining_secs: ATTACK_DURATION_SECS,
        },
    ))
}
