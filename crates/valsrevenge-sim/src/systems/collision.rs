//! Contact routing: maps an unordered category pair to a handler.
//!
//! The routing table is symmetric. A contact between (A, x) and (B, y)
//! routes exactly like (B, y) and (A, x); the handler always receives the
//! entities in the table's canonical order.

use log::debug;

use valsrevenge_core::components::{Collectible, Projectile};
use valsrevenge_core::enums::{CollectibleKind, PhysicsCategory, PlayerKeyState};
use valsrevenge_core::events::GameEvent;
use valsrevenge_core::objects;
use valsrevenge_core::save::SaveData;
use valsrevenge_core::types::EntityId;

use crate::error::SimError;
use crate::flow::KeyTracker;
use crate::registry::EntityRegistry;
use crate::systems::health::{self, HealthContext};
use crate::timers::TimerQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactRule {
    OpenDoor,
    Collect,
    ProjectileHitsMonster,
    ProjectileHitsCollectible,
    MonsterHitsPlayer,
    ReachExit,
}

/// Canonical category order per rule.
const ROUTES: [(PhysicsCategory, PhysicsCategory, ContactRule); 6] = [
    (PhysicsCategory::Player, PhysicsCategory::Door, ContactRule::OpenDoor),
    (PhysicsCategory::Player, PhysicsCategory::Collectible, ContactRule::Collect),
    (
        PhysicsCategory::Projectile,
        PhysicsCategory::Monster,
        ContactRule::ProjectileHitsMonster,
    ),
    (
        PhysicsCategory::Projectile,
        PhysicsCategory::Collectible,
        ContactRule::ProjectileHitsCollectible,
    ),
    (PhysicsCategory::Player, PhysicsCategory::Monster, ContactRule::MonsterHitsPlayer),
    (PhysicsCategory::Player, PhysicsCategory::Exit, ContactRule::ReachExit),
];

/// A contact matched to a rule, with entities in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutedContact {
    pub rule: ContactRule,
    pub primary: EntityId,
    pub secondary: EntityId,
}

/// Look up the rule for a contact. Pairs with no rule return `None`.
pub fn route(
    category_a: PhysicsCategory,
    category_b: PhysicsCategory,
    entity_a: EntityId,
    entity_b: EntityId,
) -> Option<RoutedContact> {
    ROUTES.iter().find_map(|&(first, second, rule)| {
        if (category_a, category_b) == (first, second) {
            Some(RoutedContact {
                rule,
                primary: entity_a,
                secondary: entity_b,
            })
        } else if (category_b, category_a) == (first, second) {
            Some(RoutedContact {
                rule,
                primary: entity_b,
                secondary: entity_a,
            })
        } else {
            None
        }
    })
}

/// How a contact was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No rule, or a participant was already gone.
    Ignored,
    Handled,
    /// The player reached the exit; the save record was advanced.
    LevelComplete,
}

/// Everything a contact handler may touch.
pub struct ContactContext<'a> {
    pub registry: &'a mut EntityRegistry,
    pub keys: &'a mut KeyTracker,
    pub save: &'a mut SaveData,
    pub timers: &'a mut TimerQueue,
    pub events: &'a mut Vec<GameEvent>,
    pub now: f64,
}

impl ContactContext<'_> {
    fn health(&mut self) -> HealthContext<'_> {
        HealthContext {
            registry: self.registry,
            timers: self.timers,
            events: self.events,
            now: self.now,
        }
    }

    fn sound(&mut self, name: &str) {
        self.events.push(GameEvent::Sound {
            name: name.to_string(),
        });
    }

    fn destroy(&mut self, id: EntityId) {
        health::mark_removed(self.registry, id);
        if self.registry.destroy_entity(id).is_some() {
            self.events.push(GameEvent::Removed { entity: id });
        }
    }

    fn key_changed(&mut self, changed: Option<PlayerKeyState>) {
        self.save.keys = self.keys.keys();
        if let Some(state) = changed {
            self.events.push(GameEvent::KeyStateChanged {
                state,
                keys: self.keys.keys(),
            });
        }
    }
}

/// Resolve one routed contact against the live world.
pub fn resolve(ctx: &mut ContactContext<'_>, contact: RoutedContact) -> Resolution {
    // Contacts from the same tick may name entities an earlier contact
    // already removed.
    for id in [contact.primary, contact.secondary] {
        if !ctx.registry.contains(id) {
            debug!("{:?} skipped: {}", contact.rule, SimError::UnknownEntity(id));
            return Resolution::Ignored;
        }
    }

    match contact.rule {
        ContactRule::OpenDoor => open_door(ctx, contact.secondary),
        ContactRule::Collect => collect(ctx, contact.primary, contact.secondary),
        ContactRule::ProjectileHitsMonster => damage(ctx, contact.secondary),
        ContactRule::ProjectileHitsCollectible => {
            projectile_hits_collectible(ctx, contact.primary, contact.secondary)
        }
        ContactRule::MonsterHitsPlayer => damage(ctx, contact.primary),
        ContactRule::ReachExit => {
            let next_level = ctx.save.advance_level();
            ctx.sound(objects::EXIT_SOUND);
            ctx.events.push(GameEvent::LevelComplete { next_level });
            Resolution::LevelComplete
        }
    }
}

fn open_door(ctx: &mut ContactContext<'_>, door: EntityId) -> Resolution {
    let (spent, changed) = ctx.keys.spend();
    if !spent {
        ctx.sound(objects::DOOR_LOCKED_SOUND);
        ctx.events.push(GameEvent::DoorLocked {
            door,
            message: "locked".to_string(),
        });
        return Resolution::Handled;
    }
    ctx.sound(objects::DOOR_OPEN_SOUND);
    ctx.events.push(GameEvent::DoorOpened { door });
    ctx.key_changed(changed);
    ctx.destroy(door);
    Resolution::Handled
}

fn collect(ctx: &mut ContactContext<'_>, player: EntityId, item: EntityId) -> Resolution {
    let Some(collectible) = ctx.registry.get::<Collectible>(item).map(|c| *c) else {
        debug!("collect: {item} has no collectible");
        return Resolution::Ignored;
    };
    let settings = objects::collectible_settings(collectible.kind);
    ctx.sound(settings.collect_sound);

    match collectible.kind {
        CollectibleKind::Key => {
            let changed = ctx.keys.add(collectible.value.max(0) as u32);
            ctx.key_changed(changed);
        }
        CollectibleKind::Treasure => {
            ctx.save.treasure = ctx
                .save
                .treasure
                .saturating_add(collectible.value.max(0) as u32);
        }
        CollectibleKind::Food => {
            if let Err(err) = health::apply_delta(&mut ctx.health(), player, collectible.value) {
                debug!("food pick-up: {err}");
            }
        }
    }

    ctx.events.push(GameEvent::Collected {
        entity: item,
        kind: collectible.kind,
        value: collectible.value,
    });
    ctx.destroy(item);
    Resolution::Handled
}

fn projectile_hits_collectible(
    ctx: &mut ContactContext<'_>,
    projectile: EntityId,
    item: EntityId,
) -> Resolution {
    if let Some(collectible) = ctx.registry.get::<Collectible>(item).map(|c| *c) {
        let settings = objects::collectible_settings(collectible.kind);
        if settings.can_destroy {
            ctx.sound(settings.destroy_sound);
            ctx.events
                .push(GameEvent::CollectibleDestroyed { entity: item });
            ctx.destroy(item);
        }
    }
    if ctx.registry.get::<Projectile>(projectile).is_some() {
        ctx.destroy(projectile);
    }
    Resolution::Handled
}

fn damage(ctx: &mut ContactContext<'_>, target: EntityId) -> Resolution {
    match health::apply_delta(&mut ctx.health(), target, -1) {
        Ok(_) => Resolution::Handled,
        Err(err) => {
            debug!("damage: {err}");
            Resolution::Ignored
        }
    }
}
