//! Entity registry backed by a hecs world.
//!
//! The registry is the only owner of entities and their components. Each
//! component kind is stored once per entity: adding a kind that is already
//! present replaces it. Ids handed out are the hecs entity bits, so a
//! destroyed id never resolves again even if its slot is reused.

use hecs::{Entity, World};
use log::debug;

use valsrevenge_core::components::*;
use valsrevenge_core::enums::ComponentKind;
use valsrevenge_core::types::EntityId;

use crate::error::SimError;

/// A component addressed by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Render(Render),
    Physics(Physics),
    Health(Health),
    Agent(Agent),
    Collectible(Collectible),
    Generator(Generator),
    Pathfinding(Pathfinding),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Render(_) => ComponentKind::Render,
            Component::Physics(_) => ComponentKind::Physics,
            Component::Health(_) => ComponentKind::Health,
            Component::Agent(_) => ComponentKind::Agent,
            Component::Collectible(_) => ComponentKind::Collectible,
            Component::Generator(_) => ComponentKind::Generator,
            Component::Pathfinding(_) => ComponentKind::Pathfinding,
        }
    }
}

/// Notified after an entity leaves the registry, with the component kinds
/// it carried.
pub trait DestroyListener {
    fn on_destroy(&mut self, id: EntityId, kinds: &[ComponentKind]);
}

impl<F> DestroyListener for F
where
    F: FnMut(EntityId, &[ComponentKind]),
{
    fn on_destroy(&mut self, id: EntityId, kinds: &[ComponentKind]) {
        self(id, kinds)
    }
}

/// Convert a hecs handle into the public id.
pub fn id_of(entity: Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}

#[derive(Default)]
pub struct EntityRegistry {
    world: World,
    listeners: Vec<Box<dyn DestroyListener>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_entity(&mut self) -> EntityId {
        id_of(self.world.spawn(()))
    }

    /// Spawn an entity with a bundle of components in one step.
    pub fn spawn(&mut self, bundle: impl hecs::DynamicBundle) -> EntityId {
        id_of(self.world.spawn(bundle))
    }

    /// Resolve an id to a live hecs handle.
    pub fn entity(&self, id: EntityId) -> Option<Entity> {
        Entity::from_bits(id.0).filter(|e| self.world.contains(*e))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entity(id).is_some()
    }

    pub fn len(&self) -> u32 {
        self.world.len()
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }

    /// Attach a component, replacing any existing one of the same kind.
    pub fn add_component(&mut self, id: EntityId, component: Component) -> Result<(), SimError> {
        let entity = self.entity(id).ok_or(SimError::UnknownEntity(id))?;
        let result = match component {
            Component::Render(c) => self.world.insert_one(entity, c),
            Component::Physics(c) => self.world.insert_one(entity, c),
            Component::Health(c) => self.world.insert_one(entity, c),
            Component::Agent(c) => self.world.insert_one(entity, c),
            Component::Collectible(c) => self.world.insert_one(entity, c),
            Component::Generator(c) => self.world.insert_one(entity, c),
            Component::Pathfinding(c) => self.world.insert_one(entity, c),
        };
        result.map_err(|_| SimError::UnknownEntity(id))
    }

    /// Attach any typed value (positions, markers) to an entity.
    pub fn insert<T: hecs::Component>(&mut self, id: EntityId, value: T) -> Result<(), SimError> {
        let entity = self.entity(id).ok_or(SimError::UnknownEntity(id))?;
        self.world
            .insert_one(entity, value)
            .map_err(|_| SimError::UnknownEntity(id))
    }

    /// Copy of the component of `kind`, if the entity is live and has one.
    pub fn get_component(&self, id: EntityId, kind: ComponentKind) -> Option<Component> {
        let entity = self.entity(id)?;
        match kind {
            ComponentKind::Render => self.cloned::<Render>(entity).map(Component::Render),
            ComponentKind::Physics => self.cloned::<Physics>(entity).map(Component::Physics),
            ComponentKind::Health => self.cloned::<Health>(entity).map(Component::Health),
            ComponentKind::Agent => self.cloned::<Agent>(entity).map(Component::Agent),
            ComponentKind::Collectible => {
                self.cloned::<Collectible>(entity).map(Component::Collectible)
            }
            ComponentKind::Generator => self.cloned::<Generator>(entity).map(Component::Generator),
            ComponentKind::Pathfinding => {
                self.cloned::<Pathfinding>(entity).map(Component::Pathfinding)
            }
        }
    }

    /// Typed shared borrow.
    pub fn get<T: hecs::Component>(&self, id: EntityId) -> Option<hecs::Ref<'_, T>> {
        let entity = self.entity(id)?;
        self.world.get::<&T>(entity).ok()
    }

    /// Typed exclusive borrow.
    pub fn get_mut<T: hecs::Component>(&self, id: EntityId) -> Option<hecs::RefMut<'_, T>> {
        let entity = self.entity(id)?;
        self.world.get::<&mut T>(entity).ok()
    }

    pub fn has(&self, id: EntityId, kind: ComponentKind) -> bool {
        self.entity(id)
            .map(|e| self.kinds_of(e).contains(&kind))
            .unwrap_or(false)
    }

    /// Detach one component, returning it.
    pub fn remove_component(&mut self, id: EntityId, kind: ComponentKind) -> Option<Component> {
        let entity = self.entity(id)?;
        let w = &mut self.world;
        match kind {
            ComponentKind::Render => w.remove_one::<Render>(entity).ok().map(Component::Render),
            ComponentKind::Physics => w.remove_one::<Physics>(entity).ok().map(Component::Physics),
            ComponentKind::Health => w.remove_one::<Health>(entity).ok().map(Component::Health),
            ComponentKind::Agent => w.remove_one::<Agent>(entity).ok().map(Component::Agent),
            ComponentKind::Collectible => w
                .remove_one::<Collectible>(entity)
                .ok()
                .map(Component::Collectible),
            ComponentKind::Generator => w
                .remove_one::<Generator>(entity)
                .ok()
                .map(Component::Generator),
            ComponentKind::Pathfinding => w
                .remove_one::<Pathfinding>(entity)
                .ok()
                .map(Component::Pathfinding),
        }
    }

    /// Remove the entity and everything attached to it, then notify
    /// subscribers. Returns the kinds it carried, or `None` for an id that
    /// is not live.
    pub fn destroy_entity(&mut self, id: EntityId) -> Option<Vec<ComponentKind>> {
        let Some(entity) = self.entity(id) else {
            debug!("destroy_entity: {} is not live, ignoring", SimError::UnknownEntity(id));
            return None;
        };
        let kinds = self.kinds_of(entity);
        if self.world.despawn(entity).is_err() {
            return None;
        }
        for listener in &mut self.listeners {
            listener.on_destroy(id, &kinds);
        }
        Some(kinds)
    }

    /// Register a destroy subscriber.
    pub fn subscribe(&mut self, listener: impl DestroyListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Destroy every entity, notifying subscribers for each in id order.
    /// Returns how many were destroyed.
    pub fn clear(&mut self) -> usize {
        let mut ids: Vec<EntityId> = self.world.iter().map(|e| id_of(e.entity())).collect();
        ids.sort();
        ids.into_iter()
            .filter(|&id| self.destroy_entity(id).is_some())
            .count()
    }

    fn cloned<T: hecs::Component + Clone>(&self, entity: Entity) -> Option<T> {
        self.world.get::<&T>(entity).ok().map(|c| (*c).clone())
    }

    fn kinds_of(&self, entity: Entity) -> Vec<ComponentKind> {
        let Ok(e) = self.world.entity(entity) else {
            return Vec::new();
        };
        let mut kinds = Vec::new();
        if e.has::<Render>() {
            kinds.push(ComponentKind::Render);
        }
        if e.has::<Physics>() {
            kinds.push(ComponentKind::Physics);
        }
        if e.has::<Health>() {
            kinds.push(ComponentKind::Health);
        }
        if e.has::<Agent>() {
            kinds.push(ComponentKind::Agent);
        }
        if e.has::<Collectible>() {
            kinds.push(ComponentKind::Collectible);
        }
        if e.has::<Generator>() {
            kinds.push(ComponentKind::Generator);
        }
        if e.has::<Pathfinding>() {
            kinds.push(ComponentKind::Pathfinding);
        }
        kinds
    }
}
