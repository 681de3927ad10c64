//! Built-in overlap detection for hosts without a physics engine.
//!
//! Reports begin-contacts only: a pair is reported on the first tick its
//! bodies overlap and not again until they have separated. Only pairs whose
//! contact masks intersect are considered. Bodies within `CONTACT_SKIN` of
//! each other count as touching, since blocked bodies rest flush.

use std::collections::HashSet;

use glam::Vec2;
use hecs::World;

use valsrevenge_core::categories::reports_contact;
use valsrevenge_core::components::{Bounds, Physics};
use valsrevenge_core::constants::CONTACT_SKIN;
use valsrevenge_core::enums::{PhysicsCategory, PhysicsShape};
use valsrevenge_core::types::{EntityId, Position};

use crate::registry::id_of;

/// Collision geometry of one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub center: Vec2,
    pub shape: PhysicsShape,
    pub size: Vec2,
}

impl Body {
    pub fn new(center: Vec2, shape: PhysicsShape, size: Vec2) -> Self {
        Self {
            center,
            shape,
            size,
        }
    }

    /// Circles use the sprite height as their diameter.
    fn radius(&self) -> f32 {
        self.size.y / 2.0
    }

    fn half_extents(&self) -> Vec2 {
        self.size / 2.0
    }

    /// The same body grown by `margin` on every side.
    pub fn inflated(&self, margin: f32) -> Body {
        Body {
            size: self.size + Vec2::splat(margin * 2.0),
            ..*self
        }
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        match (self.shape, other.shape) {
            (PhysicsShape::Circle, PhysicsShape::Circle) => {
                self.center.distance(other.center) < self.radius() + other.radius()
            }
            (PhysicsShape::Rect, PhysicsShape::Rect) => {
                let gap = (self.center - other.center).abs();
                let reach = self.half_extents() + other.half_extents();
                gap.x < reach.x && gap.y < reach.y
            }
            (PhysicsShape::Circle, PhysicsShape::Rect) => circle_rect(self, other),
            (PhysicsShape::Rect, PhysicsShape::Circle) => circle_rect(other, self),
        }
    }
}

fn circle_rect(circle: &Body, rect: &Body) -> bool {
    let half = rect.half_extents();
    let closest = circle.center.clamp(rect.center - half, rect.center + half);
    circle.center.distance(closest) < circle.radius()
}

/// A reported contact, in the order the bodies were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub category_a: PhysicsCategory,
    pub category_b: PhysicsCategory,
    pub entity_a: EntityId,
    pub entity_b: EntityId,
}

#[derive(Debug, Default)]
pub struct ContactDetector {
    touching: HashSet<(EntityId, EntityId)>,
}

impl ContactDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every tracked pair (level reload).
    pub fn reset(&mut self) {
        self.touching.clear();
    }

    /// Find pairs that started overlapping since the previous call.
    pub fn detect(&mut self, world: &World) -> Vec<Contact> {
        let mut bodies: Vec<(EntityId, PhysicsCategory, Body)> = world
            .query::<(&Physics, &Position, &Bounds)>()
            .iter()
            .map(|(entity, (physics, pos, bounds))| {
                (
                    id_of(entity),
                    physics.category,
                    Body::new(pos.0, physics.shape, bounds.0),
                )
            })
            .collect();
        bodies.sort_by_key(|(id, _, _)| *id);

        let mut now_touching = HashSet::new();
        let mut began = Vec::new();
        for (i, (id_a, cat_a, body_a)) in bodies.iter().enumerate() {
            for (id_b, cat_b, body_b) in &bodies[i + 1..] {
                if !reports_contact(*cat_a, *cat_b) || !body_a.inflated(CONTACT_SKIN).overlaps(body_b) {
                    continue;
                }
                let key = (*id_a, *id_b);
                now_touching.insert(key);
                if !self.touching.contains(&key) {
                    began.push(Contact {
                        category_a: *cat_a,
                        category_b: *cat_b,
                        entity_a: *id_a,
                        entity_b: *id_b,
                    });
                }
            }
        }
        self.touching = now_touching;
        began
    }
}
