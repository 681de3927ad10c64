//! Physics category bitmasks.
//!
//! Every body carries exactly one category bit. Two static tables derive the
//! other two masks: the collision-response set (what blocks this body) and
//! the contact-notification set (what produces a logic callback). The two
//! tables are independent; a category may receive contacts from bodies it
//! passes straight through.

use crate::enums::PhysicsCategory;

/// Single-bit category identifier.
pub fn category_bit(category: PhysicsCategory) -> u32 {
    match category {
        PhysicsCategory::Player => 1 << 0,
        PhysicsCategory::Wall => 1 << 1,
        PhysicsCategory::Door => 1 << 2,
        PhysicsCategory::Monster => 1 << 3,
        PhysicsCategory::Projectile => 1 << 4,
        PhysicsCategory::Exit => 1 << 5,
        PhysicsCategory::Collectible => 1 << 6,
    }
}

/// Categories this body is physically blocked by.
pub fn collides_with(category: PhysicsCategory) -> &'static [PhysicsCategory] {
    use PhysicsCategory::*;
    match category {
        Player => &[Wall, Door],
        Monster => &[Wall, Door],
        Wall | Door | Projectile | Collectible | Exit => &[],
    }
}

/// Categories this body receives contact notifications for.
pub fn contacts_with(category: PhysicsCategory) -> &'static [PhysicsCategory] {
    use PhysicsCategory::*;
    match category {
        Player => &[Monster, Collectible, Door, Exit],
        Wall => &[Player],
        Door => &[Player],
        Monster => &[Player, Projectile],
        Projectile => &[Monster, Collectible, Wall],
        Collectible => &[Player, Projectile],
        Exit => &[Player],
    }
}

fn union(categories: &[PhysicsCategory]) -> u32 {
    categories.iter().fold(0, |acc, &c| acc | category_bit(c))
}

/// Collision-response bitmask for a category.
pub fn collision_mask(category: PhysicsCategory) -> u32 {
    union(collides_with(category))
}

/// Contact-notification bitmask for a category.
pub fn contact_mask(category: PhysicsCategory) -> u32 {
    union(contacts_with(category))
}

/// The three masks a physics body is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyMasks {
    pub category: u32,
    pub collision: u32,
    pub contact: u32,
}

impl BodyMasks {
    pub fn for_category(category: PhysicsCategory) -> Self {
        Self {
            category: category_bit(category),
            collision: collision_mask(category),
            contact: contact_mask(category),
        }
    }
}

/// Whether a contact between the two categories is reported. Matches the
/// usual physics-engine rule: either side listing the other is enough.
pub fn reports_contact(a: PhysicsCategory, b: PhysicsCategory) -> bool {
    contact_mask(a) & category_bit(b) != 0 || contact_mask(b) & category_bit(a) != 0
}
