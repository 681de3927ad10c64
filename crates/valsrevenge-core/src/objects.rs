//! Static game object tables: per-kind sounds, sprites and flags.

use crate::enums::{CollectibleKind, MonsterKind};

/// Settings shared by every collectible of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectibleSettings {
    pub collect_sound: &'static str,
    pub destroy_sound: &'static str,
    /// Whether a projectile can destroy it.
    pub can_destroy: bool,
}

pub fn collectible_settings(kind: CollectibleKind) -> CollectibleSettings {
    match kind {
        CollectibleKind::Key => CollectibleSettings {
            collect_sound: "key",
            destroy_sound: "destroyed",
            can_destroy: false,
        },
        CollectibleKind::Food => CollectibleSettings {
            collect_sound: "food",
            destroy_sound: "destroyed",
            can_destroy: true,
        },
        CollectibleKind::Treasure => CollectibleSettings {
            collect_sound: "treasure",
            destroy_sound: "destroyed",
            can_destroy: false,
        },
    }
}

/// Sounds played by a health owner on hit and on death.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthSounds {
    pub hit: &'static str,
    pub die: &'static str,
}

pub fn health_sounds(is_player: bool) -> HealthSounds {
    if is_player {
        HealthSounds {
            hit: "player_hit",
            die: "player_die",
        }
    } else {
        HealthSounds {
            hit: "monster_hit",
            die: "monster_die",
        }
    }
}

/// First animation frame of a monster, used as its initial sprite.
pub fn monster_sprite(kind: MonsterKind) -> String {
    format!("{}_0", kind.as_str())
}

pub const DOOR_LOCKED_SOUND: &str = "locked";
pub const DOOR_OPEN_SOUND: &str = "door_open";
pub const EXIT_SOUND: &str = "exit";
pub const PROJECTILE_SPRITE: &str = "knife";
