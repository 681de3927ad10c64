//! Simulation systems. Each system is a function that operates on the world
//! (or the registry, when it needs to destroy entities and notify
//! subscribers).

pub mod cleanup;
pub mod collision;
pub mod contacts;
pub mod health;
pub mod movement;
pub mod pathfinding;
pub mod spawner;
pub mod steering;
