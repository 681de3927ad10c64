//! Simulation for Val's Revenge.
//!
//! Owns the hecs world behind an entity registry, runs the gameplay
//! systems once per host frame, and reports what happened as events.

pub mod controls;
pub mod engine;
pub mod error;
pub mod flow;
pub mod persistence;
pub mod registry;
pub mod systems;
pub mod timers;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use valsrevenge_core as core;

#[cfg(test)]
mod tests;
