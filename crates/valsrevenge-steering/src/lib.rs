//! Steering for Val's Revenge agents.
//!
//! Computes per-agent steering forces from weighted goals (wander, intercept,
//! path following, obstacle avoidance) and builds the behaviors monsters and
//! patrollers use. No ECS dependency: callers resolve entity references into
//! plain kinematic data before steering.

pub mod behavior;
pub mod path;
pub mod steering;

pub use valsrevenge_core as core;
