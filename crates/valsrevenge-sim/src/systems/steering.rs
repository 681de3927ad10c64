//! Agent steering system.
//!
//! Resolves intercept targets through the world, runs the pure steering
//! step for every active agent, and writes the resulting velocity back.

use std::collections::HashMap;

use hecs::{Entity, World};
use log::warn;
use rand::Rng;

use valsrevenge_core::components::{Agent, Health, Monster, Pathfinding, SteeringGoal};
use valsrevenge_core::enums::{HealthPhase, PlayerKeyState};
use valsrevenge_core::types::{EntityId, Position, Velocity};
use valsrevenge_steering::behavior::{self, MONSTER_INTERCEPT_GOAL, MONSTER_WANDER_GOAL};
use valsrevenge_steering::steering::{steer, AgentState, GoalInput, TargetState};

use crate::error::SimError;

/// Set every monster's goal weights from the player's key state.
pub fn apply_monster_weights(world: &mut World, key_state: PlayerKeyState) {
    let weights = behavior::monster_weights(key_state);
    for (_entity, (agent, _monster)) in world.query_mut::<(&mut Agent, &Monster)>() {
        agent.behavior.set_weight(MONSTER_WANDER_GOAL, weights.wander);
        agent.behavior.set_weight(MONSTER_INTERCEPT_GOAL, weights.intercept);
    }
}

fn resolve_targets(world: &World) -> HashMap<EntityId, TargetState> {
    let mut wanted: Vec<EntityId> = Vec::new();
    for (_entity, agent) in world.query::<&Agent>().iter() {
        for entry in &agent.behavior.goals {
            if let SteeringGoal::InterceptTarget { target, .. } = entry.goal {
                if entry.weight != 0.0 && !wanted.contains(&target) {
                    wanted.push(target);
                }
            }
        }
    }

    let mut targets = HashMap::new();
    for id in wanted {
        let resolved = Entity::from_bits(id.0).and_then(|e| {
            let pos = world.get::<&Position>(e).ok()?;
            let vel = world.get::<&Velocity>(e).map(|v| v.0).unwrap_or_default();
            Some(TargetState {
                position: pos.0,
                velocity: vel,
            })
        });
        match resolved {
            Some(state) => {
                targets.insert(id, state);
            }
            None => warn!("intercept target {id}: {}", SimError::UnresolvedLookup("player")),
        }
    }
    targets
}

fn goal_input<'a>(goal: &'a SteeringGoal, targets: &HashMap<EntityId, TargetState>) -> GoalInput<'a> {
    match goal {
        SteeringGoal::Wander => GoalInput::Wander,
        SteeringGoal::InterceptTarget {
            target,
            max_prediction_time,
        } => match targets.get(target) {
            Some(state) => GoalInput::Intercept {
                target: *state,
                max_prediction_time: *max_prediction_time,
            },
            None => GoalInput::Inactive,
        },
        SteeringGoal::FollowPath {
            path,
            max_prediction_time,
            forward,
        } => GoalInput::FollowPath {
            path,
            max_prediction_time: *max_prediction_time,
            forward: *forward,
        },
        SteeringGoal::AvoidObstacles {
            obstacles,
            max_prediction_time,
        } => GoalInput::AvoidObstacles {
            obstacles: obstacles.as_slice(),
            max_prediction_time: *max_prediction_time,
        },
    }
}

/// Steer every live agent. Stopped pathfinders and dying agents are held
/// still.
pub fn run<R: Rng>(world: &mut World, rng: &mut R, dt: f32) {
    let targets = resolve_targets(world);

    for (_entity, (agent, pos, vel, pathfinding, health)) in world.query_mut::<(
        &mut Agent,
        &Position,
        &mut Velocity,
        Option<&Pathfinding>,
        Option<&Health>,
    )>() {
        let stopped = pathfinding.is_some_and(|p| !p.running);
        let dying = health.is_some_and(|h| h.phase != HealthPhase::Alive);
        if stopped || dying {
            vel.0 = glam::Vec2::ZERO;
            continue;
        }

        let state = AgentState {
            position: pos.0,
            velocity: vel.0,
            mass: agent.mass,
            max_speed: agent.max_speed,
            max_acceleration: agent.max_acceleration,
            radius: agent.radius,
        };
        let goals: Vec<(GoalInput<'_>, f32)> = agent
            .behavior
            .goals
            .iter()
            .map(|entry| (goal_input(&entry.goal, &targets), entry.weight))
            .collect();
        let out = steer(&state, &goals, &mut agent.wander_angle, dt, rng);
        vel.0 = out.velocity;
    }
}
