//! Weighted goal steering.
//!
//! Each goal yields a direction of at most unit length. The agent's steering
//! force is the weighted sum of those directions scaled by its maximum
//! acceleration, then clipped to that maximum. Velocity is integrated from
//! the force and clipped to the agent's maximum speed.

use glam::Vec2;
use rand::Rng;
use valsrevenge_core::components::{Obstacle, PatrolPath};
use valsrevenge_core::constants::*;

use crate::path;

/// Kinematic state of the agent being steered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
    pub max_speed: f32,
    pub max_acceleration: f32,
    pub radius: f32,
}

/// Position and velocity of an intercept target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetState {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// A goal with every entity reference already resolved.
#[derive(Debug, Clone, Copy)]
pub enum GoalInput<'a> {
    Wander,
    Intercept {
        target: TargetState,
        max_prediction_time: f32,
    },
    FollowPath {
        path: &'a PatrolPath,
        max_prediction_time: f32,
        forward: bool,
    },
    AvoidObstacles {
        obstacles: &'a [Obstacle],
        max_prediction_time: f32,
    },
    /// Reference could not be resolved this tick; contributes nothing.
    Inactive,
}

/// Result of one steering step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringOutput {
    pub force: Vec2,
    pub velocity: Vec2,
}

/// Run one steering step for `agent` over `dt` seconds.
///
/// `wander_angle` is the agent's persistent wander state; it is only
/// advanced when a wander goal carries a non-zero weight.
pub fn steer<R: Rng>(
    agent: &AgentState,
    goals: &[(GoalInput<'_>, f32)],
    wander_angle: &mut f32,
    dt: f32,
    rng: &mut R,
) -> SteeringOutput {
    let mut sum = Vec2::ZERO;
    for (goal, weight) in goals {
        if *weight == 0.0 {
            continue;
        }
        let direction = match goal {
            GoalInput::Wander => wander(agent, wander_angle, dt, rng),
            GoalInput::Intercept {
                target,
                max_prediction_time,
            } => intercept(agent, target, *max_prediction_time),
            GoalInput::FollowPath {
                path,
                max_prediction_time,
                forward,
            } => follow_path(agent, path, *max_prediction_time, *forward),
            GoalInput::AvoidObstacles {
                obstacles,
                max_prediction_time,
            } => avoid_obstacles(agent, obstacles, *max_prediction_time),
            GoalInput::Inactive => Vec2::ZERO,
        };
        sum += direction * *weight;
    }
    combine(agent, sum, dt)
}

/// Turn a weighted direction sum into a clipped force and the resulting
/// clipped velocity.
pub fn combine(agent: &AgentState, weighted: Vec2, dt: f32) -> SteeringOutput {
    let force = (weighted * agent.max_acceleration).clamp_length_max(agent.max_acceleration);
    let mass = if agent.mass > 0.0 { agent.mass } else { 1.0 };
    let velocity = (agent.velocity + force / mass * dt).clamp_length_max(agent.max_speed);
    SteeringOutput { force, velocity }
}

/// Direction that turns the current velocity toward `desired_velocity`.
fn seek_velocity(agent: &AgentState, desired_velocity: Vec2) -> Vec2 {
    let delta = desired_velocity - agent.velocity;
    if agent.max_speed > 0.0 {
        (delta / agent.max_speed).clamp_length_max(1.0)
    } else {
        Vec2::ZERO
    }
}

fn seek(agent: &AgentState, target: Vec2) -> Vec2 {
    let desired = (target - agent.position).normalize_or_zero() * agent.max_speed;
    seek_velocity(agent, desired)
}

fn heading(agent: &AgentState) -> Vec2 {
    let h = agent.velocity.normalize_or_zero();
    if h == Vec2::ZERO {
        Vec2::X
    } else {
        h
    }
}

/// Random drift: a point on a small circle projected ahead of the agent,
/// with the angle on that circle jittering over time.
pub fn wander<R: Rng>(agent: &AgentState, wander_angle: &mut f32, dt: f32, rng: &mut R) -> Vec2 {
    let jitter = WANDER_JITTER_PER_SEC * dt;
    if jitter > 0.0 {
        *wander_angle += rng.gen_range(-jitter..=jitter);
    }
    let ahead = heading(agent) * WANDER_DISTANCE;
    let target = ahead + Vec2::from_angle(*wander_angle) * WANDER_RADIUS;
    target.normalize_or_zero()
}

/// Pursue a moving target, aiming where it will be after the shorter of
/// the closing time and `max_prediction_time`.
pub fn intercept(agent: &AgentState, target: &TargetState, max_prediction_time: f32) -> Vec2 {
    let distance = agent.position.distance(target.position);
    let closing_time = if agent.max_speed > 0.0 {
        distance / agent.max_speed
    } else {
        0.0
    };
    let lead = closing_time.min(max_prediction_time.max(0.0));
    seek(agent, target.position + target.velocity * lead)
}

/// Steer toward a point ahead on the path from the agent's predicted
/// position. A path radius of zero means the agent always seeks the
/// centerline.
pub fn follow_path(agent: &AgentState, path: &PatrolPath, max_prediction_time: f32, forward: bool) -> Vec2 {
    let predicted = agent.position + agent.velocity * max_prediction_time;
    let Some(projection) = path::project(path, predicted) else {
        return Vec2::ZERO;
    };
    let look_ahead = agent.radius.max(1.0);
    let along = if forward {
        projection.distance_along + look_ahead
    } else {
        projection.distance_along - look_ahead
    };
    let Some(target) = path::point_at(path, along) else {
        return Vec2::ZERO;
    };
    if path.radius > 0.0 && projection.offset <= path.radius {
        // Inside the tolerance band: run parallel to the path.
        let tangent = (target - projection.point).normalize_or_zero();
        return seek_velocity(agent, tangent * agent.max_speed);
    }
    seek(agent, target)
}

/// Push away from the most imminent obstacle within the look-ahead window.
pub fn avoid_obstacles(agent: &AgentState, obstacles: &[Obstacle], max_prediction_time: f32) -> Vec2 {
    let dir = heading(agent);
    let look_ahead = agent.velocity.length() * max_prediction_time + agent.radius;

    let mut nearest: Option<(f32, Vec2)> = None;
    for obstacle in obstacles {
        let to_obstacle = obstacle.center - agent.position;
        let clearance = obstacle.radius + agent.radius;

        // Already overlapping: push straight out.
        if to_obstacle.length() < clearance {
            let away = -to_obstacle.normalize_or_zero();
            let away = if away == Vec2::ZERO { -dir } else { away };
            let ahead = 0.0;
            if nearest.map_or(true, |(d, _)| ahead < d) {
                nearest = Some((ahead, away));
            }
            continue;
        }

        let ahead = to_obstacle.dot(dir);
        if ahead <= 0.0 || ahead > look_ahead {
            continue;
        }
        let lateral = to_obstacle - dir * ahead;
        if lateral.length() >= clearance {
            continue;
        }
        let side = if lateral == Vec2::ZERO { dir.perp() } else { lateral.normalize() };
        if nearest.map_or(true, |(d, _)| ahead < d) {
            nearest = Some((ahead, -side));
        }
    }

    match nearest {
        Some((ahead, away)) => {
            let urgency = if look_ahead > 0.0 {
                (1.0 - ahead / look_ahead).clamp(0.0, 1.0)
            } else {
                1.0
            };
            away * urgency.max(0.25)
        }
        None => Vec2::ZERO,
    }
}
