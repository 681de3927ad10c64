//! Polyline queries for patrol paths.

use glam::Vec2;
use valsrevenge_core::components::PatrolPath;

/// Closest point on a path to some query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathProjection {
    pub point: Vec2,
    /// Arc length from the first node to `point`.
    pub distance_along: f32,
    /// Distance from the query point to `point`.
    pub offset: f32,
}

/// Segments in traversal order, including the closing segment of a
/// cyclical path.
pub fn segments(path: &PatrolPath) -> Vec<(Vec2, Vec2)> {
    let nodes = &path.nodes;
    let mut out: Vec<(Vec2, Vec2)> = nodes.windows(2).map(|w| (w[0], w[1])).collect();
    if path.cyclical && nodes.len() > 2 {
        if let (Some(&last), Some(&first)) = (nodes.last(), nodes.first()) {
            out.push((last, first));
        }
    }
    out
}

pub fn length(path: &PatrolPath) -> f32 {
    segments(path).iter().map(|(a, b)| a.distance(*b)).sum()
}

/// Project `point` onto the path. `None` for a path with no nodes.
pub fn project(path: &PatrolPath, point: Vec2) -> Option<PathProjection> {
    let first = *path.nodes.first()?;
    let mut best = PathProjection {
        point: first,
        distance_along: 0.0,
        offset: point.distance(first),
    };
    let mut travelled = 0.0;
    for (a, b) in segments(path) {
        let ab = b - a;
        let len_sq = ab.length_squared();
        let t = if len_sq > 0.0 {
            ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let candidate = a + ab * t;
        let offset = point.distance(candidate);
        if offset < best.offset {
            best = PathProjection {
                point: candidate,
                distance_along: travelled + len_sq.sqrt() * t,
                offset,
            };
        }
        travelled += len_sq.sqrt();
    }
    Some(best)
}

/// Point at arc length `distance` from the first node. Cyclical paths wrap
/// in both directions; open paths clamp to their ends.
pub fn point_at(path: &PatrolPath, distance: f32) -> Option<Vec2> {
    let first = *path.nodes.first()?;
    let total = length(path);
    if total <= 0.0 {
        return Some(first);
    }
    let mut remaining = if path.cyclical {
        distance.rem_euclid(total)
    } else {
        distance.clamp(0.0, total)
    };
    for (a, b) in segments(path) {
        let len = a.distance(b);
        if remaining <= len {
            if len <= 0.0 {
                return Some(a);
            }
            return Some(a.lerp(b, remaining / len));
        }
        remaining -= len;
    }
    path.nodes.last().copied()
}
