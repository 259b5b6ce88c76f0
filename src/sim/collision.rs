//! Collision detection and response for course walls
//!
//! One generic pass over the course's wall list, dispatching on the wall kind.
//! Detection returns a `CollisionResult`; response pushes the ball out of the
//! wall and reflects its velocity, damped by the restitution factor.

use glam::{Vec2, Vec3};

use super::course::{Course, FieldBounds, Wall};
use super::geometry::{BoxShape, PlaneSegment};
use super::state::Ball;
use crate::settings::PhysicsTuning;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at contact, pointing toward the ball centre
    pub normal: Vec3,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec3::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a ball against an axis-aligned box wall
pub fn ball_box_collision(ball_pos: Vec3, ball_radius: f32, wall: &BoxShape) -> CollisionResult {
    let closest = wall.closest_point(ball_pos);
    let offset = ball_pos - closest;
    let dist = offset.length();

    if dist >= ball_radius {
        return CollisionResult::miss();
    }

    // Centre on or inside the box: leave through the nearest side face
    if dist < 1e-6 {
        let (normal, depth) = wall.nearest_side_face(ball_pos);
        return CollisionResult {
            hit: true,
            normal,
            penetration: depth + ball_radius,
        };
    }

    CollisionResult {
        hit: true,
        normal: offset / dist,
        penetration: ball_radius - dist,
    }
}

/// Check a ball against a finite angled wall.
///
/// `ball_vel` only breaks the tie when the centre sits exactly on the plane.
pub fn ball_plane_collision(
    ball_pos: Vec3,
    ball_vel: Vec3,
    ball_radius: f32,
    wall: &PlaneSegment,
) -> CollisionResult {
    let d = wall.signed_distance(ball_pos);
    if d.abs() > ball_radius {
        return CollisionResult::miss();
    }

    let local = wall.to_local(ball_pos);
    if !wall.within_extents(local, ball_radius) {
        return CollisionResult::miss();
    }

    let n = wall.normal();
    let side = if d > 0.0 {
        1.0
    } else if d < 0.0 {
        -1.0
    } else if ball_vel.dot(n) > 0.0 {
        -1.0
    } else {
        1.0
    };
    let normal = n * side;

    CollisionResult {
        hit: true,
        normal,
        penetration: ball_radius - d.abs(),
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec3, normal: Vec3) -> Vec3 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Apply a collision to the ball. Returns the impact speed if the ball was
/// moving into the wall.
pub fn apply_collision(
    ball: &mut Ball,
    hit: &CollisionResult,
    tuning: &PhysicsTuning,
) -> Option<f32> {
    if !hit.hit {
        return None;
    }

    ball.pos += hit.normal * (hit.penetration + tuning.collision_epsilon);

    let approach = ball.vel.dot(hit.normal);
    if approach < 0.0 {
        ball.vel = reflect_velocity(ball.vel, hit.normal) * tuning.restitution;
        Some(-approach)
    } else {
        None
    }
}

/// Collide the ball with one wall
pub fn resolve_wall(ball: &mut Ball, wall: &Wall, tuning: &PhysicsTuning) -> Option<f32> {
    let hit = match wall {
        Wall::Box(shape) => ball_box_collision(ball.pos, ball.radius, shape),
        Wall::Angled(plane) => ball_plane_collision(ball.pos, ball.vel, ball.radius, plane),
    };
    apply_collision(ball, &hit, tuning)
}

/// Collide the ball with every wall of a course, in authored order.
///
/// Returns the hardest impact speed, if any wall was struck.
pub fn resolve_walls(ball: &mut Ball, course: &Course, tuning: &PhysicsTuning) -> Option<f32> {
    let mut impact: Option<f32> = None;
    for wall in &course.walls {
        if let Some(speed) = resolve_wall(ball, wall, tuning) {
            impact = Some(impact.map_or(speed, |s| s.max(speed)));
        }
    }
    impact
}

/// Keep the ball inside a rectangular field, negating and damping the velocity
/// component on each clamped axis. Returns the impact speed if clamped.
pub fn clamp_to_field(ball: &mut Ball, field: &FieldBounds, restitution: f32) -> Option<f32> {
    let min = field.center - field.half_extents + Vec2::splat(ball.radius);
    let max = field.center + field.half_extents - Vec2::splat(ball.radius);
    let mut impact: Option<f32> = None;

    let mut clamp_axis = |pos: &mut f32, vel: &mut f32, lo: f32, hi: f32| {
        let clamped = pos.clamp(lo, hi);
        if clamped != *pos {
            *pos = clamped;
            let speed = vel.abs();
            *vel = -*vel * restitution;
            impact = Some(impact.map_or(speed, |s: f32| s.max(speed)));
        }
    };

    clamp_axis(&mut ball.pos.x, &mut ball.vel.x, min.x, max.x);
    clamp_axis(&mut ball.pos.z, &mut ball.vel.z, min.y, max.y);
    impact
}
