//! Mini Golf - a browser 3D mini-golf game
//!
//! Core modules:
//! - `sim`: Deterministic gameplay (shot input, physics, collisions, progression)
//! - `scene`: Presentation bridge to an external scene renderer and model loader
//! - `settings`: Tunable input/physics/audio configuration
//! - `audio`: Sound cues for game events, played through Web Audio

pub mod audio;
pub mod scene;
pub mod settings;
pub mod sim;

pub use settings::{InputTuning, PhysicsTuning, Settings};

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the accumulator will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Collision substeps per tick for fast balls
    pub const MAX_COLLISION_SUBSTEPS: u32 = 8;

    /// Rate at which per-frame coefficients (friction, smoothing) are authored
    pub const REFERENCE_HZ: f32 = 60.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.2;
    /// Launch speed (units/s) per unit of shot power
    pub const LAUNCH_SPEED_SCALE: f32 = 60.0;
    /// Speed clamp, keeps per-step displacement below wall thickness
    pub const BALL_MAX_SPEED: f32 = 60.0;
    /// Below this speed (units/s) the ball snaps to rest
    pub const BALL_STOP_SPEED: f32 = 0.05;

    /// Wall bounce energy retention
    pub const RESTITUTION: f32 = 0.72;
    /// Extra push-out after resolving a penetration
    pub const COLLISION_EPSILON: f32 = 0.001;
    /// Default rolling friction per reference frame
    pub const DEFAULT_FRICTION: f32 = 0.98;

    /// Descent speed while over the hole (units/s)
    pub const SINK_SPEED: f32 = 1.2;

    /// Failsafe: horizontal escape limit, course independent
    pub const OUT_OF_BOUNDS_LIMIT: f32 = 50.0;
    /// Failsafe: how far below the surface counts as an escape
    pub const OUT_OF_BOUNDS_DEPTH: f32 = 5.0;

    /// Shot power per screen pixel of drag
    pub const DRAG_SENSITIVITY: f32 = 0.005;
    /// Shot power clamp
    pub const MAX_POWER: f32 = 1.0;
    /// Power meter smoothing factor per reference frame
    pub const POWER_SMOOTHING: f32 = 0.1;

    /// Height of the playing surface (ball centre rests here)
    pub const SURFACE_Y: f32 = 0.0;
}

/// Drop the vertical component of a vector
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Project a world point onto the ground plane (x, z)
#[inline]
pub fn ground(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Distance between two points ignoring height
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    ground(a).distance(ground(b))
}

/// Convert a per-reference-frame decay factor into the factor for `dt` seconds.
///
/// `per_frame_decay(0.98, 1.0 / 60.0)` is exactly `0.98`.
#[inline]
pub fn per_frame_decay(factor: f32, dt: f32) -> f32 {
    factor.powf(dt * consts::REFERENCE_HZ)
}

/// Exponential smoothing toward `target` at `rate` per reference frame
#[inline]
pub fn smooth_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let keep = per_frame_decay(1.0 - rate, dt);
    target + (current - target) * keep
}
