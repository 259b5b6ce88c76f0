//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Walls resolved in authored order
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod camera;
pub mod collision;
pub mod course;
pub mod geometry;
pub mod progress;
pub mod scoring;
pub mod shot;
pub mod state;
pub mod tick;

pub use autoplay::Autoplayer;
pub use camera::Camera;
pub use collision::{CollisionResult, ball_box_collision, ball_plane_collision, resolve_walls};
pub use course::{Course, CourseBook, CourseError, Decoration, FieldBounds, Hole, Wall};
pub use geometry::{BoxShape, PlaneSegment, Ray};
pub use progress::{MenuAction, Transition};
pub use scoring::result_label;
pub use shot::{AimIndicator, ShotInput, ShotRelease, ShotState};
pub use state::{Ball, CourseResult, GameEvent, GameMode, GameSession};
pub use tick::{FixedStep, Intent, TickInput, step_ball, tick};
