//! Camera pose and screen-space queries
//!
//! The renderer owns the actual projection; the simulation only needs enough of
//! it to turn a pointer position into a world ray and to aim shots relative to
//! where the camera is looking.

use glam::{Mat4, Vec2, Vec3};

use super::geometry::Ray;
use crate::horizontal;

/// Vertical field of view used by the game view (75 degrees)
pub const DEFAULT_FOV_Y: f32 = 75.0 * std::f32::consts::PI / 180.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

/// Follow camera placement relative to the ball
const FOLLOW_DISTANCE: f32 = 3.0;
const FOLLOW_HEIGHT: f32 = 2.0;
const FOLLOW_LEAD: f32 = 1.0;

/// Perspective camera pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    /// Viewport size in CSS pixels
    pub viewport: Vec2,
}

impl Camera {
    pub fn new(eye: Vec3, target: Vec3, viewport: Vec2) -> Self {
        Self {
            eye,
            target,
            fov_y: DEFAULT_FOV_Y,
            viewport,
        }
    }

    /// Sit behind the ball, looking past it toward the hole
    pub fn follow(ball: Vec3, hole: Vec3, viewport: Vec2) -> Self {
        let mut dir = horizontal(hole - ball).normalize_or_zero();
        if dir == Vec3::ZERO {
            dir = Vec3::NEG_Z;
        }
        let eye = ball - dir * FOLLOW_DISTANCE + Vec3::Y * FOLLOW_HEIGHT;
        Self::new(eye, ball + dir * FOLLOW_LEAD, viewport)
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        if self.viewport.y > 0.0 {
            self.viewport.x / self.viewport.y
        } else {
            1.0
        }
    }

    /// Unit look direction
    #[inline]
    pub fn look_dir(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }

    pub fn view_proj(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect(), NEAR, FAR);
        let view = Mat4::look_at_rh(self.eye, self.target, Vec3::Y);
        proj * view
    }

    /// World-space ray through a screen point (origin top-left, y down)
    pub fn screen_ray(&self, screen: Vec2) -> Ray {
        let w = self.viewport.x.max(1.0);
        let h = self.viewport.y.max(1.0);
        let ndc_x = 2.0 * screen.x / w - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / h;

        let inv = self.view_proj().inverse();
        let near = inv.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
        Ray::new(near, far - near)
    }

    /// Camera-relative horizontal basis used for aiming: `(forward, right)`.
    ///
    /// forward is the look direction flattened onto the ground; right is
    /// `up x forward`. Looking straight down falls back to -Z.
    pub fn horizontal_basis(&self) -> (Vec3, Vec3) {
        let mut forward = horizontal(self.look_dir()).normalize_or_zero();
        if forward == Vec3::ZERO {
            forward = Vec3::NEG_Z;
        }
        let right = Vec3::Y.cross(forward).normalize_or_zero();
        (forward, right)
    }
}
