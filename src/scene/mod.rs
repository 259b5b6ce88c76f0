//! Presentation bridge
//!
//! The game does not draw anything itself. An external scene renderer owns the
//! meshes; this module tells it what exists (`attach`/`detach`), where things
//! are (`place`), where the camera is, and when to draw. Decorative models come
//! from an asynchronous `ModelLoader`.

pub mod bridge;
pub mod hud;
pub mod loader;

pub use bridge::PresentationBridge;
pub use hud::{HudView, LevelButton};
pub use loader::{LoadError, LoadTicket, ModelHandle, ModelLoader};

use std::collections::BTreeSet;

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::sim::Camera;

/// Renderer-side identity of a placed object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ObjectId(pub u32);

/// Pose of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub position: Vec3,
    /// Rotation about +Y (radians)
    pub yaw: f32,
    pub scale: f32,
}

impl Placement {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            scale: 1.0,
        }
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

/// What the renderer should build for an id
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneObject {
    /// Green covering the course extent (x, z)
    Ground { size: Vec2 },
    Ball { radius: f32 },
    Hole { radius: f32, depth: f32 },
    BoxWall { half_extents: Vec3 },
    AngledWall { length: f32, height: f32 },
    /// Rectangular border of a field-bounded course
    Field { half_extents: Vec2 },
    /// Loaded decorative model
    Model { handle: ModelHandle },
    /// Shot direction arrow; placement scale is the power fraction
    AimArrow,
}

/// The external renderer
pub trait SceneRenderer {
    fn attach(&mut self, id: ObjectId, object: &SceneObject, placement: Placement);
    fn detach(&mut self, id: ObjectId);
    fn place(&mut self, id: ObjectId, placement: Placement);
    fn set_camera(&mut self, camera: &Camera);
    fn draw(&mut self);
}

/// Renderer wrapper that tracks which objects are attached.
///
/// Attaching an attached id, detaching an unknown id or placing an unknown id
/// is a no-op and never reaches the renderer.
pub struct Scene<R: SceneRenderer> {
    renderer: R,
    attached: BTreeSet<ObjectId>,
}

impl<R: SceneRenderer> Scene<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            attached: BTreeSet::new(),
        }
    }

    /// Returns false if `id` was already attached
    pub fn attach(&mut self, id: ObjectId, object: &SceneObject, placement: Placement) -> bool {
        if !self.attached.insert(id) {
            return false;
        }
        self.renderer.attach(id, object, placement);
        true
    }

    /// Returns false if `id` was not attached
    pub fn detach(&mut self, id: ObjectId) -> bool {
        if !self.attached.remove(&id) {
            return false;
        }
        self.renderer.detach(id);
        true
    }

    pub fn place(&mut self, id: ObjectId, placement: Placement) {
        if self.attached.contains(&id) {
            self.renderer.place(id, placement);
        }
    }

    pub fn is_attached(&self, id: ObjectId) -> bool {
        self.attached.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    pub fn set_camera(&mut self, camera: &Camera) {
        self.renderer.set_camera(camera);
    }

    pub fn draw(&mut self) {
        self.renderer.draw();
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
