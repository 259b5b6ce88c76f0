//! Course object lifecycle
//!
//! `PresentationBridge::sync` runs once per frame. When the session generation
//! changes (course start, return to title) every object of the previous course
//! is detached before the new course is attached. Model loads are tagged with
//! the generation that asked for them and dropped if it is no longer current.

use glam::{Vec2, Vec3};

use super::loader::{LoadError, LoadTicket, ModelHandle, ModelLoader};
use super::{ObjectId, Placement, Scene, SceneObject, SceneRenderer};
use crate::sim::{Camera, Course, GameSession, ShotInput, Wall};

/// Keeps the renderer's scene in step with the game session
#[derive(Debug)]
pub struct PresentationBridge {
    /// Generation whose course is currently attached
    generation: Option<u64>,
    next_id: u32,
    ball: ObjectId,
    aim_arrow: ObjectId,
    /// Everything owned by the attached course, models included
    course_objects: Vec<ObjectId>,
}

impl Default for PresentationBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationBridge {
    pub fn new() -> Self {
        Self {
            generation: None,
            next_id: 3,
            ball: ObjectId(1),
            aim_arrow: ObjectId(2),
            course_objects: Vec::new(),
        }
    }

    pub fn ball_id(&self) -> ObjectId {
        self.ball
    }

    pub fn aim_arrow_id(&self) -> ObjectId {
        self.aim_arrow
    }

    /// Objects belonging to the attached course
    pub fn course_objects(&self) -> &[ObjectId] {
        &self.course_objects
    }

    /// Bring the scene up to date with the session and draw a frame
    pub fn sync<R: SceneRenderer, L: ModelLoader>(
        &mut self,
        scene: &mut Scene<R>,
        session: &GameSession,
        shot: &ShotInput,
        camera: &Camera,
        loader: &mut L,
    ) {
        if self.generation != Some(session.generation) {
            self.rebuild(scene, session, loader);
        }

        for (ticket, result) in loader.drain_completed() {
            self.accept_model(scene, session, ticket, result);
        }

        match session.active_course() {
            Some(_) => {
                let ball = &session.ball;
                let object = SceneObject::Ball {
                    radius: ball.radius,
                };
                let placement = Placement::at(ball.pos);
                if !scene.attach(self.ball, &object, placement) {
                    scene.place(self.ball, placement);
                }
            }
            None => {
                scene.detach(self.ball);
            }
        }

        let aim = shot.aim();
        if aim.visible && session.active_course().is_some() {
            let placement = Placement::at(session.ball.pos)
                .with_yaw(yaw_of(aim.direction))
                .with_scale(shot.power_fraction());
            if !scene.attach(self.aim_arrow, &SceneObject::AimArrow, placement) {
                scene.place(self.aim_arrow, placement);
            }
        } else {
            scene.detach(self.aim_arrow);
        }

        scene.set_camera(camera);
        scene.draw();
    }

    fn rebuild<R: SceneRenderer, L: ModelLoader>(
        &mut self,
        scene: &mut Scene<R>,
        session: &GameSession,
        loader: &mut L,
    ) {
        for id in self.course_objects.drain(..) {
            scene.detach(id);
        }
        self.generation = Some(session.generation);

        let Some(course) = session.active_course() else {
            log::debug!("Scene cleared (generation {})", session.generation);
            return;
        };

        for (object, placement) in course_objects(course) {
            let id = self.allocate();
            scene.attach(id, &object, placement);
            self.course_objects.push(id);
        }

        for (decoration, item) in course.decorations.iter().enumerate() {
            loader.request(
                &item.model,
                LoadTicket {
                    generation: session.generation,
                    decoration,
                },
            );
        }

        log::debug!(
            "Scene built for course {} ({} objects, {} models requested)",
            course.index,
            self.course_objects.len(),
            course.decorations.len()
        );
    }

    fn accept_model<R: SceneRenderer>(
        &mut self,
        scene: &mut Scene<R>,
        session: &GameSession,
        ticket: LoadTicket,
        result: Result<ModelHandle, LoadError>,
    ) {
        if self.generation != Some(ticket.generation) {
            log::debug!(
                "Discarding model for stale generation {} (now {:?})",
                ticket.generation,
                self.generation
            );
            return;
        }

        let handle = match result {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("{}", e);
                return;
            }
        };

        let Some(item) = session
            .active_course()
            .and_then(|c| c.decorations.get(ticket.decoration))
        else {
            return;
        };

        let id = self.allocate();
        let placement = Placement::at(item.position)
            .with_yaw(item.yaw)
            .with_scale(item.scale);
        scene.attach(id, &SceneObject::Model { handle }, placement);
        self.course_objects.push(id);
    }

    fn allocate(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Static geometry of a course, in attach order
fn course_objects(course: &Course) -> Vec<(SceneObject, Placement)> {
    let mut objects = Vec::with_capacity(course.walls.len() + 3);

    let (min, max) = course.ground_bounds();
    let mid = (min + max) * 0.5;
    objects.push((
        SceneObject::Ground { size: max - min },
        Placement::at(Vec3::new(mid.x, 0.0, mid.y)),
    ));

    objects.push((
        SceneObject::Hole {
            radius: course.hole.radius,
            depth: course.hole.depth,
        },
        Placement::at(course.hole.center),
    ));

    for wall in &course.walls {
        let entry = match wall {
            Wall::Box(shape) => (
                SceneObject::BoxWall {
                    half_extents: shape.half_extents,
                },
                Placement::at(shape.center),
            ),
            Wall::Angled(plane) => (
                SceneObject::AngledWall {
                    length: plane.length,
                    height: plane.height,
                },
                Placement::at(plane.center).with_yaw(plane.yaw),
            ),
        };
        objects.push(entry);
    }

    if let Some(field) = &course.field {
        objects.push((
            SceneObject::Field {
                half_extents: field.half_extents,
            },
            Placement::at(Vec3::new(field.center.x, 0.0, field.center.y)),
        ));
    }

    objects
}

/// Yaw that turns local +X onto `dir` (same convention as angled walls)
fn yaw_of(dir: Vec3) -> f32 {
    let flat = Vec2::new(dir.x, dir.z);
    if flat == Vec2::ZERO {
        return 0.0;
    }
    (-flat.y).atan2(flat.x)
}
