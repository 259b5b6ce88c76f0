//! Course definitions
//!
//! A course is authored data: a wall list, one hole, a ball start position and
//! a par. Adding a course means adding an entry to `courses.json`, never code.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::geometry::{BoxShape, PlaneSegment, degrees};
use crate::consts::DEFAULT_FRICTION;

/// Built-in course book, embedded at compile time
const BUILTIN_COURSES: &str = include_str!("courses.json");

/// Errors raised while loading or validating course data.
#[derive(Debug, thiserror::Error)]
pub enum CourseError {
    #[error("Course data parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Course book contains no courses")]
    NoCourses,

    #[error("Course {course} has neither walls nor a field")]
    NoBoundary { course: u32 },

    #[error("Course {course} has par below 1")]
    InvalidPar { course: u32 },

    #[error("Course {course} hole needs positive radius and depth")]
    InvalidHole { course: u32 },

    #[error("Course {course} friction {friction} is outside (0, 1)")]
    InvalidFriction { course: u32, friction: f32 },

    #[error("Course {course} wall {wall} has a non-positive extent")]
    InvalidWall { course: u32, wall: usize },

    #[error("Expected course index {expected}, found {found}")]
    IndexMismatch { expected: u32, found: u32 },
}

/// Collision geometry variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Wall {
    /// Axis-aligned prism
    Box(BoxShape),
    /// Finite vertical plane at any yaw
    Angled(PlaneSegment),
}

impl Wall {
    fn is_valid(&self) -> bool {
        match self {
            Wall::Box(b) => b.half_extents.cmpgt(Vec3::ZERO).all(),
            Wall::Angled(p) => p.length > 0.0 && p.height > 0.0,
        }
    }

    /// Ground-plane corners used to size the green
    fn ground_points(&self) -> [Vec2; 2] {
        match self {
            Wall::Box(b) => [Vec2::new(b.min().x, b.min().z), Vec2::new(b.max().x, b.max().z)],
            Wall::Angled(p) => {
                let (a, b) = p.endpoints();
                [Vec2::new(a.x, a.z), Vec2::new(b.x, b.z)]
            }
        }
    }
}

/// The cup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub center: Vec3,
    pub radius: f32,
    pub depth: f32,
}

/// Rectangular play field for courses that clamp instead of colliding with walls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldBounds {
    /// Centre on the ground plane (x, z)
    pub center: Vec2,
    pub half_extents: Vec2,
}

/// Decorative model placement (not part of gameplay)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    /// Asset name handed to the model loader
    pub model: String,
    pub position: Vec3,
    #[serde(default, rename = "yaw_deg", with = "degrees")]
    pub yaw: f32,
    #[serde(default = "unit_scale")]
    pub scale: f32,
}

fn unit_scale() -> f32 {
    1.0
}

fn default_friction() -> f32 {
    DEFAULT_FRICTION
}

/// One playable hole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// 1-based position in the course book
    pub index: u32,
    pub name: String,
    pub par: u32,
    /// Ball start position
    pub start: Vec3,
    pub hole: Hole,
    /// Rolling friction per reference frame
    #[serde(default = "default_friction")]
    pub friction: f32,
    #[serde(default)]
    pub walls: Vec<Wall>,
    #[serde(default)]
    pub field: Option<FieldBounds>,
    #[serde(default)]
    pub decorations: Vec<Decoration>,
}

impl Course {
    /// Check the invariants every course must satisfy
    pub fn validate(&self) -> Result<(), CourseError> {
        let course = self.index;
        // A field clamp is a boundary of its own
        if self.walls.is_empty() && self.field.is_none() {
            return Err(CourseError::NoBoundary { course });
        }
        if self.par < 1 {
            return Err(CourseError::InvalidPar { course });
        }
        if !(self.hole.radius > 0.0 && self.hole.depth > 0.0) {
            return Err(CourseError::InvalidHole { course });
        }
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(CourseError::InvalidFriction {
                course,
                friction: self.friction,
            });
        }
        if let Some(wall) = self.walls.iter().position(|w| !w.is_valid()) {
            return Err(CourseError::InvalidWall { course, wall });
        }
        Ok(())
    }

    /// Ground-plane extent covering every wall, the field, start and hole: `(min, max)`
    pub fn ground_bounds(&self) -> (Vec2, Vec2) {
        let mut min = Vec2::new(self.start.x, self.start.z);
        let mut max = min;
        let mut include = |p: Vec2| {
            min = min.min(p);
            max = max.max(p);
        };

        include(Vec2::new(self.hole.center.x, self.hole.center.z));
        for wall in &self.walls {
            for p in wall.ground_points() {
                include(p);
            }
        }
        if let Some(field) = &self.field {
            include(field.center - field.half_extents);
            include(field.center + field.half_extents);
        }
        (min, max)
    }
}

/// Ordered set of courses, indexed 1..=N
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseBook {
    courses: Vec<Course>,
}

impl CourseBook {
    /// The courses shipped with the game
    pub fn builtin() -> Result<Self, CourseError> {
        Self::from_json(BUILTIN_COURSES)
    }

    /// Parse and validate a course book
    pub fn from_json(json: &str) -> Result<Self, CourseError> {
        let book: CourseBook = serde_json::from_str(json)?;
        book.validate()?;
        Ok(book)
    }

    /// Build from already-constructed courses (validated)
    pub fn new(courses: Vec<Course>) -> Result<Self, CourseError> {
        let book = Self { courses };
        book.validate()?;
        Ok(book)
    }

    fn validate(&self) -> Result<(), CourseError> {
        if self.courses.is_empty() {
            return Err(CourseError::NoCourses);
        }
        for (i, course) in self.courses.iter().enumerate() {
            let expected = i as u32 + 1;
            if course.index != expected {
                return Err(CourseError::IndexMismatch {
                    expected,
                    found: course.index,
                });
            }
            course.validate()?;
        }
        Ok(())
    }

    /// Course by 1-based index
    pub fn get(&self, index: u32) -> Option<&Course> {
        let i = index.checked_sub(1)? as usize;
        self.courses.get(i)
    }

    /// Course 1; a validated book is never empty
    pub fn first(&self) -> &Course {
        &self.courses[0]
    }

    pub fn len(&self) -> u32 {
        self.courses.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Course> {
        self.courses.iter()
    }
}
