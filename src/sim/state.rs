//! Game state and core simulation types
//!
//! Everything the tick, the input handlers and the presentation bridge share
//! lives in one `GameSession`, passed by reference into each of them.

use std::collections::BTreeSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::course::{Course, CourseBook, CourseError};
use crate::consts::BALL_RADIUS;
use crate::settings::PhysicsTuning;

/// Top-level game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Title menu
    Title,
    /// Course picker
    LevelSelect,
    /// Ball in play, physics running
    Playing,
    /// Ball sunk, waiting for the continue key
    WaitingForContinue,
}

/// The golf ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec3,
    pub vel: Vec3,
    pub radius: f32,
    /// Captured by the hole; terminal for the course
    pub sunk: bool,
}

impl Ball {
    pub fn new(start: Vec3) -> Self {
        Self {
            pos: start,
            vel: Vec3::ZERO,
            radius: BALL_RADIUS,
            sunk: false,
        }
    }

    /// Put the ball back on a start position, at rest
    pub fn reset(&mut self, start: Vec3) {
        self.pos = start;
        self.vel = Vec3::ZERO;
        self.sunk = false;
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    #[inline]
    pub fn is_at_rest(&self) -> bool {
        self.vel == Vec3::ZERO
    }
}

/// Outcome of a completed course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseResult {
    pub course: u32,
    pub strokes: u32,
    pub par: u32,
    /// "Birdie!", "Par", "3 Over Par", ...
    pub label: String,
    /// Running total after this course
    pub total_score: u32,
    /// True when this was the last course of the book
    pub final_course: bool,
}

/// Things that happened during a tick, for sound and overlays
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    CourseStarted(u32),
    ShotTaken { power: f32 },
    WallHit { speed: f32 },
    /// Failsafe put the ball back on the start position
    BallReset,
    HoleSunk(CourseResult),
    ReturnedToTitle,
}

/// Complete game session state
#[derive(Debug, Clone)]
pub struct GameSession {
    pub mode: GameMode,
    courses: CourseBook,
    /// 1-based index of the active course
    pub course_index: u32,
    /// Runtime copy of the active course
    pub course: Course,
    pub ball: Ball,
    /// Strokes on the active course
    pub strokes: u32,
    /// Cumulative strokes across the run
    pub total_score: u32,
    unlocked: BTreeSet<u32>,
    pub last_result: Option<CourseResult>,
    /// Events raised since the frontend last drained them
    pub events: Vec<GameEvent>,
    /// Bumped on every course switch and return to title
    pub generation: u64,
    pub tuning: PhysicsTuning,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameSession {
    /// Create a session sitting at the title screen
    pub fn new(courses: CourseBook, tuning: PhysicsTuning) -> Self {
        let course = courses.first().clone();
        let ball = Ball::new(course.start);
        Self {
            mode: GameMode::Title,
            courses,
            course_index: 1,
            course,
            ball,
            strokes: 0,
            total_score: 0,
            unlocked: BTreeSet::from([1]),
            last_result: None,
            events: Vec::new(),
            generation: 0,
            tuning,
            time_ticks: 0,
        }
    }

    /// Session over the built-in courses with default tuning
    pub fn with_builtin_courses() -> Result<Self, CourseError> {
        Ok(Self::new(CourseBook::builtin()?, PhysicsTuning::default()))
    }

    pub fn courses(&self) -> &CourseBook {
        &self.courses
    }

    pub fn course_count(&self) -> u32 {
        self.courses.len()
    }

    pub fn is_unlocked(&self, index: u32) -> bool {
        self.unlocked.contains(&index)
    }

    /// Number of unlocked courses
    pub fn unlocked_count(&self) -> u32 {
        self.unlocked.len() as u32
    }

    /// Unlock a course; never re-locks
    pub(crate) fn unlock(&mut self, index: u32) {
        if index >= 1 && index <= self.course_count() {
            self.unlocked.insert(index);
        }
    }

    /// Take the pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// The course currently on the green, if any
    pub fn active_course(&self) -> Option<&Course> {
        match self.mode {
            GameMode::Playing | GameMode::WaitingForContinue => Some(&self.course),
            GameMode::Title | GameMode::LevelSelect => None,
        }
    }

    /// Load course `index` and put the ball in play
    pub(crate) fn start_course(&mut self, index: u32) -> bool {
        let Some(course) = self.courses.get(index).cloned() else {
            log::debug!("No course {} to start", index);
            return false;
        };

        self.mode = GameMode::Playing;
        self.course_index = index;
        self.strokes = 0;
        self.last_result = None;
        self.ball = Ball::new(course.start);
        self.course = course;
        self.generation += 1;
        self.events.push(GameEvent::CourseStarted(index));

        log::info!(
            "Course {} '{}' started (par {})",
            index,
            self.course.name,
            self.course.par
        );
        true
    }

    /// Back to the title screen; run state is cleared, unlocks are kept
    pub(crate) fn return_to_title(&mut self) {
        self.mode = GameMode::Title;
        self.course_index = 1;
        self.strokes = 0;
        self.total_score = 0;
        self.last_result = None;
        self.course = self.courses.first().clone();
        self.ball = Ball::new(self.course.start);
        self.generation += 1;
        self.events.push(GameEvent::ReturnedToTitle);

        log::info!("Returned to title");
    }
}
