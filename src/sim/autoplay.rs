//! Demo autoplayer
//!
//! Picks shots by trying a fan of candidates through the real ball physics
//! and keeping the one that ends nearest the cup. A seeded RNG adds a little
//! aim error so runs differ by seed but replay exactly for the same seed.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::course::Course;
use super::progress::MenuAction;
use super::shot::ShotRelease;
use super::state::{Ball, CourseResult, GameEvent, GameMode, GameSession};
use super::tick::{Intent, TickInput, step_ball, tick};
use crate::consts::*;
use crate::horizontal_distance;
use crate::settings::PhysicsTuning;

/// Directions tried per shot
const CANDIDATE_ANGLES: u32 = 36;
/// Power levels tried per direction
const CANDIDATE_POWERS: [f32; 6] = [0.1, 0.2, 0.35, 0.5, 0.7, 0.9];
/// Extra power on the direct putt so it reaches the cup
const PUTT_MARGIN: f32 = 0.1;
/// Longest roll simulated per candidate (seconds)
const LOOKAHEAD_SECS: f32 = 12.0;
/// Strokes before the autoplayer gives up on a course
pub const MAX_STROKES: u32 = 15;

/// Seeded shot chooser
#[derive(Debug, Clone)]
pub struct Autoplayer {
    rng: Pcg32,
    /// Aim error bound (radians)
    pub jitter: f32,
}

impl Autoplayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            jitter: 0.02,
        }
    }

    /// Next shot, if the ball is in play and at rest
    pub fn choose_shot(&mut self, session: &GameSession) -> Option<ShotRelease> {
        if session.mode != GameMode::Playing || session.ball.sunk {
            return None;
        }
        if !session.ball.is_at_rest() {
            return None;
        }

        let best = plan_shot(&session.course, &session.tuning, session.ball.pos);

        let angle = best.direction.z.atan2(best.direction.x);
        let angle = if self.jitter > 0.0 {
            angle + self.rng.random_range(-self.jitter..=self.jitter)
        } else {
            angle
        };
        Some(ShotRelease {
            direction: Vec3::new(angle.cos(), 0.0, angle.sin()),
            power: best.power,
        })
    }

    /// Play every course from the title screen and return the results.
    ///
    /// Stops early if a course takes more than `MAX_STROKES`.
    pub fn play_run(&mut self, session: &mut GameSession) -> Vec<CourseResult> {
        let mut results = Vec::new();
        let max_ticks = (LOOKAHEAD_SECS / SIM_DT) as u32 * 2;

        let mut input = TickInput::default();
        input.push(Intent::Menu(MenuAction::Play));
        tick(session, &input, SIM_DT);

        while session.mode == GameMode::Playing {
            if session.strokes >= MAX_STROKES {
                log::warn!(
                    "Autoplay giving up on course {} after {} strokes",
                    session.course_index,
                    session.strokes
                );
                break;
            }

            let mut input = TickInput::default();
            if let Some(shot) = self.choose_shot(session) {
                input.push(Intent::Shot(shot));
            }
            tick(session, &input, SIM_DT);

            // Let the ball settle
            let idle = TickInput::default();
            let mut ticks = 0;
            while session.mode == GameMode::Playing
                && !session.ball.is_at_rest()
                && ticks < max_ticks
            {
                tick(session, &idle, SIM_DT);
                ticks += 1;
            }

            for event in session.drain_events() {
                if let GameEvent::HoleSunk(result) = event {
                    results.push(result);
                }
            }

            if session.mode == GameMode::WaitingForContinue {
                let mut input = TickInput::default();
                input.push(Intent::Menu(MenuAction::Continue));
                tick(session, &input, SIM_DT);
                session.drain_events();
            }
        }

        results
    }
}

/// Best deterministic shot from `from`: sinks if any candidate sinks, else
/// ends nearest the hole
pub fn plan_shot(course: &Course, tuning: &PhysicsTuning, from: Vec3) -> ShotRelease {
    let to_hole = course.hole.center - from;
    let direct = Vec3::new(to_hole.x, 0.0, to_hole.z).normalize_or_zero();

    let mut candidates =
        Vec::with_capacity(CANDIDATE_ANGLES as usize * CANDIDATE_POWERS.len() + 1);
    if direct != Vec3::ZERO {
        let power = putt_power(horizontal_distance(from, course.hole.center), course, tuning);
        candidates.push(ShotRelease {
            direction: direct,
            power,
        });
    }
    for i in 0..CANDIDATE_ANGLES {
        let angle = i as f32 * std::f32::consts::TAU / CANDIDATE_ANGLES as f32;
        let direction = Vec3::new(angle.cos(), 0.0, angle.sin());
        for power in CANDIDATE_POWERS {
            candidates.push(ShotRelease { direction, power });
        }
    }

    let mut best = candidates[0];
    let mut best_score = f32::INFINITY;
    for shot in candidates {
        let score = score_shot(course, tuning, from, shot);
        if score < best_score {
            best_score = score;
            best = shot;
        }
    }
    best
}

/// Power that rolls the ball `distance` on flat ground, plus a margin.
///
/// Under per-frame friction `f` a launch at `v0` rolls `v0 / (60 ln(1/f))`.
pub fn putt_power(distance: f32, course: &Course, tuning: &PhysicsTuning) -> f32 {
    let decay_rate = REFERENCE_HZ * (1.0 / course.friction).ln();
    let launch = distance * decay_rate * (1.0 + PUTT_MARGIN);
    (launch / tuning.launch_speed_scale).clamp(0.0, MAX_POWER)
}

/// Lower is better: 0 when the shot sinks
fn score_shot(course: &Course, tuning: &PhysicsTuning, from: Vec3, shot: ShotRelease) -> f32 {
    let mut ball = Ball::new(from);
    ball.vel = shot.direction * shot.power * tuning.launch_speed_scale;

    let steps = (LOOKAHEAD_SECS / SIM_DT) as u32;
    for _ in 0..steps {
        let report = step_ball(&mut ball, course, tuning, SIM_DT);
        if report.sunk {
            return 0.0;
        }
        if report.reset {
            return f32::INFINITY;
        }
        if ball.is_at_rest() {
            break;
        }
    }
    horizontal_distance(ball.pos, course.hole.center) + 1.0
}
