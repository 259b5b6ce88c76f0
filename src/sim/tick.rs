//! Fixed timestep simulation tick
//!
//! Input handlers never touch the session directly: they queue `Intent`s, and
//! `tick` applies them before advancing the ball. Physics is integrated in
//! seconds, so behaviour does not depend on the display refresh rate.

use glam::Vec3;

use super::collision::{clamp_to_field, resolve_walls};
use super::course::Course;
use super::progress::MenuAction;
use super::scoring::complete_course;
use super::shot::ShotRelease;
use super::state::{Ball, GameEvent, GameMode, GameSession};
use crate::consts::*;
use crate::settings::PhysicsTuning;
use crate::{horizontal_distance, per_frame_decay};

/// Something the player asked for between ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Launch the ball
    Shot(ShotRelease),
    /// Menu button or continue key
    Menu(MenuAction),
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Applied in order at the top of the tick
    pub intents: Vec<Intent>,
}

impl TickInput {
    pub fn push(&mut self, intent: Intent) {
        self.intents.push(intent);
    }
}

/// What happened to the ball during one physics step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    /// Hardest wall impact speed
    pub impact: Option<f32>,
    /// Ball dropped into the cup this step
    pub sunk: bool,
    /// Failsafe moved the ball back to the start
    pub reset: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) {
    for intent in &input.intents {
        apply_intent(session, *intent);
    }

    // Ball is frozen outside play
    if session.mode != GameMode::Playing {
        return;
    }

    session.time_ticks += 1;

    let report = step_ball(&mut session.ball, &session.course, &session.tuning, dt);

    if let Some(speed) = report.impact {
        session.events.push(GameEvent::WallHit { speed });
    }
    if report.reset {
        session.events.push(GameEvent::BallReset);
    }
    if report.sunk {
        complete_course(session);
    }
}

fn apply_intent(session: &mut GameSession, intent: Intent) {
    match intent {
        Intent::Menu(action) => {
            session.apply(action);
        }
        Intent::Shot(shot) => {
            if session.mode != GameMode::Playing || session.ball.sunk {
                log::debug!("Dropping shot outside play");
                return;
            }
            session.ball.vel = shot.direction * shot.power * session.tuning.launch_speed_scale;
            session.strokes += 1;
            session.events.push(GameEvent::ShotTaken { power: shot.power });
            log::info!(
                "Stroke {} on course {} (power {:.2})",
                session.strokes,
                session.course_index,
                shot.power
            );
        }
    }
}

/// Advance the ball by `dt` seconds against a course
///
/// Order per substep: integrate, hole capture or surface clamp, walls, field
/// clamp, failsafe, friction. Capture wins over bounce: once sunk, walls are
/// no longer checked.
pub fn step_ball(
    ball: &mut Ball,
    course: &Course,
    tuning: &PhysicsTuning,
    dt: f32,
) -> StepReport {
    let mut report = StepReport::default();
    if ball.sunk {
        return report;
    }

    // Prevent tunneling through thin walls
    let speed = ball.speed();
    if speed > tuning.max_speed {
        ball.vel *= tuning.max_speed / speed;
    }

    // Keep each substep's travel under half a radius
    let travel = ball.speed() * dt;
    let substeps =
        ((travel / (ball.radius * 0.5)).ceil() as u32).clamp(1, MAX_COLLISION_SUBSTEPS);
    let h = dt / substeps as f32;

    for _ in 0..substeps {
        ball.pos += ball.vel * h;

        if horizontal_distance(ball.pos, course.hole.center) < course.hole.radius {
            let floor = course.hole.center.y - course.hole.depth;
            ball.vel.y = -tuning.sink_speed;
            if ball.pos.y <= floor {
                ball.pos.y = floor;
                ball.vel = Vec3::ZERO;
                ball.sunk = true;
                report.sunk = true;
                return report;
            }
        } else {
            ball.pos.y = SURFACE_Y;
            ball.vel.y = 0.0;
        }

        if let Some(speed) = resolve_walls(ball, course, tuning) {
            report.impact = Some(report.impact.map_or(speed, |s| s.max(speed)));
        }
        if let Some(field) = &course.field {
            if let Some(speed) = clamp_to_field(ball, field, tuning.restitution) {
                report.impact = Some(report.impact.map_or(speed, |s| s.max(speed)));
            }
        }

        if out_of_bounds(ball.pos, tuning) {
            log::warn!(
                "Ball escaped course {} at {:?}, resetting to start",
                course.index,
                ball.pos
            );
            ball.reset(course.start);
            report.reset = true;
            return report;
        }

        apply_friction(ball, course.friction, tuning.stop_speed, h);
    }

    report
}

/// Failsafe test: far outside any course, or fallen through the surface
fn out_of_bounds(pos: Vec3, tuning: &PhysicsTuning) -> bool {
    !pos.is_finite()
        || pos.x.abs() > tuning.out_of_bounds_limit
        || pos.z.abs() > tuning.out_of_bounds_limit
        || pos.y < SURFACE_Y - tuning.out_of_bounds_depth
}

/// Rolling friction on the horizontal velocity; slow balls snap to rest
pub fn apply_friction(ball: &mut Ball, friction: f32, stop_speed: f32, dt: f32) {
    let decay = per_frame_decay(friction, dt);
    ball.vel.x *= decay;
    ball.vel.z *= decay;

    if ball.vel.x.hypot(ball.vel.z) < stop_speed {
        ball.vel.x = 0.0;
        ball.vel.z = 0.0;
    }
}

/// Fixed-step accumulator driving `tick` from variable frame times
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many ticks as `frame_dt` covers. Intents are consumed by the
    /// first tick that runs; if none runs they wait for the next frame.
    pub fn advance(
        &mut self,
        session: &mut GameSession,
        input: &mut TickInput,
        frame_dt: f32,
    ) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            tick(session, input, SIM_DT);
            input.intents.clear();
            self.accumulator -= SIM_DT;
            steps += 1;
        }

        // Drop any backlog rather than spiral
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::course::CourseBook;
    use proptest::prelude::*;

    fn playing(course: u32) -> GameSession {
        let mut session = GameSession::with_builtin_courses().unwrap();
        session.apply(MenuAction::Play);
        if course != 1 {
            session.unlock(course);
            session.start_course(course);
        }
        session.drain_events();
        session
    }

    fn shot(direction: Vec3, power: f32) -> TickInput {
        TickInput {
            intents: vec![Intent::Shot(ShotRelease { direction, power })],
        }
    }

    #[test]
    fn test_shot_sets_velocity_and_counts_stroke() {
        let mut session = playing(1);
        tick(&mut session, &shot(Vec3::NEG_Z, 0.5), SIM_DT);

        assert_eq!(session.strokes, 1);
        assert!(session.ball.vel.z < 0.0);
        assert!(session.ball.pos.z < session.course.start.z);
        assert_eq!(session.events[0], GameEvent::ShotTaken { power: 0.5 });
    }

    #[test]
    fn test_shot_ignored_outside_playing() {
        let mut session = GameSession::with_builtin_courses().unwrap();
        tick(&mut session, &shot(Vec3::NEG_Z, 0.5), SIM_DT);
        assert_eq!(session.strokes, 0);
        assert!(session.ball.is_at_rest());

        let mut session = playing(1);
        session.mode = GameMode::WaitingForContinue;
        let before = session.ball;
        tick(&mut session, &shot(Vec3::NEG_Z, 0.5), SIM_DT);
        assert_eq!(session.strokes, 0);
        assert_eq!(session.ball, before);
    }

    #[test]
    fn test_menu_intent_routes_through_tick() {
        let mut session = GameSession::with_builtin_courses().unwrap();
        let input = TickInput {
            intents: vec![Intent::Menu(MenuAction::Play)],
        };
        tick(&mut session, &input, SIM_DT);
        assert_eq!(session.mode, GameMode::Playing);
        assert_eq!(session.events[0], GameEvent::CourseStarted(1));
    }

    #[test]
    fn test_ball_rolls_to_exact_rest() {
        let mut session = playing(1);
        tick(&mut session, &shot(Vec3::X, 0.1), SIM_DT);

        let idle = TickInput::default();
        for _ in 0..2400 {
            tick(&mut session, &idle, SIM_DT);
        }
        assert_eq!(session.ball.vel, Vec3::ZERO);
        assert_eq!(session.ball.pos.y, SURFACE_Y);
    }

    #[test]
    fn test_wall_bounce_keeps_ball_on_course() {
        let mut session = playing(1);
        tick(&mut session, &shot(Vec3::X, 1.0), SIM_DT);

        let idle = TickInput::default();
        for _ in 0..240 {
            tick(&mut session, &idle, SIM_DT);
            assert!(session.ball.pos.x <= 2.0 - session.ball.radius + 0.01);
        }
        assert!(
            session
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::WallHit { .. }))
        );
    }

    #[test]
    fn test_ball_over_hole_sinks_and_scores() {
        let mut session = playing(1);
        session.strokes = 1;
        session.ball.pos = session.course.hole.center;

        let idle = TickInput::default();
        for _ in 0..240 {
            tick(&mut session, &idle, SIM_DT);
        }
        assert!(session.ball.sunk);
        assert_eq!(session.ball.pos.y, -session.course.hole.depth);
        assert_eq!(session.mode, GameMode::WaitingForContinue);

        let sunk: Vec<_> = session
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::HoleSunk(_)))
            .collect();
        assert_eq!(sunk.len(), 1);
        assert_eq!(session.last_result.as_ref().unwrap().label, "Hole-in-One!");
    }

    #[test]
    fn test_fast_ball_skips_over_hole() {
        let course = CourseBook::builtin().unwrap().first().clone();
        let tuning = PhysicsTuning::default();
        let mut ball = Ball::new(course.hole.center + Vec3::new(0.0, 0.0, 0.35));
        ball.vel = Vec3::new(0.0, 0.0, -30.0);

        for _ in 0..6 {
            step_ball(&mut ball, &course, &tuning, SIM_DT);
        }
        assert!(!ball.sunk);
        assert_eq!(ball.pos.y, SURFACE_Y);
    }

    #[test]
    fn test_failsafe_resets_escaped_ball() {
        let mut session = playing(1);
        session.ball.pos = Vec3::new(80.0, 0.0, 0.0);
        session.ball.vel = Vec3::X;

        tick(&mut session, &TickInput::default(), SIM_DT);
        assert_eq!(session.ball.pos, session.course.start);
        assert!(session.ball.is_at_rest());
        assert!(session.events.contains(&GameEvent::BallReset));

        session.ball.pos = Vec3::new(f32::NAN, 0.0, 0.0);
        tick(&mut session, &TickInput::default(), SIM_DT);
        assert_eq!(session.ball.pos, session.course.start);
    }

    #[test]
    fn test_field_course_clamps_ball() {
        let mut session = playing(3);
        let field = session.course.field.unwrap();
        tick(&mut session, &shot(Vec3::NEG_X, 1.0), SIM_DT);

        let idle = TickInput::default();
        for _ in 0..240 {
            tick(&mut session, &idle, SIM_DT);
            let min_x = field.center.x - field.half_extents.x + session.ball.radius;
            assert!(session.ball.pos.x >= min_x - 1e-4);
        }
    }

    #[test]
    fn test_dogleg_bank_turns_ball_into_second_arm() {
        let course = playing(2).course;
        let tuning = PhysicsTuning::default();
        let mut ball = Ball::new(Vec3::ZERO);
        ball.vel = Vec3::new(0.0, 0.0, -20.0);

        let mut reached_second_arm = false;
        for _ in 0..600 {
            let report = step_ball(&mut ball, &course, &tuning, SIM_DT);
            assert!(!report.reset);
            if ball.pos.x > 4.0 {
                assert!(ball.pos.z < -2.0 && ball.pos.z > -6.0);
                reached_second_arm = true;
            }
        }
        assert!(reached_second_arm);
    }

    #[test]
    fn test_field_alone_contains_ball() {
        let book = CourseBook::from_json(
            r#"{ "courses": [ {
                "index": 1, "name": "Open Green", "par": 2,
                "start": [0, 0, 3],
                "hole": { "center": [0, 0, -3], "radius": 0.3, "depth": 0.5 },
                "field": { "center": [0, 0], "half_extents": [2, 5] }
            } ] }"#,
        )
        .unwrap();
        let course = book.first().clone();
        let tuning = PhysicsTuning::default();
        let mut ball = Ball::new(course.start);
        ball.vel = Vec3::new(-1.0, 0.0, 0.3).normalize() * tuning.max_speed;

        let mut bounced = false;
        for _ in 0..600 {
            let report = step_ball(&mut ball, &course, &tuning, SIM_DT);
            assert!(!report.reset);
            bounced |= report.impact.is_some();
            assert!(ball.pos.x.abs() <= 2.0 - ball.radius + 1e-4);
            assert!(ball.pos.z.abs() <= 5.0 - ball.radius + 1e-4);
        }
        assert!(bounced);
    }

    #[test]
    fn test_fixed_step_consumes_intents_once() {
        let mut session = playing(1);
        let mut stepper = FixedStep::new();
        let mut input = shot(Vec3::NEG_Z, 0.3);

        // Too short for a tick: the shot waits
        assert_eq!(stepper.advance(&mut session, &mut input, SIM_DT * 0.5), 0);
        assert_eq!(input.intents.len(), 1);

        assert_eq!(stepper.advance(&mut session, &mut input, SIM_DT * 2.0), 2);
        assert!(input.intents.is_empty());
        assert_eq!(session.strokes, 1);

        // Long stalls are capped
        assert_eq!(stepper.advance(&mut session, &mut input, 5.0), MAX_SUBSTEPS);
    }

    #[test]
    fn test_same_distance_at_any_frame_rate() {
        let run = |frame_dt: f32| {
            let mut session = playing(1);
            let mut stepper = FixedStep::new();
            let mut input = shot(Vec3::NEG_Z, 0.2);
            let mut elapsed = 0.0;
            while elapsed < 1.0 {
                stepper.advance(&mut session, &mut input, frame_dt);
                elapsed += frame_dt;
            }
            session.ball.pos
        };

        let at_60 = run(1.0 / 60.0);
        let at_144 = run(1.0 / 144.0);
        assert!((at_60 - at_144).length() < 0.2);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing(2);
        let mut b = playing(2);
        let inputs = [
            shot(Vec3::new(0.3, 0.0, -1.0).normalize(), 0.8),
            TickInput::default(),
            TickInput::default(),
        ];
        for _ in 0..200 {
            for input in &inputs {
                tick(&mut a, input, SIM_DT);
                tick(&mut b, input, SIM_DT);
            }
        }
        assert_eq!(a.ball, b.ball);
        assert_eq!(a.strokes, b.strokes);
        assert_eq!(a.time_ticks, b.time_ticks);
    }

    proptest! {
        #[test]
        fn prop_friction_reaches_exact_zero(
            vx in -60.0f32..60.0,
            vz in -60.0f32..60.0,
            friction in 0.5f32..0.995,
        ) {
            let mut ball = Ball::new(Vec3::ZERO);
            ball.vel = Vec3::new(vx, 0.0, vz);
            let speed = ball.speed().max(BALL_STOP_SPEED);

            // Frames needed to fall below the stop speed, plus slack
            let frames = ((BALL_STOP_SPEED / speed).ln() / friction.ln()).ceil() as u32 + 2;
            let ticks = frames * 2;

            for _ in 0..ticks {
                apply_friction(&mut ball, friction, BALL_STOP_SPEED, SIM_DT);
            }
            prop_assert_eq!(ball.vel, Vec3::ZERO);
        }

        #[test]
        fn prop_hole_capture_is_exact(
            offset_x in -0.25f32..0.25,
            offset_z in -0.25f32..0.25,
            start_y in -0.45f32..0.0,
        ) {
            let mut session = playing(1);
            let hole = session.course.hole;
            prop_assume!(offset_x.hypot(offset_z) < hole.radius * 0.9);

            session.ball.pos = hole.center + Vec3::new(offset_x, start_y, offset_z);
            session.ball.vel = Vec3::new(0.0, -session.tuning.sink_speed, 0.0);

            let floor = hole.center.y - hole.depth;
            let idle = TickInput::default();
            for _ in 0..600 {
                tick(&mut session, &idle, SIM_DT);
                prop_assert!(session.ball.pos.y >= floor);
                if session.ball.sunk {
                    break;
                }
            }
            prop_assert!(session.ball.sunk);
            prop_assert_eq!(session.ball.pos.y, floor);
            prop_assert_eq!(session.ball.vel, Vec3::ZERO);
            prop_assert_eq!(session.mode, GameMode::WaitingForContinue);
        }
    }
}
