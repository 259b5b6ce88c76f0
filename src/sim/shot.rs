//! Shot input state machine
//!
//! Drag-to-shoot: press on the ball, pull back, release. The drag vector in
//! screen space becomes a direction on the ground (relative to the camera) and
//! a power. Releasing yields a `ShotRelease` for the next tick to apply; the
//! ball itself is never touched here.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::geometry::ray_sphere;
use super::state::{GameMode, GameSession};
use crate::settings::InputTuning;
use crate::smooth_toward;

/// Gesture state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotState {
    Idle,
    /// Dragging from `start`, last seen at `current` (screen pixels)
    Aiming { start: Vec2, current: Vec2 },
}

/// A released shot, queued as an intent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotRelease {
    /// Unit direction on the ground plane
    pub direction: Vec3,
    /// Shot power in `[0, max_power]`
    pub power: f32,
}

/// Aim arrow and power meter presentation state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AimIndicator {
    pub visible: bool,
    pub direction: Vec3,
    /// Power the gesture currently asks for
    pub target_power: f32,
    /// Smoothed power shown by the meter
    pub displayed_power: f32,
}

/// Shot input handler
#[derive(Debug, Clone)]
pub struct ShotInput {
    state: ShotState,
    tuning: InputTuning,
    aim: AimIndicator,
}

impl ShotInput {
    pub fn new(tuning: InputTuning) -> Self {
        Self {
            state: ShotState::Idle,
            tuning,
            aim: AimIndicator::default(),
        }
    }

    pub fn state(&self) -> ShotState {
        self.state
    }

    pub fn is_aiming(&self) -> bool {
        matches!(self.state, ShotState::Aiming { .. })
    }

    /// Camera orbit is only allowed while no shot is being lined up
    pub fn orbit_enabled(&self) -> bool {
        !self.is_aiming()
    }

    pub fn aim(&self) -> &AimIndicator {
        &self.aim
    }

    /// Power meter fill in `[0, 1]`
    pub fn power_fraction(&self) -> f32 {
        if self.tuning.max_power <= 0.0 {
            return 0.0;
        }
        (self.aim.displayed_power / self.tuning.max_power).clamp(0.0, 1.0)
    }

    /// Pointer pressed. Starts aiming if the press lands on the ball.
    pub fn pointer_down(&mut self, session: &GameSession, camera: &Camera, screen: Vec2) -> bool {
        if !self.accepts_input(session) {
            return false;
        }

        let ray = camera.screen_ray(screen);
        if ray_sphere(&ray, session.ball.pos, session.ball.radius).is_none() {
            return false;
        }

        self.state = ShotState::Aiming {
            start: screen,
            current: screen,
        };
        self.aim = AimIndicator {
            visible: true,
            ..AimIndicator::default()
        };
        log::debug!("Aiming from {:?}", screen);
        true
    }

    /// Pointer moved while possibly aiming
    pub fn pointer_move(&mut self, session: &GameSession, camera: &Camera, screen: Vec2) {
        if !self.accepts_input(session) {
            return;
        }
        let ShotState::Aiming { start, .. } = self.state else {
            return;
        };

        self.state = ShotState::Aiming {
            start,
            current: screen,
        };
        let shot = self.shot_from_drag(camera, screen - start);
        self.aim.direction = shot.direction;
        self.aim.target_power = shot.power;
    }

    /// Pointer released. A zero-power release cancels the shot.
    pub fn pointer_up(
        &mut self,
        session: &GameSession,
        camera: &Camera,
        screen: Vec2,
    ) -> Option<ShotRelease> {
        if !self.accepts_input(session) {
            return None;
        }
        let ShotState::Aiming { start, .. } = self.state else {
            return None;
        };

        let shot = self.shot_from_drag(camera, screen - start);
        self.reset();

        if shot.power <= 0.0 || shot.direction == Vec3::ZERO {
            log::debug!("Shot cancelled (no drag)");
            return None;
        }
        Some(shot)
    }

    /// Advance the power meter smoothing by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.aim.displayed_power = smooth_toward(
            self.aim.displayed_power,
            self.aim.target_power,
            self.tuning.power_smoothing,
            dt,
        );
    }

    /// Drop any gesture in progress and hide the indicators
    pub fn reset(&mut self) {
        self.state = ShotState::Idle;
        self.aim = AimIndicator::default();
    }

    /// Input only counts while playing; any other mode forces the machine idle
    fn accepts_input(&mut self, session: &GameSession) -> bool {
        if session.mode == GameMode::Playing {
            return true;
        }
        if self.is_aiming() {
            self.reset();
        }
        false
    }

    fn shot_from_drag(&self, camera: &Camera, drag: Vec2) -> ShotRelease {
        let (forward, right) = camera.horizontal_basis();
        let direction = (forward * drag.y + right * drag.x).normalize_or_zero();
        let power = (drag.length() * self.tuning.drag_sensitivity).min(self.tuning.max_power);
        ShotRelease { direction, power }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::progress::MenuAction;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn playing() -> (GameSession, Camera) {
        let mut session = GameSession::with_builtin_courses().unwrap();
        session.apply(MenuAction::Play);
        // Looking down -Z at the ball from behind and above
        let ball = session.ball.pos;
        let camera = Camera::new(ball + Vec3::new(0.0, 2.0, 3.0), ball, VIEWPORT);
        (session, camera)
    }

    fn center() -> Vec2 {
        VIEWPORT * 0.5
    }

    #[test]
    fn test_press_on_ball_starts_aiming() {
        let (session, camera) = playing();
        let mut shot = ShotInput::new(InputTuning::default());
        assert!(shot.orbit_enabled());

        assert!(shot.pointer_down(&session, &camera, center()));
        assert!(shot.is_aiming());
        assert!(!shot.orbit_enabled());
        assert!(shot.aim().visible);
    }

    #[test]
    fn test_press_off_ball_is_ignored() {
        let (session, camera) = playing();
        let mut shot = ShotInput::new(InputTuning::default());
        assert!(!shot.pointer_down(&session, &camera, Vec2::new(10.0, 10.0)));
        assert_eq!(shot.state(), ShotState::Idle);
    }

    #[test]
    fn test_pull_back_aims_forward() {
        let (session, camera) = playing();
        let mut shot = ShotInput::new(InputTuning::default());
        shot.pointer_down(&session, &camera, center());

        // Drag 100px down the screen
        shot.pointer_move(&session, &camera, center() + Vec2::new(0.0, 100.0));
        assert!((shot.aim().direction - Vec3::NEG_Z).length() < 1e-5);
        assert!((shot.aim().target_power - 0.5).abs() < 1e-5);

        let release = shot
            .pointer_up(&session, &camera, center() + Vec2::new(0.0, 120.0))
            .unwrap();
        assert!((release.direction - Vec3::NEG_Z).length() < 1e-5);
        assert!((release.power - 0.6).abs() < 1e-5);
        assert_eq!(shot.state(), ShotState::Idle);
        assert!(!shot.aim().visible);
    }

    #[test]
    fn test_power_is_clamped() {
        let (session, camera) = playing();
        let mut shot = ShotInput::new(InputTuning::default());
        shot.pointer_down(&session, &camera, center());
        let release = shot
            .pointer_up(&session, &camera, center() + Vec2::new(0.0, 5000.0))
            .unwrap();
        assert_eq!(release.power, InputTuning::default().max_power);
    }

    #[test]
    fn test_zero_drag_release_is_cancelled() {
        let (session, camera) = playing();
        let mut shot = ShotInput::new(InputTuning::default());
        shot.pointer_down(&session, &camera, center());
        assert!(shot.pointer_up(&session, &camera, center()).is_none());
        assert_eq!(shot.state(), ShotState::Idle);
    }

    #[test]
    fn test_input_ignored_outside_playing() {
        let (mut session, camera) = playing();
        let mut shot = ShotInput::new(InputTuning::default());
        shot.pointer_down(&session, &camera, center());

        session.mode = GameMode::WaitingForContinue;
        shot.pointer_move(&session, &camera, center() + Vec2::new(0.0, 50.0));
        assert_eq!(shot.state(), ShotState::Idle);
        assert!(
            shot.pointer_up(&session, &camera, center() + Vec2::new(0.0, 50.0))
                .is_none()
        );
        assert!(!shot.pointer_down(&session, &camera, center()));
    }

    #[test]
    fn test_power_meter_smooths_toward_target() {
        let (session, camera) = playing();
        let mut shot = ShotInput::new(InputTuning::default());
        shot.pointer_down(&session, &camera, center());
        shot.pointer_move(&session, &camera, center() + Vec2::new(0.0, 200.0));

        shot.update(SIM_DT);
        let first = shot.power_fraction();
        assert!(first > 0.0 && first < 1.0);

        for _ in 0..600 {
            shot.update(SIM_DT);
        }
        assert!((shot.power_fraction() - 1.0).abs() < 1e-3);
    }
}
