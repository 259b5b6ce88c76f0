//! Audio system using Web Audio API
//!
//! Procedurally generated sound cues - no external files needed!
//! The event-to-cue mapping is plain Rust; only `AudioManager` needs a browser.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

/// Wall impacts slower than this are silent (units/s)
const WALL_HIT_MIN_SPEED: f32 = 0.5;
/// Impact speed that plays a wall hit at full volume
const WALL_HIT_FULL_SPEED: f32 = 30.0;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundEffect {
    /// Club strikes the ball; louder for harder shots
    Putt { power: f32 },
    /// Ball bounces off a wall; `intensity` in `[0, 1]`
    WallHit { intensity: f32 },
    /// Ball drops into the cup
    HoleSunk,
    /// Failsafe put the ball back on the tee
    BallReset,
    /// Last course finished
    GameOver,
}

impl SoundEffect {
    /// Cue for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ShotTaken { power } => Some(SoundEffect::Putt { power: *power }),
            GameEvent::WallHit { speed } if *speed >= WALL_HIT_MIN_SPEED => {
                Some(SoundEffect::WallHit {
                    intensity: (speed / WALL_HIT_FULL_SPEED).clamp(0.1, 1.0),
                })
            }
            GameEvent::HoleSunk(result) if result.final_course => Some(SoundEffect::GameOver),
            GameEvent::HoleSunk(_) => Some(SoundEffect::HoleSunk),
            GameEvent::BallReset => Some(SoundEffect::BallReset),
            _ => None,
        }
    }
}

/// Audio manager for the game
#[cfg(target_arch = "wasm32")]
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    muted: bool,
}

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    pub fn new(master_volume: f32, enabled: bool) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: master_volume.clamp(0.0, 1.0),
            muted: !enabled,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Flip the mute switch; returns the new state
    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play the cue for each event that has one
    pub fn play_events(&self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Browsers suspend the context until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Putt { power } => self.play_putt(ctx, vol * (0.4 + 0.6 * power)),
            SoundEffect::WallHit { intensity } => self.play_wall_hit(ctx, vol * intensity),
            SoundEffect::HoleSunk => self.play_hole_sunk(ctx, vol),
            SoundEffect::BallReset => self.play_ball_reset(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Putt - short wooden click
    fn play_putt(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.06)
            .ok();
        osc.frequency().set_value_at_time(900.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(300.0, t + 0.06)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.08).ok();
    }

    /// Wall hit - dull thud
    fn play_wall_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();
        osc.frequency().set_value_at_time(180.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(90.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.12).ok();
    }

    /// Hole sunk - rattle in the cup, then a rising chime
    fn play_hole_sunk(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [220.0, 200.0, 180.0].iter().enumerate() {
            let delay = i as f64 * 0.05;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.15, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.04)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.05).ok();
            }
        }
        for (i, freq) in [523.0, 659.0, 784.0].iter().enumerate() {
            let delay = 0.2 + i as f64 * 0.1;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.5).ok();
            }
        }
    }

    /// Ball reset - falling whistle
    fn play_ball_reset(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 600.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.5)
            .ok();
        osc.frequency().set_value_at_time(600.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(150.0, t + 0.5)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.6).ok();
    }

    /// Game over - closing fanfare
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [392.0, 523.0, 659.0, 784.0, 1047.0].iter().enumerate() {
            let delay = i as f64 * 0.15;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.6).ok();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::CourseResult;

    fn sunk(final_course: bool) -> GameEvent {
        GameEvent::HoleSunk(CourseResult {
            course: 1,
            strokes: 2,
            par: 3,
            label: "Birdie!".to_string(),
            total_score: 2,
            final_course,
        })
    }

    #[test]
    fn test_event_cues() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::ShotTaken { power: 0.5 }),
            Some(SoundEffect::Putt { power: 0.5 })
        );
        assert_eq!(SoundEffect::for_event(&sunk(false)), Some(SoundEffect::HoleSunk));
        assert_eq!(SoundEffect::for_event(&sunk(true)), Some(SoundEffect::GameOver));
        assert_eq!(SoundEffect::for_event(&GameEvent::BallReset), Some(SoundEffect::BallReset));
        assert_eq!(SoundEffect::for_event(&GameEvent::CourseStarted(1)), None);
    }

    #[test]
    fn test_soft_wall_touches_are_silent() {
        assert_eq!(SoundEffect::for_event(&GameEvent::WallHit { speed: 0.1 }), None);
        assert_eq!(
            SoundEffect::for_event(&GameEvent::WallHit { speed: 60.0 }),
            Some(SoundEffect::WallHit { intensity: 1.0 })
        );
    }
}
