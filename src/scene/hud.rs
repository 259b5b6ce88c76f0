//! HUD and menu view model
//!
//! Everything on the overlay is derived from the session and the shot input on
//! demand; the HUD holds no state of its own.

use serde::Serialize;

use crate::sim::{GameMode, GameSession, MenuAction, ShotInput};

/// One level-select button
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelButton {
    pub index: u32,
    pub name: String,
    pub enabled: bool,
}

/// Snapshot of what the overlay shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudView {
    pub mode: GameMode,
    /// 1-based hole number
    pub hole: u32,
    pub hole_count: u32,
    pub par: u32,
    pub strokes: u32,
    /// Power meter fill in `[0, 1]`
    pub power: f32,
    /// "Birdie!", "Par", ...
    pub result: Option<String>,
    /// Continue prompt, or the game-over summary after the final course
    pub prompt: Option<String>,
    pub levels: Vec<LevelButton>,
    pub total_score: u32,
}

impl HudView {
    pub fn from_session(session: &GameSession, shot: &ShotInput) -> Self {
        let result = match session.mode {
            GameMode::WaitingForContinue => session.last_result.clone(),
            _ => None,
        };

        let prompt = result.as_ref().map(|r| {
            if r.final_course {
                format!("Game Over! Total score: {}", r.total_score)
            } else {
                "Press Space to continue".to_string()
            }
        });

        let levels = if session.mode == GameMode::LevelSelect {
            session
                .courses()
                .iter()
                .map(|c| LevelButton {
                    index: c.index,
                    name: c.name.clone(),
                    enabled: session.can_apply(MenuAction::SelectCourse(c.index)),
                })
                .collect()
        } else {
            Vec::new()
        };

        let power = if session.mode == GameMode::Playing {
            shot.power_fraction()
        } else {
            0.0
        };

        Self {
            mode: session.mode,
            hole: session.course_index,
            hole_count: session.course_count(),
            par: session.course.par,
            strokes: session.strokes,
            power,
            result: result.map(|r| r.label),
            prompt,
            levels,
            total_score: session.total_score,
        }
    }

    pub fn show_title(&self) -> bool {
        self.mode == GameMode::Title
    }

    pub fn show_level_select(&self) -> bool {
        self.mode == GameMode::LevelSelect
    }

    /// Hole, par, strokes and power meter
    pub fn show_scorecard(&self) -> bool {
        matches!(self.mode, GameMode::Playing | GameMode::WaitingForContinue)
    }
}
