//! Game progression state machine
//!
//! Menu buttons and the continue key arrive as `MenuAction`s. Each one either
//! moves the session to a new mode or is rejected without touching any state.

use serde::{Deserialize, Serialize};

use super::state::{GameMode, GameSession};

/// Actions that drive mode transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuAction {
    /// Title: start course 1
    Play,
    /// Title: open the course picker
    OpenLevelSelect,
    /// Level select: start an unlocked course
    SelectCourse(u32),
    /// Level select: back to the title
    Back,
    /// Waiting: next course, or the title after the last one
    Continue,
}

impl MenuAction {
    /// Map a keyboard key to an action (only the continue key is bound)
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            " " | "Enter" => Some(MenuAction::Continue),
            _ => None,
        }
    }
}

/// Result of a mode transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub success: bool,
    pub from: GameMode,
    pub to: GameMode,
    pub action: MenuAction,
}

/// What an accepted action does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Enter(GameMode),
    StartCourse { index: u32, new_run: bool },
    ReturnToTitle,
}

impl GameSession {
    /// Check if an action is valid in the current mode
    pub fn can_apply(&self, action: MenuAction) -> bool {
        self.next_step(action).is_some()
    }

    /// Attempt a transition
    pub fn apply(&mut self, action: MenuAction) -> Transition {
        let from = self.mode;

        let Some(step) = self.next_step(action) else {
            log::debug!("Ignoring {:?} in {:?}", action, from);
            return Transition {
                success: false,
                from,
                to: from,
                action,
            };
        };

        match step {
            Step::Enter(mode) => self.mode = mode,
            Step::StartCourse { index, new_run } => {
                if new_run {
                    self.total_score = 0;
                }
                self.start_course(index);
            }
            Step::ReturnToTitle => self.return_to_title(),
        }

        Transition {
            success: true,
            from,
            to: self.mode,
            action,
        }
    }

    fn next_step(&self, action: MenuAction) -> Option<Step> {
        match (self.mode, action) {
            // From Title
            (GameMode::Title, MenuAction::Play) => Some(Step::StartCourse {
                index: 1,
                new_run: true,
            }),
            (GameMode::Title, MenuAction::OpenLevelSelect) => {
                Some(Step::Enter(GameMode::LevelSelect))
            }

            // From LevelSelect
            (GameMode::LevelSelect, MenuAction::SelectCourse(index))
                if self.is_unlocked(index) =>
            {
                Some(Step::StartCourse {
                    index,
                    new_run: true,
                })
            }
            (GameMode::LevelSelect, MenuAction::Back) => Some(Step::Enter(GameMode::Title)),

            // From WaitingForContinue
            (GameMode::WaitingForContinue, MenuAction::Continue) => {
                let next = self.course_index + 1;
                if next <= self.course_count() {
                    Some(Step::StartCourse {
                        index: next,
                        new_run: false,
                    })
                } else {
                    Some(Step::ReturnToTitle)
                }
            }

            // Playing takes no menu input
            _ => None,
        }
    }
}
