//! Course completion and scoring

use super::state::{CourseResult, GameEvent, GameMode, GameSession};

/// Result label for a stroke count against par.
///
/// First match wins: a one-stroke hole is always a hole-in-one, whatever the par.
pub fn result_label(strokes: u32, par: u32) -> String {
    if strokes == 1 {
        return "Hole-in-One!".to_string();
    }

    let diff = strokes as i64 - par as i64;
    match diff {
        d if d <= -2 => "Eagle!".to_string(),
        -1 => "Birdie!".to_string(),
        0 => "Par".to_string(),
        1 => "Bogey".to_string(),
        2 => "Double Bogey".to_string(),
        d => format!("{} Over Par", d),
    }
}

/// Book the sunk ball: fires once per course, on the transition into sunk.
///
/// Adds the strokes to the running total, unlocks the next course and parks
/// the session in `WaitingForContinue`.
pub(crate) fn complete_course(session: &mut GameSession) -> CourseResult {
    let course = session.course_index;
    let par = session.course.par;
    let strokes = session.strokes;

    session.total_score += strokes;
    if course < session.course_count() {
        session.unlock(course + 1);
    }

    let result = CourseResult {
        course,
        strokes,
        par,
        label: result_label(strokes, par),
        total_score: session.total_score,
        final_course: course >= session.course_count(),
    };

    log::info!(
        "Course {} complete: {} ({} strokes, par {}, total {})",
        course,
        result.label,
        strokes,
        par,
        result.total_score
    );
    if result.final_course {
        log::info!("Final course finished, total score {}", result.total_score);
    }

    session.last_result = Some(result.clone());
    session.events.push(GameEvent::HoleSunk(result.clone()));
    session.mode = GameMode::WaitingForContinue;
    result
}
