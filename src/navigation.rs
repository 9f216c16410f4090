//! Moving between answer fields.
//!
//! Leaving a field is what counts a mistake, so a departure is always
//! committed against the field's current value before focus moves on.

use crate::session::{GameSession, GameStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOutcome {
    /// Focus the field at this index
    Move(usize),
    /// Keep focus where it is
    Stay,
    /// The departure finished the game
    Completed,
}

/// Leave the field at `index` in `direction`
pub fn leave_field(session: &mut GameSession, index: usize, direction: Direction) -> FocusOutcome {
    if session.status() != GameStatus::Playing {
        return FocusOutcome::Stay;
    }
    let count = session.problems().len();
    let Some(id) = session.problems().get(index).map(|p| p.id) else {
        return FocusOutcome::Stay;
    };

    let is_last = index + 1 == count;
    let all_answered = session.answers().len() == count;

    // Completion tracks the last field itself
    if !(is_last && all_answered && direction == Direction::Next) {
        session.track_incorrect_attempt(&id);
    }

    if session.check_completion() {
        return FocusOutcome::Completed;
    }

    match direction {
        Direction::Next if !is_last => FocusOutcome::Move(index + 1),
        Direction::Previous if index > 0 => FocusOutcome::Move(index - 1),
        _ => FocusOutcome::Stay,
    }
}
