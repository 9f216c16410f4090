use crate::date_provider::{DateProvider, SystemDateProvider};
use crate::error::GameError;
use crate::problems::{Problem, ProblemId, TableRange, generate_problem_set};
use crate::score::Score;
use crate::streak::StreakTracker;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Idle,
    Playing,
    Completed,
}

impl GameStatus {
    pub fn as_str(&self) -> &str {
        match self {
            GameStatus::Idle => "idle",
            GameStatus::Playing => "playing",
            GameStatus::Completed => "completed",
        }
    }
}

/// A raw answer field value accepted by `GameSession::submit_answer`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerInput {
    /// The field was emptied
    Clear,
    Value(u32),
}

impl AnswerInput {
    /// Accepts the empty string or a run of ASCII digits that fits in a `u32`
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return Some(AnswerInput::Clear);
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        raw.parse().ok().map(AnswerInput::Value)
    }
}

/// How a single field should be shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStatus {
    Unanswered,
    Correct,
    Incorrect,
}

/// The game state machine: one batch of problems, the player's answers,
/// mistake counters and the streak carried between batches.
///
/// `Idle -> Playing -> Completed`, with `reset_game` returning to `Idle` or,
/// when the streak is kept, straight back to `Playing` on a fresh batch.
pub struct GameSession {
    date_provider: Arc<dyn DateProvider>,
    status: GameStatus,
    default_bounds: TableRange,
    bounds: TableRange,
    active_range: Option<TableRange>,
    problems: Vec<Problem>,
    answers: HashMap<ProblemId, u32>,
    incorrect_attempts: HashMap<ProblemId, u32>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    streak: StreakTracker,
}

impl GameSession {
    pub fn new() -> Self {
        Self::with_date_provider(Arc::new(SystemDateProvider))
    }

    pub fn with_date_provider(date_provider: Arc<dyn DateProvider>) -> Self {
        GameSession {
            date_provider,
            status: GameStatus::Idle,
            default_bounds: TableRange::default(),
            bounds: TableRange::default(),
            active_range: None,
            problems: Vec::new(),
            answers: HashMap::new(),
            incorrect_attempts: HashMap::new(),
            start_time: None,
            end_time: None,
            streak: StreakTracker::new(),
        }
    }

    /// Use `bounds` as the initial selection and as the selection a full reset restores
    pub fn with_bounds(mut self, bounds: TableRange) -> Self {
        self.default_bounds = bounds;
        self.bounds = bounds;
        self
    }

    // ===== Accessors =====

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn answers(&self) -> &HashMap<ProblemId, u32> {
        &self.answers
    }

    pub fn incorrect_attempts(&self) -> &HashMap<ProblemId, u32> {
        &self.incorrect_attempts
    }

    pub fn answer_for(&self, id: &ProblemId) -> Option<u32> {
        self.answers.get(id).copied()
    }

    pub fn streak(&self) -> u8 {
        self.streak.streak()
    }

    pub fn cumulative_time(&self) -> Duration {
        self.streak.cumulative_time()
    }

    /// The currently selected range bounds
    pub fn bounds(&self) -> TableRange {
        self.bounds
    }

    /// Range of the batch being played or last completed
    pub fn active_range(&self) -> Option<TableRange> {
        self.active_range
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Wall-clock time of the current attempt, frozen once it completes
    pub fn elapsed(&self) -> Duration {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end - start,
            (Some(start), None) => self.date_provider.get_current_time() - start,
            _ => Duration::zero(),
        }
    }

    pub fn answer_status(&self, id: &ProblemId) -> AnswerStatus {
        let Some(answer) = self.answer_for(id) else {
            return AnswerStatus::Unanswered;
        };
        match self.find_problem(id) {
            Some(problem) if problem.check_answer(answer) => AnswerStatus::Correct,
            _ => AnswerStatus::Incorrect,
        }
    }

    // ===== Transitions =====

    /// Start a fresh batch on `lower..=upper`.
    ///
    /// Starting on a range other than the last one forfeits any active
    /// streak, even if this game is never finished.
    pub fn start_game(&mut self, lower: u32, upper: u32) -> Result<(), GameError> {
        let range = TableRange::new(lower, upper)?;
        self.begin(range);
        Ok(())
    }

    /// Apply the current contents of a field. Returns false if the input was refused.
    pub fn submit_answer(&mut self, id: &ProblemId, raw: &str) -> bool {
        if self.status != GameStatus::Playing || self.find_problem(id).is_none() {
            warn!("Ignoring answer for {} while {}", id, self.status.as_str());
            return false;
        }

        match AnswerInput::parse(raw) {
            Some(AnswerInput::Clear) => {
                self.answers.remove(id);
                debug!("Cleared answer for {}", id);
                true
            }
            Some(AnswerInput::Value(value)) => {
                self.answers.insert(*id, value);
                debug!("Answer for {} set to {}", id, value);
                true
            }
            None => {
                warn!("Refusing non-numeric answer {:?} for {}", raw, id);
                false
            }
        }
    }

    /// Record a departure from a field: counts one mistake if the field
    /// currently holds a wrong number
    pub fn track_incorrect_attempt(&mut self, id: &ProblemId) {
        if self.status != GameStatus::Playing {
            return;
        }
        let Some(problem) = self.find_problem(id) else {
            return;
        };
        let Some(answer) = self.answers.get(id).copied() else {
            return;
        };
        if !problem.check_answer(answer) {
            let count = self.incorrect_attempts.entry(*id).or_insert(0);
            *count += 1;
            debug!("Incorrect attempt #{} on {} (answered {})", count, id, answer);
        }
    }

    /// Finish the game once every problem has an answer. Returns false,
    /// changing nothing, while any field is still empty.
    pub fn check_completion(&mut self) -> bool {
        if self.status != GameStatus::Playing || self.answers.len() != self.problems.len() {
            return false;
        }

        // The last field may be filled without ever being left
        if let Some(last) = self.problems.last().map(|p| p.id) {
            self.track_incorrect_attempt(&last);
        }

        let end = self.date_provider.get_current_time();
        let time_spent = self.start_time.map(|start| end - start).unwrap_or_else(Duration::zero);
        let range = self.active_range.unwrap_or(self.bounds);

        let outcome = Score::compute(
            &self.problems,
            &self.answers,
            &self.incorrect_attempts,
            time_spent,
            self.streak.cumulative_time(),
        );
        let perfect = outcome.is_perfect();
        self.streak.record_completion(perfect, &range, time_spent);

        self.status = GameStatus::Completed;
        self.end_time = Some(end);

        info!(
            "Game on {} completed: {}/{} correct, perfect: {}, streak: {}",
            range,
            outcome.correct,
            outcome.total,
            perfect,
            self.streak.streak()
        );
        true
    }

    /// Score of the completed game, or None while it is not completed
    pub fn get_score(&self) -> Option<Score> {
        if self.status != GameStatus::Completed {
            return None;
        }
        Some(Score::compute(
            &self.problems,
            &self.answers,
            &self.incorrect_attempts,
            self.elapsed(),
            self.streak.cumulative_time(),
        ))
    }

    /// Leave the current game.
    ///
    /// Keeping the streak immediately starts a new batch on the same range.
    /// A maxed streak always gets a full reset.
    pub fn reset_game(&mut self, preserve_streak: bool) {
        self.answers.clear();
        self.incorrect_attempts.clear();

        if preserve_streak && !self.streak.is_maxed() {
            info!("Starting next game with streak {}", self.streak.streak());
            self.begin(self.bounds);
            return;
        }

        info!("Full reset");
        self.problems.clear();
        self.streak.clear();
        self.status = GameStatus::Idle;
        self.bounds = self.default_bounds;
        self.active_range = None;
        self.start_time = None;
        self.end_time = None;
    }

    fn begin(&mut self, range: TableRange) {
        self.streak.forfeit_if_range_changed(&range);

        self.problems = generate_problem_set(&range);
        self.answers.clear();
        self.incorrect_attempts.clear();

        self.bounds = range;
        self.active_range = Some(range);
        self.status = GameStatus::Playing;
        self.start_time = Some(self.date_provider.get_current_time());
        self.end_time = None;
        self.streak.remember_range(range);

        info!(
            "Started game on tables {} with {} problems",
            range,
            self.problems.len()
        );
    }

    fn find_problem(&self, id: &ProblemId) -> Option<&Problem> {
        self.problems.iter().find(|p| p.id == *id)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
