use crate::problems::{Problem, ProblemId};
use chrono::Duration;
use std::collections::HashMap;

/// Result of a completed game
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub total: usize,
    pub correct: usize,
    /// Sum of every tracked incorrect departure across the batch
    pub incorrect_attempts: u32,
    /// Problems whose final answer is wrong
    pub incorrect_answers: usize,
    /// The larger of `incorrect_answers` and `incorrect_attempts`
    pub total_incorrect: usize,
    pub percentage: u32,
    pub time_spent: Duration,
    pub cumulative_time: Duration,
}

impl Score {
    /// Score a batch against the final answers and the incorrect-attempt counters.
    ///
    /// A problem fixed after a wrong departure still costs a point: the
    /// denominator uses whichever is larger of wrong final answers and
    /// total recorded mistakes.
    pub fn compute(
        problems: &[Problem],
        answers: &HashMap<ProblemId, u32>,
        incorrect_attempts: &HashMap<ProblemId, u32>,
        time_spent: Duration,
        cumulative_time: Duration,
    ) -> Self {
        let total = problems.len();
        let correct = count_correct(problems, answers);
        let incorrect_attempts_sum: u32 = problems
            .iter()
            .map(|p| incorrect_attempts.get(&p.id).copied().unwrap_or(0))
            .sum();
        let incorrect_answers = total - correct;
        let total_incorrect = incorrect_answers.max(incorrect_attempts_sum as usize);
        let percentage = percentage(correct, total_incorrect);

        Score {
            total,
            correct,
            incorrect_attempts: incorrect_attempts_sum,
            incorrect_answers,
            total_incorrect,
            percentage,
            time_spent,
            cumulative_time,
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.correct == self.total && self.incorrect_attempts == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "Completed! Score: {}/{} ({}%)",
            self.correct, self.total, self.percentage
        )
    }
}

/// Number of problems whose stored answer matches the true answer
fn count_correct(problems: &[Problem], answers: &HashMap<ProblemId, u32>) -> usize {
    problems
        .iter()
        .filter(|p| answers.get(&p.id).is_some_and(|&a| p.check_answer(a)))
        .count()
}

fn percentage(correct: usize, total_incorrect: usize) -> u32 {
    let denominator = correct + total_incorrect;
    if denominator == 0 {
        return 100;
    }
    (100.0 * correct as f64 / denominator as f64).round() as u32
}
