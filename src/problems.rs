use crate::error::GameError;
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

/// Every table runs from `× 1` to `× MULTIPLIER_MAX`
pub const MULTIPLIER_MAX: u32 = 12;

/// Maximum number of problems in one batch
pub const BATCH_SIZE: usize = 21;

/// Inclusive range of multiplicands (the "times tables") a batch is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableRange {
    pub lower: u32,
    pub upper: u32,
}

impl TableRange {
    /// Both bounds must be tables in `1..=MULTIPLIER_MAX`
    pub fn new(lower: u32, upper: u32) -> Result<Self, GameError> {
        for table in [lower, upper] {
            if !(1..=MULTIPLIER_MAX).contains(&table) {
                return Err(GameError::TableOutOfRange {
                    table,
                    max: MULTIPLIER_MAX,
                });
            }
        }
        if lower > upper {
            return Err(GameError::InvertedRange { lower, upper });
        }
        Ok(TableRange { lower, upper })
    }

    /// Number of distinct (multiplicand, multiplier) pairs in the range
    pub fn pool_size(&self) -> usize {
        (self.upper - self.lower + 1) as usize * MULTIPLIER_MAX as usize
    }

    /// Length of a batch generated from this range
    pub fn batch_size(&self) -> usize {
        self.pool_size().min(BATCH_SIZE)
    }
}

impl Default for TableRange {
    fn default() -> Self {
        TableRange { lower: 2, upper: 12 }
    }
}

impl fmt::Display for TableRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lower, self.upper)
    }
}

/// Identifies a problem within a batch by its operand pair.
/// Two batches can contain problems with the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProblemId {
    pub multiplicand: u32,
    pub multiplier: u32,
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.multiplicand, self.multiplier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub id: ProblemId,
    pub multiplicand: u32,
    pub multiplier: u32,
    pub answer: u32,
}

impl Problem {
    pub fn new(multiplicand: u32, multiplier: u32) -> Self {
        Problem {
            id: ProblemId {
                multiplicand,
                multiplier,
            },
            multiplicand,
            multiplier,
            answer: multiplicand * multiplier,
        }
    }

    pub fn check_answer(&self, answer: u32) -> bool {
        self.answer == answer
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × {}", self.multiplicand, self.multiplier)
    }
}

/// Generate a shuffled batch of problems for the range using the thread RNG
pub fn generate_problem_set(range: &TableRange) -> Vec<Problem> {
    generate_problem_set_with(range, &mut rand::thread_rng())
}

/// Generate a shuffled batch of at most `BATCH_SIZE` problems drawn without
/// repetition from every pair in `range × 1..=MULTIPLIER_MAX`
pub fn generate_problem_set_with<R: Rng + ?Sized>(range: &TableRange, rng: &mut R) -> Vec<Problem> {
    let mut candidates: Vec<Problem> = (range.lower..=range.upper)
        .flat_map(|multiplicand| {
            (1..=MULTIPLIER_MAX).map(move |multiplier| Problem::new(multiplicand, multiplier))
        })
        .collect();

    candidates.shuffle(rng);
    candidates.truncate(BATCH_SIZE);

    debug!(
        "Generated {} problem(s) for tables {} (pool of {})",
        candidates.len(),
        range,
        range.pool_size()
    );

    candidates
}
