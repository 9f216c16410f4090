use crate::problems::TableRange;
use chrono::Duration;
use log::info;

/// A streak never grows beyond this many perfect games
pub const MAX_STREAK: u8 = 5;

/// Tracks consecutive perfect games played on the same range and the
/// total time they took.
///
/// Invariant: `cumulative_time` is zero whenever `streak` is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct StreakTracker {
    streak: u8,
    cumulative_time: Duration,
    last_range: Option<TableRange>,
}

impl StreakTracker {
    pub fn new() -> Self {
        StreakTracker {
            streak: 0,
            cumulative_time: Duration::zero(),
            last_range: None,
        }
    }

    pub fn streak(&self) -> u8 {
        self.streak
    }

    pub fn cumulative_time(&self) -> Duration {
        self.cumulative_time
    }

    pub fn is_maxed(&self) -> bool {
        self.streak >= MAX_STREAK
    }

    /// A range is consistent when it matches the last started game's range,
    /// or when no game has been started yet
    pub fn is_range_consistent(&self, range: &TableRange) -> bool {
        self.last_range.is_none_or(|last| last == *range)
    }

    /// Drop an active streak when a game starts on a different range.
    /// Returns true if a streak was forfeited.
    pub fn forfeit_if_range_changed(&mut self, range: &TableRange) -> bool {
        if self.streak > 0 && !self.is_range_consistent(range) {
            info!(
                "Range changed to {}, forfeiting streak of {}",
                range, self.streak
            );
            self.break_streak();
            return true;
        }
        false
    }

    pub fn remember_range(&mut self, range: TableRange) {
        self.last_range = Some(range);
    }

    /// Apply the outcome of a completed game.
    /// Returns true if the streak advanced.
    pub fn record_completion(
        &mut self,
        perfect: bool,
        range: &TableRange,
        time_spent: Duration,
    ) -> bool {
        if perfect && self.is_range_consistent(range) {
            self.streak = (self.streak + 1).min(MAX_STREAK);
            self.cumulative_time += time_spent;
            info!(
                "Perfect game on {}: streak {}/{}, cumulative time {}s",
                range,
                self.streak,
                MAX_STREAK,
                self.cumulative_time.num_seconds()
            );
            true
        } else {
            if self.streak > 0 {
                info!("Streak of {} broken", self.streak);
            }
            self.break_streak();
            false
        }
    }

    /// Forget everything, including the last range
    pub fn clear(&mut self) {
        *self = StreakTracker::new();
    }

    fn break_streak(&mut self) {
        self.streak = 0;
        self.cumulative_time = Duration::zero();
    }
}

impl Default for StreakTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(lower: u32, upper: u32) -> TableRange {
        TableRange::new(lower, upper).unwrap()
    }

    #[test]
    fn test_first_game_is_range_consistent() {
        let tracker = StreakTracker::new();
        assert!(tracker.is_range_consistent(&range(3, 7)));
    }

    #[test]
    fn test_range_consistency_compares_both_bounds() {
        let mut tracker = StreakTracker::new();
        tracker.remember_range(range(3, 7));

        assert!(tracker.is_range_consistent(&range(3, 7)));
        assert!(!tracker.is_range_consistent(&range(3, 8)));
        assert!(!tracker.is_range_consistent(&range(2, 7)));
    }

    #[test]
    fn test_perfect_game_advances_streak_and_time() {
        let mut tracker = StreakTracker::new();
        tracker.remember_range(range(2, 12));

        assert!(tracker.record_completion(true, &range(2, 12), Duration::seconds(40)));
        assert!(tracker.record_completion(true, &range(2, 12), Duration::seconds(35)));

        assert_eq!(tracker.streak(), 2);
        assert_eq!(tracker.cumulative_time(), Duration::seconds(75));
    }

    #[test]
    fn test_streak_is_capped() {
        let mut tracker = StreakTracker::new();
        for _ in 0..8 {
            tracker.record_completion(true, &range(2, 12), Duration::seconds(10));
        }

        assert_eq!(tracker.streak(), MAX_STREAK);
        assert!(tracker.is_maxed());
        assert_eq!(tracker.cumulative_time(), Duration::seconds(80));
    }

    #[test]
    fn test_imperfect_game_breaks_streak() {
        let mut tracker = StreakTracker::new();
        tracker.record_completion(true, &range(2, 12), Duration::seconds(30));
        assert!(!tracker.record_completion(false, &range(2, 12), Duration::seconds(30)));

        assert_eq!(tracker.streak(), 0);
        assert_eq!(tracker.cumulative_time(), Duration::zero());
    }

    #[test]
    fn test_perfect_game_on_inconsistent_range_breaks_streak() {
        let mut tracker = StreakTracker::new();
        tracker.remember_range(range(2, 12));
        tracker.record_completion(true, &range(2, 12), Duration::seconds(30));

        assert!(!tracker.record_completion(true, &range(4, 6), Duration::seconds(30)));
        assert_eq!(tracker.streak(), 0);
        assert_eq!(tracker.cumulative_time(), Duration::zero());
    }

    #[test]
    fn test_forfeit_on_range_change() {
        let mut tracker = StreakTracker::new();
        tracker.remember_range(range(2, 12));
        tracker.record_completion(true, &range(2, 12), Duration::seconds(30));

        assert!(!tracker.forfeit_if_range_changed(&range(2, 12)));
        assert_eq!(tracker.streak(), 1);

        assert!(tracker.forfeit_if_range_changed(&range(5, 5)));
        assert_eq!(tracker.streak(), 0);
        assert_eq!(tracker.cumulative_time(), Duration::zero());
    }

    #[test]
    fn test_forfeit_without_streak_is_noop() {
        let mut tracker = StreakTracker::new();
        tracker.remember_range(range(2, 12));
        assert!(!tracker.forfeit_if_range_changed(&range(5, 5)));
    }

    #[test]
    fn test_clear_forgets_range() {
        let mut tracker = StreakTracker::new();
        tracker.remember_range(range(2, 3));
        tracker.record_completion(true, &range(2, 3), Duration::seconds(30));

        tracker.clear();

        assert_eq!(tracker, StreakTracker::new());
        assert!(tracker.is_range_consistent(&range(9, 9)));
    }
}
