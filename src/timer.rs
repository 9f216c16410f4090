use crate::session::GameStatus;
use crate::time_format::format_clock;
use chrono::Duration;

/// Seconds counter for the on-screen clock.
///
/// Advanced by a roughly once-per-second tick; scores use the session's
/// wall-clock timestamps instead, so missed ticks only affect the display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayTimer {
    seconds: u64,
    running: bool,
}

impl DisplayTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.seconds = 0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.seconds = 0;
        self.running = false;
    }

    /// Count one second if the timer runs and the game is being played
    pub fn tick(&mut self, status: GameStatus) {
        if self.running && status == GameStatus::Playing {
            self.seconds += 1;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn formatted(&self) -> String {
        format_clock(Duration::seconds(self.seconds as i64))
    }
}
