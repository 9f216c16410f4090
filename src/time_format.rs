use chrono::Duration;

/// Formats a running clock as zero-padded minutes and seconds
///
/// Examples:
/// - 0 seconds: "00:00"
/// - 65 seconds: "01:05"
/// - 2 hours: "120:00"
pub fn format_clock(elapsed: Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Formats the time a finished game took, as shown on the results panel
///
/// Examples:
/// - 9 seconds: "0:09"
/// - 75 seconds: "1:15"
pub fn format_time_taken(time_spent: Duration) -> String {
    let secs = time_spent.num_seconds().max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}
