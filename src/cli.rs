use crate::problems::{MULTIPLIER_MAX, TableRange};
use clap::Parser;

/// Times tables drill: 21 problems per round, five perfect rounds make a streak
#[derive(Parser, Debug, Clone)]
#[command(name = "Times Tables")]
#[command(about = "Practice multiplication tables in timed rounds", long_about = None)]
#[command(version)]
pub struct Args {
    /// Lowest times table to practice
    #[arg(
        long,
        value_name = "N",
        default_value_t = 2,
        value_parser = clap::value_parser!(u32).range(1..=MULTIPLIER_MAX as i64),
        help = "Lowest times table to practice (1-12)"
    )]
    pub lower: u32,

    /// Highest times table to practice
    #[arg(
        long,
        value_name = "N",
        default_value_t = 12,
        value_parser = clap::value_parser!(u32).range(1..=MULTIPLIER_MAX as i64),
        help = "Highest times table to practice (1-12)"
    )]
    pub upper: u32,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the range selection
    pub fn validate_range(&self) -> Result<TableRange, String> {
        TableRange::new(self.lower, self.upper).map_err(|e| {
            format!(
                "Invalid range --lower {} --upper {}: {}",
                self.lower, self.upper, e
            )
        })
    }
}
