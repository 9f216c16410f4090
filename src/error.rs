use thiserror::Error;

/// Errors raised by the game core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Lower bound {lower} must be less than or equal to upper bound {upper}")]
    InvertedRange { lower: u32, upper: u32 },

    #[error("Times table {table} is outside 1-{max}")]
    TableOutOfRange { table: u32, max: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_range_message() {
        let err = GameError::InvertedRange { lower: 9, upper: 3 };
        assert_eq!(
            err.to_string(),
            "Lower bound 9 must be less than or equal to upper bound 3"
        );
    }

    #[test]
    fn test_table_out_of_range_message() {
        let err = GameError::TableOutOfRange { table: 13, max: 12 };
        assert_eq!(err.to_string(), "Times table 13 is outside 1-12");
    }
}
