use thiserror::Error;

// ---------------------------------------------------------------------------
// DataFormatError – the file does not match the expected activity layout
// ---------------------------------------------------------------------------

/// Raised when an uploaded spreadsheet cannot be turned into an
/// [`ActivityTable`](super::model::ActivityTable).
///
/// Row numbers are spreadsheet rows as a user sees them: the header is
/// row 1, the first record is row 2.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataFormatError {
    #[error("missing required column(s): {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("row {row}: '{value}' is not a valid date")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: '{value}' is not a valid number of people")]
    InvalidPeopleImpacted { row: usize, value: String },

    #[error("the sheet has no header row")]
    EmptySheet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_are_listed_in_message() {
        let err = DataFormatError::MissingColumns {
            missing: vec!["Data".to_string(), "Tipo".to_string()],
        };
        assert_eq!(err.to_string(), "missing required column(s): Data, Tipo");
    }
}
