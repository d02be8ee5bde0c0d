#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GameError {
    #[error("cell ({row}, {col}) is occupied")]
    CellIsOccupied { row: usize, col: usize },
    #[error("cell ({row}, {col}) is out of range (expected: 0-{max_expected})")]
    OutOfRange {
        row: usize,
        col: usize,
        max_expected: usize,
    },
    #[error("invalid board: {reason}")]
    InvalidBoard { reason: String },
}

impl GameError {
    pub fn cell_is_occupied(row: usize, col: usize) -> Self {
        Self::CellIsOccupied { row, col }
    }

    pub fn out_of_range(row: usize, col: usize, max_expected: usize) -> Self {
        Self::OutOfRange {
            row,
            col,
            max_expected,
        }
    }

    pub fn invalid_board(reason: impl Into<String>) -> Self {
        Self::InvalidBoard {
            reason: reason.into(),
        }
    }
}
