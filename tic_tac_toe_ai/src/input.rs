//! JSON shapes of the stateless "suggest a move" adapter.

use game_environment::game::{Board, Position};
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, AgentResult};

/// A board as sent by a client: 3 rows of 3 cells or 9 cells in row-major order,
/// each cell `0` (empty), `1` (X) or `-1` (O).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BoardInput {
    Nested(Vec<Vec<i8>>),
    Flat(Vec<i8>),
}

impl BoardInput {
    pub fn into_board(self) -> AgentResult<Board> {
        let board = match self {
            BoardInput::Nested(rows) => Board::from_rows(&rows)?,
            BoardInput::Flat(cells) => Board::from_cells(&cells)?,
        };
        Ok(board)
    }
}

pub fn parse_board(json: &str) -> AgentResult<Board> {
    serde_json::from_str::<BoardInput>(json)
        .map_err(AgentError::MalformedBoard)?
        .into_board()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MoveResponse {
    Move {
        #[serde(rename = "move")]
        position: [usize; 2],
    },
    Error {
        error: String,
    },
}

impl From<Position> for MoveResponse {
    fn from(position: Position) -> Self {
        Self::Move {
            position: [position.row(), position.col()],
        }
    }
}

impl MoveResponse {
    pub fn error(message: impl ToString) -> Self {
        Self::Error {
            error: message.to_string(),
        }
    }
}
