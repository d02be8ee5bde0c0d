use std::fmt::{Display, Formatter};

use game_environment::game::{Board, Position};
use serde::{Deserialize, Serialize};

/// Value table key of a board.
///
/// Built from the cell contents only, e.g. `[[1, 0, 0], [0, -1, 0], [0, 0, 0]]`,
/// so equal boards always share a key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl From<&Board> for StateKey {
    fn from(board: &Board) -> Self {
        let rows: Vec<String> = board
            .rows()
            .iter()
            .map(|row| {
                let cells: Vec<String> = row.iter().map(i8::to_string).collect();
                format!("[{}]", cells.join(", "))
            })
            .collect();
        Self(format!("[{}]", rows.join(", ")))
    }
}

impl StateKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Value table key of a move, e.g. `(1, 2)`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionKey(String);

impl From<Position> for ActionKey {
    fn from(position: Position) -> Self {
        Self(position.to_string())
    }
}

impl ActionKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ActionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
