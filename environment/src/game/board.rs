use std::fmt::{Display, Formatter};

use generic_array::typenum::U3;

use crate::game::error::GameError;
use crate::game::grid::Grid;
use crate::game::{GameResult, Position};

/// Number of cells along each side of the board.
pub const BOARD_SIZE: usize = 3;
/// Total number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Sign {
    #[default]
    X,
    O,
}

impl Sign {
    /// Integer encoding of the mark: `+1` for [`Sign::X`], `-1` for [`Sign::O`].
    pub fn value(self) -> i8 {
        match self {
            Sign::X => 1,
            Sign::O => -1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Sign::X => Sign::O,
            Sign::O => Sign::X,
        }
    }
}

impl Display for Sign {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Sign::X => f.write_str("X"),
            Sign::O => f.write_str("O"),
        }
    }
}

pub type Cell = Option<Sign>;

/// Integer encoding of a cell: `0` when it's empty, otherwise the value of its [`Sign`].
pub fn cell_value(cell: &Cell) -> i8 {
    cell.map_or(0, Sign::value)
}

fn cell_from_value(value: i8) -> GameResult<Cell> {
    match value {
        0 => Ok(None),
        1 => Ok(Some(Sign::X)),
        -1 => Ok(Some(Sign::O)),
        _ => Err(GameError::invalid_board(format!(
            "unexpected cell value {} (expected: -1, 0 or 1)",
            value
        ))),
    }
}

fn line_sum<'a>(line: impl Iterator<Item = &'a Cell>) -> i8 {
    line.map(cell_value).sum()
}

/// Snapshot of a 3x3 tic-tac-toe field.
///
/// Boards are plain values: two boards with the same marks in the same cells are equal
/// no matter how they were built, and cloning gives an independent copy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cells: Grid<Cell, U3, U3>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from 9 integer cells in row-major order.
    pub fn from_cells(values: &[i8]) -> GameResult<Self> {
        if values.len() != CELL_COUNT {
            return Err(GameError::invalid_board(format!(
                "expected {} cells, found {}",
                CELL_COUNT,
                values.len()
            )));
        }
        let mut board = Self::new();
        for (i, &value) in values.iter().enumerate() {
            board.cells[(i / BOARD_SIZE, i % BOARD_SIZE).into()] = cell_from_value(value)?;
        }
        Ok(board)
    }

    /// Builds a board from 3 rows of 3 integer cells.
    pub fn from_rows<T: AsRef<[i8]>>(rows: &[T]) -> GameResult<Self> {
        if rows.len() != BOARD_SIZE {
            return Err(GameError::invalid_board(format!(
                "expected {} rows, found {}",
                BOARD_SIZE,
                rows.len()
            )));
        }
        if let Some(row) = rows.iter().find(|row| row.as_ref().len() != BOARD_SIZE) {
            return Err(GameError::invalid_board(format!(
                "expected {} cells in a row, found {}",
                BOARD_SIZE,
                row.as_ref().len()
            )));
        }
        let values: Vec<i8> = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();
        Self::from_cells(&values)
    }

    /// Returns the cell at `position` or [`None`] if the position is off the board.
    pub fn get(&self, position: Position) -> Option<&Cell> {
        self.cells.get(position)
    }

    pub(crate) fn place(&mut self, position: Position, sign: Sign) {
        self.cells[position] = Some(sign);
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Position> {
        self.cells
            .all_indexed()
            .filter_map(|(idx, cell)| cell.is_none().then_some(idx))
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| cell.is_some())
    }

    pub fn count(&self, sign: Sign) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == Some(sign))
            .count()
    }

    /// Integer encoding of every cell in row-major order.
    pub fn values(&self) -> impl Iterator<Item = i8> + '_ {
        self.cells.iter().flatten().map(cell_value)
    }

    pub fn rows(&self) -> [[i8; BOARD_SIZE]; BOARD_SIZE] {
        let mut rows = [[0; BOARD_SIZE]; BOARD_SIZE];
        for (idx, cell) in self.cells.all_indexed() {
            rows[idx.row()][idx.col()] = cell_value(cell);
        }
        rows
    }

    /// Returns the owner of the first completed line.
    ///
    /// A line is complete when the signed sum of its cells reaches the board size,
    /// the sign of the sum tells which player owns it.
    pub fn winner(&self) -> Option<Sign> {
        self.line_sums().into_iter().find_map(|sum| {
            if sum.unsigned_abs() as usize != BOARD_SIZE {
                return None;
            }
            if sum > 0 {
                Some(Sign::X)
            } else {
                Some(Sign::O)
            }
        })
    }

    /// Sums of row `i` and column `i` for every `i`, followed by both diagonals.
    fn line_sums(&self) -> Vec<i8> {
        let mut sums = Vec::with_capacity(2 * BOARD_SIZE + 2);
        for i in 0..BOARD_SIZE {
            sums.push(line_sum(self.cells.right_iter((i, 0).into())));
            sums.push(line_sum(self.cells.bottom_iter((0, i).into())));
        }
        sums.push(line_sum(self.cells.bottom_right_iter((0, 0).into())));
        sums.push(line_sum(
            self.cells.bottom_left_iter((0, BOARD_SIZE - 1).into()),
        ));
        sums
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for cell in row {
                match cell {
                    Some(sign) => write!(f, "{}", sign)?,
                    None => f.write_str(".")?,
                }
            }
        }
        Ok(())
    }
}
