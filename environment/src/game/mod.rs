pub mod board;
pub mod error;
pub mod grid;
pub mod tic_tac_toe;

pub use board::{Board, Cell, Sign};
pub use error::GameError;
pub use grid::GridIndex;
pub use tic_tac_toe::{Reward, Step, TicTacToe};

pub type GameResult<T> = Result<T, GameError>;

/// A move on the board, addressed by row and column.
pub type Position = GridIndex;
