use crate::game::board::{Board, Sign, BOARD_SIZE};
use crate::game::error::GameError;
use crate::game::{GameResult, Position};

pub type Reward = f32;

pub const WIN_REWARD: Reward = 1.0;
pub const LOSS_REWARD: Reward = -1.0;
pub const NEUTRAL_REWARD: Reward = 0.0;

/// Outcome of a single move, as seen by the player who made it.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub board: Board,
    pub reward: Reward,
    pub terminal: bool,
}

/// Tic-tac-toe environment: the authoritative board plus whose turn it is.
///
/// [`Sign::X`] always moves first. The environment doesn't guard episode boundaries,
/// it's up to the caller to [`TicTacToe::reset`] after a terminal [`Step`].
#[derive(Clone, Debug, Default)]
pub struct TicTacToe {
    field: Board,
    current: Sign,
}

impl TicTacToe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the field and gives the turn to [`Sign::X`].
    /// Returns a copy of the fresh board.
    pub fn reset(&mut self) -> Board {
        self.field = Board::new();
        self.current = Sign::X;
        self.field.clone()
    }

    pub fn board(&self) -> &Board {
        &self.field
    }

    pub fn current_player(&self) -> Sign {
        self.current
    }

    pub fn winner(&self) -> Option<Sign> {
        self.field.winner()
    }

    /// All empty cells in row-major order.
    pub fn get_valid_moves(&self) -> Vec<Position> {
        self.field.empty_cells()
    }

    /// Puts the current player's mark at `position` and passes the turn.
    ///
    /// Rewards are given from the mover's point of view: a win is `1.0`,
    /// a line owned by the opponent is `-1.0`, a draw or an ongoing game is `0.0`.
    pub fn make_move(&mut self, position: Position) -> GameResult<Step> {
        let cell = self.field.get(position).ok_or_else(|| {
            GameError::out_of_range(position.row(), position.col(), BOARD_SIZE - 1)
        })?;
        if cell.is_some() {
            return Err(GameError::cell_is_occupied(position.row(), position.col()));
        }

        let sign = self.current;
        self.field.place(position, sign);

        let (reward, terminal) = match self.field.winner() {
            Some(winner) if winner == sign => (WIN_REWARD, true),
            // unreachable with alternating legal moves
            Some(_) => (LOSS_REWARD, true),
            None if self.field.is_full() => (NEUTRAL_REWARD, true),
            None => (NEUTRAL_REWARD, false),
        };

        self.current = sign.opponent();
        Ok(Step {
            board: self.field.clone(),
            reward,
            terminal,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn play(env: &mut TicTacToe, moves: &[(usize, usize)]) -> Step {
        let mut last = None;
        for &m in moves {
            last = Some(env.make_move(m.into()).unwrap());
        }
        last.unwrap()
    }

    #[test]
    fn test_reset() {
        let mut env = TicTacToe::new();
        play(&mut env, &[(1, 1), (0, 0)]);
        let board = env.reset();
        assert_eq!(board, Board::new());
        assert_eq!(env.current_player(), Sign::X);
        assert_eq!(env.get_valid_moves().len(), 9);
    }

    #[test]
    fn test_valid_moves_shrink() {
        let mut env = TicTacToe::new();
        env.reset();
        let moves = [(1, 1), (0, 0), (2, 2), (0, 2), (0, 1), (2, 1), (1, 0), (1, 2)];
        for (i, &m) in moves.iter().enumerate() {
            assert_eq!(env.get_valid_moves().len(), 9 - i);
            let step = env.make_move(m.into()).unwrap();
            assert!(!step.terminal);
            let valid = env.get_valid_moves();
            assert_eq!(valid.len(), 8 - i);
            assert!(!valid.contains(&m.into()));
            assert_eq!(valid, env.board().empty_cells());
            // X moves first, so X is never behind and at most one ahead
            let x = env.board().count(Sign::X);
            let o = env.board().count(Sign::O);
            assert_eq!(x + o, i + 1);
            assert!(x == o || x == o + 1);
        }
    }

    #[test]
    fn test_players_alternate() {
        let mut env = TicTacToe::new();
        assert_eq!(env.current_player(), Sign::X);
        let step = env.make_move((0, 0).into()).unwrap();
        assert_eq!(step.board.get((0, 0).into()), Some(&Some(Sign::X)));
        assert_eq!(env.current_player(), Sign::O);
        let step = env.make_move((0, 1).into()).unwrap();
        assert_eq!(step.board.get((0, 1).into()), Some(&Some(Sign::O)));
        assert_eq!(env.current_player(), Sign::X);
    }

    #[test]
    fn test_invalid_moves() {
        let mut env = TicTacToe::new();
        env.make_move((1, 1).into()).unwrap();
        let before = env.board().clone();

        let err = env.make_move((1, 1).into()).unwrap_err();
        assert_eq!(err, GameError::cell_is_occupied(1, 1));

        let err = env.make_move((3, 0).into()).unwrap_err();
        assert_eq!(err, GameError::out_of_range(3, 0, 2));
        let err = env.make_move((0, 7).into()).unwrap_err();
        assert_eq!(err, GameError::out_of_range(0, 7, 2));

        // nothing changed, still O's turn
        assert_eq!(env.board(), &before);
        assert_eq!(env.current_player(), Sign::O);
    }

    #[test]
    fn test_win() {
        let mut env = TicTacToe::new();
        // ends with [[1, 1, 1], [0, -1, 0], [0, 0, -1]]
        let step = play(&mut env, &[(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]);
        assert_eq!(
            step.board,
            Board::from_rows(&[[1, 1, 1], [0, -1, 0], [0, 0, -1]]).unwrap()
        );
        assert_eq!(step.reward, WIN_REWARD);
        assert!(step.terminal);
        assert_eq!(env.winner(), Some(Sign::X));
        // the turn passes even after the game ends
        assert_eq!(env.current_player(), Sign::O);
    }

    #[test]
    fn test_opponent_line() {
        // not reachable through alternating play, only through a prepared field
        let mut env = TicTacToe {
            field: Board::from_rows(&[[-1, -1, -1], [1, 1, 0], [0, 0, 0]]).unwrap(),
            current: Sign::X,
        };
        let step = env.make_move((2, 2).into()).unwrap();
        assert_eq!(step.reward, LOSS_REWARD);
        assert!(step.terminal);
        assert_eq!(env.winner(), Some(Sign::O));
        assert_eq!(env.current_player(), Sign::O);
    }

    #[test]
    fn test_second_player_win() {
        let mut env = TicTacToe::new();
        let step = play(&mut env, &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2), (1, 2)]);
        assert_eq!(step.reward, WIN_REWARD);
        assert!(step.terminal);
        assert_eq!(env.winner(), Some(Sign::O));
    }

    #[test]
    fn test_draw() {
        let mut env = TicTacToe::new();
        // X O X
        // X O O
        // O X X
        let step = play(
            &mut env,
            &[
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 1),
                (1, 0),
                (1, 2),
                (2, 1),
                (2, 0),
                (2, 2),
            ],
        );
        assert_eq!(step.reward, NEUTRAL_REWARD);
        assert!(step.terminal);
        assert_eq!(env.winner(), None);
        assert!(env.get_valid_moves().is_empty());
    }

    #[test]
    fn test_step_is_a_snapshot() {
        let mut env = TicTacToe::new();
        let first = env.make_move((0, 0).into()).unwrap();
        env.make_move((2, 2).into()).unwrap();
        assert_eq!(first.board.get((2, 2).into()), Some(&None));
        assert_ne!(&first.board, env.board());
    }
}
