use std::fmt::{Display, Formatter};

use game_environment::game::{Sign, TicTacToe};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{AgentError, AgentResult};
use crate::q_learning::QLearningAgent;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EvaluationSummary {
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl Display for EvaluationSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "games: {}, wins: {}, draws: {}, losses: {}",
            self.games, self.wins, self.draws, self.losses
        )
    }
}

/// Plays `games` games of `agent` against an opponent picking uniformly random moves.
///
/// The agent opens every even game as [`Sign::X`] and answers every odd one as [`Sign::O`].
/// Nothing is learned while evaluating.
pub fn evaluate<A: Rng, R: Rng>(
    agent: &mut QLearningAgent<A>,
    games: usize,
    opponent_rng: &mut R,
) -> AgentResult<EvaluationSummary> {
    let mut summary = EvaluationSummary::default();
    let mut env = TicTacToe::new();
    for game in 0..games {
        let agent_sign = if game % 2 == 0 { Sign::X } else { Sign::O };
        let mut state = env.reset();
        loop {
            let valid_moves = env.get_valid_moves();
            let action = if env.current_player() == agent_sign {
                agent.get_action(&state, &valid_moves)?
            } else {
                *valid_moves
                    .choose(opponent_rng)
                    .ok_or(AgentError::NoValidMoves)?
            };
            let step = env.make_move(action)?;
            if step.terminal {
                break;
            }
            state = step.board;
        }
        summary.games += 1;
        match env.winner() {
            Some(winner) if winner == agent_sign => summary.wins += 1,
            Some(_) => summary.losses += 1,
            None => summary.draws += 1,
        }
    }
    Ok(summary)
}
