//! Self-play training loop.
//!
//! A single agent plays both sides and learns from every move through
//! [`QLearningAgent::update`], with rewards given from the mover's point of view.

use std::fmt::{Display, Formatter};

use game_environment::game::{Board, Position, Sign, TicTacToe};
use rand::Rng;
use tracing::{debug, info};

use crate::error::AgentResult;
use crate::q_learning::QLearningAgent;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EpisodeOutcome {
    Win(Sign),
    Draw,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
}

impl TrainingSummary {
    fn record(&mut self, outcome: EpisodeOutcome) {
        self.episodes += 1;
        match outcome {
            EpisodeOutcome::Win(Sign::X) => self.x_wins += 1,
            EpisodeOutcome::Win(Sign::O) => self.o_wins += 1,
            EpisodeOutcome::Draw => self.draws += 1,
        }
    }
}

impl Display for TrainingSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "episodes: {}, X wins: {}, O wins: {}, draws: {}",
            self.episodes, self.x_wins, self.o_wins, self.draws
        )
    }
}

/// Last move of each player still waiting for the opponent's reply.
#[derive(Default)]
struct Pending {
    x: Option<(Board, Position)>,
    o: Option<(Board, Position)>,
}

impl Pending {
    fn slot(&mut self, sign: Sign) -> &mut Option<(Board, Position)> {
        match sign {
            Sign::X => &mut self.x,
            Sign::O => &mut self.o,
        }
    }

    fn take(&mut self, sign: Sign) -> Option<(Board, Position)> {
        self.slot(sign).take()
    }

    fn set(&mut self, sign: Sign, state: Board, action: Position) {
        *self.slot(sign) = Some((state, action));
    }
}

pub struct Trainer<R> {
    agent: QLearningAgent<R>,
    env: TicTacToe,
    episode: usize,
}

impl<R: Rng> Trainer<R> {
    pub fn new(agent: QLearningAgent<R>) -> Self {
        Self {
            agent,
            env: TicTacToe::new(),
            episode: 0,
        }
    }

    pub fn agent(&self) -> &QLearningAgent<R> {
        &self.agent
    }

    pub fn into_agent(self) -> QLearningAgent<R> {
        self.agent
    }

    /// Number of episodes played so far.
    pub fn episode(&self) -> usize {
        self.episode
    }

    /// Plays one game from an empty board to the end.
    ///
    /// A move is learned from once the same player is to move again: its next state is the
    /// board after the opponent's reply, so every value is seen from the side to move.
    /// The final move of the game closes both players' transitions, the loser's with the
    /// negated reward.
    pub fn run_episode(&mut self) -> AgentResult<EpisodeOutcome> {
        let mut state = self.env.reset();
        let mut pending = Pending::default();
        let mut step_count: usize = 0;

        loop {
            let mover = self.env.current_player();
            let valid_moves = self.env.get_valid_moves();
            let action = self.agent.get_action(&state, &valid_moves)?;
            let step = self.env.make_move(action)?;
            step_count += 1;
            debug!(
                episode = self.episode,
                step = step_count,
                "state after step:\n{}",
                step.board
            );

            if step.terminal {
                self.agent
                    .update(&state, action, step.reward, &step.board, &[]);
                if let Some((prev_state, prev_action)) = pending.take(mover.opponent()) {
                    self.agent
                        .update(&prev_state, prev_action, -step.reward, &step.board, &[]);
                }
                let outcome = match self.env.winner() {
                    Some(winner) => EpisodeOutcome::Win(winner),
                    None => EpisodeOutcome::Draw,
                };
                debug!(
                    episode = self.episode,
                    steps = step_count,
                    last_mover = %mover,
                    ?outcome,
                    "episode finished"
                );
                self.episode += 1;
                return Ok(outcome);
            }

            let next_valid_moves = self.env.get_valid_moves();
            if let Some((prev_state, prev_action)) = pending.take(mover.opponent()) {
                self.agent.update(
                    &prev_state,
                    prev_action,
                    step.reward,
                    &step.board,
                    &next_valid_moves,
                );
            }
            pending.set(mover, state, action);
            state = step.board;
        }
    }

    /// Runs `episodes` games, logging progress every 1% of the run.
    pub fn train(&mut self, episodes: usize) -> AgentResult<TrainingSummary> {
        let report_every = (episodes / 100).max(1);
        let mut summary = TrainingSummary::default();
        for i in 0..episodes {
            summary.record(self.run_episode()?);
            if (i + 1) % report_every == 0 {
                info!(
                    episode = i + 1,
                    states = self.agent.q_table().state_count(),
                    "{}",
                    summary
                );
            }
        }
        Ok(summary)
    }
}
