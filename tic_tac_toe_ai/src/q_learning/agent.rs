use std::cmp::Ordering;
use std::path::Path;

use game_environment::game::{Board, Position, Reward};
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::error::{AgentError, AgentResult, PolicyLoadError};
use crate::q_learning::keys::{ActionKey, StateKey};
use crate::q_learning::policy;
use crate::q_learning::q_table::{QTable, QValue};

fn calculate_q(old: QValue, max_q_next: QValue, reward: Reward, lr: f32, gamma: f32) -> QValue {
    old + lr * (reward + gamma * max_q_next - old)
}

/// Fixed learning parameters of an agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hyperparameters {
    /// Probability of picking a random move instead of the best known one, `[0, 1]`.
    pub epsilon: f32,
    /// Learning rate, `(0, 1]`.
    pub alpha: f32,
    /// Discount factor, `[0, 1]`.
    pub gamma: f32,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            alpha: 0.1,
            gamma: 0.9,
        }
    }
}

impl Hyperparameters {
    pub fn validate(&self) -> AgentResult<()> {
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(AgentError::invalid_hyperparameter(
                "epsilon",
                self.epsilon,
                "0.0-1.0",
            ));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(AgentError::invalid_hyperparameter(
                "alpha",
                self.alpha,
                "greater than 0.0, at most 1.0",
            ));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(AgentError::invalid_hyperparameter(
                "gamma",
                self.gamma,
                "0.0-1.0",
            ));
        }
        Ok(())
    }
}

/// Epsilon-greedy tabular Q-learning agent.
///
/// The agent owns its value table and its source of randomness, which drives both
/// exploration and tie-breaking between equally valued moves. It keeps no state between
/// calls other than the table, so it has no notion of episodes.
#[derive(Debug)]
pub struct QLearningAgent<R = StdRng> {
    params: Hyperparameters,
    q_table: QTable,
    rng: R,
}

impl QLearningAgent<StdRng> {
    pub fn new(params: Hyperparameters) -> AgentResult<Self> {
        Self::with_rng(params, StdRng::from_entropy())
    }

    pub fn seeded(params: Hyperparameters, seed: u64) -> AgentResult<Self> {
        Self::with_rng(params, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> QLearningAgent<R> {
    pub fn with_rng(params: Hyperparameters, rng: R) -> AgentResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            q_table: QTable::default(),
            rng,
        })
    }

    pub fn params(&self) -> &Hyperparameters {
        &self.params
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Current estimate for playing `action` in `state`.
    pub fn value(&self, state: &Board, action: Position) -> QValue {
        self.q_table
            .get(&StateKey::from(state), &ActionKey::from(action))
    }

    /// Picks a random move with probability epsilon, the best known move otherwise.
    pub fn get_action(&mut self, state: &Board, valid_moves: &[Position]) -> AgentResult<Position> {
        if valid_moves.is_empty() {
            return Err(AgentError::NoValidMoves);
        }
        if self.rng.sample(Uniform::from(0.0..1.0f32)) < self.params.epsilon {
            return Ok(self.random_action(valid_moves));
        }
        self.best_action(state, valid_moves)
    }

    /// Picks the move with the highest value, ties are broken uniformly at random.
    pub fn best_action(&mut self, state: &Board, valid_moves: &[Position]) -> AgentResult<Position> {
        if valid_moves.is_empty() {
            return Err(AgentError::NoValidMoves);
        }
        let state_key = StateKey::from(state);
        let mut max_q = QValue::NEG_INFINITY;
        let mut best_actions = Vec::with_capacity(valid_moves.len());
        for &action in valid_moves {
            let q_value = self.q_table.get(&state_key, &ActionKey::from(action));
            match q_value.partial_cmp(&max_q) {
                Some(Ordering::Greater) => {
                    best_actions.clear();
                    best_actions.push(action);
                    max_q = q_value;
                }
                Some(Ordering::Equal) => {
                    best_actions.push(action);
                }
                _ => {}
            }
        }
        match best_actions.len() {
            1 => Ok(best_actions[0]),
            // every value is NaN
            0 => Ok(self.random_action(valid_moves)),
            _ => Ok(self.random_action(&best_actions)),
        }
    }

    /// One-step Q-learning update of `(state, action)`.
    ///
    /// The bootstrap term is the best value over `next_valid_moves` in `next_state`,
    /// pass no moves for a terminal transition.
    pub fn update(
        &mut self,
        state: &Board,
        action: Position,
        reward: Reward,
        next_state: &Board,
        next_valid_moves: &[Position],
    ) {
        let next_actions: Vec<ActionKey> = next_valid_moves
            .iter()
            .map(|&m| ActionKey::from(m))
            .collect();
        let max_q_next = self
            .q_table
            .max_value(&StateKey::from(next_state), &next_actions);

        let Hyperparameters { alpha, gamma, .. } = self.params;
        let q_value = self
            .q_table
            .entry(StateKey::from(state), ActionKey::from(action));
        *q_value = calculate_q(*q_value, max_q_next, reward, alpha, gamma);
    }

    pub fn save_policy(&self, path: impl AsRef<Path>) -> AgentResult<()> {
        policy::save(&self.q_table, path.as_ref())
    }

    /// Replaces the whole value table with the one stored at `path`.
    /// On failure the current table is kept.
    pub fn load_policy(&mut self, path: impl AsRef<Path>) -> Result<(), PolicyLoadError> {
        self.q_table = policy::load(path.as_ref(), self.q_table.default_value())?;
        Ok(())
    }

    /// Like [`QLearningAgent::load_policy`], but falls back to an empty table on failure.
    /// Returns `true` if the policy was loaded.
    pub fn load_policy_or_default(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.load_policy(path) {
            Ok(()) => {
                info!(
                    path = %path.display(),
                    states = self.q_table.state_count(),
                    "loaded trained policy"
                );
                true
            }
            Err(err) => {
                warn!(%err, "no trained policy found, using an untrained one");
                self.q_table = QTable::new(self.q_table.default_value());
                false
            }
        }
    }

    fn random_action(&mut self, actions: &[Position]) -> Position {
        actions[self.rng.sample(Uniform::from(0..actions.len()))]
    }
}
