//! Tabular Q-learning: the value table, its keys, the epsilon-greedy agent
//! and the flat snapshot the table is persisted as.

mod agent;
mod keys;
mod policy;
mod q_table;

pub use agent::{Hyperparameters, QLearningAgent};
pub use keys::{ActionKey, StateKey};
pub use q_table::{QTable, QValue};
