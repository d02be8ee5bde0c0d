pub mod error;
pub mod evaluation;
pub mod input;
pub mod q_learning;
pub mod training;

pub use error::{AgentError, AgentResult, PolicyLoadError};
pub use q_learning::{Hyperparameters, QLearningAgent};
