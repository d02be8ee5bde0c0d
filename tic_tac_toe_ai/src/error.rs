use std::path::PathBuf;

use game_environment::game::GameError;

pub type AgentResult<T> = Result<T, AgentError>;

#[derive(thiserror::Error, Debug)]
pub enum AgentError {
    #[error("no valid moves to choose from")]
    NoValidMoves,
    #[error("invalid hyperparameter {name}={value} (expected: {expected})")]
    InvalidHyperparameter {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },
    #[error("failed to write policy to {path}: {source}")]
    PolicyWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("value {value} of {action} in {state} can't be saved")]
    NonFiniteValue {
        state: String,
        action: String,
        value: f32,
    },
    #[error("failed to serialize policy: {0}")]
    PolicySerialization(#[from] serde_json::Error),
    #[error("malformed board: {0}")]
    MalformedBoard(#[source] serde_json::Error),
    #[error(transparent)]
    Game(#[from] GameError),
}

impl AgentError {
    pub fn invalid_hyperparameter(name: &'static str, value: f32, expected: &'static str) -> Self {
        Self::InvalidHyperparameter {
            name,
            value,
            expected,
        }
    }
}

/// A policy file couldn't be read back.
///
/// This is never fatal: the agent keeps its current table and the caller
/// may continue with an empty one.
#[derive(thiserror::Error, Debug)]
pub enum PolicyLoadError {
    #[error("no policy available at {path}: {source}")]
    Missing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("policy at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
