use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tic_tac_toe_ai::Hyperparameters;

pub const DEFAULT_POLICY_PATH: &str = "tic_tac_toe_policy.json";

#[derive(Parser, Debug)]
#[command(version, about = "Tabular Q-learning tic-tac-toe agent")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Train a policy through self-play and save it
    Train(TrainArgs),
    /// Suggest a move for a board given as JSON
    Suggest(SuggestArgs),
    /// Play a saved policy against a random opponent
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug)]
pub struct HyperparameterArgs {
    /// Exploration probability
    #[arg(long, env = "TTT_EPSILON", default_value_t = 0.1)]
    pub epsilon: f32,
    /// Learning rate
    #[arg(long, env = "TTT_ALPHA", default_value_t = 0.1)]
    pub alpha: f32,
    /// Discount factor
    #[arg(long, env = "TTT_GAMMA", default_value_t = 0.9)]
    pub gamma: f32,
}

impl From<&HyperparameterArgs> for Hyperparameters {
    fn from(args: &HyperparameterArgs) -> Self {
        Self {
            epsilon: args.epsilon,
            alpha: args.alpha,
            gamma: args.gamma,
        }
    }
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub hyperparameters: HyperparameterArgs,
    /// Number of self-play games
    #[arg(long, env = "TTT_EPISODES", default_value_t = 100_000)]
    pub episodes: usize,
    /// Where to write the trained policy
    #[arg(short, long, env = "TTT_POLICY", default_value = DEFAULT_POLICY_PATH)]
    pub output: PathBuf,
    /// Continue from the policy already stored at the output path
    #[arg(long)]
    pub resume: bool,
    /// Seed for reproducible runs
    #[arg(long, env = "TTT_SEED")]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct SuggestArgs {
    #[arg(short, long, env = "TTT_POLICY", default_value = DEFAULT_POLICY_PATH)]
    pub policy: PathBuf,
    /// Board as JSON: 3 rows of 3 cells or 9 cells, 1 for X, -1 for O, 0 for empty
    #[arg(long)]
    pub board: String,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    #[arg(short, long, env = "TTT_POLICY", default_value = DEFAULT_POLICY_PATH)]
    pub policy: PathBuf,
    /// Number of games against the random opponent
    #[arg(long, default_value_t = 1000)]
    pub games: usize,
    #[arg(long, env = "TTT_SEED")]
    pub seed: Option<u64>,
}
