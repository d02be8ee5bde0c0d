extern crate tic_tac_toe_ai;

mod cli;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tic_tac_toe_ai::evaluation::evaluate;
use tic_tac_toe_ai::input::{parse_board, MoveResponse};
use tic_tac_toe_ai::training::Trainer;
use tic_tac_toe_ai::{Hyperparameters, QLearningAgent};

use cli::{Cli, Command, EvaluateArgs, SuggestArgs, TrainArgs};

fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn greedy() -> Hyperparameters {
    Hyperparameters {
        epsilon: 0.0,
        ..Default::default()
    }
}

fn train(args: TrainArgs) -> Result<(), Box<dyn std::error::Error>> {
    let params = Hyperparameters::from(&args.hyperparameters);
    let mut agent = QLearningAgent::with_rng(params, rng(args.seed))?;
    if args.resume {
        agent.load_policy_or_default(&args.output);
    }
    info!(params = ?agent.params(), episodes = args.episodes, "starting training");

    let mut trainer = Trainer::new(agent);
    let summary = trainer.train(args.episodes)?;
    info!("training finished: {}", summary);

    trainer.agent().save_policy(&args.output)?;
    info!(path = %args.output.display(), "policy saved");
    Ok(())
}

fn suggest(args: SuggestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut agent = QLearningAgent::new(greedy())?;
    agent.load_policy_or_default(&args.policy);

    let response = match parse_board(&args.board) {
        Ok(board) => {
            let valid_moves = board.empty_cells();
            if valid_moves.is_empty() {
                MoveResponse::error("No valid moves")
            } else {
                MoveResponse::from(agent.get_action(&board, &valid_moves)?)
            }
        }
        Err(err) => MoveResponse::error(err),
    };
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

fn evaluate_policy(args: EvaluateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut agent = QLearningAgent::with_rng(greedy(), rng(args.seed))?;
    agent.load_policy_or_default(&args.policy);
    let mut opponent_rng = rng(args.seed.map(|seed| seed.wrapping_add(1)));
    let summary = evaluate(&mut agent, args.games, &mut opponent_rng)?;
    info!("evaluation finished: {}", summary);
    println!("{}", summary);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Train(args) => train(args),
        Command::Suggest(args) => suggest(args),
        Command::Evaluate(args) => evaluate_policy(args),
    }
}
