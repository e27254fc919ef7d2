use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;

use gridworld_q::config::DEFAULT_SEED;
use gridworld_q::logging::init_logging;
use gridworld_q::{AgentConfig, EnvironmentDescription, QLearningAgent, TrainingReport};

/// Train a Q-learning agent to walk a grid world towards its goal tiles.
#[derive(Debug, Parser)]
#[command(name = "gridworld-q", version)]
struct Args {
    /// JSON environment description
    #[arg(short = 'e', long, default_value = "data/sample_environment.json")]
    environment: PathBuf,

    /// Number of training episodes; asked on stdin when omitted
    #[arg(short = 'n', long)]
    episodes: Option<usize>,

    /// Learning rate
    #[arg(long, default_value_t = 0.1)]
    alpha: f64,

    /// Discount factor
    #[arg(long, default_value_t = 0.9)]
    gamma: f64,

    /// Final exploration rate
    #[arg(long, default_value_t = 0.1)]
    epsilon: f64,

    /// Seed for the agent's random generator
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Also write the tile visit counts to this CSV file
    #[arg(long)]
    visits_csv: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = AgentConfig::new(args.alpha, args.gamma, args.epsilon)?.with_seed(args.seed);
    let description = EnvironmentDescription::from_path(&args.environment)
        .with_context(|| format!("loading {}", args.environment.display()))?;

    let mut agent = QLearningAgent::new(config);
    agent.load_environment(&description)?;

    let episodes = match args.episodes {
        Some(0) => bail!("the number of episodes must be positive"),
        Some(episodes) => episodes,
        None => ask_episodes(io::stdin().lock())?,
    };

    println!("Running {} training episodes...", episodes);
    let start = Instant::now();
    agent.train(episodes)?;
    println!(
        "{} episodes run in {:.2} seconds",
        episodes,
        start.elapsed().as_secs_f64()
    );

    let report = TrainingReport::from_agent(&agent, episodes)?;
    println!("{}", report);

    if let Some(path) = &args.visits_csv {
        let file = File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        report.write_visit_csv(file)?;
        tracing::info!(path = %path.display(), "visit counts written");
    }
    Ok(())
}

/// Keeps asking until a positive integer is entered.
fn ask_episodes<R: BufRead>(input: R) -> Result<usize> {
    prompt()?;
    for line in input.lines() {
        let line = line.context("reading the number of episodes")?;
        match line.trim().parse::<usize>() {
            Ok(episodes) if episodes > 0 => return Ok(episodes),
            _ => prompt()?,
        }
    }
    bail!("input finished before a number of episodes was entered")
}

fn prompt() -> io::Result<()> {
    print!("Enter number of episodes: ");
    io::stdout().flush()
}
