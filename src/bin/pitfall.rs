use std::{fs::File, io, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use pitfall::{
    algo::tabular::{QTableAgent, QTableAgentConfig},
    env::{DiscreteStateSpace, Environment},
    gym::{Action, GridWorld, GridWorldConfig},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pitfall")]
#[command(about = "Train a Q-table agent on a grid world with fire pits and teleporters")]
struct Cli {
    /// Cells per line, also the distance covered by one move up or down
    #[arg(long, default_value_t = 4)]
    rows: usize,

    /// Number of lines
    #[arg(long, default_value_t = 4)]
    columns: usize,

    /// Fire pit cells, comma separated
    #[arg(long, value_name = "CELL", value_delimiter = ',', num_args = 0..)]
    #[arg(default_values_t = [11, 12])]
    hazards: Vec<usize>,

    /// Teleporters as IN:OUT pairs, comma separated
    #[arg(long, value_name = "IN:OUT", value_delimiter = ',', num_args = 0..)]
    #[arg(value_parser = parse_teleporter, default_values = ["5:14", "13:2"])]
    teleporters: Vec<(usize, usize)>,

    /// Number of episodes; epsilon reaches zero at the last one
    #[arg(long, default_value_t = 50_000)]
    episodes: u32,

    /// Learning rate
    #[arg(long, default_value_t = 0.1)]
    alpha: f32,

    /// Discount factor
    #[arg(long, default_value_t = 1.0)]
    gamma: f32,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Write per-episode statistics to this CSV file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

fn parse_teleporter(s: &str) -> Result<(usize, usize), String> {
    let (entrance, exit) = s
        .split_once(':')
        .ok_or_else(|| format!("expected IN:OUT, got `{s}`"))?;
    let cell = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid cell `{v}` in `{s}`: {e}"))
    };
    Ok((cell(entrance)?, cell(exit)?))
}

/// Follow the learned policy from the start without exploring, giving up after visiting as
/// many cells as the grid has
fn greedy_path(agent: &QTableAgent<GridWorld>, env: &GridWorld) -> (Vec<Action>, bool) {
    let mut env = env.clone();
    let mut state = env.reset();
    let mut path = Vec::new();
    for _ in 0..env.num_states() {
        let action = agent.greedy_action(&env, state);
        let (next, _, done) = env.step(action);
        path.push(action);
        if done {
            return (path, true);
        }
        state = next;
    }
    (path, false)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut env = GridWorld::new(GridWorldConfig {
        rows: cli.rows,
        columns: cli.columns,
        hazards: cli.hazards.into_iter().collect(),
        teleporters: cli.teleporters.into_iter().collect(),
    })
    .context("invalid grid")?;

    let config = QTableAgentConfig {
        alpha: cli.alpha,
        gamma: cli.gamma,
        seed: cli.seed,
        ..QTableAgentConfig::annealed(cli.episodes).context("invalid episode count")?
    };
    let mut agent = QTableAgent::new(&env, config).context("invalid agent configuration")?;

    let out: Box<dyn io::Write> = match &cli.out {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["episode", "steps", "reward", "epsilon"])?;

    let mut last = None;
    for summary in agent.train(&mut env, cli.episodes) {
        wtr.write_record(&[
            summary.episode.to_string(),
            summary.steps.to_string(),
            summary.reward.to_string(),
            summary.epsilon.to_string(),
        ])?;
        last = Some(summary);
    }
    wtr.flush()?;

    if let Some(summary) = last {
        info!(
            "last episode took {} steps for a reward of {}",
            summary.steps, summary.reward
        );
    }

    let (path, reached) = greedy_path(&agent, &env);
    let path = path.iter().map(Action::to_string).collect::<Vec<_>>().join(" ");
    if reached {
        info!("greedy path to the goal: {path}");
    } else {
        warn!("greedy policy does not reach the goal: {path}");
    }

    Ok(())
}
