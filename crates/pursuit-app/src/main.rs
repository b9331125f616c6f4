use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pursuit_app::game_loop::{spawn_sim_loop, LoopSettings};
use pursuit_app::sink::{JsonLinesSink, NullSink};
use pursuit_core::config::Scenario;
use pursuit_sim::Simulation;

#[derive(Parser)]
#[command(name = "pursuit")]
#[command(about = "Robots steering toward a moving target with P/PD/PI/PID control")]
struct Args {
    /// Scenario file (TOML). Uses the built-in five-robot demo when omitted.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Stop after this many ticks. Runs until killed when omitted.
    #[arg(long)]
    ticks: Option<u64>,

    /// RNG seed, overriding the scenario.
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds between ticks, overriding the scenario.
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Do not write frames to stdout.
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pursuit=info,pursuit_app=info,pursuit_sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let mut scenario = match &args.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => Scenario::default(),
    };
    if let Some(seed) = args.seed {
        scenario.sim.seed = Some(seed);
    }
    if let Some(ms) = args.tick_ms {
        scenario.sim.tick_interval_ms = ms;
    }

    let sim = Simulation::from_scenario(&scenario).context("building simulation")?;
    let settings = LoopSettings {
        tick_interval: scenario.sim.tick_interval(),
        max_ticks: args.ticks,
    };
    info!(entities = sim.len(), seed = ?scenario.sim.seed, "starting");

    // The sender must outlive the loop; dropping it shuts the loop down.
    let (cmd_tx, handle) = if args.quiet {
        spawn_sim_loop(sim, NullSink, settings)
    } else {
        spawn_sim_loop(sim, JsonLinesSink::new(io::stdout()), settings)
    }
    .context("spawning sim loop thread")?;

    let report = handle
        .join()
        .map_err(|_| anyhow::anyhow!("sim loop thread panicked"))??;
    drop(cmd_tx);

    info!(ticks = report.ticks, respawns = report.respawns, "done");
    Ok(())
}
