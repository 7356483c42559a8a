use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use elevator_sim::console::{load_state, save_state, Console};
use elevator_sim::simulation::{FleetScheduler, LogSink, TrafficGenerator};

#[derive(Parser)]
#[command(name = "elevator_sim")]
#[command(about = "Elevator fleet dispatch simulation")]
struct Cli {
    /// Number of floors in the building
    #[arg(long, default_value = "10")]
    floors: u32,

    /// Number of elevator cars
    #[arg(long, default_value = "3")]
    cars: u32,

    /// Number of simulation ticks to run in headless mode
    #[arg(long, default_value = "200")]
    ticks: u32,

    /// Seed for reproducible traffic
    #[arg(long)]
    seed: Option<u64>,

    /// Probability of a new hall call each tick
    #[arg(long, default_value = "0.3")]
    call_rate: f64,

    /// Probability of a cab button press each tick
    #[arg(long, default_value = "0.1")]
    press_rate: f64,

    /// Read commands from stdin instead of generating traffic
    #[arg(long)]
    interactive: bool,

    /// Start from a saved state instead of a fresh building
    #[arg(long)]
    load: Option<PathBuf>,

    /// Save the final state to this file
    #[arg(long)]
    save: Option<PathBuf>,
}

/// How many ticks pass between progress summaries in headless mode
const SUMMARY_INTERVAL: u32 = 10;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let scheduler = match &cli.load {
        Some(path) => {
            let state = load_state(path)?;
            FleetScheduler::from_state(&state, Box::new(LogSink))
                .with_context(|| format!("Invalid state in {}", path.display()))?
        }
        None => FleetScheduler::new(cli.floors, cli.cars)
            .context("Invalid building configuration")?,
    };

    let scheduler = if cli.interactive {
        run_interactive(scheduler)?
    } else {
        run_headless(&cli, scheduler)?
    };

    if let Some(path) = &cli.save {
        save_state(&scheduler.current_state(), path)?;
        info!("Saved state to {}", path.display());
    }

    Ok(())
}

/// Run the simulation with generated traffic
fn run_headless(cli: &Cli, mut scheduler: FleetScheduler) -> Result<FleetScheduler> {
    info!("Running elevator simulation in headless mode...");
    info!(
        "Floors: {}, Cars: {}, Ticks: {}",
        scheduler.floor_count(),
        scheduler.cars().len(),
        cli.ticks
    );

    let mut traffic = match cli.seed {
        Some(seed) => TrafficGenerator::new_with_seed(seed, cli.call_rate, cli.press_rate),
        None => TrafficGenerator::new(cli.call_rate, cli.press_rate),
    };

    let mut tick = 0;
    while tick < cli.ticks {
        traffic
            .apply(&mut scheduler)
            .context("Generated traffic was rejected")?;
        scheduler.tick(1);
        tick += 1;

        if tick % SUMMARY_INTERVAL == 0 {
            info!("--- After tick {} ---", tick);
            info!("{}", scheduler.status());
        }
    }

    info!("=== SIMULATION COMPLETE ===");
    scheduler.log_summary();
    let stats = scheduler.stats();
    info!("Total calls placed: {}", stats.calls_placed);
    info!("Total calls served: {}", stats.calls_served);
    info!("Average wait: {:.1} ticks", stats.average_wait());
    info!("Service rate: {:.1}%", stats.service_rate());

    Ok(scheduler)
}

/// Drive the simulation from stdin
fn run_interactive(scheduler: FleetScheduler) -> Result<FleetScheduler> {
    println!("Elevator simulation console. Type 'help' for commands.");
    let mut console = Console::new(scheduler);
    let stdin = std::io::stdin();
    console.run(stdin.lock(), std::io::stdout())?;
    Ok(console.into_scheduler())
}
