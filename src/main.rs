//! Command line front end for the simulation.

use clap::{Parser, Subcommand};
use microcosm::stats::LogObserver;
use microcosm::{Config, World};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "microcosm", version, about = "Evolutionary ecosystem simulation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Named preset: default, harsh, abundant
        #[arg(short, long, conflicts_with = "config")]
        preset: Option<String>,
        /// Number of days to simulate
        #[arg(short, long, default_value_t = 100)]
        days: u32,
        /// RNG seed (random when omitted)
        #[arg(short, long)]
        seed: Option<u64>,
        /// Suppress the per-day summary
        #[arg(short, long)]
        quiet: bool,
        /// Write the run history as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Write the run history as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Write a default configuration file
    Init {
        /// Destination path
        #[arg(default_value = "microcosm.yaml")]
        path: PathBuf,
    },
    /// Measure simulation throughput
    Benchmark {
        /// Days to simulate
        #[arg(short, long, default_value_t = 200)]
        days: u32,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Run {
            config,
            preset,
            days,
            seed,
            quiet,
            json,
            csv,
        } => {
            let config = load_config(config, preset)?;
            let mut world = match seed {
                Some(seed) => World::with_seed(config, seed),
                None => World::new(config),
            };
            if !quiet {
                world.add_observer(Box::new(LogObserver));
            }

            world.run_days(days);

            log::info!(
                "finished: day {}, population {}, {} species ({} alive), seed {}",
                world.day(),
                world.population(),
                world.species().total_count(),
                world.species().living_count(),
                world.seed(),
            );
            if let Some(path) = json {
                world.history().save_json(&path)?;
                log::info!("history written to {}", path.display());
            }
            if let Some(path) = csv {
                world.history().save_csv(&path)?;
                log::info!("history written to {}", path.display());
            }
            Ok(())
        }
        Command::Init { path } => {
            Config::default().save(&path)?;
            log::info!("default configuration written to {}", path.display());
            Ok(())
        }
        Command::Benchmark { days } => {
            let mut world = World::with_seed(Config::default(), 42);
            let start = Instant::now();
            world.run_days(days);
            let elapsed = start.elapsed();
            log::info!(
                "{} days in {:.2?} ({:.1} days/s, final population {})",
                world.day() - 1,
                elapsed,
                (world.day() - 1) as f64 / elapsed.as_secs_f64().max(1e-9),
                world.population(),
            );
            Ok(())
        }
    }
}

fn load_config(
    path: Option<PathBuf>,
    preset: Option<String>,
) -> Result<Config, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Config::from_file(&path);
    }
    if let Some(name) = preset {
        return Config::preset(&name).ok_or_else(|| format!("unknown preset '{}'", name).into());
    }
    Ok(Config::default())
}
