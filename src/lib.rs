//! Microcosm: an evolutionary ecosystem simulation.
//!
//! Organisms with heritable traits compete for a daily food supply in a
//! continuous 2D world with terrain, weather, temperature zones, and
//! obstacles. Fed organisms reproduce with mutation; drifted offspring
//! found new species. The engine tracks lineages, fitness, milestones,
//! and trait correlations per day.
//!
//! ```no_run
//! use microcosm::{Config, World};
//!
//! let mut world = World::with_seed(Config::default(), 42);
//! world.run_days(100);
//! println!("day {}: {} organisms", world.day(), world.population());
//! ```

pub mod analysis;
pub mod commands;
pub mod config;
pub mod contest;
pub mod environment;
pub mod fitness;
pub mod genetics;
pub mod geometry;
pub mod organism;
pub mod stats;
pub mod world;

pub use commands::SimCommand;
pub use config::Config;
pub use organism::{DeathCause, Organism, OrganismId};
pub use world::{DayPhase, World, DEFAULT_FRAME_DT};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
