//! Per-day statistics: trait aggregates, death breakdowns, species
//! summaries, and the run history.

use crate::analysis::{CorrelationReport, Milestone};
use crate::environment::{Season, SpawnPattern, WeatherKind};
use crate::fitness::FitnessEntry;
use crate::genetics::traits::TraitKind;
use crate::organism::{DeathCause, Organism, OrganismId};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Mean/min/max of one trait across the living population
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct TraitAggregate {
    pub mean: f32,
    pub min: f32,
    pub max: f32,
}

/// Death counts by cause for one day
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct DeathBreakdown {
    pub starvation: u32,
    pub old_age: u32,
    pub low_energy: u32,
    pub hazard: u32,
}

impl DeathBreakdown {
    pub fn record(&mut self, cause: DeathCause) {
        match cause {
            DeathCause::Starvation => self.starvation += 1,
            DeathCause::OldAge => self.old_age += 1,
            DeathCause::LowEnergy => self.low_energy += 1,
            DeathCause::Hazard => self.hazard += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.starvation + self.old_age + self.low_energy + self.hazard
    }
}

/// One species' share of the day
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SpeciesSummary {
    pub species_id: OrganismId,
    pub population: usize,
}

/// The public fields of one living organism, snapshotted at the day
/// boundary for external consumers
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct OrganismSummary {
    pub id: OrganismId,
    pub species_id: OrganismId,
    pub generation: u32,
    pub age: u32,
    pub energy: f32,
    pub position: crate::geometry::Vec2,
    pub fed: bool,
}

impl From<&Organism> for OrganismSummary {
    fn from(o: &Organism) -> Self {
        Self {
            id: o.id,
            species_id: o.species_id,
            generation: o.generation,
            age: o.age,
            energy: o.energy,
            position: o.position,
            fed: o.has_food_today,
        }
    }
}

/// Everything recorded at one day boundary
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DayStats {
    pub day: u32,
    pub population: usize,
    pub births: u32,
    pub deaths: DeathBreakdown,
    pub max_generation: u32,
    pub species_alive: usize,
    pub species_total: usize,
    pub traits: [TraitAggregate; TraitKind::COUNT],
    pub species: Vec<SpeciesSummary>,
    pub organisms: Vec<OrganismSummary>,
    pub milestones: Vec<Milestone>,
    pub correlations: Vec<CorrelationReport>,
    pub elites: Vec<FitnessEntry>,
    pub weather: WeatherKind,
    pub season: Season,
    pub pattern: SpawnPattern,
}

impl DayStats {
    pub fn trait_aggregate(&self, kind: TraitKind) -> &TraitAggregate {
        &self.traits[kind.index()]
    }
}

/// Trait aggregates over the living population, in one pass. An empty
/// population yields all-zero aggregates.
pub fn aggregate_traits<'a>(
    organisms: impl Iterator<Item = &'a Organism>,
) -> [TraitAggregate; TraitKind::COUNT] {
    let mut count = 0usize;
    let mut sums = [0.0f32; TraitKind::COUNT];
    let mut mins = [f32::INFINITY; TraitKind::COUNT];
    let mut maxs = [f32::NEG_INFINITY; TraitKind::COUNT];

    for organism in organisms {
        count += 1;
        for kind in TraitKind::ALL {
            let v = organism.traits.get(kind);
            let i = kind.index();
            sums[i] += v;
            mins[i] = mins[i].min(v);
            maxs[i] = maxs[i].max(v);
        }
    }

    let mut out = [TraitAggregate::default(); TraitKind::COUNT];
    if count == 0 {
        return out;
    }
    for kind in TraitKind::ALL {
        let i = kind.index();
        out[i] = TraitAggregate {
            mean: sums[i] / count as f32,
            min: mins[i],
            max: maxs[i],
        };
    }
    out
}

/// Gets the day's statistics as they are produced
pub trait StatsObserver {
    fn on_day_complete(&mut self, stats: &DayStats);
}

/// Observer that writes a one-line day summary to the log
#[derive(Debug, Default)]
pub struct LogObserver;

impl StatsObserver for LogObserver {
    fn on_day_complete(&mut self, stats: &DayStats) {
        log::info!(
            "day {}: pop {} (+{}/-{}), {} species, {} {} ({})",
            stats.day,
            stats.population,
            stats.births,
            stats.deaths.total(),
            stats.species_alive,
            stats.season.name(),
            stats.weather.name(),
            stats.pattern.name(),
        );
        for milestone in &stats.milestones {
            log::info!("milestone: {}", milestone.description);
        }
        for report in &stats.correlations {
            log::info!(
                "correlation: {} ~ {} (r = {:.2})",
                report.a.name(),
                report.b.name(),
                report.coefficient,
            );
        }
    }
}

/// Full run history of day statistics
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    days: Vec<DayStats>,
}

impl StatsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stats: DayStats) {
        self.days.push(stats);
    }

    pub fn latest(&self) -> Option<&DayStats> {
        self.days.last()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DayStats> {
        self.days.iter()
    }

    pub fn total_births(&self) -> u32 {
        self.days.iter().map(|d| d.births).sum()
    }

    pub fn total_deaths(&self) -> u32 {
        self.days.iter().map(|d| d.deaths.total()).sum()
    }

    /// Dump the whole history as JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(&self.days)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Export the headline numbers as CSV, one row per day
    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let mut out = String::from(
            "day,population,births,deaths,starvation,old_age,low_energy,hazard,species_alive,max_generation,season,weather,pattern\n",
        );
        for d in &self.days {
            out.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
                d.day,
                d.population,
                d.births,
                d.deaths.total(),
                d.deaths.starvation,
                d.deaths.old_age,
                d.deaths.low_energy,
                d.deaths.hazard,
                d.species_alive,
                d.max_generation,
                d.season.name(),
                d.weather.name(),
                d.pattern.name(),
            ));
        }
        std::fs::write(path, out)?;
        Ok(())
    }
}
