//! Configuration system for the simulation engine.
//!
//! Supports YAML configuration files with sensible defaults and named
//! presets. Out-of-range values are clamped at the point of use rather
//! than rejected.

use crate::genetics::traits::{TraitKind, TraitRange};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldConfig,
    pub traits: TraitBoundsConfig,
    pub energy: EnergyConfig,
    pub day: DayNightConfig,
    pub reproduction: ReproductionConfig,
    pub food: FoodConfig,
    pub contest: ContestConfig,
    #[serde(default)]
    pub temperature: TemperatureConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub terrain: TerrainConfig,
    #[serde(default)]
    pub speciation: SpeciationConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// World/playfield configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Playable width in world units
    pub width: f32,
    /// Playable height in world units
    pub height: f32,
    /// Number of organisms at start
    pub initial_population: usize,
    /// Hard population cap (reproduction stops above this)
    pub max_population: usize,
}

/// Per-trait bounds and mutation ranges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitBoundsConfig {
    pub speed: TraitRange,
    pub sense_range: TraitRange,
    pub size: TraitRange,
    pub fertility: TraitRange,
    pub energy_efficiency: TraitRange,
    pub max_age: TraitRange,
    pub aggression: TraitRange,
    pub defense: TraitRange,
    pub metabolism: TraitRange,
    pub heat_tolerance: TraitRange,
    pub cold_tolerance: TraitRange,
}

impl TraitBoundsConfig {
    /// Bounds for a given trait
    pub fn range(&self, kind: TraitKind) -> &TraitRange {
        match kind {
            TraitKind::Speed => &self.speed,
            TraitKind::SenseRange => &self.sense_range,
            TraitKind::Size => &self.size,
            TraitKind::Fertility => &self.fertility,
            TraitKind::EnergyEfficiency => &self.energy_efficiency,
            TraitKind::MaxAge => &self.max_age,
            TraitKind::Aggression => &self.aggression,
            TraitKind::Defense => &self.defense,
            TraitKind::Metabolism => &self.metabolism,
            TraitKind::HeatTolerance => &self.heat_tolerance,
            TraitKind::ColdTolerance => &self.cold_tolerance,
        }
    }
}

/// Energy accounting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyConfig {
    /// Maximum energy an organism can hold
    pub max_energy: f32,
    /// Starting energy for the initial population
    pub initial_energy: f32,
    /// Flat energy cost applied to every organism at each day boundary,
    /// scaled by the metabolism trait and divided by energy efficiency
    pub daily_metabolism: f32,
}

/// Day/night cycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayNightConfig {
    /// Fraction of day progress after which it is night (0..1)
    pub night_start: f32,
    /// Sense range multiplier at night
    pub night_sense_multiplier: f32,
}

/// Reproduction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReproductionConfig {
    /// Base reproduction probability before the fertility multiplier
    pub base_probability: f32,
    /// Distance from the parent at which offspring spawn
    pub spawn_distance: f32,
    /// Starting energy for offspring
    pub offspring_energy: f32,
}

/// Food spawning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodConfig {
    /// Food items spawned per live organism
    pub per_organism: f32,
    /// Minimum food items per day
    pub min_count: usize,
    /// Food item diameter (for capture collision)
    pub food_size: f32,
    /// Energy gained by the contest winner
    pub energy_gain: f32,
    /// Days between spawn pattern rotations
    pub pattern_rotation_days: u32,
    /// Cluster count for the clustered pattern
    pub cluster_count: usize,
    /// Cluster radius for the clustered pattern
    pub cluster_radius: f32,
    /// Ring radius as a fraction of the smaller world dimension
    pub ring_radius_fraction: f32,
}

/// Resource contention configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestConfig {
    /// Radius around a food item within which unfed organisms contest it
    pub contest_radius: f32,
    /// Weight of the aggression trait in the contest score
    pub aggression_weight: f32,
    /// Upper bound of the uniform random component
    pub random_range: f32,
    /// Weight of the size bonus
    pub size_bonus_weight: f32,
    /// Weight of the defense penalty
    pub defense_penalty_weight: f32,
}

/// Temperature model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureConfig {
    /// Baseline world temperature (also the comfort baseline)
    pub base_temperature: f32,
    /// Amplitude of the seasonal offset
    pub seasonal_amplitude: f32,
    /// Days per season (4 seasons per year)
    pub season_length_days: u32,
    /// Number of randomly placed temperature zones
    pub zone_count: usize,
    /// Zone radius bounds
    pub zone_radius_min: f32,
    pub zone_radius_max: f32,
    /// Zone temperature offset magnitude bound (sign is random)
    pub zone_offset_max: f32,
    /// Deviation beyond tolerance that is instantly lethal
    pub death_threshold: f32,
    /// Energy cost per degree of effective deviation per simulated second
    pub cost_per_degree: f32,
    /// Multiplier on the temperature energy cost at night
    pub night_cost_multiplier: f32,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            base_temperature: 20.0,
            seasonal_amplitude: 8.0,
            season_length_days: 16,
            zone_count: 3,
            zone_radius_min: 60.0,
            zone_radius_max: 160.0,
            zone_offset_max: 18.0,
            death_threshold: 25.0,
            cost_per_degree: 0.05,
            night_cost_multiplier: 1.25,
        }
    }
}

/// Weather event configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Minimum weather event duration in days
    pub min_duration_days: u32,
    /// Maximum weather event duration in days
    pub max_duration_days: u32,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            min_duration_days: 2,
            max_duration_days: 6,
        }
    }
}

/// Terrain generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Number of randomly generated terrain patches
    pub patch_count: usize,
    /// Patch side-length bounds
    pub patch_size_min: f32,
    pub patch_size_max: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            patch_count: 5,
            patch_size_min: 60.0,
            patch_size_max: 180.0,
        }
    }
}

/// Speciation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciationConfig {
    /// Genetic distance at or above which offspring found a new species
    pub threshold: f32,
}

impl Default for SpeciationConfig {
    fn default() -> Self {
        Self { threshold: 0.25 }
    }
}

/// Analytics configuration (milestone thresholds, correlation cadence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Days between trait correlation scans
    pub correlation_interval_days: u32,
    /// Population size thresholds (each fires at most once)
    pub population_thresholds: Vec<u32>,
    /// Generation thresholds (each fires at most once)
    pub generation_thresholds: Vec<u32>,
    /// Species count thresholds (each fires at most once)
    pub species_thresholds: Vec<u32>,
    /// Day-survival thresholds (each fires at most once)
    pub day_thresholds: Vec<u32>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            correlation_interval_days: 5,
            population_thresholds: vec![25, 50, 100, 250],
            generation_thresholds: vec![10, 25, 50],
            species_thresholds: vec![3, 5, 10],
            day_thresholds: vec![10, 50, 100],
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            traits: TraitBoundsConfig::default(),
            energy: EnergyConfig::default(),
            day: DayNightConfig::default(),
            reproduction: ReproductionConfig::default(),
            food: FoodConfig::default(),
            contest: ContestConfig::default(),
            temperature: TemperatureConfig::default(),
            weather: WeatherConfig::default(),
            terrain: TerrainConfig::default(),
            speciation: SpeciationConfig::default(),
            analysis: AnalysisConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            initial_population: 20,
            max_population: 500,
        }
    }
}

impl Default for TraitBoundsConfig {
    fn default() -> Self {
        Self {
            speed: TraitRange::new(5.0, 25.0, 2.0),
            sense_range: TraitRange::new(20.0, 120.0, 8.0),
            size: TraitRange::new(0.5, 3.0, 0.2),
            fertility: TraitRange::new(0.2, 2.0, 0.15),
            energy_efficiency: TraitRange::new(0.5, 2.0, 0.1),
            max_age: TraitRange::new(5.0, 40.0, 2.0),
            aggression: TraitRange::new(0.0, 1.0, 0.1),
            defense: TraitRange::new(0.0, 1.0, 0.1),
            metabolism: TraitRange::new(0.5, 2.0, 0.1),
            heat_tolerance: TraitRange::new(0.0, 15.0, 1.0),
            cold_tolerance: TraitRange::new(0.0, 15.0, 1.0),
        }
    }
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            max_energy: 100.0,
            initial_energy: 60.0,
            daily_metabolism: 8.0,
        }
    }
}

impl Default for DayNightConfig {
    fn default() -> Self {
        Self {
            night_start: 0.7,
            night_sense_multiplier: 0.5,
        }
    }
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self {
            base_probability: 0.45,
            spawn_distance: 24.0,
            offspring_energy: 50.0,
        }
    }
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            per_organism: 0.8,
            min_count: 8,
            food_size: 6.0,
            energy_gain: 35.0,
            pattern_rotation_days: 5,
            cluster_count: 4,
            cluster_radius: 60.0,
            ring_radius_fraction: 0.35,
        }
    }
}

impl Default for ContestConfig {
    fn default() -> Self {
        Self {
            contest_radius: 30.0,
            aggression_weight: 1.0,
            random_range: 0.5,
            size_bonus_weight: 0.2,
            defense_penalty_weight: 0.5,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;
        config.sanitize();
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// A named preset, or `None` for unknown names
    pub fn preset(name: &str) -> Option<Config> {
        match name {
            "default" => Some(Config::default()),
            "harsh" => {
                let mut config = Config::default();
                config.temperature.seasonal_amplitude = 14.0;
                config.temperature.zone_count = 5;
                config.food.per_organism = 0.6;
                config.reproduction.base_probability = 0.35;
                Some(config)
            }
            "abundant" => {
                let mut config = Config::default();
                config.food.per_organism = 1.5;
                config.food.min_count = 20;
                config.reproduction.base_probability = 0.6;
                config.world.initial_population = 40;
                Some(config)
            }
            _ => None,
        }
    }

    /// Absorb degenerate values. This never fails, it clamps.
    pub fn sanitize(&mut self) {
        self.world.width = self.world.width.max(100.0);
        self.world.height = self.world.height.max(100.0);
        self.world.initial_population = self.world.initial_population.max(1);
        self.world.max_population = self.world.max_population.max(self.world.initial_population);

        self.energy.max_energy = self.energy.max_energy.max(1.0);
        self.energy.initial_energy = self.energy.initial_energy.clamp(0.0, self.energy.max_energy);
        self.energy.daily_metabolism = self.energy.daily_metabolism.max(0.0);

        self.day.night_start = self.day.night_start.clamp(0.0, 1.0);
        self.day.night_sense_multiplier = self.day.night_sense_multiplier.clamp(0.0, 1.0);

        self.reproduction.base_probability = self.reproduction.base_probability.clamp(0.0, 1.0);
        self.reproduction.spawn_distance = self.reproduction.spawn_distance.max(0.0);
        self.reproduction.offspring_energy = self
            .reproduction
            .offspring_energy
            .clamp(0.0, self.energy.max_energy);

        self.food.per_organism = self.food.per_organism.max(0.0);
        self.food.food_size = self.food.food_size.max(1.0);
        self.food.energy_gain = self.food.energy_gain.max(0.0);
        self.food.pattern_rotation_days = self.food.pattern_rotation_days.max(1);
        self.food.ring_radius_fraction = self.food.ring_radius_fraction.clamp(0.05, 0.5);

        self.contest.contest_radius = self.contest.contest_radius.max(1.0);
        self.contest.random_range = self.contest.random_range.max(0.0);

        self.temperature.season_length_days = self.temperature.season_length_days.max(1);
        self.temperature.death_threshold = self.temperature.death_threshold.max(0.0);
        self.temperature.cost_per_degree = self.temperature.cost_per_degree.max(0.0);
        if self.temperature.zone_radius_max < self.temperature.zone_radius_min {
            std::mem::swap(
                &mut self.temperature.zone_radius_min,
                &mut self.temperature.zone_radius_max,
            );
        }

        if self.weather.max_duration_days < self.weather.min_duration_days {
            std::mem::swap(
                &mut self.weather.min_duration_days,
                &mut self.weather.max_duration_days,
            );
        }
        self.weather.min_duration_days = self.weather.min_duration_days.max(1);
        self.weather.max_duration_days = self.weather.max_duration_days.max(1);

        if self.terrain.patch_size_max < self.terrain.patch_size_min {
            std::mem::swap(
                &mut self.terrain.patch_size_min,
                &mut self.terrain.patch_size_max,
            );
        }

        self.speciation.threshold = self.speciation.threshold.max(0.0);
        self.analysis.correlation_interval_days = self.analysis.correlation_interval_days.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_sane() {
        let mut config = Config::default();
        let before = format!("{:?}", config);
        config.sanitize();
        // Defaults survive sanitization unchanged
        assert_eq!(before, format!("{:?}", config));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(
            config.world.initial_population,
            loaded.world.initial_population
        );
        assert_eq!(config.traits.speed, loaded.traits.speed);
    }

    #[test]
    fn test_sanitize_clamps_degenerate_values() {
        let mut config = Config::default();
        config.world.width = -10.0;
        config.reproduction.base_probability = 3.0;
        config.weather.min_duration_days = 9;
        config.weather.max_duration_days = 2;

        config.sanitize();

        assert_eq!(config.world.width, 100.0);
        assert_eq!(config.reproduction.base_probability, 1.0);
        assert!(config.weather.min_duration_days <= config.weather.max_duration_days);
    }

    #[test]
    fn test_presets() {
        assert!(Config::preset("default").is_some());
        assert!(Config::preset("harsh").is_some());
        assert!(Config::preset("abundant").is_some());
        assert!(Config::preset("nonsense").is_none());
    }
}
