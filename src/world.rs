//! The world: organism arena, environment, and the day cycle.
//!
//! A day runs as a movement phase driven by `step` calls until every food
//! item is claimed or every organism has eaten, then an evaluation phase
//! settles aging, deaths, reproduction, and analytics in one pass.

use crate::analysis::{CorrelationScanner, DayObservation, MilestoneTracker};
use crate::commands::{clamp_time_scale, SimCommand};
use crate::config::Config;
use crate::contest;
use crate::environment::{effective_deviation, Environment, FoodId};
use crate::fitness;
use crate::genetics::traits::{TraitKind, TraitVector};
use crate::genetics::{reproduction, LineageTracker, SpeciesRegistry};
use crate::geometry::Vec2;
use crate::organism::{DeathCause, Organism, OrganismId, OrganismKey};
use crate::stats::{
    aggregate_traits, DayStats, DeathBreakdown, OrganismSummary, SpeciesSummary, StatsHistory,
    StatsObserver,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use slotmap::SlotMap;

/// Steps allowed within a single day before the evaluation is forced.
/// Guards against unfed organisms that can never reach the leftover food.
const MAX_STEPS_PER_DAY: u32 = 50_000;

/// Default wall-clock slice per `step` call, in simulated seconds
pub const DEFAULT_FRAME_DT: f32 = 0.05;

/// Day cycle phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayPhase {
    Movement,
    Evaluation,
}

/// The complete simulation state
pub struct World {
    config: Config,
    organisms: SlotMap<OrganismKey, Organism>,
    environment: Environment,
    species: SpeciesRegistry,
    lineages: LineageTracker,
    milestones: MilestoneTracker,
    correlations: CorrelationScanner,
    history: StatsHistory,
    observers: Vec<Box<dyn StatsObserver>>,
    pending_commands: Vec<SimCommand>,
    rng: ChaCha8Rng,
    seed: u64,
    next_organism_id: OrganismId,
    time_scale: f32,
    phase: DayPhase,
    day: u32,
    steps_today: u32,
    population_at_dawn: usize,
    births_today: u32,
    deaths_today: DeathBreakdown,
    corpses: Vec<Vec2>,
}

impl World {
    /// Build a world with a random seed
    pub fn new(config: Config) -> Self {
        Self::with_seed(config, rand::random())
    }

    /// Build a world from an explicit seed; identical seeds and configs
    /// produce identical runs.
    pub fn with_seed(mut config: Config, seed: u64) -> Self {
        config.sanitize();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let environment = Environment::generate(&config, &mut rng);

        let mut world = Self {
            organisms: SlotMap::with_key(),
            environment,
            species: SpeciesRegistry::new(),
            lineages: LineageTracker::new(),
            milestones: MilestoneTracker::new(),
            correlations: CorrelationScanner::new(),
            history: StatsHistory::new(),
            observers: Vec::new(),
            pending_commands: Vec::new(),
            rng,
            seed,
            next_organism_id: 1,
            time_scale: 1.0,
            phase: DayPhase::Movement,
            day: 1,
            steps_today: 0,
            population_at_dawn: 0,
            births_today: 0,
            deaths_today: DeathBreakdown::default(),
            corpses: Vec::new(),
            config,
        };
        world.spawn_initial_population();
        world.population_at_dawn = world.organisms.len();
        world
    }

    /// The initial population shares one founding species; every member
    /// starts its own lineage.
    fn spawn_initial_population(&mut self) {
        let bounds = Vec2::new(self.config.world.width, self.config.world.height);
        let founding_species = self.next_organism_id;

        for _ in 0..self.config.world.initial_population {
            let id = self.alloc_id();
            let traits = TraitVector::random(&self.config.traits, &mut self.rng);
            let position = Vec2::new(
                self.rng.gen_range(0.0..bounds.x),
                self.rng.gen_range(0.0..bounds.y),
            );
            let organism = Organism::new(
                id,
                founding_species,
                0,
                traits,
                position,
                self.config.energy.initial_energy,
            );
            self.lineages.register_founder(id, self.day);
            self.organisms.insert(organism);
        }
        self.species.found(founding_species, founding_species, self.day);
        log::info!(
            "world seeded: {} organisms, seed {}",
            self.organisms.len(),
            self.seed
        );
    }

    fn alloc_id(&mut self) -> OrganismId {
        let id = self.next_organism_id;
        self.next_organism_id += 1;
        id
    }

    /// Advance the simulation by one frame of `frame_dt` wall seconds,
    /// scaled by the current time scale. Runs the day's evaluation when
    /// the day completes within this step.
    pub fn step(&mut self, frame_dt: f32) {
        self.apply_pending_commands();
        if self.organisms.is_empty() {
            return;
        }

        let dt = frame_dt.max(0.0) * self.time_scale;
        self.movement_tick(dt);
        self.steps_today += 1;

        if self.day_complete() || self.steps_today >= MAX_STEPS_PER_DAY {
            if self.steps_today >= MAX_STEPS_PER_DAY {
                log::warn!("day {} stalled, forcing evaluation", self.day);
            }
            self.evaluate_day();
        }
    }

    fn day_complete(&self) -> bool {
        self.environment.all_food_claimed()
            || (!self.organisms.is_empty()
                && self.organisms.values().all(|o| o.has_food_today))
    }

    fn movement_tick(&mut self, dt: f32) {
        let night = self.environment.is_night(self.config.day.night_start);
        let night_sense = if night {
            self.config.day.night_sense_multiplier
        } else {
            1.0
        };
        let visibility = self.environment.weather.kind.visibility_multiplier();
        let weather_speed = self.environment.weather.kind.movement_multiplier();
        let comfort = self.config.temperature.base_temperature;

        let keys: Vec<OrganismKey> = self.organisms.keys().collect();
        let mut captures: Vec<FoodId> = Vec::new();
        let mut hazard_deaths: Vec<OrganismKey> = Vec::new();

        for key in keys {
            let Some(organism) = self.organisms.get_mut(key) else {
                continue;
            };
            // Fed organisms rest for the remainder of the day
            if organism.has_food_today {
                continue;
            }

            // Drop a target that got claimed under us
            if let Some(target) = organism.target_food {
                if self.environment.food(target).map_or(true, |f| f.claimed) {
                    organism.target_food = None;
                }
            }
            if organism.target_food.is_none() {
                let sense = organism.effective_sense_range(night_sense, visibility);
                let mut best: Option<(FoodId, f32)> = None;
                for food in self.environment.foods.iter().filter(|f| !f.claimed) {
                    let distance = food.position.distance(organism.position);
                    if distance <= sense && best.map_or(true, |(_, d)| distance < d) {
                        best = Some((food.id, distance));
                    }
                }
                organism.target_food = best.map(|(id, _)| id);
            }

            // Head for the target, or wander
            let direction = match organism
                .target_food
                .and_then(|id| self.environment.food(id))
                .map(|f| f.position)
            {
                Some(target) => (target - organism.position).normalized(),
                None => {
                    let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
                    Vec2::new(angle.cos(), angle.sin())
                }
            };
            let terrain = self.environment.terrain.multiplier_at(organism.position);
            let speed = organism.effective_speed(&self.config.traits) * terrain * weather_speed;
            let next = (organism.position + direction * (speed * dt))
                .clamped(self.environment.bounds);

            match self.environment.obstacles.collision(next, organism.radius()) {
                Some(kind) if kind.is_lethal() => {
                    organism.position = next;
                    hazard_deaths.push(key);
                    continue;
                }
                // Blocked: hold position and re-route next tick
                Some(_) => organism.target_food = None,
                None => organism.position = next,
            }

            // Temperature exposure
            let ambient = self
                .environment
                .ambient_temperature(organism.position, &self.config);
            let deviation = effective_deviation(
                ambient,
                comfort,
                organism.traits.get(TraitKind::HeatTolerance),
                organism.traits.get(TraitKind::ColdTolerance),
            );
            if deviation >= self.config.temperature.death_threshold {
                // Lethal exposure drains the organism outright
                organism.energy = 0.0;
            } else if deviation > 0.0 {
                let night_cost = if night {
                    self.config.temperature.night_cost_multiplier
                } else {
                    1.0
                };
                organism.energy -=
                    deviation * self.config.temperature.cost_per_degree * night_cost * dt;
            }

            // Close enough to grab the target?
            if let Some(target) = organism.target_food {
                if let Some(food) = self.environment.food(target) {
                    let reach = organism.radius() + self.config.food.food_size / 2.0;
                    if !food.claimed && food.position.distance(organism.position) <= reach {
                        captures.push(target);
                    }
                }
            }
        }

        for key in hazard_deaths {
            self.kill(key, DeathCause::Hazard);
        }
        self.resolve_captures(&captures);
    }

    /// Settle each reached food item: every unfed organism within the
    /// contest radius competes, the winner eats.
    fn resolve_captures(&mut self, captures: &[FoodId]) {
        for &food_id in captures {
            let Some(food) = self.environment.food(food_id) else {
                continue;
            };
            if food.claimed {
                continue;
            }
            let position = food.position;

            let contestants: Vec<OrganismKey> = self
                .organisms
                .iter()
                .filter(|(_, o)| {
                    !o.has_food_today
                        && o.position.distance(position) <= self.config.contest.contest_radius
                })
                .map(|(k, _)| k)
                .collect();

            let Some(winner) =
                contest::resolve(&contestants, &self.organisms, &self.config.contest, &mut self.rng)
            else {
                continue;
            };
            self.environment.claim_food(food_id);
            if let Some(organism) = self.organisms.get_mut(winner) {
                organism.has_food_today = true;
                organism.target_food = None;
                organism.energy =
                    (organism.energy + self.config.food.energy_gain).min(self.config.energy.max_energy);
            }
        }
    }

    /// End-of-day evaluation: aging and metabolism, deaths, reproduction,
    /// census, analytics, and the rollover into the next day.
    fn evaluate_day(&mut self) {
        self.phase = DayPhase::Evaluation;

        for organism in self.organisms.values_mut() {
            organism.end_of_day_update(&self.config);
        }

        // Death causes in precedence order
        let dead: Vec<(OrganismKey, DeathCause)> = self
            .organisms
            .iter()
            .filter_map(|(key, o)| {
                let cause = if !o.has_food_today {
                    Some(DeathCause::Starvation)
                } else if o.is_past_max_age() {
                    Some(DeathCause::OldAge)
                } else if o.energy <= 0.0 {
                    Some(DeathCause::LowEnergy)
                } else {
                    None
                };
                cause.map(|c| (key, c))
            })
            .collect();
        for (key, cause) in dead {
            self.kill(key, cause);
        }

        self.reproduce_survivors();

        self.species.census(self.organisms.values(), self.day);
        let stats = self.build_day_stats();
        for observer in &mut self.observers {
            observer.on_day_complete(&stats);
        }
        self.history.push(stats);

        if self.organisms.is_empty() {
            log::warn!("population extinct on day {}", self.day);
        }

        // Roll into the next day
        self.day += 1;
        self.environment.begin_new_day(
            self.day,
            self.organisms.len(),
            &self.corpses,
            &self.config,
            &mut self.rng,
        );
        for organism in self.organisms.values_mut() {
            organism.reset_daily_state();
        }
        self.corpses.clear();
        self.births_today = 0;
        self.deaths_today = DeathBreakdown::default();
        self.steps_today = 0;
        self.population_at_dawn = self.organisms.len();
        self.phase = DayPhase::Movement;
    }

    /// Every fed survivor gets one reproduction roll, capped by the
    /// population limit.
    fn reproduce_survivors(&mut self) {
        let parents: Vec<OrganismKey> = self
            .organisms
            .iter()
            .filter(|(_, o)| o.has_food_today)
            .map(|(k, _)| k)
            .collect();

        let mut newborns = Vec::new();
        for key in parents {
            if self.organisms.len() + newborns.len() >= self.config.world.max_population {
                break;
            }
            let Some(parent) = self.organisms.get(key) else {
                continue;
            };
            let probability = reproduction::reproduction_probability(
                parent.traits.get(TraitKind::Fertility),
                &self.config,
            );
            if self.rng.gen::<f32>() >= probability {
                continue;
            }

            let child_id = self.next_organism_id;
            self.next_organism_id += 1;
            let mut child =
                reproduction::spawn_offspring(parent, child_id, &self.config, &mut self.rng);
            child.species_id =
                self.species
                    .assign_species(parent, child_id, &child, &self.config, self.day);
            self.lineages.register_birth(parent.id, child_id);
            newborns.push(child);
        }

        for child in newborns {
            self.births_today += 1;
            self.organisms.insert(child);
        }
    }

    fn build_day_stats(&mut self) -> DayStats {
        let traits = aggregate_traits(self.organisms.values());

        // Trait maxima and the organisms holding them, plus the newest
        // generation's representative, in one pass
        let mut max_generation = 0u32;
        let mut max_generation_holder = None;
        let mut trait_maxima = [0.0f32; TraitKind::COUNT];
        let mut trait_maxima_holders = [None; TraitKind::COUNT];
        for organism in self.organisms.values() {
            if max_generation_holder.is_none() || organism.generation > max_generation {
                max_generation = organism.generation;
                max_generation_holder = Some(organism.id);
            }
            for kind in TraitKind::ALL {
                let i = kind.index();
                let v = organism.traits.get(kind);
                if trait_maxima_holders[i].is_none() || v > trait_maxima[i] {
                    trait_maxima[i] = v;
                    trait_maxima_holders[i] = Some(organism.id);
                }
            }
        }

        let observation = DayObservation {
            day: self.day,
            population: self.organisms.len(),
            previous_population: self.population_at_dawn,
            max_generation,
            max_generation_holder,
            species_count: self.species.total_count(),
            trait_maxima,
            trait_maxima_holders,
        };
        let milestones = self.milestones.observe(&observation, &self.config.analysis);

        let correlations = if self.day % self.config.analysis.correlation_interval_days == 0 {
            let vectors: Vec<TraitVector> =
                self.organisms.values().map(|o| o.traits).collect();
            self.correlations.scan(&vectors, self.day)
        } else {
            Vec::new()
        };

        let elites = fitness::rank(
            self.organisms.values(),
            self.environment.spawner.active_pattern(),
            &self.config.traits,
        )
        .into_iter()
        .filter(|e| e.elite)
        .collect();

        let species = self
            .species
            .iter()
            .filter(|s| !s.is_extinct())
            .map(|s| SpeciesSummary {
                species_id: s.id,
                population: s.population,
            })
            .collect();

        DayStats {
            day: self.day,
            population: self.organisms.len(),
            births: self.births_today,
            deaths: self.deaths_today,
            max_generation,
            species_alive: self.species.living_count(),
            species_total: self.species.total_count(),
            traits,
            species,
            organisms: self.organisms.values().map(OrganismSummary::from).collect(),
            milestones,
            correlations,
            elites,
            weather: self.environment.weather.kind,
            season: self.environment.season,
            pattern: self.environment.spawner.active_pattern(),
        }
    }

    fn kill(&mut self, key: OrganismKey, cause: DeathCause) {
        if let Some(mut organism) = self.organisms.remove(key) {
            organism.cause_of_death = Some(cause);
            self.deaths_today.record(cause);
            self.corpses.push(organism.position);
            self.lineages.register_death(organism.id, self.day);
            log::debug!("organism {} died: {}", organism.id, cause.name());
        }
    }

    /// Queue a command for the next step boundary
    pub fn queue_command(&mut self, command: SimCommand) {
        self.pending_commands.push(command);
    }

    fn apply_pending_commands(&mut self) {
        for command in std::mem::take(&mut self.pending_commands) {
            match command {
                SimCommand::AddObstacle { shape, kind } => {
                    let id = self.environment.obstacles.add(shape, kind);
                    log::debug!("obstacle {} added ({})", id, kind.name());
                }
                SimCommand::RemoveObstacle(id) => {
                    if !self.environment.obstacles.remove(id) {
                        log::warn!("remove for unknown obstacle {}", id);
                    }
                }
                SimCommand::ClearObstacles => self.environment.obstacles.clear_all(),
                SimCommand::SetTimeScale(scale) => {
                    self.time_scale = clamp_time_scale(scale);
                }
            }
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn StatsObserver>) {
        self.observers.push(observer);
    }

    /// Step until `days` day boundaries have passed or the population
    /// dies out.
    pub fn run_days(&mut self, days: u32) {
        let target = self.day + days;
        while self.day < target && !self.is_extinct() {
            self.step(DEFAULT_FRAME_DT);
        }
    }

    pub fn is_extinct(&self) -> bool {
        self.organisms.is_empty()
    }

    pub fn population(&self) -> usize {
        self.organisms.len()
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> DayPhase {
        self.phase
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn organisms(&self) -> impl Iterator<Item = &Organism> {
        self.organisms.values()
    }

    pub fn species(&self) -> &SpeciesRegistry {
        &self.species
    }

    pub fn lineages(&self) -> &LineageTracker {
        &self.lineages
    }

    pub fn history(&self) -> &StatsHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::ObstacleKind;
    use crate::geometry::{Rect, Shape};

    fn small_config() -> Config {
        let mut config = Config::default();
        config.world.initial_population = 10;
        config.world.max_population = 100;
        // Keep the temperature model quiet for the mechanics tests
        config.temperature.zone_count = 0;
        config.temperature.seasonal_amplitude = 0.0;
        config
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = World::with_seed(small_config(), 42);
        let mut b = World::with_seed(small_config(), 42);

        a.run_days(5);
        b.run_days(5);

        assert_eq!(a.day(), b.day());
        assert_eq!(a.population(), b.population());
        let positions_a: Vec<Vec2> = a.organisms().map(|o| o.position).collect();
        let positions_b: Vec<Vec2> = b.organisms().map(|o| o.position).collect();
        assert_eq!(positions_a, positions_b);
    }

    #[test]
    fn test_days_advance() {
        let mut world = World::with_seed(small_config(), 1);
        assert_eq!(world.day(), 1);

        world.run_days(3);

        assert!(world.is_extinct() || world.day() == 4);
        assert!(world.history().len() >= 1 || world.is_extinct());
    }

    #[test]
    fn test_trait_bounds_hold_over_time() {
        let config = small_config();
        let mut world = World::with_seed(config.clone(), 7);
        world.run_days(10);

        for organism in world.organisms() {
            for kind in TraitKind::ALL {
                let range = config.traits.range(kind);
                let v = organism.traits.get(kind);
                assert!(v >= range.min && v <= range.max, "{} out of bounds", kind.name());
            }
        }
    }

    #[test]
    fn test_population_cap_respected() {
        let mut config = small_config();
        config.world.max_population = 15;
        config.reproduction.base_probability = 1.0;
        let mut world = World::with_seed(config, 3);

        world.run_days(20);

        assert!(world.population() <= 15);
    }

    #[test]
    fn test_commands_applied_at_step() {
        let mut world = World::with_seed(small_config(), 9);

        world.queue_command(SimCommand::AddObstacle {
            shape: Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)),
            kind: ObstacleKind::Wall,
        });
        world.queue_command(SimCommand::SetTimeScale(500.0));
        assert_eq!(world.environment().obstacles.count(), 0);

        world.step(DEFAULT_FRAME_DT);

        assert_eq!(world.environment().obstacles.count(), 1);
        assert_eq!(world.time_scale(), crate::commands::MAX_TIME_SCALE);
    }

    #[test]
    fn test_initial_population_single_species() {
        let world = World::with_seed(small_config(), 11);
        assert_eq!(world.species().total_count(), 1);
        let species_ids: std::collections::HashSet<_> =
            world.organisms().map(|o| o.species_id).collect();
        assert_eq!(species_ids.len(), 1);
    }

    #[test]
    fn test_deaths_feed_next_day() {
        let mut config = small_config();
        // No food pressure relief: tiny food supply starves most organisms
        config.food.per_organism = 0.2;
        config.food.min_count = 2;
        let mut world = World::with_seed(config, 13);

        let before = world.population();
        world.run_days(1);

        if !world.is_extinct() {
            let stats = world.history().latest().unwrap();
            assert!(stats.deaths.total() > 0 || world.population() >= before);
        }
    }

    #[test]
    fn test_extinct_world_is_stable() {
        let mut config = small_config();
        config.world.initial_population = 1;
        config.food.min_count = 1;
        config.food.per_organism = 0.0;
        config.energy.initial_energy = 1.0;
        config.energy.daily_metabolism = 100.0;
        let mut world = World::with_seed(config, 17);

        world.run_days(3);
        assert!(world.is_extinct());

        // Stepping an extinct world is a no-op
        let day = world.day();
        world.step(DEFAULT_FRAME_DT);
        assert_eq!(world.day(), day);
    }
}
