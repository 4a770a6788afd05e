//! World environment: daily food, obstacles, temperature, terrain,
//! weather, and the seasonal cycle.

pub mod food;
pub mod obstacles;
pub mod temperature;
pub mod terrain;
pub mod weather;

pub use food::{Food, FoodId, FoodSpawner, SpawnPattern};
pub use obstacles::{Obstacle, ObstacleField, ObstacleId, ObstacleKind};
pub use temperature::{effective_deviation, TemperatureField, TemperatureZone};
pub use terrain::{TerrainKind, TerrainMap, TerrainPatch};
pub use weather::{Weather, WeatherKind};

use crate::config::Config;
use crate::geometry::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The four seasons, each lasting a configured number of days
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Season on a given day, cycling spring through winter
    pub fn from_day(day: u32, season_length_days: u32) -> Season {
        match (day / season_length_days.max(1)) % 4 {
            0 => Season::Spring,
            1 => Season::Summer,
            2 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    /// Fraction of the seasonal amplitude applied to the base temperature
    pub fn temperature_factor(&self) -> f32 {
        match self {
            Season::Spring => 0.0,
            Season::Summer => 1.0,
            Season::Autumn => 0.0,
            Season::Winter => -1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

/// Everything in the world besides the organisms themselves
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Environment {
    pub foods: Vec<Food>,
    pub spawner: FoodSpawner,
    pub obstacles: ObstacleField,
    pub temperature: TemperatureField,
    pub terrain: TerrainMap,
    pub weather: Weather,
    pub season: Season,
    pub bounds: Vec2,
}

impl Environment {
    /// Generate a fresh environment with the first day's food in place
    pub fn generate(config: &Config, rng: &mut impl Rng) -> Self {
        let bounds = Vec2::new(config.world.width, config.world.height);
        let spawner = FoodSpawner::new();
        let foods = spawner.spawn_day(
            config.world.initial_population,
            &[],
            bounds,
            &config.food,
            rng,
        );
        Self {
            foods,
            spawner,
            obstacles: ObstacleField::new(),
            temperature: TemperatureField::generate(&config.temperature, bounds, rng),
            terrain: TerrainMap::generate(&config.terrain, bounds, rng),
            weather: Weather::new_random(&config.weather, rng),
            season: Season::from_day(0, config.temperature.season_length_days),
            bounds,
        }
    }

    /// Fraction of the day's food already claimed (0..1). This doubles as
    /// the day/night clock: late in the food supply means late in the day.
    pub fn day_progress(&self) -> f32 {
        if self.foods.is_empty() {
            return 0.0;
        }
        let claimed = self.foods.iter().filter(|f| f.claimed).count();
        claimed as f32 / self.foods.len() as f32
    }

    #[inline]
    pub fn is_night(&self, night_start: f32) -> bool {
        self.day_progress() >= night_start
    }

    pub fn all_food_claimed(&self) -> bool {
        self.foods.iter().all(|f| f.claimed)
    }

    /// Look up a food item by its per-day id
    pub fn food(&self, id: FoodId) -> Option<&Food> {
        self.foods.get(id as usize)
    }

    /// Mark a food item claimed; returns false if it was already taken
    pub fn claim_food(&mut self, id: FoodId) -> bool {
        match self.foods.get_mut(id as usize) {
            Some(food) if !food.claimed => {
                food.claimed = true;
                true
            }
            _ => false,
        }
    }

    /// Ambient temperature at a point: base climate plus the seasonal
    /// offset, the weather offset, and local zone contributions.
    pub fn ambient_temperature(&self, position: Vec2, config: &Config) -> f32 {
        config.temperature.base_temperature
            + self.season.temperature_factor() * config.temperature.seasonal_amplitude
            + self.weather.kind.temperature_offset()
            + self.temperature.zone_offset(position)
    }

    /// Day-boundary housekeeping: advance weather and season, rotate the
    /// spawn pattern on schedule, and respawn the food supply.
    pub fn begin_new_day(
        &mut self,
        day: u32,
        alive_count: usize,
        corpses: &[Vec2],
        config: &Config,
        rng: &mut impl Rng,
    ) {
        self.weather.advance_day(&config.weather, rng);
        self.season = Season::from_day(day, config.temperature.season_length_days);
        if day % config.food.pattern_rotation_days == 0 {
            self.spawner.rotate();
        }
        self.foods = self
            .spawner
            .spawn_day(alive_count, corpses, self.bounds, &config.food, rng);
    }
}
