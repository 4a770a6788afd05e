//! Weather events that modify visibility, movement, and temperature
//! world-wide for a few days at a time.

use crate::config::WeatherConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Weather kinds and their global modifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherKind {
    Clear,
    Rain,
    Fog,
    Heatwave,
    ColdSnap,
    Storm,
}

impl WeatherKind {
    pub const ALL: [WeatherKind; 6] = [
        WeatherKind::Clear,
        WeatherKind::Rain,
        WeatherKind::Fog,
        WeatherKind::Heatwave,
        WeatherKind::ColdSnap,
        WeatherKind::Storm,
    ];

    /// Multiplier on every organism's sense range
    pub fn visibility_multiplier(&self) -> f32 {
        match self {
            WeatherKind::Clear => 1.0,
            WeatherKind::Rain => 0.85,
            WeatherKind::Fog => 0.5,
            WeatherKind::Heatwave => 1.0,
            WeatherKind::ColdSnap => 0.9,
            WeatherKind::Storm => 0.6,
        }
    }

    /// Multiplier on movement speed
    pub fn movement_multiplier(&self) -> f32 {
        match self {
            WeatherKind::Clear => 1.0,
            WeatherKind::Rain => 0.9,
            WeatherKind::Fog => 1.0,
            WeatherKind::Heatwave => 0.85,
            WeatherKind::ColdSnap => 0.8,
            WeatherKind::Storm => 0.7,
        }
    }

    /// World-wide temperature offset while the event lasts
    pub fn temperature_offset(&self) -> f32 {
        match self {
            WeatherKind::Clear => 0.0,
            WeatherKind::Rain => -2.0,
            WeatherKind::Fog => -1.0,
            WeatherKind::Heatwave => 8.0,
            WeatherKind::ColdSnap => -8.0,
            WeatherKind::Storm => -3.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WeatherKind::Clear => "clear",
            WeatherKind::Rain => "rain",
            WeatherKind::Fog => "fog",
            WeatherKind::Heatwave => "heatwave",
            WeatherKind::ColdSnap => "cold_snap",
            WeatherKind::Storm => "storm",
        }
    }

    fn random(rng: &mut impl Rng) -> WeatherKind {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Current weather event and its remaining duration
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Weather {
    pub kind: WeatherKind,
    pub remaining_days: u32,
}

impl Weather {
    pub fn new_random(config: &WeatherConfig, rng: &mut impl Rng) -> Self {
        Self {
            kind: WeatherKind::random(rng),
            remaining_days: roll_duration(config, rng),
        }
    }

    /// Consume one day; when the event runs out, a new kind and duration
    /// are rolled.
    pub fn advance_day(&mut self, config: &WeatherConfig, rng: &mut impl Rng) {
        self.remaining_days = self.remaining_days.saturating_sub(1);
        if self.remaining_days == 0 {
            self.kind = WeatherKind::random(rng);
            self.remaining_days = roll_duration(config, rng);
        }
    }
}

fn roll_duration(config: &WeatherConfig, rng: &mut impl Rng) -> u32 {
    if config.max_duration_days > config.min_duration_days {
        rng.gen_range(config.min_duration_days..=config.max_duration_days)
    } else {
        config.min_duration_days.max(1)
    }
}
