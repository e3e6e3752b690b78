use serde::Serialize;
use std::ops::Range;

use crate::error::{Result, SimError};
use crate::tire::{TireCompound, TireModel};

/// Seconds gained per lap as fuel burns off.
pub const DEFAULT_FUEL_EFFECT: f64 = 0.1;
/// Seconds lost for each pit stop.
pub const DEFAULT_PIT_TIME: f64 = 25.0;
/// Fuel load reference of the lap model. Does not follow the real race length.
pub const FUEL_REFERENCE_LAPS: u32 = 50;
pub const MAX_STINT_LAPS: u32 = 50;

/// Time of a single lap.
///
/// Wear grows linearly with the lap number inside the stint while the fuel
/// term shrinks against the fixed 50-lap reference. No clamping is applied,
/// so very long stints can produce implausibly low values.
///
/// # Arguments
/// * `base_lap_time` - Compound lap time at zero wear and zero fuel effect
/// * `lap_in_stint` - 1-based lap number, reset at every stint
/// * `wear_rate` - Seconds added per lap of use
/// * `fuel_effect` - Seconds gained per lap of burned fuel
pub fn lap_time(base_lap_time: f64, lap_in_stint: u32, wear_rate: f64, fuel_effect: f64) -> f64 {
    let lap = f64::from(lap_in_stint);
    base_lap_time + lap * wear_rate - (f64::from(FUEL_REFERENCE_LAPS) - lap) * fuel_effect
}

/// Lap times of one stint on fresh tires, `laps` values long.
pub fn simulate_stint(laps: u32, tire: TireCompound, fuel_effect: f64) -> Vec<f64> {
    let params = TireModel::lookup(tire);
    (1..=laps)
        .map(|lap| lap_time(params.base_lap_time, lap, params.wear_rate, fuel_effect))
        .collect()
}

/// Simulate a whole strategy with the default fuel effect.
pub fn simulate_strategy(strategy: &Strategy, pit_time: f64) -> SimulationResult {
    Simulator { pit_time, fuel_effect: DEFAULT_FUEL_EFFECT }.simulate(strategy)
}

// ---------- Input types ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stint {
    tire: TireCompound,
    laps: u32,
}

impl Stint {
    /// # Errors
    /// `SimError::InvalidLapCount` unless `1 <= laps <= MAX_STINT_LAPS`.
    pub fn new(tire: TireCompound, laps: u32) -> Result<Self> {
        if laps == 0 || laps > MAX_STINT_LAPS {
            return Err(SimError::InvalidLapCount { laps: i64::from(laps), max: MAX_STINT_LAPS });
        }
        Ok(Self { tire, laps })
    }

    pub fn tire(&self) -> TireCompound {
        self.tire
    }

    pub fn laps(&self) -> u32 {
        self.laps
    }

    /// Build a stint from untyped input, e.g. a form or a JSON body.
    pub fn parse(tire: &str, laps: i64) -> Result<Self> {
        let tire = tire.parse::<TireCompound>()?;
        let laps = u32::try_from(laps)
            .map_err(|_| SimError::InvalidLapCount { laps, max: MAX_STINT_LAPS })?;
        Self::new(tire, laps)
    }
}

/// Ordered, non-empty list of stints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Strategy {
    stints: Vec<Stint>,
}

impl Strategy {
    pub fn new(stints: Vec<Stint>) -> Result<Self> {
        if stints.is_empty() {
            return Err(SimError::EmptyStrategy);
        }
        Ok(Self { stints })
    }

    /// Like [`Strategy::new`], also capping the number of stints.
    pub fn with_limit(stints: Vec<Stint>, max_stints: usize) -> Result<Self> {
        if stints.len() > max_stints {
            return Err(SimError::TooManyStints { count: stints.len(), max: max_stints });
        }
        Self::new(stints)
    }

    pub fn stints(&self) -> &[Stint] {
        &self.stints
    }

    pub fn total_laps(&self) -> usize {
        self.stints.iter().map(|s| s.laps as usize).sum()
    }

    /// Index ranges of each stint inside the race-long lap sequence.
    pub fn stint_ranges(&self) -> Vec<Range<usize>> {
        let mut start = 0;
        self.stints
            .iter()
            .map(|s| {
                let end = start + s.laps as usize;
                let r = start..end;
                start = end;
                r
            })
            .collect()
    }
}

// ---------- Simulation ----------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    /// Sum of every lap plus pit losses (s)
    pub total_time: f64,
    /// Per-lap times in race order
    pub lap_times: Vec<f64>,
    /// Cumulative lap after which each pit stop happens
    pub pit_laps: Vec<u32>,
}

impl SimulationResult {
    /// `(lap, time)` pairs with 1-based lap indices, ready for plotting.
    pub fn lap_series(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        (1u32..).zip(self.lap_times.iter().copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simulator {
    pub pit_time: f64,
    pub fuel_effect: f64,
}

impl Default for Simulator {
    fn default() -> Self {
        Self { pit_time: DEFAULT_PIT_TIME, fuel_effect: DEFAULT_FUEL_EFFECT }
    }
}

impl Simulator {
    pub fn new(pit_time: f64, fuel_effect: f64) -> Self {
        Self { pit_time, fuel_effect }
    }

    /// Run every stint in order, charging a pit stop between consecutive stints.
    pub fn simulate(&self, strategy: &Strategy) -> SimulationResult {
        let stints = strategy.stints();
        let mut total_time = 0.0;
        let mut lap_times = Vec::with_capacity(strategy.total_laps());
        let mut pit_laps = Vec::with_capacity(stints.len() - 1);
        // Pit laps are the last lap of the finished stint: [20] for 20 + 20, not 21.
        let mut lap_counter = 0u32;

        for (i, stint) in stints.iter().enumerate() {
            let stint_times = simulate_stint(stint.laps, stint.tire, self.fuel_effect);
            total_time += stint_times.iter().sum::<f64>();
            lap_times.extend(stint_times);
            lap_counter += stint.laps;

            if i < stints.len() - 1 {
                total_time += self.pit_time;
                pit_laps.push(lap_counter);
            }
        }

        tracing::debug!(
            stints = stints.len(),
            laps = lap_times.len(),
            total_time,
            "strategy simulated"
        );

        SimulationResult { total_time, lap_times, pit_laps }
    }
}
