use serde::{Deserialize, Serialize};
use strategy_sim::{
    Comparison, SimError, SimulationResult, Stint, StintSummary, Strategy, StrategySummary,
    TireCompound,
};

// Compound names and lap counts stay raw here; Stint::parse validates them.
#[derive(Debug, Deserialize)]
pub struct StintIn {
    pub laps: i64,
    pub tire: String,
}

#[derive(Debug, Deserialize)]
pub struct StrategyIn {
    pub stints: Vec<StintIn>,
}

impl StrategyIn {
    pub fn to_strategy(&self, max_stints: usize) -> Result<Strategy, SimError> {
        let stints = self
            .stints
            .iter()
            .map(|s| Stint::parse(&s.tire, s.laps))
            .collect::<Result<Vec<_>, _>>()?;
        Strategy::with_limit(stints, max_stints)
    }
}

#[derive(Debug, Deserialize)]
pub struct CompareIn {
    pub a: StrategyIn,
    pub b: StrategyIn,
}

#[derive(Debug, Serialize)]
pub struct CompoundOut {
    pub name: TireCompound,
    pub base_lap_time: f64,
    pub wear_rate: f64,
}

impl From<TireCompound> for CompoundOut {
    fn from(c: TireCompound) -> Self {
        let p = c.params();
        Self {
            name: c,
            base_lap_time: p.base_lap_time,
            wear_rate: p.wear_rate,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SimulateOut {
    pub total_time: f64,
    pub lap_times: Vec<f64>,
    /// `(lap, time)` points for charting
    pub lap_series: Vec<(u32, f64)>,
    pub pit_laps: Vec<u32>,
    pub stints: Vec<StintSummary>,
}

impl SimulateOut {
    pub fn new(summary: StrategySummary, result: SimulationResult) -> Self {
        Self {
            lap_series: result.lap_series().collect(),
            total_time: result.total_time,
            lap_times: result.lap_times,
            pit_laps: result.pit_laps,
            stints: summary.stints,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CompareOut {
    #[serde(flatten)]
    pub comparison: Comparison,
    pub report: String,
}
