//! Deterministic lap-time model for comparing pit-stop strategies.
//!
//! A strategy is an ordered list of stints, each run on a fresh set of one
//! tire compound. Simulating it yields every lap time in race order, the total
//! race time including pit losses, and the laps after which the car pitted.

pub mod error;
pub mod report;
pub mod simulator;
pub mod tire;

pub use error::{Result, SimError};
pub use report::{Comparison, StintSummary, StrategySummary, Verdict};
pub use simulator::{
    lap_time, simulate_stint, simulate_strategy, SimulationResult, Simulator, Stint, Strategy,
    DEFAULT_FUEL_EFFECT, DEFAULT_PIT_TIME, FUEL_REFERENCE_LAPS, MAX_STINT_LAPS,
};
pub use tire::{TireCompound, TireModel, TireParams};
