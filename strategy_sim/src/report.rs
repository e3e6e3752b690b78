//! Side-by-side comparison of two strategies and its plain-text rendering.

use serde::Serialize;
use std::fmt;

use crate::simulator::{SimulationResult, Simulator, Strategy};
use crate::tire::TireCompound;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StintSummary {
    /// 1-based stint number
    pub index: usize,
    pub tire: TireCompound,
    pub laps: u32,
    pub avg_lap_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySummary {
    pub label: String,
    pub total_time: f64,
    pub stints: Vec<StintSummary>,
    pub pit_laps: Vec<u32>,
}

impl StrategySummary {
    /// Simulate `strategy` and summarize it in one go.
    pub fn run(label: impl Into<String>, sim: &Simulator, strategy: &Strategy) -> (Self, SimulationResult) {
        let result = sim.simulate(strategy);
        (Self::new(label, strategy, &result), result)
    }

    /// Average each stint over its own slice of the race-long lap sequence.
    /// `result` must come from simulating `strategy`.
    pub(crate) fn new(label: impl Into<String>, strategy: &Strategy, result: &SimulationResult) -> Self {
        let stints = strategy
            .stints()
            .iter()
            .zip(strategy.stint_ranges())
            .enumerate()
            .map(|(i, (stint, range))| {
                let slice = &result.lap_times[range];
                StintSummary {
                    index: i + 1,
                    tire: stint.tire(),
                    laps: stint.laps(),
                    avg_lap_time: slice.iter().sum::<f64>() / f64::from(stint.laps()),
                }
            })
            .collect();

        Self {
            label: label.into(),
            total_time: result.total_time,
            stints,
            pit_laps: result.pit_laps.clone(),
        }
    }

    /// "20, 40", or "None" without stops.
    pub fn pit_stops_text(&self) -> String {
        if self.pit_laps.is_empty() {
            return "None".to_string();
        }
        self.pit_laps.iter().map(u32::to_string).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for StrategySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Summary:", self.label)?;
        writeln!(f, "Total Time: {:.2} seconds", self.total_time)?;
        for s in &self.stints {
            writeln!(f, "Stint {} ({}) Avg Lap: {:.2}s", s.index, s.tire, s.avg_lap_time)?;
        }
        writeln!(f, "Pit Stops After: {}", self.pit_stops_text())
    }
}

/// Which strategy finished first, with both totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "winner", rename_all = "snake_case")]
pub enum Verdict {
    AFaster { a: f64, b: f64 },
    BFaster { a: f64, b: f64 },
    Tie,
}

impl Verdict {
    pub fn from_totals(a: f64, b: f64) -> Self {
        if a < b {
            Verdict::AFaster { a, b }
        } else if b < a {
            Verdict::BFaster { a, b }
        } else {
            Verdict::Tie
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Verdict::AFaster { a, b } => write!(
                f,
                "Strategy A was better with a lower total race time ({a:.2}s vs {b:.2}s)."
            ),
            Verdict::BFaster { a, b } => write!(
                f,
                "Strategy B was better with a lower total race time ({b:.2}s vs {a:.2}s)."
            ),
            Verdict::Tie => f.write_str("Both strategies performed equally well in terms of total race time."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub a: StrategySummary,
    pub b: StrategySummary,
    pub a_result: SimulationResult,
    pub b_result: SimulationResult,
    pub verdict: Verdict,
}

impl Comparison {
    /// Simulate both strategies independently and compare their totals.
    pub fn run(sim: &Simulator, a: &Strategy, b: &Strategy) -> Self {
        let (a, a_result) = StrategySummary::run("Strategy A", sim, a);
        let (b, b_result) = StrategySummary::run("Strategy B", sim, b);
        Self {
            a,
            b,
            verdict: Verdict::from_totals(a_result.total_time, b_result.total_time),
            a_result,
            b_result,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Race Strategy Comparison - Insights")?;
        writeln!(f)?;
        writeln!(f, "{}", self.a)?;
        writeln!(f, "{}", self.b)?;
        writeln!(f, "Conclusion:")?;
        writeln!(f, "{}", self.verdict)?;
        writeln!(
            f,
            "The result is based on total race time, influenced by tire degradation, compound type, and pit stop loss."
        )
    }
}
