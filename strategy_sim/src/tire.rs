use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::{Result, SimError};

/// Tire compounds a stint can be run on. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum TireCompound {
    Soft,
    Medium,
    Hard,
}

impl TireCompound {
    /// Every compound, softest first.
    pub const ALL: [TireCompound; 3] = [TireCompound::Soft, TireCompound::Medium, TireCompound::Hard];

    pub fn name(self) -> &'static str {
        match self {
            TireCompound::Soft => "Soft",
            TireCompound::Medium => "Medium",
            TireCompound::Hard => "Hard",
        }
    }

    pub fn params(self) -> TireParams {
        TireModel::lookup(self)
    }
}

impl fmt::Display for TireCompound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TireCompound {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        TireCompound::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| SimError::UnknownCompound(s.to_string()))
    }
}

impl TryFrom<String> for TireCompound {
    type Error = SimError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<TireCompound> for &'static str {
    fn from(c: TireCompound) -> Self {
        c.name()
    }
}

/// Intrinsic performance of a compound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TireParams {
    /// Lap time (s) at zero wear and zero fuel effect
    pub base_lap_time: f64,
    /// Seconds added per lap of use within the current stint
    pub wear_rate: f64,
}

/// Fixed compound table.
pub struct TireModel;

impl TireModel {
    pub fn lookup(compound: TireCompound) -> TireParams {
        let (base_lap_time, wear_rate) = match compound {
            TireCompound::Soft => (90.0, 0.35),
            TireCompound::Medium => (91.0, 0.25),
            TireCompound::Hard => (92.0, 0.15),
        };
        TireParams { base_lap_time, wear_rate }
    }

    /// Look a compound up by its display name.
    ///
    /// # Errors
    /// `SimError::UnknownCompound` if `name` is not one of the known compounds.
    pub fn lookup_name(name: &str) -> Result<TireParams> {
        name.parse::<TireCompound>().map(Self::lookup)
    }
}
