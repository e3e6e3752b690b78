use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};
use strategy_sim::{Simulator, DEFAULT_FUEL_EFFECT, DEFAULT_PIT_TIME};

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub pit_time_s: f64,
    pub fuel_effect_s: f64,
    pub max_stints: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            pit_time_s: DEFAULT_PIT_TIME,
            fuel_effect_s: DEFAULT_FUEL_EFFECT,
            max_stints: 3,
        }
    }
}

impl ServerConfig {
    /// Defaults, then the JSON file at `CONFIG_PATH` if set, then `PORT`,
    /// `PIT_TIME_S` and `FUEL_EFFECT_S`.
    pub fn from_env() -> Result<Self> {
        let mut cfg = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::load(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&data).with_context(|| format!("invalid config JSON in {}", path.display()))
    }

    pub fn parse(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = get("PORT") {
            self.port = v.parse().with_context(|| format!("PORT is not a port number: {v:?}"))?;
        }
        if let Some(v) = get("PIT_TIME_S") {
            self.pit_time_s = v.parse().with_context(|| format!("PIT_TIME_S is not a number: {v:?}"))?;
        }
        if let Some(v) = get("FUEL_EFFECT_S") {
            self.fuel_effect_s = v
                .parse()
                .with_context(|| format!("FUEL_EFFECT_S is not a number: {v:?}"))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !self.pit_time_s.is_finite() || self.pit_time_s < 0.0 {
            bail!("pit_time_s must be a non-negative number, got {}", self.pit_time_s);
        }
        if !self.fuel_effect_s.is_finite() {
            bail!("fuel_effect_s must be finite, got {}", self.fuel_effect_s);
        }
        if self.max_stints == 0 {
            bail!("max_stints must be at least 1");
        }
        Ok(())
    }

    pub fn simulator(&self) -> Simulator {
        Simulator::new(self.pit_time_s, self.fuel_effect_s)
    }
}
