use std::env;

use anyhow::Context;
use gridcalc_core::GridConfig;
use serde::{Deserialize, Serialize};

/// Prefix of the environment variables read by [`Config::from_env`]
pub const ENV_PREFIX: &str = "GRIDCALC_";

/// Spreadsheet configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Grid construction options
    #[serde(default)]
    pub grid: GridConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    ///
    /// Unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));
        let mut grid = GridConfig::default();

        if let Some(seed) = var("FIRST_SEED") {
            grid.first_seed = seed
                .trim()
                .parse()
                .with_context(|| format!("invalid {}FIRST_SEED: {:?}", ENV_PREFIX, seed))?;
        }
        if let Some(color) = var("CELL_COLOR") {
            grid.default_cell_color = color;
        }
        if let Some(color) = var("TEXT_COLOR") {
            grid.default_text_color = color;
        }
        if let Some(flag) = var("DETECT_CYCLES") {
            grid.detect_cycles = parse_flag(&flag)
                .with_context(|| format!("invalid {}DETECT_CYCLES: {:?}", ENV_PREFIX, flag))?;
        }

        Ok(Self { grid })
    }

    /// Load configuration from a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid spreadsheet configuration")
    }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {:?}", other),
    }
}
