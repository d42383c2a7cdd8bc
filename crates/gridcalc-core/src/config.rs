use serde::{Deserialize, Serialize};

/// First literal seed handed out by a fresh grid
pub const DEFAULT_FIRST_SEED: u64 = 1;
/// Background colour of new cells
pub const DEFAULT_CELL_COLOR: &str = "white";
/// Text colour of new cells
pub const DEFAULT_TEXT_COLOR: &str = "black";

/// Grid construction options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    /// Value given to the first seeded cell; later cells count up from it
    #[serde(default = "default_first_seed")]
    pub first_seed: u64,
    #[serde(default = "default_cell_color")]
    pub default_cell_color: String,
    #[serde(default = "default_text_color")]
    pub default_text_color: String,
    /// Fail propagation with `CircularReference` instead of looping forever
    #[serde(default)]
    pub detect_cycles: bool,
}

fn default_first_seed() -> u64 {
    DEFAULT_FIRST_SEED
}

fn default_cell_color() -> String {
    DEFAULT_CELL_COLOR.to_string()
}

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            first_seed: DEFAULT_FIRST_SEED,
            default_cell_color: default_cell_color(),
            default_text_color: default_text_color(),
            detect_cycles: false,
        }
    }
}

impl GridConfig {
    /// Default options with the cycle guard switched on
    pub fn with_cycle_detection() -> Self {
        Self {
            detect_cycles: true,
            ..Self::default()
        }
    }
}
