use serde::{Deserialize, Serialize};

/// Tiles per second right after a reset.
pub const INITIAL_SPEED: u32 = 5;
/// The speed ramp stops here.
pub const MAX_SPEED: u32 = 30;
/// Speed gained per food eaten.
pub const SPEED_STEP: u32 = 1;

pub const DEFAULT_WIDTH: u16 = 40;
pub const DEFAULT_HEIGHT: u16 = 40;

/// Board setup handed over by whatever drives the simulation.
///
/// A missing `seed` means the food generator is seeded from entropy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig { width: DEFAULT_WIDTH, height: DEFAULT_HEIGHT, seed: None }
    }
}

/// Next step of the speed ramp, saturating at `MAX_SPEED`.
pub fn next_speed(speed: u32) -> u32 {
    (speed + SPEED_STEP).min(MAX_SPEED).max(speed)
}
