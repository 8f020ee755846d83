use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::geometry::Geometry;
use super::state::Cell;
use crate::error::ConfigError;

/// Largest board side accepted from the command line or a config file
pub const MAX_GRID_COUNT: i32 = 200;

/// Bomb hazard settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BombConfig {
    /// Score at which bombs start appearing
    pub score_threshold: u32,
    /// Chance per tick to attempt a bomb spawn
    pub spawn_chance: f64,
    /// Maximum bombs on the board
    pub limit: usize,
    /// Lifetime in milliseconds
    pub lifetime_ms: u64,
}

impl Default for BombConfig {
    fn default() -> Self {
        Self {
            score_threshold: 50,
            spawn_chance: 0.02,
            limit: 3,
            lifetime_ms: 5000,
        }
    }
}

/// Roaming mini-snake settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiniSnakeConfig {
    /// Score at which the mini-snake appears
    pub score_threshold: u32,
    pub length: usize,
    /// The mini-snake moves once every this many ticks
    pub move_every: u32,
    /// Chance to pick a new random direction when it moves
    pub turn_chance: f64,
}

impl Default for MiniSnakeConfig {
    fn default() -> Self {
        Self {
            score_threshold: 100,
            length: 3,
            move_every: 5,
            turn_chance: 0.1,
        }
    }
}

/// Tick speed settings: interval = base - speed * slope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub base_ms: u64,
    pub slope_ms: u64,
    pub min: u8,
    pub max: u8,
    pub default: u8,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            base_ms: 200,
            slope_ms: 15,
            min: 1,
            max: 10,
            default: 5,
        }
    }
}

impl SpeedConfig {
    /// Clamp a requested speed into the configured range
    pub fn clamp(&self, speed: u8) -> u8 {
        speed.clamp(self.min, self.max)
    }

    /// Tick interval for a speed setting
    pub fn interval_for(&self, speed: u8) -> Duration {
        let speed = u64::from(self.clamp(speed));
        Duration::from_millis(self.base_ms.saturating_sub(speed * self.slope_ms))
    }
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of cells along each side of the square grid
    pub grid_count: i32,
    /// Canvas columns per cell
    pub cell_width: u16,
    /// Canvas rows per cell
    pub cell_height: u16,
    /// Where the snake starts each session
    pub start: Cell,
    /// Points per food eaten
    pub score_per_food: u32,
    /// Random draws before spawn falls back to a scan
    pub spawn_attempts: usize,
    pub bombs: BombConfig,
    pub mini_snake: MiniSnakeConfig,
    pub speed: SpeedConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_count: 20,
            cell_width: 2,
            cell_height: 1,
            start: Cell::new(10, 10),
            score_per_food: 10,
            spawn_attempts: 1000,
            bombs: BombConfig::default(),
            mini_snake: MiniSnakeConfig::default(),
            speed: SpeedConfig::default(),
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size
    ///
    /// The start cell moves to the centre of the new grid.
    pub fn new(grid_count: i32) -> Self {
        Self {
            grid_count,
            start: Cell::new(grid_count / 2, grid_count / 2),
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file; missing fields use defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration describes a playable game
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_GRID_COUNT).contains(&self.grid_count) {
            return Err(ConfigError::Invalid(format!(
                "grid_count must be within 2..={MAX_GRID_COUNT}, got {}",
                self.grid_count
            )));
        }
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(ConfigError::Invalid("cell size must be non-zero".into()));
        }
        let tile = self.cell_width.max(self.cell_height);
        if Geometry::from(self).pixel_extent().is_none() {
            return Err(ConfigError::Invalid(format!(
                "a {0}x{0} grid of {tile}-unit cells does not fit on a canvas",
                self.grid_count
            )));
        }
        let in_grid = |c: i32| (0..self.grid_count).contains(&c);
        if !in_grid(self.start.x) || !in_grid(self.start.y) {
            return Err(ConfigError::Invalid(format!(
                "start cell ({}, {}) is outside the grid",
                self.start.x, self.start.y
            )));
        }
        for (name, p) in [
            ("bombs.spawn_chance", self.bombs.spawn_chance),
            ("mini_snake.turn_chance", self.mini_snake.turn_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }
        if self.mini_snake.length == 0 || self.mini_snake.move_every == 0 {
            return Err(ConfigError::Invalid(
                "mini_snake length and move_every must be non-zero".into(),
            ));
        }
        let speed = &self.speed;
        if speed.min > speed.max || !(speed.min..=speed.max).contains(&speed.default) {
            return Err(ConfigError::Invalid(format!(
                "speed range {}..={} must contain default {}",
                speed.min, speed.max, speed.default
            )));
        }
        if speed.interval_for(speed.max).is_zero() {
            return Err(ConfigError::Invalid(format!(
                "speed {} gives a zero tick interval",
                speed.max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_count, 20);
        assert_eq!(config.start, Cell::new(10, 10));
        assert_eq!(config.score_per_food, 10);
        assert_eq!(config.bombs.limit, 3);
        assert_eq!(config.bombs.lifetime_ms, 5000);
        assert_eq!(config.mini_snake.length, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15);
        assert_eq!(config.grid_count, 15);
        assert_eq!(config.start, Cell::new(7, 7));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_speed_interval() {
        let speed = SpeedConfig::default();
        assert_eq!(speed.interval_for(5), Duration::from_millis(125));
        assert_eq!(speed.interval_for(1), Duration::from_millis(185));
        assert_eq!(speed.interval_for(10), Duration::from_millis(50));
        // Out-of-range settings are clamped
        assert_eq!(speed.interval_for(40), Duration::from_millis(50));
        assert_eq!(speed.interval_for(0), Duration::from_millis(185));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = GameConfig::default();
        config.bombs.spawn_chance = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = GameConfig::default();
        config.start = Cell::new(20, 3);
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.speed.max = 14;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_grid() {
        let config = GameConfig::new(40_000);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = GameConfig::new(70_000);
        assert!(config.validate().is_err());

        assert!(GameConfig::new(MAX_GRID_COUNT).validate().is_ok());
        assert!(GameConfig::new(MAX_GRID_COUNT + 1).validate().is_err());

        // Within the cap, but the tiles are too wide for the canvas
        let mut config = GameConfig::new(100);
        config.cell_width = 1_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_count": 12, "bombs": {{ "limit": 5 }} }}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.grid_count, 12);
        assert_eq!(config.bombs.limit, 5);
        assert_eq!(config.bombs.lifetime_ms, 5000);
        assert_eq!(config.start, Cell::new(10, 10));
    }

    #[test]
    fn test_load_garbage_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            GameConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
