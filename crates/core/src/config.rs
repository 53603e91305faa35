//! Manual arena configuration, loadable from TOML or JSON.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::map_spec::MAX_ENTRANCES;
use crate::types::{Density, GridSize, Lighting, Theme};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleCount {
    pub type_id: String,
    pub count: usize,
}

/// Which grid edges receive border walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderMask {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl BorderMask {
    pub const ALL: Self = Self { north: true, south: true, east: true, west: true };
    pub const NONE: Self = Self { north: false, south: false, east: false, west: false };

    pub fn any(self) -> bool {
        self.north || self.south || self.east || self.west
    }
}

impl Default for BorderMask {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualOptions {
    pub walls: bool,
    pub density: Density,
    /// Keeps the middle row and column clear of props.
    pub corridors: bool,
    pub entrances: u8,
    pub lighting: Lighting,
    pub theme: Theme,
    pub border: BorderMask,
    /// Pattern ids to force-place, in order.
    pub patterns: Vec<String>,
}

impl Default for ManualOptions {
    fn default() -> Self {
        Self {
            walls: true,
            density: Density::Normal,
            corridors: false,
            entrances: 2,
            lighting: Lighting::Bright,
            theme: Theme::Generic,
            border: BorderMask::ALL,
            patterns: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualConfig {
    #[serde(default)]
    pub preset_id: String,
    pub grid: GridSize,
    #[serde(default)]
    pub obstacles: Vec<ObstacleCount>,
    #[serde(default)]
    pub enemy_count: usize,
    #[serde(default)]
    pub options: ManualOptions,
}

impl ManualConfig {
    pub fn new(grid: GridSize) -> Self {
        Self {
            preset_id: String::new(),
            grid,
            obstacles: Vec::new(),
            enemy_count: 0,
            options: ManualOptions::default(),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.cols == 0 || self.grid.rows == 0 {
            return Err(ConfigError::EmptyGrid { cols: self.grid.cols, rows: self.grid.rows });
        }
        if self.options.entrances > MAX_ENTRANCES {
            return Err(ConfigError::TooManyEntrances(self.options.entrances));
        }
        Ok(())
    }

    /// Stable text form used as the random seed for this config.
    pub fn canonical_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.preset_id.clone())
    }

    pub fn with_obstacle(mut self, type_id: &str, count: usize) -> Self {
        self.obstacles.push(ObstacleCount { type_id: type_id.to_string(), count });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_config_fills_defaults() {
        let config = ManualConfig::from_toml_str(
            r#"
            preset_id = "cellar"
            grid = { cols = 8, rows = 8 }

            [[obstacles]]
            type_id = "barrel-wood"
            count = 5

            [options]
            theme = "dungeon"
            border = { north = true, south = false }
            "#,
        )
        .unwrap();

        assert_eq!(config.obstacles[0].count, 5);
        assert_eq!(config.options.theme, Theme::Dungeon);
        assert!(config.options.walls);
        assert_eq!(config.options.entrances, 2);
        assert!(config.options.border.north);
        assert!(!config.options.border.south);
        assert!(config.options.border.east);
    }

    #[test]
    fn json_config_round_trips_through_canonical_form() {
        let config = ManualConfig::new(GridSize::new(10, 6)).with_obstacle("crate-wood", 2);
        let parsed = ManualConfig::from_json_str(&config.canonical_json()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn validation_rejects_empty_grids_and_excess_entrances() {
        let error = ManualConfig::from_json_str(r#"{"grid":{"cols":0,"rows":4}}"#).unwrap_err();
        assert!(matches!(error, ConfigError::EmptyGrid { cols: 0, rows: 4 }));

        let error = ManualConfig::from_json_str(
            r#"{"grid":{"cols":6,"rows":4},"options":{"entrances":9}}"#,
        )
        .unwrap_err();
        assert!(matches!(error, ConfigError::TooManyEntrances(9)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let error = ManualConfig::from_toml_str("grid = [").unwrap_err();
        assert!(matches!(error, ConfigError::Toml(_)));
    }
}
