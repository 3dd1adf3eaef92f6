// Configuration module for reading Snake.toml
// This module provides OOP-style configuration management for the decision engine

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::grid::Grid;
use crate::rules::Rules;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub grid: GridConfig,
    pub scores: ScoresConfig,
    pub safety: SafetyConfig,
    pub weights: WeightsConfig,
    pub tree_search: TreeSearchConfig,
    pub rules: RulesConfig,
    pub debug: DebugConfig,
}

/// Board geometry, fixed for the process lifetime
#[derive(Debug, Deserialize, Clone)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
    pub cell_size: f64,
}

impl GridConfig {
    pub fn to_grid(&self) -> Grid {
        Grid::new(self.width, self.height, self.cell_size)
    }
}

/// Raw confidence scores each strategy proposes
#[derive(Debug, Deserialize, Clone)]
pub struct ScoresConfig {
    pub path_search: f64,
    /// Sentinel for a path that exists but fails the safety check
    pub path_rejected: f64,
    pub space_fallback: f64,
    pub tree_search: f64,
    pub survival: f64,
}

/// Heuristic margins
#[derive(Debug, Deserialize, Clone)]
pub struct SafetyConfig {
    /// Path is unsafe when post-consumption space < grown length + this margin
    pub path_space_margin: usize,
    /// Space is tight when space from the head < body length + this margin
    pub space_fallback_margin: usize,
}

/// Initial weights and the multiplicative update
#[derive(Debug, Deserialize, Clone)]
pub struct WeightsConfig {
    pub path_search: f64,
    pub space_fallback: f64,
    pub survival: f64,
    pub tree_search: f64,
    pub success_multiplier: f64,
    pub failure_multiplier: f64,
    pub floor: f64,
}

/// Monte Carlo tree search budget
#[derive(Debug, Deserialize, Clone)]
pub struct TreeSearchConfig {
    /// When false the tree search never competes in arbitration
    pub enabled: bool,
    pub simulations: usize,
    pub rollout_depth: usize,
    pub exploration_constant: f64,
    pub trapped_penalty: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Rewards emitted by the simulated transition
#[derive(Debug, Deserialize, Clone)]
pub struct RulesConfig {
    pub food_reward: f64,
    pub collision_penalty: f64,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Rejects values the engine cannot run with
    pub fn validate(&self) -> Result<(), String> {
        if self.grid.width <= 0 || self.grid.height <= 0 {
            return Err(format!(
                "Grid dimensions must be positive, got {}x{}",
                self.grid.width, self.grid.height
            ));
        }
        if self.grid.cell_size <= 0.0 {
            return Err(format!("Cell size must be positive, got {}", self.grid.cell_size));
        }
        let w = &self.weights;
        if [w.path_search, w.space_fallback, w.survival, w.tree_search]
            .iter()
            .any(|&v| v <= 0.0)
        {
            return Err("Initial weights must be positive".to_string());
        }
        if w.floor <= 0.0 || w.success_multiplier <= 0.0 || w.failure_multiplier <= 0.0 {
            return Err("Weight floor and multipliers must be positive".to_string());
        }
        Ok(())
    }

    /// The grid described by this configuration
    pub fn grid(&self) -> Grid {
        self.grid.to_grid()
    }

    /// Stock transition rules for this configuration
    pub fn rules(&self) -> Rules {
        Rules::new(
            self.grid(),
            self.rules.food_reward,
            self.rules.collision_penalty,
        )
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            grid: GridConfig {
                width: 32,
                height: 24,
                cell_size: 20.0,
            },
            scores: ScoresConfig {
                path_search: 100.0,
                path_rejected: -1.0,
                space_fallback: 80.0,
                tree_search: 90.0,
                survival: 20.0,
            },
            safety: SafetyConfig {
                path_space_margin: 0,
                space_fallback_margin: 5,
            },
            weights: WeightsConfig {
                path_search: 1.0,
                space_fallback: 1.0,
                survival: 1.0,
                tree_search: 1.2,
                success_multiplier: 1.02,
                failure_multiplier: 0.98,
                floor: 0.0001,
            },
            tree_search: TreeSearchConfig {
                enabled: true,
                simulations: 100,
                rollout_depth: 100,
                exploration_constant: 1.41,
                trapped_penalty: -1.0,
                seed: None,
            },
            rules: RulesConfig {
                food_reward: 10.0,
                collision_penalty: -10.0,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "arbiter_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            eprintln!("Warning: Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_can_be_created() {
        let config = Config::default_hardcoded();
        assert_eq!(config.grid.width, 32);
        assert_eq!(config.tree_search.simulations, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_snake_toml_can_be_parsed() {
        // This test ensures Snake.toml is valid and can be parsed
        let result = Config::from_file("Snake.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Snake.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Snake.toml").expect("Snake.toml should be parseable");
        let hardcoded = Config::default_hardcoded();

        assert_eq!(file_config.grid.width, hardcoded.grid.width);
        assert_eq!(file_config.grid.height, hardcoded.grid.height);
        assert_eq!(file_config.grid.cell_size, hardcoded.grid.cell_size);

        assert_eq!(file_config.scores.path_search, hardcoded.scores.path_search);
        assert_eq!(file_config.scores.path_rejected, hardcoded.scores.path_rejected);
        assert_eq!(file_config.scores.space_fallback, hardcoded.scores.space_fallback);
        assert_eq!(file_config.scores.tree_search, hardcoded.scores.tree_search);
        assert_eq!(file_config.scores.survival, hardcoded.scores.survival);

        assert_eq!(
            file_config.safety.path_space_margin,
            hardcoded.safety.path_space_margin
        );
        assert_eq!(
            file_config.safety.space_fallback_margin,
            hardcoded.safety.space_fallback_margin
        );

        assert_eq!(file_config.weights.tree_search, hardcoded.weights.tree_search);
        assert_eq!(
            file_config.weights.success_multiplier,
            hardcoded.weights.success_multiplier
        );
        assert_eq!(
            file_config.weights.failure_multiplier,
            hardcoded.weights.failure_multiplier
        );

        assert_eq!(
            file_config.tree_search.simulations,
            hardcoded.tree_search.simulations
        );
        assert_eq!(
            file_config.tree_search.rollout_depth,
            hardcoded.tree_search.rollout_depth
        );
        assert_eq!(
            file_config.tree_search.exploration_constant,
            hardcoded.tree_search.exploration_constant
        );

        assert_eq!(file_config.rules.food_reward, hardcoded.rules.food_reward);
        assert_eq!(
            file_config.rules.collision_penalty,
            hardcoded.rules.collision_penalty
        );
    }

    #[test]
    fn test_load_or_default_works() {
        let config = Config::load_or_default();
        assert_eq!(config.safety.space_fallback_margin, 5);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_non_positive_weight_is_rejected() {
        let mut config = Config::default_hardcoded();
        config.weights.survival = 0.0;
        assert!(config.validate().is_err());
    }
}
