//! Run configuration: mirrors the teacher's small, `Default`-able
//! `BhConfig` shape, extended to cover a whole run so it can be loaded
//! from an optional TOML file and overridden by CLI flags.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::octree::BhConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Evaluator {
    Naive,
    BarnesHut,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "kebab-case")]
pub enum InitialConditions {
    /// N bodies, mass/position/velocity drawn uniformly from the given ranges.
    Uniform {
        mass_min: f64,
        mass_max: f64,
        position_range: f64,
        velocity_range: f64,
    },
    /// Two disks of `n_per_galaxy` bodies each, orbiting a central mass.
    TwinGalaxy {
        n_per_galaxy: usize,
        center_offset: f64,
        mass_min: f64,
        mass_max: f64,
        position_spread: f64,
        central_mass: f64,
    },
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self::Uniform {
            mass_min: 1.,
            mass_max: 10.,
            position_range: 50.,
            velocity_range: 1.,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct RunConfig {
    pub body_count: usize,
    pub gravitational_constant: f64,
    pub dt: f64,
    pub steps: u64,
    pub evaluator: Evaluator,
    pub θ: f64,
    pub max_bodies_per_leaf: usize,
    pub max_tree_depth: usize,
    pub initial_conditions: InitialConditions,
    pub seed: u64,
    pub output_path: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            body_count: 100,
            gravitational_constant: 1.,
            dt: 1e-3,
            steps: 1_000,
            evaluator: Evaluator::BarnesHut,
            θ: 0.5,
            max_bodies_per_leaf: 1,
            max_tree_depth: 48,
            initial_conditions: InitialConditions::default(),
            seed: 1234,
            output_path: None,
        }
    }
}

impl RunConfig {
    pub fn bh_config(&self) -> BhConfig {
        BhConfig {
            θ: self.θ,
            max_bodies_per_leaf: self.max_bodies_per_leaf,
            max_tree_depth: self.max_tree_depth,
        }
    }

    /// Validates fields that would otherwise surface as fatal errors
    /// only once the step loop is already running.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.evaluator == Evaluator::BarnesHut {
            crate::error::validate_theta(self.θ)?;
            if self.body_count == 0 {
                return Err(SimError::EmptyBodySet);
            }
        }
        Ok(())
    }

    pub fn load_or_default(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!("failed to parse config file {path}: {err}. Using defaults.");
                    Self::default()
                }
            },
            Err(err) => {
                tracing::warn!("could not read config file {path}: {err}. Using defaults.");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self).expect("RunConfig always serializes");
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_toml() {
        let config = RunConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let loaded: RunConfig = toml::from_str(&text).unwrap();
        assert_eq!(loaded.body_count, config.body_count);
        assert_eq!(loaded.evaluator, config.evaluator);
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let config = RunConfig::load_or_default("/nonexistent/path/to/config.toml");
        assert_eq!(config.body_count, RunConfig::default().body_count);
    }

    #[test]
    fn validate_accepts_zero_theta_for_barnes_hut() {
        let mut config = RunConfig::default();
        config.θ = 0.;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_negative_theta_for_barnes_hut() {
        let mut config = RunConfig::default();
        config.θ = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_allows_naive_with_zero_theta() {
        let mut config = RunConfig::default();
        config.evaluator = Evaluator::Naive;
        config.θ = 0.;
        assert!(config.validate().is_ok());
    }
}
