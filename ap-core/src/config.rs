//! Unified configuration schema shared by the CLI and the harnesses.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Search engine settings.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Evaluation harness settings.
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            evaluation: EvaluationConfig::default(),
        }
    }
}

/// Anytime search engine configuration.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Total leaf expansions per decision.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Horizon for leaf evaluation; tips at or below it are not re-enqueued.
    #[serde(default = "default_depth_bound")]
    pub depth_bound: u16,
    /// Probability of expanding an on-policy tip when both frontiers are
    /// non-empty.
    #[serde(default = "default_parameter")]
    pub parameter: f64,
    /// Estimate action values by sampled rollouts instead of full-width
    /// expansion.
    #[serde(default = "default_delayed_evaluation")]
    pub delayed_evaluation: bool,
    /// Expansions between frontier rebuilds; also the capacity of each
    /// bounded priority queue.
    #[serde(default = "default_expansions_per_iteration")]
    pub expansions_per_iteration: u32,
    /// Rollouts averaged per state-leaf evaluation.
    #[serde(default = "default_leaf_nsamples")]
    pub leaf_nsamples: u32,
    /// Sampled outcomes per action-leaf evaluation.
    #[serde(default = "default_delayed_evaluation_nsamples")]
    pub delayed_evaluation_nsamples: u32,
}

fn default_width() -> u32 {
    32
}

fn default_depth_bound() -> u16 {
    50
}

fn default_parameter() -> f64 {
    0.5
}

fn default_delayed_evaluation() -> bool {
    true
}

fn default_expansions_per_iteration() -> u32 {
    100
}

fn default_leaf_nsamples() -> u32 {
    1
}

fn default_delayed_evaluation_nsamples() -> u32 {
    1
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            depth_bound: default_depth_bound(),
            parameter: default_parameter(),
            delayed_evaluation: default_delayed_evaluation(),
            expansions_per_iteration: default_expansions_per_iteration(),
            leaf_nsamples: default_leaf_nsamples(),
            delayed_evaluation_nsamples: default_delayed_evaluation_nsamples(),
        }
    }
}

/// Evaluation harness configuration.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct EvaluationConfig {
    /// Episodes per policy.
    #[serde(default = "default_trials")]
    pub trials: u32,
    /// Step budget per episode.
    #[serde(default = "default_eval_depth")]
    pub depth: u16,
    /// Base seed; per-trial seeds are derived from it so that policies can be
    /// compared on identical hidden instances.
    #[serde(default)]
    pub seed: u64,
}

fn default_trials() -> u32 {
    200
}

fn default_eval_depth() -> u16 {
    70
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            depth: default_eval_depth(),
            seed: 0,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_tuned_values() {
        let config = Config::from_yaml("{}").expect("empty mapping should parse");
        assert_eq!(config.engine.width, 32);
        assert_eq!(config.engine.depth_bound, 50);
        assert!((config.engine.parameter - 0.5).abs() < 1e-12);
        assert!(config.engine.delayed_evaluation);
        assert_eq!(config.engine.expansions_per_iteration, 100);
        assert_eq!(config.engine.leaf_nsamples, 1);
        assert_eq!(config.engine.delayed_evaluation_nsamples, 1);
        assert_eq!(config.evaluation.trials, 200);
        assert_eq!(config.evaluation.depth, 70);
        assert_eq!(config.evaluation.seed, 0);
    }

    #[test]
    fn partial_yaml_overrides_only_named_fields() {
        let yaml = r#"
engine:
  width: 128
  delayed_evaluation: false
evaluation:
  trials: 50
"#;
        let config = Config::from_yaml(yaml).expect("parse");
        assert_eq!(config.engine.width, 128);
        assert!(!config.engine.delayed_evaluation);
        assert_eq!(config.engine.depth_bound, 50);
        assert_eq!(config.evaluation.trials, 50);
        assert_eq!(config.evaluation.depth, 70);
    }

    #[test]
    fn load_reads_a_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "engine:\n  width: 7").unwrap();

        let config = Config::load(&path).expect("load");
        assert_eq!(config.engine.width, 7);
    }

    #[test]
    fn invalid_yaml_fails() {
        assert!(Config::from_yaml("engine: [not, a, mapping]").is_err());
    }
}
