//! Top-level Fronthaul configuration with layered resolution.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{AnomalyConfig, PipelineConfig, PropagationConfig, SimilarityConfig, TopologyConfig};
use crate::constants;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all stage configs.
///
/// Resolution order (highest priority first):
/// 1. Caller overrides (applied via `apply_overrides`)
/// 2. Environment variables (`FRONTHAUL_*`)
/// 3. Project config (`fronthaul.toml` in the project root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FronthaulConfig {
    pub similarity: SimilarityConfig,
    pub topology: TopologyConfig,
    pub anomaly: AnomalyConfig,
    pub propagation: PropagationConfig,
    pub pipeline: PipelineConfig,
}

/// Caller-supplied overrides, applied last.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub num_clusters: Option<usize>,
    pub distance_threshold: Option<f64>,
    pub max_lag: Option<usize>,
    pub min_correlation: Option<f64>,
    pub propagation: Option<bool>,
}

impl FronthaulConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(constants::CONFIG_FILE_NAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config)?;

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        tracing::debug!(path = %project_config_path.display(), "configuration loaded");
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialize>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &FronthaulConfig) -> Result<(), ConfigError> {
        let s = &config.similarity;
        check_window("similarity", s.window, s.min_periods)?;

        let t = &config.topology;
        if t.num_clusters == Some(0) {
            return Err(invalid("topology.num_clusters", "must be at least 1"));
        }
        if let Some(d) = t.distance_threshold {
            if !(0.0..=1.0).contains(&d) {
                return Err(invalid("topology.distance_threshold", "must be between 0.0 and 1.0"));
            }
        }
        if matches!(t.min_cluster_size, Some(n) if n < 2) {
            return Err(invalid("topology.min_cluster_size", "must be at least 2"));
        }

        let a = &config.anomaly;
        check_window("anomaly", a.window, a.min_periods)?;
        if matches!(a.z_threshold, Some(z) if !(z < 0.0 && z.is_finite())) {
            return Err(invalid("anomaly.z_threshold", "must be a finite negative number"));
        }
        if matches!(a.drop_threshold, Some(d) if !(d > 0.0 && d < 1.0)) {
            return Err(invalid("anomaly.drop_threshold", "must be between 0.0 and 1.0 (exclusive)"));
        }
        if matches!(a.epsilon, Some(e) if !(e > 0.0 && e.is_finite())) {
            return Err(invalid("anomaly.epsilon", "must be a finite positive number"));
        }
        if matches!(a.flag_rate, Some(r) if !(0.0..1.0).contains(&r)) {
            return Err(invalid("anomaly.flag_rate", "must be in [0.0, 1.0)"));
        }
        if matches!(a.peer_fit_threshold, Some(t) if !(0.0..=1.0).contains(&t)) {
            return Err(invalid("anomaly.peer_fit_threshold", "must be between 0.0 and 1.0"));
        }

        let p = &config.propagation;
        if p.max_lag == Some(0) {
            return Err(invalid("propagation.max_lag", "must be at least 1"));
        }
        if matches!(p.min_correlation, Some(c) if !(0.0..=1.0).contains(&c)) {
            return Err(invalid("propagation.min_correlation", "must be between 0.0 and 1.0"));
        }
        if matches!(p.slot_duration_ms, Some(d) if !(d > 0.0 && d.is_finite())) {
            return Err(invalid("propagation.slot_duration_ms", "must be a finite positive number"));
        }
        if matches!(p.min_signal_length, Some(n) if n < 2) {
            return Err(invalid("propagation.min_signal_length", "must be at least 2"));
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut FronthaulConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: FronthaulConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; only `Some` values in `other` win.
    pub fn merge(base: &mut FronthaulConfig, other: &FronthaulConfig) {
        base.similarity.merge_from(&other.similarity);
        base.topology.merge_from(&other.topology);
        base.anomaly.merge_from(&other.anomaly);
        base.propagation.merge_from(&other.propagation);
        base.pipeline.merge_from(&other.pipeline);
    }

    /// Apply `FRONTHAUL_*` environment variables. Unparseable values are
    /// rejected rather than ignored.
    fn apply_env_overrides(config: &mut FronthaulConfig) -> Result<(), ConfigError> {
        let c = config;
        env_var("FRONTHAUL_SIMILARITY_METHOD", &mut c.similarity.method)?;
        env_var("FRONTHAUL_SIMILARITY_SIGNAL", &mut c.similarity.signal)?;
        env_var("FRONTHAUL_SIMILARITY_PREWHITEN", &mut c.similarity.prewhiten)?;
        env_var("FRONTHAUL_TOPOLOGY_STRATEGY", &mut c.topology.strategy)?;
        env_var("FRONTHAUL_TOPOLOGY_NUM_CLUSTERS", &mut c.topology.num_clusters)?;
        env_var("FRONTHAUL_TOPOLOGY_DISTANCE_THRESHOLD", &mut c.topology.distance_threshold)?;
        env_var("FRONTHAUL_ANOMALY_RULE", &mut c.anomaly.rule)?;
        env_var("FRONTHAUL_ANOMALY_WINDOW", &mut c.anomaly.window)?;
        env_var("FRONTHAUL_ANOMALY_MIN_PERIODS", &mut c.anomaly.min_periods)?;
        env_var("FRONTHAUL_ANOMALY_FLAG_RATE", &mut c.anomaly.flag_rate)?;
        env_var("FRONTHAUL_PROPAGATION_MAX_LAG", &mut c.propagation.max_lag)?;
        env_var("FRONTHAUL_PROPAGATION_MIN_CORRELATION", &mut c.propagation.min_correlation)?;
        env_var("FRONTHAUL_PROPAGATION_INDICATOR", &mut c.propagation.indicator)?;
        env_var("FRONTHAUL_PIPELINE_PROPAGATION", &mut c.pipeline.propagation)?;
        Ok(())
    }

    /// Apply caller overrides (highest priority).
    pub fn apply_overrides(config: &mut FronthaulConfig, overrides: &ConfigOverrides) {
        if let Some(k) = overrides.num_clusters {
            config.topology.num_clusters = Some(k);
        }
        if let Some(d) = overrides.distance_threshold {
            config.topology.distance_threshold = Some(d);
        }
        if let Some(lag) = overrides.max_lag {
            config.propagation.max_lag = Some(lag);
        }
        if let Some(c) = overrides.min_correlation {
            config.propagation.min_correlation = Some(c);
        }
        if let Some(p) = overrides.propagation {
            config.pipeline.propagation = Some(p);
        }
    }
}

fn env_var<T: FromStr>(name: &str, slot: &mut Option<T>) -> Result<(), ConfigError> {
    if let Ok(raw) = std::env::var(name) {
        let parsed = raw.trim().parse::<T>().map_err(|_| ConfigError::ValidationFailed {
            field: name.to_string(),
            message: format!("cannot parse '{raw}'"),
        })?;
        *slot = Some(parsed);
    }
    Ok(())
}

fn check_window(
    section: &str,
    window: Option<usize>,
    min_periods: Option<usize>,
) -> Result<(), ConfigError> {
    if window == Some(0) {
        return Err(invalid(&format!("{section}.window"), "must be at least 1"));
    }
    if min_periods == Some(0) {
        return Err(invalid(&format!("{section}.min_periods"), "must be at least 1"));
    }
    let w = window.unwrap_or(constants::DEFAULT_WINDOW);
    let p = min_periods.unwrap_or(constants::DEFAULT_MIN_PERIODS);
    if p > w {
        return Err(invalid(
            &format!("{section}.min_periods"),
            "must not exceed the window",
        ));
    }
    Ok(())
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
