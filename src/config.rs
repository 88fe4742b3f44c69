//! Pipeline configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is valid:
//!
//! ```toml
//! overlap_threshold = 0.01
//! batch_limit = 100
//! area_metric = "planar"      # or "spherical"
//! default_center = { lat = 23.8103, lng = 90.4125 }
//!
//! [retry]
//! max_attempts = 5
//! initial_backoff_ms = 200
//! max_backoff_ms = 5000
//!
//! [collections]
//! constituencies = "constituencies"
//! wards = "wards"
//!
//! [schema]
//! group = "layer"
//! ward_name = "ADM4_EN"
//! ```

use std::path::Path;
use std::time::Duration;

use geoshape::AreaMetric;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::matcher::MatchOptions;
use crate::merge::MergeOptions;
use crate::types::GeoPoint;
use crate::writer::RetryPolicy;

/// Fraction of a ward's area that must overlap a constituency for a match.
pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 0.01;

/// Writes per committed batch.
pub const DEFAULT_BATCH_LIMIT: usize = 100;

/// Firestore rejects commits with more writes than this.
pub const MAX_BATCH_LIMIT: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Strict lower bound on overlap area / ward area.
    pub overlap_threshold: f64,
    pub batch_limit: usize,
    pub area_metric: AreaMetric,
    /// Center used for constituencies whose centroid cannot be computed.
    pub default_center: GeoPoint,
    pub retry: RetryConfig,
    pub collections: Collections,
    pub schema: FeatureSchema,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
            batch_limit: DEFAULT_BATCH_LIMIT,
            area_metric: AreaMetric::default(),
            default_center: GeoPoint::CAPITAL,
            retry: RetryConfig::default(),
            collections: Collections::default(),
            schema: FeatureSchema::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PipelineError::InputNotFound { path: path.to_path_buf() },
            _ => PipelineError::Io { path: path.to_path_buf(), source: e },
        })?;
        Self::from_toml_str(&text).map_err(|e| match e {
            PipelineError::Config(msg) => PipelineError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.overlap_threshold) {
            return Err(PipelineError::Config(format!(
                "overlap_threshold must be in [0, 1), got {}", self.overlap_threshold
            )));
        }
        if self.batch_limit == 0 || self.batch_limit > MAX_BATCH_LIMIT {
            return Err(PipelineError::Config(format!(
                "batch_limit must be in 1..={MAX_BATCH_LIMIT}, got {}", self.batch_limit
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(PipelineError::Config("retry.max_attempts must be at least 1".into()));
        }
        if self.collections.constituencies.is_empty() || self.collections.wards.is_empty() {
            return Err(PipelineError::Config("collection names must not be empty".into()));
        }
        Ok(())
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions { default_center: self.default_center }
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions { overlap_threshold: self.overlap_threshold, area_metric: self.area_metric }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Total commit attempts per batch, including the first.
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 5, initial_backoff_ms: 200, max_backoff_ms: 5_000 }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
        }
    }
}

/// Names of the output collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Collections {
    pub constituencies: String,
    pub wards: String,
}

impl Default for Collections {
    fn default() -> Self {
        Self { constituencies: "constituencies".into(), wards: "wards".into() }
    }
}

/// Property keys read from the input features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureSchema {
    /// Constituency name on each fragment (required).
    pub group: String,
    pub population: String,
    pub division: String,
    pub district: String,
    /// Ward name (required).
    pub ward_name: String,
    /// Ward parent sub-district, used to disambiguate ward ids.
    pub ward_thana: String,
    pub ward_district: String,
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self {
            group: "layer".into(),
            population: "TOTAL_POP".into(),
            division: "DIVISION_N".into(),
            district: "DISTRICT_N".into(),
            ward_name: "ADM4_EN".into(),
            ward_thana: "ADM3_EN".into(),
            ward_district: "ADM2_EN".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.overlap_threshold, 0.01);
        assert_eq!(config.batch_limit, 100);
        assert_eq!(config.default_center, GeoPoint::new(23.8103, 90.4125));
    }

    #[test]
    fn demo_config_spells_out_the_defaults() {
        let config = PipelineConfig::from_toml_str(include_str!("../demos/wardseed.toml")).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let config = PipelineConfig::from_toml_str(r#"
            overlap_threshold = 0.05
            area_metric = "spherical"

            [retry]
            max_attempts = 2

            [schema]
            group = "CONST_NAME"
        "#).unwrap();
        assert_eq!(config.overlap_threshold, 0.05);
        assert_eq!(config.area_metric, AreaMetric::Spherical);
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.initial_backoff_ms, 200);
        assert_eq!(config.schema.group, "CONST_NAME");
        assert_eq!(config.schema.ward_name, "ADM4_EN");
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(PipelineConfig::from_toml_str("overlap_threshold = 1.0").is_err());
        assert!(PipelineConfig::from_toml_str("overlap_threshold = -0.1").is_err());
        assert!(PipelineConfig::from_toml_str("batch_limit = 0").is_err());
        assert!(PipelineConfig::from_toml_str("batch_limit = 501").is_err());
        assert!(PipelineConfig::from_toml_str("[retry]\nmax_attempts = 0").is_err());
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = PipelineConfig::from_toml_str("batch_size = 10").unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn missing_file_is_input_not_found() {
        let err = PipelineConfig::from_file(Path::new("/nonexistent/wardseed.toml")).unwrap_err();
        assert!(matches!(err, PipelineError::InputNotFound { .. }));
    }

    #[test]
    fn retry_policy_carries_durations() {
        let policy = RetryConfig { max_attempts: 3, initial_backoff_ms: 10, max_backoff_ms: 40 }.policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_backoff, Duration::from_millis(10));
        assert_eq!(policy.max_backoff, Duration::from_millis(40));
    }
}
