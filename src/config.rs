//! Analysis configuration file support.
//!
//! All classifier and correlation thresholds, the analyst-maintained
//! forced-dark identity list, and provider settings can be read from a
//! TOML configuration file. Every field has a default, so a missing or
//! partial file is never an error.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::classifier::ClassifierConfig;
use crate::analysis::dark_vessel::CorrelationConfig;

/// Top-level analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub correlation: CorrelationConfig,
    /// Identities always flagged as dark when they have an AIS track,
    /// modeling analyst-supplied intelligence overriding the heuristics.
    #[serde(default = "default_forced_dark_mmsis")]
    pub forced_dark_mmsis: Vec<String>,
    #[serde(default)]
    pub provider: ProviderSettings,
}

fn default_forced_dark_mmsis() -> Vec<String> {
    vec!["316014621".to_string()]
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            correlation: CorrelationConfig::default(),
            forced_dark_mmsis: default_forced_dark_mmsis(),
            provider: ProviderSettings::default(),
        }
    }
}

/// Data backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Backend selection: "local" or "remote"
    #[serde(default = "default_provider_kind")]
    pub kind: String,
    #[serde(default = "default_ais_base_url")]
    pub ais_base_url: String,
    #[serde(default)]
    pub classification_base_url: String,
}

fn default_provider_kind() -> String {
    "local".to_string()
}

fn default_ais_base_url() -> String {
    "https://kystdatahuset.no/ws/api".to_string()
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: default_provider_kind(),
            ais_base_url: default_ais_base_url(),
            classification_base_url: String::new(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file {}", path.as_ref().display())
        })?;
        toml::from_str(&content).with_context(|| {
            format!("Failed to parse config file {}", path.as_ref().display())
        })
    }

    /// Load configuration from the default locations.
    ///
    /// Searches for `analysis.toml` in the current directory, `config/`,
    /// and the parent directory; falls back to defaults when no file
    /// exists.
    pub fn from_default_locations() -> Result<Self> {
        let candidates = [
            PathBuf::from("analysis.toml"),
            PathBuf::from("config/analysis.toml"),
            PathBuf::from("../analysis.toml"),
        ];
        for candidate in &candidates {
            if candidate.exists() {
                return Self::from_file(candidate);
            }
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.classifier.stationary_speed_threshold_knots, 0.5);
        assert_eq!(config.correlation.max_match_distance_nm, 1.0);
        assert_eq!(config.forced_dark_mmsis, vec!["316014621".to_string()]);
        assert_eq!(config.provider.kind, "local");
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let config: AnalysisConfig = toml::from_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: AnalysisConfig = toml::from_str(
            r#"
            forced_dark_mmsis = ["111111111", "222222222"]

            [classifier]
            min_transit_distance_nm = 8.0

            [correlation]
            max_match_time_diff_minutes = 60.0

            [provider]
            kind = "remote"
            classification_base_url = "https://sensors.example/api"
            "#,
        )
        .unwrap();

        assert_eq!(config.classifier.min_transit_distance_nm, 8.0);
        assert_eq!(config.classifier.dwell_speed_threshold_knots, 2.0);
        assert_eq!(config.correlation.max_match_time_diff_minutes, 60.0);
        assert_eq!(config.correlation.max_match_distance_nm, 1.0);
        assert_eq!(config.forced_dark_mmsis.len(), 2);
        assert_eq!(config.provider.kind, "remote");
        assert_eq!(
            config.provider.classification_base_url,
            "https://sensors.example/api"
        );
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(AnalysisConfig::from_file("/nonexistent/analysis.toml").is_err());
    }
}
