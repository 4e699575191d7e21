//! Score weighting configuration.
//!
//! Each analyzer carries an analyzer weight (its share of the overall spec
//! score) and one integer weight per severity. Analyzers without an explicit
//! `score_config` share whatever analyzer-weight budget the explicit ones
//! leave over.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::analyzer_config::{AnalyzerConfig, SCORE_CONFIG_KEY};
use crate::core::{Analyzer, Severity, SeverityWeights};

/// Weighting for one analyzer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Share of the overall spec score (0.0-1.0)
    #[serde(default, alias = "analyzerWeight")]
    pub analyzer_weight: f64,

    /// Weight per severity; missing severities use their default weight
    #[serde(
        default,
        alias = "severityWeights",
        skip_serializing_if = "Option::is_none"
    )]
    pub severity_weights: Option<SeverityWeights>,
}

impl ScoreConfig {
    pub fn new(analyzer_weight: f64) -> Self {
        Self {
            analyzer_weight,
            severity_weights: None,
        }
    }

    pub fn with_severity_weights(mut self, weights: SeverityWeights) -> Self {
        self.severity_weights = Some(weights);
        self
    }

    /// Configured weight for `severity`, else its default.
    pub fn severity_weight(&self, severity: Severity) -> u32 {
        self.severity_weights
            .as_ref()
            .and_then(|weights| weights.get(&severity).copied())
            .unwrap_or_else(|| severity.weight())
    }

    // Pure function: Check if a weight is in valid range
    pub fn is_valid_weight(weight: f64) -> bool {
        (0.0..=1.0).contains(&weight)
    }

    // Pure function: Validate a single weight with name
    pub fn validate_weight(weight: f64, name: &str) -> Result<(), String> {
        if Self::is_valid_weight(weight) {
            Ok(())
        } else {
            Err(format!(
                "{} analyzer weight {} must be between 0.0 and 1.0",
                name, weight
            ))
        }
    }

    /// Every severity present, missing entries filled with defaults.
    fn complete_severity_weights(&self) -> SeverityWeights {
        Severity::ALL
            .into_iter()
            .map(|s| (s, self.severity_weight(s)))
            .collect()
    }
}

/// Read the explicit `score_config` entry of an analyzer config, if any.
///
/// A malformed entry is logged and treated as absent.
pub fn explicit_score_config(analyzer: &str, config: &AnalyzerConfig) -> Option<ScoreConfig> {
    let value = config.get(SCORE_CONFIG_KEY)?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value::<ScoreConfig>(value.clone()) {
        Ok(score_config) => Some(score_config),
        Err(e) => {
            warn!(analyzer, error = %e, "Ignoring malformed score_config");
            None
        }
    }
}

/// Resolved weight table for one scoring run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalyzersScoreConfigs(BTreeMap<String, ScoreConfig>);

impl AnalyzersScoreConfigs {
    /// Resolve weights for every analyzer in the catalog map.
    pub fn from_analyzers(analyzers: &BTreeMap<String, Analyzer>) -> Self {
        Self::from_configs(
            analyzers
                .iter()
                .map(|(name, analyzer)| (name.as_str(), &analyzer.config)),
        )
    }

    /// Resolve weights from `(analyzer name, config)` pairs.
    ///
    /// Explicit configs are kept as-is. The residual budget
    /// `(100 - sum(explicit weights) * 100) / 100` is split evenly across
    /// analyzers without one. The total is not validated here; see
    /// [`AnalyzersScoreConfigs::weight_budget_warnings`].
    pub fn from_configs<'a, I>(configs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a AnalyzerConfig)>,
    {
        let mut resolved = BTreeMap::new();
        let mut unconfigured = Vec::new();
        let mut explicit_sum = 0.0;

        for (name, config) in configs {
            match explicit_score_config(name, config) {
                Some(score_config) => {
                    explicit_sum += score_config.analyzer_weight;
                    resolved.insert(name.to_string(), score_config);
                }
                None => {
                    unconfigured.push(name.to_string());
                    resolved.insert(name.to_string(), ScoreConfig::default());
                }
            }
        }

        if !unconfigured.is_empty() {
            let residual = (100.0 - explicit_sum * 100.0) / 100.0;
            let share = residual / unconfigured.len() as f64;
            for name in &unconfigured {
                if let Some(score_config) = resolved.get_mut(name) {
                    score_config.analyzer_weight = share;
                }
            }
            debug!(
                unconfigured = unconfigured.len(),
                share, "Distributed residual analyzer weight"
            );
        }

        for score_config in resolved.values_mut() {
            score_config.severity_weights = Some(score_config.complete_severity_weights());
        }

        Self(resolved)
    }

    pub fn get(&self, analyzer: &str) -> Option<&ScoreConfig> {
        self.0.get(analyzer)
    }

    pub fn insert(&mut self, analyzer: impl Into<String>, config: ScoreConfig) {
        self.0.insert(analyzer.into(), config);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ScoreConfig)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn weight_sum(&self) -> f64 {
        self.0.values().map(|c| c.analyzer_weight).sum()
    }

    /// Configuration anomalies the engine deliberately does not correct:
    /// weights outside [0, 1] and totals that do not add up to 1.0.
    pub fn weight_budget_warnings(&self) -> Vec<String> {
        let mut warnings: Vec<String> = self
            .0
            .iter()
            .filter_map(|(name, c)| ScoreConfig::validate_weight(c.analyzer_weight, name).err())
            .collect();

        let sum = self.weight_sum();
        if !self.0.is_empty() && (sum - 1.0).abs() > 0.001 {
            warnings.push(format!(
                "Analyzer weights sum to {:.3} instead of 1.0; overall scores will be skewed",
                sum
            ));
        }
        warnings
    }
}

impl FromIterator<(String, ScoreConfig)> for AnalyzersScoreConfigs {
    fn from_iter<T: IntoIterator<Item = (String, ScoreConfig)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
