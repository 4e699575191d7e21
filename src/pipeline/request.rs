use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfigMap;
use crate::core::{Analyzer, ServiceSummary, SpecAnalysis};

/// What to run for one spec.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Analyzers to run; empty runs every active analyzer
    #[serde(default)]
    pub analyzers: Vec<String>,

    /// Request tier of the analyzer configuration
    #[serde(default)]
    pub config: AnalyzerConfigMap,

    /// Rule catalog to score against instead of the live one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_catalog: Option<Vec<Analyzer>>,
}

impl AnalyzeRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_analyzers<I, S>(mut self, analyzers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.analyzers = analyzers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_config(mut self, config: AnalyzerConfigMap) -> Self {
        self.config = config;
        self
    }

    pub fn with_rules_catalog(mut self, catalog: Vec<Analyzer>) -> Self {
        self.rules_catalog = Some(catalog);
        self
    }

    /// Whether `analyzer` survives the request's name filter.
    pub fn selects(&self, analyzer: &str) -> bool {
        self.analyzers.is_empty() || self.analyzers.iter().any(|name| name == analyzer)
    }
}

/// Scored analyses of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub analyses: Vec<SpecAnalysis>,
    pub spec_score: i64,
    /// Totals written onto the owning service
    pub summary: ServiceSummary,
    /// Weight-budget anomalies noticed while resolving weights
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weight_warnings: Vec<String>,
}

impl AnalysisOutcome {
    pub fn analysis_scores(&self) -> BTreeMap<String, i64> {
        self.analyses
            .iter()
            .map(|a| (a.analyzer.clone(), a.score))
            .collect()
    }

    pub fn analyzer_names(&self) -> Vec<&str> {
        self.analyses.iter().map(|a| a.analyzer.as_str()).collect()
    }
}
