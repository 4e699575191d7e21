//! Governed entities read and written by the engine.
//!
//! Persistence of these records belongs to the storage layer; the engine only
//! relies on the fields and validation rules defined here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Rule;
use crate::aggregation::{AnalysisResult, SummaryStats};
use crate::config::{AnalyzerConfig, AnalyzerConfigMap};
use crate::errors::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerStatus {
    #[default]
    Active,
    Inactive,
}

/// A pluggable check with its configuration and rule catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analyzer {
    pub name_id: String,
    #[serde(default)]
    pub status: AnalyzerStatus,
    #[serde(default)]
    pub config: AnalyzerConfig,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Analyzer {
    pub fn new(name_id: impl Into<String>) -> Self {
        Self {
            name_id: name_id.into(),
            status: AnalyzerStatus::Active,
            config: AnalyzerConfig::new(),
            rules: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AnalyzerStatus::Active
    }

    /// Catalog rules default their analyzer id to the owner.
    pub fn normalized_rules(&self) -> impl Iterator<Item = Rule> + '_ {
        self.rules.iter().map(|rule| {
            let mut rule = rule.clone();
            if rule.analyzer_name_id.is_empty() {
                rule.analyzer_name_id = self.name_id.clone();
            }
            rule
        })
    }
}

/// Totals written back onto a service after an analysis run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub spec_id: Uuid,
    pub score: i64,
    #[serde(default)]
    pub analyzer_scores: std::collections::BTreeMap<String, i64>,
    #[serde(default)]
    pub findings: SummaryStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<Uuid>,
    /// Service tier of the analyzer configuration
    #[serde(default)]
    pub analyzers_config: AnalyzerConfigMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ServiceSummary>,
}

impl Service {
    pub fn new(name_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name_id: name_id.into(),
            base_name: None,
            organization_id: None,
            analyzers_config: AnalyzerConfigMap::new(),
            summary: None,
        }
    }

    /// Name fed to `service_name_id_template`.
    pub fn base_name(&self) -> &str {
        self.base_name.as_deref().unwrap_or(&self.name_id)
    }
}

/// An API document belonging to a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spec {
    pub id: Uuid,
    pub service_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Spec {
    pub fn new(service_id: Uuid, doc: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            service_id,
            doc,
            score: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnalysisStatus {
    #[default]
    Submitted,
    Invalid,
    Analyzed,
}

/// Persisted join of (spec, analyzer) to one result and score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecAnalysis {
    pub id: Uuid,
    pub analyzer: String,
    pub spec_id: Uuid,
    pub service_id: Uuid,
    #[serde(default)]
    pub config: AnalyzerConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub status: AnalysisStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SpecAnalysis {
    pub fn new(analyzer: impl Into<String>, spec_id: Uuid, service_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            analyzer: analyzer.into(),
            spec_id,
            service_id,
            config: AnalyzerConfig::new(),
            result: None,
            score: 0,
            status: AnalysisStatus::Submitted,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    /// Seal a result onto the record. Fails on a missing result or status,
    /// and when a result was already sealed.
    pub fn set_result(
        &mut self,
        result: Option<AnalysisResult>,
        status: Option<AnalysisStatus>,
    ) -> Result<()> {
        let (result, status) = validate_result(result, status)?;
        if self.result.is_some() {
            return Err(Error::InvalidResult(format!(
                "analysis {} already holds a result",
                self.id
            )));
        }
        self.result = Some(result);
        self.status = status;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_score(&mut self, score: i64) {
        self.score = score;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffStatus {
    Submitted,
    Invalid,
    Compared,
}

/// Comparison of a spec against an earlier revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecDiff {
    pub id: Uuid,
    pub base_spec_id: Uuid,
    pub spec_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DiffStatus>,
}

impl SpecDiff {
    pub fn new(base_spec_id: Uuid, spec_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            base_spec_id,
            spec_id,
            result: None,
            status: Some(DiffStatus::Submitted),
        }
    }

    pub fn set_result(
        &mut self,
        result: Option<AnalysisResult>,
        status: Option<DiffStatus>,
    ) -> Result<()> {
        let (result, status) = validate_result(result, status)?;
        self.result = Some(result);
        self.status = Some(status);
        Ok(())
    }
}

fn validate_result<S>(
    result: Option<AnalysisResult>,
    status: Option<S>,
) -> Result<(AnalysisResult, S)> {
    let result = result.ok_or_else(|| Error::InvalidResult("result is required".to_string()))?;
    let status = status.ok_or_else(|| Error::InvalidResult("status is required".to_string()))?;
    Ok((result, status))
}
