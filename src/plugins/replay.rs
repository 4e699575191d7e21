//! Plugin that replays findings recorded by an external tool run.
//!
//! The file may hold a canonical [`AnalysisResult`] or the native output of
//! one of the [adapters](super::adapters); the shape is detected from its
//! top-level keys.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;
use tracing::debug;

use super::{DriftReport, LintReport, ResultAdapter, SpecDocAnalyzer, TextScanReport};
use crate::aggregation::AnalysisResult;
use crate::config::AnalyzerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayFormat {
    Canonical,
    Lint,
    TextScan,
    Drift,
}

impl ReplayFormat {
    pub fn detect(value: &Value) -> Option<ReplayFormat> {
        let object = value.as_object()?;
        if object.contains_key("violations") {
            Some(ReplayFormat::Lint)
        } else if object.contains_key("hits") {
            Some(ReplayFormat::TextScan)
        } else if object.contains_key("events") {
            Some(ReplayFormat::Drift)
        } else if object.contains_key("findings") || object.contains_key("summary") {
            Some(ReplayFormat::Canonical)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReplayAnalyzer {
    name: String,
    path: PathBuf,
}

impl ReplayAnalyzer {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Convert recorded output into a result attributed to `analyzer`.
    pub fn replay_value(analyzer: &str, value: Value) -> anyhow::Result<AnalysisResult> {
        let format = ReplayFormat::detect(&value)
            .with_context(|| format!("Unrecognized findings format for '{}'", analyzer))?;
        debug!(analyzer, ?format, "Replaying recorded findings");

        let result = match format {
            ReplayFormat::Canonical => serde_json::from_value::<AnalysisResult>(value)?,
            ReplayFormat::Lint => {
                let mut report: LintReport = serde_json::from_value(value)?;
                report.analyzer = analyzer.to_string();
                report.to_result()?
            }
            ReplayFormat::TextScan => {
                let mut report: TextScanReport = serde_json::from_value(value)?;
                report.analyzer = analyzer.to_string();
                report.to_result()?
            }
            ReplayFormat::Drift => {
                let mut report: DriftReport = serde_json::from_value(value)?;
                report.analyzer = analyzer.to_string();
                report.to_result()?
            }
        };
        Ok(result)
    }
}

impl SpecDocAnalyzer for ReplayAnalyzer {
    fn name(&self) -> &str {
        &self.name
    }

    fn analyze(
        &self,
        _doc: Option<&str>,
        _config: &AnalyzerConfig,
        _service_name_id: Option<&str>,
    ) -> anyhow::Result<AnalysisResult> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read findings from {}", self.path.display()))?;
        let value: Value = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid JSON in {}", self.path.display()))?;
        Self::replay_value(&self.name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_detect_formats() {
        assert_eq!(
            ReplayFormat::detect(&json!({"violations": []})),
            Some(ReplayFormat::Lint)
        );
        assert_eq!(
            ReplayFormat::detect(&json!({"hits": []})),
            Some(ReplayFormat::TextScan)
        );
        assert_eq!(
            ReplayFormat::detect(&json!({"events": []})),
            Some(ReplayFormat::Drift)
        );
        assert_eq!(
            ReplayFormat::detect(&json!({"summary": {}})),
            Some(ReplayFormat::Canonical)
        );
        assert_eq!(ReplayFormat::detect(&json!([1, 2])), None);
    }

    #[test]
    fn test_replay_lint_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lint.json");
        fs::write(
            &path,
            json!({
                "violations": [
                    {"code": "operation-tags", "message": "Operation must have tags", "severity": 1}
                ]
            })
            .to_string(),
        )
        .unwrap();

        let plugin = ReplayAnalyzer::new("lint", &path);
        let result = plugin.analyze(None, &AnalyzerConfig::new(), None).unwrap();
        let rule = result
            .rule_findings(Severity::Warning, "operation-tags")
            .unwrap();
        assert_eq!(rule.message, "Operation must have tags");
        assert_eq!(result.stats().occurrences, 1);
    }

    #[test]
    fn test_replay_text_scan_hits_without_analyzer_key() {
        let result = ReplayAnalyzer::replay_value(
            "inclusive-language",
            json!({"hits": [{"term": "whitelist", "line": 1, "column": 0}]}),
        )
        .unwrap();
        assert!(result
            .rule_findings(Severity::Warning, "term-whitelist")
            .is_some());
        assert_eq!(result.stats().occurrences, 1);
    }

    #[test]
    fn test_replay_drift_events_without_analyzer_key() {
        let result = ReplayAnalyzer::replay_value(
            "drift",
            json!({"events": [{"kind": "removed-endpoint", "old": "/pets", "path": ["paths", "/pets"]}]}),
        )
        .unwrap();
        assert!(result
            .rule_findings(Severity::Error, "removed-endpoint")
            .is_some());
        assert_eq!(result.stats().occurrences, 1);
    }

    #[test]
    fn test_missing_file_is_plugin_error() {
        let plugin = ReplayAnalyzer::new("lint", "/nonexistent/lint.json");
        let err = plugin
            .analyze(None, &AnalyzerConfig::new(), None)
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read findings"));
    }

    #[test]
    fn test_unknown_shape_rejected() {
        let err = ReplayAnalyzer::replay_value("lint", json!({"foo": 1})).unwrap_err();
        assert!(err.to_string().contains("Unrecognized findings format"));
    }
}
