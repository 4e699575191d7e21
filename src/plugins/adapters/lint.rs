use serde::{Deserialize, Serialize};

use crate::aggregation::AnalysisResult;
use crate::core::{Finding, Range, Rule, Severity};
use crate::errors::Result;
use crate::plugins::ResultAdapter;

/// One lint rule violation, in the shape spectral-style linters print.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintViolation {
    pub code: String,
    #[serde(default)]
    pub message: String,
    /// 0 = error, 1 = warning, 2 = info, 3 = hint
    #[serde(default)]
    pub severity: u8,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub range: Range,
}

impl LintViolation {
    pub fn severity(&self) -> Severity {
        match self.severity {
            0 => Severity::Error,
            1 => Severity::Warning,
            2 => Severity::Info,
            _ => Severity::Hint,
        }
    }
}

/// Violations of one lint run plus optional ruleset metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LintReport {
    #[serde(default)]
    pub analyzer: String,
    #[serde(default)]
    pub violations: Vec<LintViolation>,
    /// Ruleset descriptions; violations of unlisted rules synthesize one
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl LintReport {
    pub fn new(analyzer: impl Into<String>, violations: Vec<LintViolation>) -> Self {
        Self {
            analyzer: analyzer.into(),
            violations,
            rules: Vec::new(),
        }
    }

    fn rule_for(&self, violation: &LintViolation) -> Rule {
        self.rules
            .iter()
            .find(|rule| rule.name_id == violation.code)
            .cloned()
            .unwrap_or_else(|| {
                Rule::new(&self.analyzer, &violation.code, violation.severity())
                    .with_description(&violation.message)
            })
    }
}

impl ResultAdapter for LintReport {
    fn to_result(&self) -> Result<AnalysisResult> {
        let mut result = AnalysisResult::new();
        for violation in &self.violations {
            let severity = violation.severity();
            result.register_rule(severity, &self.rule_for(violation));
            result.add_finding(
                severity,
                &violation.code,
                Finding::range(violation.path.iter().cloned(), violation.range),
            )?;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(code: &str, severity: u8, message: &str) -> LintViolation {
        LintViolation {
            code: code.to_string(),
            message: message.to_string(),
            severity,
            path: vec!["paths".to_string(), "/pets".to_string()],
            range: Range::new(3, 2, 3, 10),
        }
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(violation("a", 0, "").severity(), Severity::Error);
        assert_eq!(violation("a", 1, "").severity(), Severity::Warning);
        assert_eq!(violation("a", 2, "").severity(), Severity::Info);
        assert_eq!(violation("a", 3, "").severity(), Severity::Hint);
        assert_eq!(violation("a", 42, "").severity(), Severity::Hint);
    }

    #[test]
    fn test_to_result_groups_by_rule_and_keeps_first_message() {
        let report = LintReport::new(
            "lint",
            vec![
                violation("operation-tags", 1, "GET /pets needs tags"),
                violation("operation-tags", 1, "POST /pets needs tags"),
                violation("no-http", 0, "Server uses http"),
            ],
        );
        let result = report.to_result().unwrap();

        let group = result
            .rule_findings(Severity::Warning, "operation-tags")
            .unwrap();
        assert_eq!(group.data.len(), 2);
        assert_eq!(group.message, "GET /pets needs tags");
        assert_eq!(result.stats().error.count, 1);
        assert_eq!(result.stats().occurrences, 3);
    }

    #[test]
    fn test_ruleset_metadata_preferred() {
        let mut report = LintReport::new("lint", vec![violation("no-http", 0, "raw message")]);
        report.rules.push(
            Rule::new("lint", "no-http", Severity::Error)
                .with_description("Servers must use https")
                .with_mitigation("Switch server URLs to https"),
        );
        let result = report.to_result().unwrap();
        let group = result.rule_findings(Severity::Error, "no-http").unwrap();
        assert_eq!(group.message, "Servers must use https");
        assert_eq!(group.mitigation, "Switch server URLs to https");
    }

    #[test]
    fn test_parse_lint_json() {
        let json = r#"{
            "analyzer": "lint",
            "violations": [
                {"code": "info-contact", "message": "Missing contact", "severity": 1,
                 "path": ["info"], "range": {"start": {"line": 1, "character": 0},
                                             "end": {"line": 4, "character": 0}}}
            ]
        }"#;
        let report: LintReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.violations[0].severity(), Severity::Warning);
        assert_eq!(report.violations[0].range.end.line, 4);
    }
}
