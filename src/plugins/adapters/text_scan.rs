use serde::{Deserialize, Serialize};

use crate::aggregation::AnalysisResult;
use crate::core::{Finding, Range, Rule, Severity};
use crate::errors::Result;
use crate::plugins::ResultAdapter;

/// One flagged term found by a text scan (inclusive-language style).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextScanHit {
    pub term: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Zero-based line and column of the first character
    pub line: u32,
    pub column: u32,
    #[serde(default)]
    pub path: Vec<String>,
}

impl TextScanHit {
    fn rule_name_id(&self) -> String {
        format!("term-{}", self.term.to_lowercase().replace(' ', "-"))
    }

    fn range(&self) -> Range {
        let width = self.term.chars().count() as u32;
        Range::new(self.line, self.column, self.line, self.column + width)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextScanReport {
    #[serde(default)]
    pub analyzer: String,
    /// Severity every hit is reported at
    #[serde(default = "default_scan_severity")]
    pub severity: Severity,
    #[serde(default)]
    pub hits: Vec<TextScanHit>,
}

fn default_scan_severity() -> Severity {
    Severity::Warning
}

impl TextScanReport {
    pub fn new(analyzer: impl Into<String>, hits: Vec<TextScanHit>) -> Self {
        Self {
            analyzer: analyzer.into(),
            severity: default_scan_severity(),
            hits,
        }
    }
}

impl ResultAdapter for TextScanReport {
    fn to_result(&self) -> Result<AnalysisResult> {
        let mut result = AnalysisResult::new();
        for hit in &self.hits {
            let mut rule = Rule::new(&self.analyzer, hit.rule_name_id(), self.severity)
                .with_title(format!("Flagged term '{}'", hit.term))
                .with_description(format!("The term '{}' should be replaced", hit.term));
            if !hit.suggestions.is_empty() {
                rule = rule.with_mitigation(format!("Consider: {}", hit.suggestions.join(", ")));
            }
            result.add_rule_finding(&rule, Finding::range(hit.path.iter().cloned(), hit.range()))?;
        }
        Ok(result)
    }
}
