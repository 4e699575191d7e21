use serde::{Deserialize, Serialize};

use crate::aggregation::AnalysisResult;
use crate::core::{Finding, Rule, Severity};
use crate::errors::Result;
use crate::plugins::ResultAdapter;

/// A difference between the documented contract and observed traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftEvent {
    /// Event kind, e.g. `undocumented-endpoint` or `changed-response-type`
    pub kind: String,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub old: Option<String>,
    #[serde(default)]
    pub new: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DriftReport {
    #[serde(default)]
    pub analyzer: String,
    #[serde(default)]
    pub events: Vec<DriftEvent>,
}

impl DriftEvent {
    /// Unlabelled events are warnings; removals of documented surface are errors.
    fn severity(&self) -> Severity {
        self.severity.unwrap_or_else(|| {
            if self.new.is_none() && self.old.is_some() {
                Severity::Error
            } else {
                Severity::Warning
            }
        })
    }
}

impl ResultAdapter for DriftReport {
    fn to_result(&self) -> Result<AnalysisResult> {
        let mut result = AnalysisResult::new();
        for event in &self.events {
            let description = if event.description.is_empty() {
                format!("Traffic drift: {}", event.kind)
            } else {
                event.description.clone()
            };
            let rule = Rule::new(&self.analyzer, &event.kind, event.severity())
                .with_description(description);
            result.add_rule_finding(
                &rule,
                Finding::diff(event.path.iter().cloned(), event.old.clone(), event.new.clone()),
            )?;
        }
        Ok(result)
    }
}
