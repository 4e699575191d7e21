use serde::{Deserialize, Serialize};

use super::Severity;

/// A check within an analyzer.
///
/// The persisted catalog is authoritative; plugins may also synthesize rules
/// of the same shape while emitting findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique within the owning analyzer
    pub name_id: String,
    #[serde(default)]
    pub analyzer_name_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitigation: Option<String>,
}

impl Rule {
    pub fn new(
        analyzer_name_id: impl Into<String>,
        name_id: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            name_id: name_id.into(),
            analyzer_name_id: analyzer_name_id.into(),
            title: String::new(),
            description: String::new(),
            severity,
            mitigation: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_mitigation(mut self, mitigation: impl Into<String>) -> Self {
        self.mitigation = Some(mitigation.into());
        self
    }

    /// Text shown for a finding group: the description, else the title.
    pub fn message(&self) -> &str {
        if self.description.is_empty() {
            &self.title
        } else {
            &self.description
        }
    }

    /// Mitigation text, empty when none was supplied.
    pub fn mitigation_text(&self) -> &str {
        self.mitigation.as_deref().unwrap_or_default()
    }
}
