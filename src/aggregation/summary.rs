use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::Severity;

/// Bookkeeping for one severity bucket.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeverityStats {
    /// Distinct rules triggered
    pub count: usize,
    /// Total findings
    pub occurrences: usize,
    /// Occurrences per rule
    #[serde(default)]
    pub data: BTreeMap<String, usize>,
}

impl SeverityStats {
    fn record(&mut self, rule_name_id: &str) {
        self.occurrences += 1;
        *self.data.entry(rule_name_id.to_string()).or_insert(0) += 1;
        self.count = self.data.len();
    }

    fn absorb(&mut self, other: &SeverityStats) {
        self.occurrences += other.occurrences;
        for (rule, n) in &other.data {
            *self.data.entry(rule.clone()).or_insert(0) += n;
        }
        self.count = self.data.len();
    }
}

/// Per-severity statistics plus the overall totals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub occurrences: usize,
    #[serde(default)]
    pub hint: SeverityStats,
    #[serde(default)]
    pub info: SeverityStats,
    #[serde(default)]
    pub warning: SeverityStats,
    #[serde(default)]
    pub error: SeverityStats,
}

impl SummaryStats {
    pub fn severity(&self, severity: Severity) -> &SeverityStats {
        match severity {
            Severity::Hint => &self.hint,
            Severity::Info => &self.info,
            Severity::Warning => &self.warning,
            Severity::Error => &self.error,
        }
    }

    fn severity_mut(&mut self, severity: Severity) -> &mut SeverityStats {
        match severity {
            Severity::Hint => &mut self.hint,
            Severity::Info => &mut self.info,
            Severity::Warning => &mut self.warning,
            Severity::Error => &mut self.error,
        }
    }

    /// Record one occurrence and refresh the overall totals.
    pub(crate) fn record(&mut self, severity: Severity, rule_name_id: &str) {
        self.severity_mut(severity).record(rule_name_id);
        self.refresh_totals();
    }

    /// Fold another summary into this one (used for service-level totals).
    pub fn absorb(&mut self, other: &SummaryStats) {
        for severity in Severity::ALL {
            self.severity_mut(severity).absorb(other.severity(severity));
        }
        self.refresh_totals();
    }

    fn refresh_totals(&mut self) {
        self.count = Severity::ALL
            .iter()
            .map(|s| self.severity(*s).count)
            .sum();
        self.occurrences = Severity::ALL
            .iter()
            .map(|s| self.severity(*s).occurrences)
            .sum();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub stats: SummaryStats,
}
