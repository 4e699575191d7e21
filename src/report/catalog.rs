use std::collections::{BTreeMap, HashMap};

use crate::core::{Analyzer, Rule, Severity};

/// Authoritative rules per analyzer, indexed for scoring and mitigation lookup.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: HashMap<(String, String), Rule>,
    counts: HashMap<String, BTreeMap<Severity, usize>>,
}

impl RuleCatalog {
    pub fn from_analyzers<'a, I>(analyzers: I) -> Self
    where
        I: IntoIterator<Item = &'a Analyzer>,
    {
        let mut catalog = Self::default();
        for analyzer in analyzers {
            for rule in analyzer.normalized_rules() {
                catalog.insert(&analyzer.name_id, rule);
            }
        }
        catalog
    }

    /// Add a rule under `analyzer`; a repeated name replaces the earlier rule.
    pub fn insert(&mut self, analyzer: &str, rule: Rule) {
        let key = (analyzer.to_string(), rule.name_id.clone());
        let counts = self.counts.entry(analyzer.to_string()).or_default();
        if let Some(previous) = self.rules.get(&key) {
            if let Some(count) = counts.get_mut(&previous.severity) {
                *count = count.saturating_sub(1);
            }
        }
        *counts.entry(rule.severity).or_default() += 1;
        self.rules.insert(key, rule);
    }

    pub fn rule(&self, analyzer: &str, rule_name_id: &str) -> Option<&Rule> {
        self.rules
            .get(&(analyzer.to_string(), rule_name_id.to_string()))
    }

    /// Rules registered for `analyzer` at `severity`.
    pub fn rule_count(&self, analyzer: &str, severity: Severity) -> usize {
        self.counts
            .get(analyzer)
            .and_then(|counts| counts.get(&severity))
            .copied()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
