//! Canonical per-invocation result of one analyzer against one spec.
//!
//! Plugins emit findings in their own shapes; adapters translate them into an
//! [`AnalysisResult`] by registering rule metadata and then adding findings.
//! The summary is maintained incrementally on every addition and is never
//! recomputed from the findings.
//!
//! Rule metadata is bound per `(severity, rule)` pair on first registration.
//! Later registrations of the same pair are ignored, so findings of one rule
//! stay grouped under a single message even when a plugin words it slightly
//! differently between occurrences.

mod summary;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::core::{Finding, Rule, Severity};
use crate::errors::{Error, Result};

pub use summary::{SeverityStats, Summary, SummaryStats};

/// Findings of one rule, seeded with the rule's text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleFindings {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub mitigation: String,
    #[serde(default)]
    pub data: Vec<Finding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeverityFindings {
    #[serde(default)]
    pub rules: BTreeMap<String, RuleFindings>,
}

/// severity -> rule -> findings
pub type Findings = BTreeMap<Severity, SeverityFindings>;

/// What `add_finding` does with a finding whose rule was never registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnregisteredRulePolicy {
    /// Return [`Error::UnregisteredRule`] and leave the result untouched.
    #[default]
    Reject,
    /// Count the finding in the summary but drop it from the findings.
    CountOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    summary: Summary,
    #[serde(default = "empty_findings", deserialize_with = "deserialize_findings")]
    findings: Findings,
    #[serde(skip)]
    rule_cache: HashMap<(Severity, String), Rule>,
    #[serde(skip)]
    policy: UnregisteredRulePolicy,
}

fn empty_findings() -> Findings {
    Severity::ALL
        .into_iter()
        .map(|s| (s, SeverityFindings::default()))
        .collect()
}

fn deserialize_findings<'de, D>(deserializer: D) -> std::result::Result<Findings, D::Error>
where
    D: Deserializer<'de>,
{
    let mut findings = Option::<Findings>::deserialize(deserializer)?.unwrap_or_default();
    for severity in Severity::ALL {
        findings.entry(severity).or_default();
    }
    Ok(findings)
}

impl AnalysisResult {
    /// Empty result with all four severity buckets present.
    pub fn new() -> Self {
        Self {
            summary: Summary::default(),
            findings: empty_findings(),
            rule_cache: HashMap::new(),
            policy: UnregisteredRulePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnregisteredRulePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> UnregisteredRulePolicy {
        self.policy
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn stats(&self) -> &SummaryStats {
        &self.summary.stats
    }

    pub fn findings(&self) -> &Findings {
        &self.findings
    }

    pub fn severity_findings(&self, severity: Severity) -> Option<&SeverityFindings> {
        self.findings.get(&severity)
    }

    pub fn rule_findings(&self, severity: Severity, rule_name_id: &str) -> Option<&RuleFindings> {
        self.findings.get(&severity)?.rules.get(rule_name_id)
    }

    pub fn is_empty(&self) -> bool {
        self.summary.stats.occurrences == 0
    }

    /// Bind rule metadata to `(severity, rule.name_id)`. The first
    /// registration wins; returns whether this call bound it.
    pub fn register_rule(&mut self, severity: Severity, rule: &Rule) -> bool {
        let key = (severity, rule.name_id.clone());
        if self.rule_cache.contains_key(&key) {
            return false;
        }
        self.rule_cache.insert(key, rule.clone());
        true
    }

    pub fn cached_rule(&self, severity: Severity, rule_name_id: &str) -> Option<&Rule> {
        self.rule_cache.get(&(severity, rule_name_id.to_string()))
    }

    /// Add one finding for an already registered rule.
    pub fn add_finding(
        &mut self,
        severity: Severity,
        rule_name_id: &str,
        finding: Finding,
    ) -> Result<()> {
        match self.cached_rule(severity, rule_name_id).cloned() {
            Some(rule) => {
                self.findings
                    .entry(severity)
                    .or_default()
                    .rules
                    .entry(rule_name_id.to_string())
                    .or_insert_with(|| RuleFindings {
                        message: rule.message().to_string(),
                        mitigation: rule.mitigation_text().to_string(),
                        data: Vec::new(),
                    })
                    .data
                    .push(finding);
            }
            None => match self.policy {
                UnregisteredRulePolicy::Reject => {
                    return Err(Error::UnregisteredRule {
                        severity,
                        rule: rule_name_id.to_string(),
                    });
                }
                UnregisteredRulePolicy::CountOnly => {
                    warn!(
                        severity = %severity,
                        rule = rule_name_id,
                        "Finding for unregistered rule counted but not kept"
                    );
                }
            },
        }
        self.summary.stats.record(severity, rule_name_id);
        Ok(())
    }

    /// Register `rule` under its own severity, then add the finding.
    pub fn add_rule_finding(&mut self, rule: &Rule, finding: Finding) -> Result<()> {
        self.register_rule(rule.severity, rule);
        self.add_finding(rule.severity, &rule.name_id, finding)
    }

    /// Rewrite the message/mitigation of every rule group in place.
    pub fn rewrite_rule_text<F>(&mut self, mut rewrite: F)
    where
        F: FnMut(Severity, &str, &mut String, &mut String),
    {
        for (severity, bucket) in self.findings.iter_mut() {
            for (rule_name_id, group) in bucket.rules.iter_mut() {
                rewrite(
                    *severity,
                    rule_name_id,
                    &mut group.message,
                    &mut group.mitigation,
                );
            }
        }
    }
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Equality ignores the rule cache and policy, which are not persisted.
impl PartialEq for AnalysisResult {
    fn eq(&self, other: &Self) -> bool {
        self.summary == other.summary && self.findings == other.findings
    }
}
