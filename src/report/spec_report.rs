use std::collections::BTreeMap;

use tracing::debug;
use uuid::Uuid;

use super::RuleCatalog;
use crate::aggregation::SummaryStats;
use crate::config::AnalyzersScoreConfigs;
use crate::core::{ServiceSummary, Severity, SpecAnalysis};
use crate::errors::{Error, Result};

/// Score of one analyzer's result against its rule catalog.
#[derive(Debug, Clone, Copy)]
pub struct SpecAnalysisReport<'a> {
    analysis: &'a SpecAnalysis,
}

impl<'a> SpecAnalysisReport<'a> {
    pub fn new(analysis: &'a SpecAnalysis) -> Self {
        Self { analysis }
    }

    /// `round((max - loss) / max * 100)`, floored at 0.
    ///
    /// `loss` weighs the distinct rules triggered per severity and `max`
    /// weighs every catalog rule of the analyzer. An analyzer with no
    /// catalog rules scores 0.
    pub fn score(&self, configs: &AnalyzersScoreConfigs, catalog: &RuleCatalog) -> Result<i64> {
        let analyzer = self.analysis.analyzer.as_str();
        let result = self
            .analysis
            .result
            .as_ref()
            .ok_or_else(|| Error::MissingResult {
                analyzer: analyzer.to_string(),
            })?;
        let config = configs
            .get(analyzer)
            .ok_or_else(|| Error::MissingScoreConfig {
                analyzer: analyzer.to_string(),
            })?;

        let (loss, max) = Severity::ALL
            .into_iter()
            .fold((0.0, 0.0), |(loss, max), severity| {
                let weight = f64::from(config.severity_weight(severity));
                let triggered = result.stats().severity(severity).count as f64;
                let possible = catalog.rule_count(analyzer, severity) as f64;
                (loss + weight * triggered, max + weight * possible)
            });

        if max == 0.0 {
            return Ok(0);
        }
        let score = ((max - loss) / max * 100.0).round() as i64;
        Ok(score.max(0))
    }
}

/// Weighted mean of per-analyzer scores, `round(sum / weights + 0.5)`
/// clamped to 0..=100. Zero total weight scores 0.
pub fn weighted_spec_score<I>(scores: I) -> i64
where
    I: IntoIterator<Item = (i64, f64)>,
{
    let (weighted, total_weight) = scores
        .into_iter()
        .fold((0.0, 0.0), |(sum, weights), (score, weight)| {
            (sum + score as f64 * weight, weights + weight)
        });
    if total_weight == 0.0 {
        return 0;
    }
    ((weighted / total_weight + 0.5).round() as i64).clamp(0, 100)
}

/// Scores for every analysis of one spec.
#[derive(Debug, Clone)]
pub struct SpecReport {
    analyses: Vec<SpecAnalysis>,
    configs: AnalyzersScoreConfigs,
    catalog: RuleCatalog,
    score: Option<i64>,
}

impl SpecReport {
    pub fn from_analyses(
        analyses: Vec<SpecAnalysis>,
        configs: AnalyzersScoreConfigs,
        catalog: RuleCatalog,
    ) -> Self {
        Self {
            analyses,
            configs,
            catalog,
            score: None,
        }
    }

    /// Score every analysis and the spec as a whole.
    ///
    /// Any failing analysis fails the whole call and no score is attached.
    pub fn score(&mut self) -> Result<i64> {
        let scores = self
            .analyses
            .iter()
            .map(|analysis| SpecAnalysisReport::new(analysis).score(&self.configs, &self.catalog))
            .collect::<Result<Vec<_>>>()?;

        let mut weighted = Vec::with_capacity(scores.len());
        for (analysis, score) in self.analyses.iter_mut().zip(scores) {
            analysis.set_score(score);
            let weight = self
                .configs
                .get(&analysis.analyzer)
                .map_or(0.0, |c| c.analyzer_weight);
            debug!(analyzer = %analysis.analyzer, score, weight, "Scored analysis");
            weighted.push((score, weight));
        }

        let spec_score = weighted_spec_score(weighted);
        self.score = Some(spec_score);
        Ok(spec_score)
    }

    /// Replace rule text with the catalog's wording where the catalog has any.
    pub fn with_mitigation(mut self) -> Self {
        let catalog = &self.catalog;
        for analysis in &mut self.analyses {
            let analyzer = analysis.analyzer.as_str();
            if let Some(result) = analysis.result.as_mut() {
                result.rewrite_rule_text(|_, rule_name_id, message, mitigation| {
                    let Some(rule) = catalog.rule(analyzer, rule_name_id) else {
                        return;
                    };
                    if let Some(text) = rule.mitigation.as_deref().filter(|t| !t.is_empty()) {
                        *mitigation = text.to_string();
                    }
                    if !rule.description.is_empty() {
                        *message = rule.description.clone();
                    }
                });
            }
        }
        self
    }

    pub fn spec_score(&self) -> Option<i64> {
        self.score
    }

    pub fn analysis_scores(&self) -> BTreeMap<String, i64> {
        self.analyses
            .iter()
            .map(|a| (a.analyzer.clone(), a.score))
            .collect()
    }

    pub fn analyses(&self) -> &[SpecAnalysis] {
        &self.analyses
    }

    pub fn into_analyses(self) -> Vec<SpecAnalysis> {
        self.analyses
    }

    pub fn configs(&self) -> &AnalyzersScoreConfigs {
        &self.configs
    }

    /// Totals for the owning service.
    pub fn summary(&self, spec_id: Uuid) -> ServiceSummary {
        let findings = self
            .analyses
            .iter()
            .filter_map(|a| a.result.as_ref())
            .fold(SummaryStats::default(), |mut totals, result| {
                totals.absorb(result.stats());
                totals
            });
        ServiceSummary {
            spec_id,
            score: self.score.unwrap_or(0),
            analyzer_scores: self.analysis_scores(),
            findings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::AnalysisResult;
    use crate::config::ScoreConfig;
    use crate::core::{Analyzer, AnalysisStatus, Finding, Rule};

    fn catalog_of(rules: &[(&str, Severity)]) -> RuleCatalog {
        let mut lint = Analyzer::new("lint");
        lint.rules = rules
            .iter()
            .map(|(name, severity)| Rule::new("lint", *name, *severity))
            .collect();
        RuleCatalog::from_analyzers([&lint])
    }

    fn analysis(findings: &[(&str, Severity)]) -> SpecAnalysis {
        let mut result = AnalysisResult::new();
        for (name, severity) in findings {
            let rule = Rule::new("lint", *name, *severity);
            result
                .add_rule_finding(&rule, Finding::range(["paths"], Default::default()))
                .unwrap();
        }
        let mut analysis = SpecAnalysis::new("lint", Uuid::new_v4(), Uuid::new_v4());
        analysis
            .set_result(Some(result), Some(AnalysisStatus::Analyzed))
            .unwrap();
        analysis
    }

    fn configs(weight: f64) -> AnalyzersScoreConfigs {
        [("lint".to_string(), ScoreConfig::new(weight))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_no_catalog_rules_scores_zero() {
        let analysis = analysis(&[]);
        let score = SpecAnalysisReport::new(&analysis)
            .score(&configs(1.0), &RuleCatalog::default())
            .unwrap();
        assert_eq!(score, 0);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let catalog = catalog_of(&[("a", Severity::Error)]);
        let analysis = analysis(&[("a", Severity::Error), ("b", Severity::Error)]);
        let score = SpecAnalysisReport::new(&analysis)
            .score(&configs(1.0), &catalog)
            .unwrap();
        assert_eq!(score, 0);
    }

    #[test]
    fn test_repeat_findings_of_one_rule_count_once() {
        let catalog = catalog_of(&[("a", Severity::Warning), ("b", Severity::Warning)]);
        let analysis = analysis(&[("a", Severity::Warning), ("a", Severity::Warning)]);
        let score = SpecAnalysisReport::new(&analysis)
            .score(&configs(1.0), &catalog)
            .unwrap();
        assert_eq!(score, 50);
    }

    #[test]
    fn test_missing_result() {
        let analysis = SpecAnalysis::new("lint", Uuid::new_v4(), Uuid::new_v4());
        let err = SpecAnalysisReport::new(&analysis)
            .score(&configs(1.0), &RuleCatalog::default())
            .unwrap_err();
        assert!(matches!(err, Error::MissingResult { .. }));
    }

    #[test]
    fn test_weighted_spec_score() {
        assert_eq!(weighted_spec_score([(80, 0.5), (40, 0.5)]), 61);
        assert_eq!(weighted_spec_score([(100, 1.0)]), 100);
        assert_eq!(weighted_spec_score([(70, 0.0)]), 0);
        assert_eq!(weighted_spec_score(std::iter::empty()), 0);
    }

    #[test]
    fn test_spec_report_sets_scores_and_summary() {
        let catalog = catalog_of(&[("a", Severity::Error), ("b", Severity::Error)]);
        let analysis = analysis(&[("a", Severity::Error)]);
        let spec_id = analysis.spec_id;
        let mut report = SpecReport::from_analyses(vec![analysis], configs(1.0), catalog);

        assert_eq!(report.score().unwrap(), 51);
        assert_eq!(report.analysis_scores()["lint"], 50);

        let summary = report.summary(spec_id);
        assert_eq!(summary.score, 51);
        assert_eq!(summary.findings.error.count, 1);
    }

    #[test]
    fn test_failed_scoring_leaves_scores_untouched() {
        let catalog = catalog_of(&[("a", Severity::Error)]);
        let scored = analysis(&[]);
        let mut unscored = analysis(&[]);
        unscored.analyzer = "drift".to_string();

        let mut report =
            SpecReport::from_analyses(vec![scored, unscored], configs(1.0), catalog);
        assert!(matches!(
            report.score(),
            Err(Error::MissingScoreConfig { .. })
        ));
        assert_eq!(report.spec_score(), None);
        assert!(report.analyses().iter().all(|a| a.score == 0));
    }

    #[test]
    fn test_with_mitigation_prefers_catalog_text() {
        let mut lint = Analyzer::new("lint");
        lint.rules = vec![Rule::new("lint", "a", Severity::Error)
            .with_description("Catalog description")
            .with_mitigation("Catalog mitigation")];
        let catalog = RuleCatalog::from_analyzers([&lint]);

        let mut result = AnalysisResult::new();
        let plugin_rule = Rule::new("lint", "a", Severity::Error)
            .with_description("plugin text")
            .with_mitigation("plugin fix");
        result
            .add_rule_finding(&plugin_rule, Finding::range(["info"], Default::default()))
            .unwrap();
        let mut analysis = SpecAnalysis::new("lint", Uuid::new_v4(), Uuid::new_v4());
        analysis
            .set_result(Some(result), Some(AnalysisStatus::Analyzed))
            .unwrap();

        let report = SpecReport::from_analyses(vec![analysis], configs(1.0), catalog)
            .with_mitigation();
        let group = report.analyses()[0]
            .result
            .as_ref()
            .unwrap()
            .rule_findings(Severity::Error, "a")
            .unwrap()
            .clone();
        assert_eq!(group.message, "Catalog description");
        assert_eq!(group.mitigation, "Catalog mitigation");
    }
}
