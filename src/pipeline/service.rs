use std::collections::BTreeSet;

use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use super::dispatch::{Dispatch, PluginJob};
use super::request::{AnalysisOutcome, AnalyzeRequest};
use crate::config::{
    merge_config_maps, resolve_service_name_id, AnalyzerConfigMap, AnalyzersScoreConfigs,
    EngineSettings,
};
use crate::core::{Analyzer, Service, Spec, SpecAnalysis};
use crate::errors::{Error, Result, ResultExt};
use crate::plugins::PluginRegistry;
use crate::report::{RuleCatalog, SpecReport};
use crate::storage::Repositories;

/// Runs analyzers for specs and keeps their scores current.
#[derive(Debug)]
pub struct AnalysisService {
    repos: Repositories,
    plugins: PluginRegistry,
    engine: EngineSettings,
}

impl AnalysisService {
    pub fn new(repos: Repositories, plugins: PluginRegistry) -> Self {
        Self {
            repos,
            plugins,
            engine: EngineSettings::default(),
        }
    }

    pub fn with_engine(mut self, engine: EngineSettings) -> Self {
        self.engine = engine;
        self
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    /// Weight table for `service`, with `request` as the top config tier.
    pub fn resolve_score_configs(
        &self,
        service: &Service,
        request: &AnalyzerConfigMap,
    ) -> Result<AnalyzersScoreConfigs> {
        let active = self.repos.analyzers.active_analyzers()?;
        let merged = merged_configs(&active, service, request);
        Ok(score_configs(&active, &merged))
    }

    /// Run the requested analyzers against `spec` and score the results.
    ///
    /// Nothing is persisted. A failing plugin only drops its analyzer from
    /// the outcome; a scoring failure fails the call.
    pub fn analyze(
        &self,
        request: &AnalyzeRequest,
        spec: &Spec,
        service: &Service,
    ) -> Result<AnalysisOutcome> {
        let span = info_span!(
            "spec_analysis",
            spec_id = %spec.id,
            service_id = %service.id,
        );
        let _guard = span.enter();

        let active = self.repos.analyzers.active_analyzers()?;
        let merged = merged_configs(&active, service, &request.config);

        let jobs: Vec<PluginJob> = active
            .iter()
            .filter(|analyzer| request.selects(&analyzer.name_id))
            .map(|analyzer| {
                let config = merged
                    .get(&analyzer.name_id)
                    .cloned()
                    .unwrap_or_default();
                let service_name_id = resolve_service_name_id(&config, service);
                PluginJob {
                    analyzer: analyzer.name_id.clone(),
                    config,
                    service_name_id,
                }
            })
            .collect();
        log_unknown_requested(request, &active);
        info!(analyzers = jobs.len(), "Starting analysis");

        let dispatch = Dispatch {
            plugins: &self.plugins,
            doc: spec.doc.as_deref(),
            spec_id: spec.id,
            service_id: service.id,
        };
        let analyses = dispatch.run(&jobs, self.engine.max_parallel_plugins);

        let catalog = match &request.rules_catalog {
            Some(catalog) => RuleCatalog::from_analyzers(catalog),
            None => RuleCatalog::from_analyzers(&active),
        };
        let outcome = self.score(spec.id, analyses, score_configs(&active, &merged), catalog)?;
        info!(
            analyzed = outcome.analyses.len(),
            spec_score = outcome.spec_score,
            "Analysis complete"
        );
        Ok(outcome)
    }

    /// Analyze a stored spec and persist the outcome.
    ///
    /// Writes analysis rows, then the spec score, then the service summary.
    /// The writes are not atomic; a failure stops the sequence and earlier
    /// writes stay in place.
    pub fn analyze_and_store(
        &self,
        request: &AnalyzeRequest,
        spec_id: Uuid,
    ) -> Result<AnalysisOutcome> {
        let spec = self.repos.specs.get(spec_id)?;
        let service = self.repos.services.get(spec.service_id)?;
        let outcome = self.analyze(request, &spec, &service)?;

        for analysis in &outcome.analyses {
            self.repos
                .analyses
                .create(analysis)
                .context(format!("Storing {} analysis", analysis.analyzer))?;
        }
        self.persist_scores(&spec, &outcome, false)?;
        Ok(outcome)
    }

    /// Recompute scores from stored analyses without invoking any plugin.
    ///
    /// Returns `None` when the spec has not been analyzed yet.
    pub fn rescore(
        &self,
        spec_id: Uuid,
        request_catalog: Option<Vec<Analyzer>>,
    ) -> Result<Option<AnalysisOutcome>> {
        let spec = self.repos.specs.get(spec_id)?;
        let service = self.repos.services.get(spec.service_id)?;
        let analyses = self.repos.analyses.latest_for_spec(spec_id)?;
        if analyses.is_empty() {
            debug!(spec_id = %spec_id, "No stored analyses to rescore");
            return Ok(None);
        }

        let active = self.repos.analyzers.active_analyzers()?;
        let merged = merged_configs(&active, &service, &AnalyzerConfigMap::new());
        let catalog = match &request_catalog {
            Some(catalog) => RuleCatalog::from_analyzers(catalog),
            None => RuleCatalog::from_analyzers(&active),
        };
        let outcome = self.score(spec.id, analyses, score_configs(&active, &merged), catalog)?;

        self.persist_scores(&spec, &outcome, true)?;
        Ok(Some(outcome))
    }

    fn score(
        &self,
        spec_id: Uuid,
        analyses: Vec<SpecAnalysis>,
        configs: AnalyzersScoreConfigs,
        catalog: RuleCatalog,
    ) -> Result<AnalysisOutcome> {
        let weight_warnings = configs.weight_budget_warnings();
        for warning in &weight_warnings {
            warn!("{}", warning);
        }
        if self.engine.fail_on_weight_budget && !weight_warnings.is_empty() {
            return Err(Error::Configuration(weight_warnings.join("; ")));
        }

        let mut report = SpecReport::from_analyses(analyses, configs, catalog).with_mitigation();
        let spec_score = report.score()?;
        let summary = report.summary(spec_id);
        Ok(AnalysisOutcome {
            analyses: report.into_analyses(),
            spec_score,
            summary,
            weight_warnings,
        })
    }

    fn persist_scores(
        &self,
        spec: &Spec,
        outcome: &AnalysisOutcome,
        update_rows: bool,
    ) -> Result<()> {
        if update_rows {
            for analysis in &outcome.analyses {
                self.repos.analyses.update_score(analysis.id, analysis.score)?;
            }
        }
        self.repos.specs.update_score(spec.id, outcome.spec_score)?;
        self.repos
            .services
            .update_summary(spec.service_id, outcome.summary.clone())
    }
}

/// Catalog < service < request, for every analyzer named in any tier.
fn merged_configs(
    active: &[Analyzer],
    service: &Service,
    request: &AnalyzerConfigMap,
) -> AnalyzerConfigMap {
    let catalog: AnalyzerConfigMap = active
        .iter()
        .map(|a| (a.name_id.clone(), a.config.clone()))
        .collect();
    merge_config_maps([&catalog, &service.analyzers_config, request])
}

/// Weights are resolved across all active analyzers, not only those run.
fn score_configs(active: &[Analyzer], merged: &AnalyzerConfigMap) -> AnalyzersScoreConfigs {
    AnalyzersScoreConfigs::from_configs(
        active
            .iter()
            .filter_map(|a| merged.get_key_value(&a.name_id))
            .map(|(name, config)| (name.as_str(), config)),
    )
}

fn log_unknown_requested(request: &AnalyzeRequest, active: &[Analyzer]) {
    let known: BTreeSet<&str> = active.iter().map(|a| a.name_id.as_str()).collect();
    for name in request
        .analyzers
        .iter()
        .filter(|name| !known.contains(name.as_str()))
    {
        debug!(analyzer = %name, "Requested analyzer is not active, ignoring");
    }
}
