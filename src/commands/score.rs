use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{catalog_with, load_cli_config, output_writer};
use crate::cli::CommonArgs;
use crate::config::SpecscoreConfig;
use crate::core::{Spec, SpecAnalysis};
use crate::pipeline::{AnalysisOutcome, AnalysisService};
use crate::plugins::PluginRegistry;
use crate::storage::{MemoryStore, Repositories, SpecAnalysisRepository};

/// A bare list of analyses, or the JSON output of `analyze`.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredAnalyses {
    List(Vec<SpecAnalysis>),
    Outcome { analyses: Vec<SpecAnalysis> },
}

impl StoredAnalyses {
    fn into_analyses(self) -> Vec<SpecAnalysis> {
        match self {
            StoredAnalyses::List(analyses) | StoredAnalyses::Outcome { analyses } => analyses,
        }
    }
}

pub fn handle_score(path: &Path, common: &CommonArgs) -> Result<()> {
    let config = load_cli_config(common.config.as_deref())?;
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read analyses {}", path.display()))?;
    let stored: StoredAnalyses = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid spec analyses in {}", path.display()))?;

    let outcome = run_score(&config, stored.into_analyses())?;
    output_writer(common)?.write_outcome(&outcome)
}

/// Rescore stored analyses of a single spec.
///
/// Analyzers missing from the catalog are scored as `analyze` scored them:
/// active, without rules.
pub fn run_score(config: &SpecscoreConfig, analyses: Vec<SpecAnalysis>) -> Result<AnalysisOutcome> {
    let spec_ids: BTreeSet<_> = analyses.iter().map(|a| a.spec_id).collect();
    let (Some(&spec_id), 1) = (spec_ids.iter().next(), spec_ids.len()) else {
        anyhow::bail!(
            "Expected analyses of exactly one spec, found {}",
            spec_ids.len()
        );
    };

    let mut service = config.service("service");
    service.id = analyses[0].service_id;
    let mut spec = Spec::new(service.id, None);
    spec.id = spec_id;

    let catalog = catalog_with(config, analyses.iter().map(|a| a.analyzer.as_str()));
    let store = Arc::new(MemoryStore::with_analyzers(catalog));
    store.put_service(service);
    store.put_spec(spec);
    for analysis in &analyses {
        store.create(analysis)?;
    }

    let engine = AnalysisService::new(Repositories::memory(store), PluginRegistry::new())
        .with_engine(config.engine.clone());
    engine
        .rescore(spec_id, None)?
        .context("No analyses to score")
}
