use std::sync::Arc;

use anyhow::Result;

use super::{load_cli_config, output_writer};
use crate::cli::CommonArgs;
use crate::config::{AnalyzerConfigMap, AnalyzersScoreConfigs, SpecscoreConfig};
use crate::pipeline::AnalysisService;
use crate::plugins::PluginRegistry;
use crate::storage::{MemoryStore, Repositories};

pub fn handle_weights(common: &CommonArgs) -> Result<()> {
    let config = load_cli_config(common.config.as_deref())?;
    let configs = resolve_weights(&config)?;
    let warnings = configs.weight_budget_warnings();
    output_writer(common)?.write_weights(&configs, &warnings)
}

/// Weight table of the configured active analyzers and service.
pub fn resolve_weights(config: &SpecscoreConfig) -> Result<AnalyzersScoreConfigs> {
    let store = Arc::new(MemoryStore::with_analyzers(config.analyzers.clone()));
    let engine = AnalysisService::new(Repositories::memory(store), PluginRegistry::new());
    Ok(engine.resolve_score_configs(&config.service("service"), &AnalyzerConfigMap::new())?)
}
