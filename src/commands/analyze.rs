use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use super::{catalog_with, load_cli_config, output_writer};
use crate::cli::CommonArgs;
use crate::config::SpecscoreConfig;
use crate::core::Spec;
use crate::pipeline::{AnalysisOutcome, AnalysisService, AnalyzeRequest};
use crate::plugins::{PluginRegistry, ReplayAnalyzer};
use crate::storage::{MemoryStore, Repositories};

#[derive(Debug, Clone, Default)]
pub struct AnalyzeArgs {
    pub spec: PathBuf,
    pub findings: Vec<(String, PathBuf)>,
    pub analyzers: Option<Vec<String>>,
    pub service: Option<String>,
}

pub fn handle_analyze(args: AnalyzeArgs, common: &CommonArgs) -> Result<()> {
    let config = load_cli_config(common.config.as_deref())?;
    let outcome = run_analyze(&config, &args)?;
    output_writer(common)?.write_outcome(&outcome)
}

/// Score recorded analyzer output for one spec against `config`.
///
/// Analyzers given findings but missing from the catalog join it as active
/// analyzers without rules.
pub fn run_analyze(config: &SpecscoreConfig, args: &AnalyzeArgs) -> Result<AnalysisOutcome> {
    let doc = fs::read_to_string(&args.spec)
        .with_context(|| format!("Failed to read spec {}", args.spec.display()))?;

    let catalog = catalog_with(config, args.findings.iter().map(|(name, _)| name.as_str()));
    let mut plugins = PluginRegistry::new();
    for (name, path) in &args.findings {
        plugins.register(Box::new(ReplayAnalyzer::new(name, path)));
    }

    let fallback_name = args
        .spec
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("service");
    let mut service = config.service(fallback_name);
    if let Some(name) = &args.service {
        service.name_id = name.clone();
    }
    let spec = Spec::new(service.id, Some(doc));
    let spec_id = spec.id;

    let store = Arc::new(MemoryStore::with_analyzers(catalog));
    store.put_service(service);
    store.put_spec(spec);

    let analysis = AnalysisService::new(Repositories::memory(store), plugins)
        .with_engine(config.engine.clone());
    let request = AnalyzeRequest::new().with_analyzers(args.analyzers.clone().unwrap_or_default());
    Ok(analysis.analyze_and_store(&request, spec_id)?)
}
