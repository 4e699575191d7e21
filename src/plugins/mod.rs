//! Plugin capability consumed by the orchestrator.
//!
//! Every analyzer (lint, inclusive language, security, drift, ...) is reached
//! through [`SpecDocAnalyzer`] and selected by its analyzer name. Plugins
//! translate their native output into an [`AnalysisResult`] through a
//! [`ResultAdapter`].

pub mod adapters;
pub mod replay;

use std::collections::BTreeMap;

use crate::aggregation::AnalysisResult;
use crate::config::AnalyzerConfig;
use crate::errors::Result;

pub use adapters::{
    DriftEvent, DriftReport, LintReport, LintViolation, TextScanHit, TextScanReport,
};
pub use replay::ReplayAnalyzer;

pub trait SpecDocAnalyzer: Send + Sync {
    /// Analyzer name this plugin answers for.
    fn name(&self) -> &str;

    fn analyze(
        &self,
        doc: Option<&str>,
        config: &AnalyzerConfig,
        service_name_id: Option<&str>,
    ) -> anyhow::Result<AnalysisResult>;
}

/// Native plugin output that can be expressed as a canonical result.
pub trait ResultAdapter {
    fn to_result(&self) -> Result<AnalysisResult>;
}

/// Analyzer name -> plugin.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, Box<dyn SpecDocAnalyzer>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin under its own name, replacing any previous one.
    pub fn register(&mut self, plugin: Box<dyn SpecDocAnalyzer>) {
        self.plugins.insert(plugin.name().to_string(), plugin);
    }

    pub fn with(mut self, plugin: impl SpecDocAnalyzer + 'static) -> Self {
        self.register(Box::new(plugin));
        self
    }

    pub fn get(&self, analyzer: &str) -> Option<&dyn SpecDocAnalyzer> {
        self.plugins.get(analyzer).map(|p| p.as_ref())
    }

    pub fn contains(&self, analyzer: &str) -> bool {
        self.plugins.contains_key(analyzer)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.plugins.keys().collect::<Vec<_>>())
            .finish()
    }
}
