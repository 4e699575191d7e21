//! Persistence seam.
//!
//! The engine reads and writes governed entities only through these traits.
//! Implementations are injected into [`crate::pipeline::AnalysisService`];
//! [`MemoryStore`] backs the CLI and the tests.

mod memory;

use std::collections::BTreeMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::core::{Analyzer, Service, ServiceSummary, Spec, SpecAnalysis};
use crate::errors::Result;

pub use memory::MemoryStore;

pub trait AnalyzerRepository: Send + Sync {
    /// Catalog entries whose status is active.
    fn active_analyzers(&self) -> Result<Vec<Analyzer>>;
}

pub trait SpecAnalysisRepository: Send + Sync {
    fn create(&self, analysis: &SpecAnalysis) -> Result<()>;

    /// Every stored analysis of a spec, oldest first.
    fn list_for_spec(&self, spec_id: Uuid) -> Result<Vec<SpecAnalysis>>;

    fn update_score(&self, analysis_id: Uuid, score: i64) -> Result<()>;

    /// Most recent analysis per analyzer, ordered by analyzer name.
    fn latest_for_spec(&self, spec_id: Uuid) -> Result<Vec<SpecAnalysis>> {
        let mut latest: BTreeMap<String, SpecAnalysis> = BTreeMap::new();
        for analysis in self.list_for_spec(spec_id)? {
            match latest.get(&analysis.analyzer) {
                Some(existing) if existing.created_at > analysis.created_at => {}
                _ => {
                    latest.insert(analysis.analyzer.clone(), analysis);
                }
            }
        }
        Ok(latest.into_values().collect())
    }
}

pub trait SpecRepository: Send + Sync {
    fn get(&self, spec_id: Uuid) -> Result<Spec>;

    fn update_score(&self, spec_id: Uuid, score: i64) -> Result<()>;
}

pub trait ServiceRepository: Send + Sync {
    fn get(&self, service_id: Uuid) -> Result<Service>;

    fn update_summary(&self, service_id: Uuid, summary: ServiceSummary) -> Result<()>;
}

/// Handles to every repository the engine uses.
#[derive(Clone)]
pub struct Repositories {
    pub analyzers: Arc<dyn AnalyzerRepository>,
    pub analyses: Arc<dyn SpecAnalysisRepository>,
    pub specs: Arc<dyn SpecRepository>,
    pub services: Arc<dyn ServiceRepository>,
}

impl Repositories {
    /// All four repositories served by one in-memory store.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            analyzers: store.clone(),
            analyses: store.clone(),
            specs: store.clone(),
            services: store,
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}
