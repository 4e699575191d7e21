use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{AnalyzerRepository, ServiceRepository, SpecAnalysisRepository, SpecRepository};
use crate::core::{Analyzer, Service, ServiceSummary, Spec, SpecAnalysis};
use crate::errors::{Error, Result};

/// Process-local store implementing every repository trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    analyzers: RwLock<Vec<Analyzer>>,
    specs: RwLock<HashMap<Uuid, Spec>>,
    services: RwLock<HashMap<Uuid, Service>>,
    analyses: RwLock<Vec<SpecAnalysis>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_analyzers(analyzers: Vec<Analyzer>) -> Self {
        Self {
            analyzers: RwLock::new(analyzers),
            ..Self::default()
        }
    }

    /// Insert or replace a catalog entry by name.
    pub fn put_analyzer(&self, analyzer: Analyzer) {
        let mut analyzers = self.analyzers.write();
        match analyzers.iter_mut().find(|a| a.name_id == analyzer.name_id) {
            Some(existing) => *existing = analyzer,
            None => analyzers.push(analyzer),
        }
    }

    pub fn put_spec(&self, spec: Spec) {
        self.specs.write().insert(spec.id, spec);
    }

    pub fn put_service(&self, service: Service) {
        self.services.write().insert(service.id, service);
    }

    pub fn analysis_count(&self) -> usize {
        self.analyses.read().len()
    }
}

impl AnalyzerRepository for MemoryStore {
    fn active_analyzers(&self) -> Result<Vec<Analyzer>> {
        Ok(self
            .analyzers
            .read()
            .iter()
            .filter(|a| a.is_active())
            .cloned()
            .collect())
    }
}

impl SpecAnalysisRepository for MemoryStore {
    fn create(&self, analysis: &SpecAnalysis) -> Result<()> {
        let mut analyses = self.analyses.write();
        if analyses.iter().any(|a| a.id == analysis.id) {
            return Err(Error::Storage(format!(
                "spec analysis {} already exists",
                analysis.id
            )));
        }
        analyses.push(analysis.clone());
        Ok(())
    }

    fn list_for_spec(&self, spec_id: Uuid) -> Result<Vec<SpecAnalysis>> {
        Ok(self
            .analyses
            .read()
            .iter()
            .filter(|a| a.spec_id == spec_id)
            .cloned()
            .collect())
    }

    fn update_score(&self, analysis_id: Uuid, score: i64) -> Result<()> {
        let mut analyses = self.analyses.write();
        let analysis = analyses
            .iter_mut()
            .find(|a| a.id == analysis_id)
            .ok_or_else(|| Error::NotFound(format!("spec analysis {}", analysis_id)))?;
        analysis.set_score(score);
        Ok(())
    }
}

impl SpecRepository for MemoryStore {
    fn get(&self, spec_id: Uuid) -> Result<Spec> {
        self.specs
            .read()
            .get(&spec_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("spec {}", spec_id)))
    }

    fn update_score(&self, spec_id: Uuid, score: i64) -> Result<()> {
        let mut specs = self.specs.write();
        let spec = specs
            .get_mut(&spec_id)
            .ok_or_else(|| Error::NotFound(format!("spec {}", spec_id)))?;
        spec.score = Some(score);
        spec.updated_at = Utc::now();
        Ok(())
    }
}

impl ServiceRepository for MemoryStore {
    fn get(&self, service_id: Uuid) -> Result<Service> {
        self.services
            .read()
            .get(&service_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("service {}", service_id)))
    }

    fn update_summary(&self, service_id: Uuid, summary: ServiceSummary) -> Result<()> {
        let mut services = self.services.write();
        let service = services
            .get_mut(&service_id)
            .ok_or_else(|| Error::NotFound(format!("service {}", service_id)))?;
        service.summary = Some(summary);
        Ok(())
    }
}
