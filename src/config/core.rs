use serde::{Deserialize, Serialize};

use super::analyzer_config::AnalyzerConfigMap;
use crate::core::{Analyzer, Service};

/// Root configuration structure for specscore
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SpecscoreConfig {
    /// Engine behavior
    #[serde(default)]
    pub engine: EngineSettings,

    /// Analyzer catalog: status, configuration and rules
    #[serde(default)]
    pub analyzers: Vec<Analyzer>,

    /// Service the CLI analyzes on behalf of
    #[serde(default)]
    pub service: Option<ServiceSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Plugins invoked at once; 1 keeps dispatch sequential
    #[serde(default = "default_max_parallel_plugins")]
    pub max_parallel_plugins: usize,

    /// Turn analyzer-weight budget warnings into a configuration error
    #[serde(default)]
    pub fail_on_weight_budget: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_parallel_plugins: default_max_parallel_plugins(),
            fail_on_weight_budget: false,
        }
    }
}

pub fn default_max_parallel_plugins() -> usize {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceSettings {
    #[serde(default)]
    pub name_id: Option<String>,

    #[serde(default)]
    pub base_name: Option<String>,

    /// Service tier of the analyzer configuration
    #[serde(default)]
    pub analyzers_config: AnalyzerConfigMap,
}

impl SpecscoreConfig {
    /// Build the service entity, `fallback_name` naming it when unset.
    pub fn service(&self, fallback_name: &str) -> Service {
        let settings = self.service.clone().unwrap_or_default();
        let name_id = settings
            .name_id
            .unwrap_or_else(|| fallback_name.to_string());
        let mut service = Service::new(name_id);
        service.base_name = settings.base_name;
        service.analyzers_config = settings.analyzers_config;
        service
    }

    pub fn active_analyzers(&self) -> impl Iterator<Item = &Analyzer> {
        self.analyzers.iter().filter(|a| a.is_active())
    }
}
