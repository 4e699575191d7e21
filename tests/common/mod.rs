// Shared fixtures for specscore integration tests
#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use specscore::config::AnalyzerConfig;
use specscore::core::{Analyzer, Finding, Range, Rule, Service, Severity, Spec};
use specscore::plugins::{PluginRegistry, SpecDocAnalyzer};
use specscore::storage::{MemoryStore, Repositories};
use specscore::{AnalysisResult, AnalysisService};

/// Turn a `json!({...})` literal into an analyzer config.
pub fn config(value: Value) -> AnalyzerConfig {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

pub fn rule(analyzer: &str, name: &str, severity: Severity) -> Rule {
    Rule::new(analyzer, name, severity).with_description(format!("{} description", name))
}

/// Active analyzer with `rules` and an optional config.
pub fn analyzer(name: &str, rules: &[(&str, Severity)], cfg: Option<Value>) -> Analyzer {
    let mut analyzer = Analyzer::new(name);
    analyzer.rules = rules
        .iter()
        .map(|(rule_name, severity)| rule(name, rule_name, *severity))
        .collect();
    if let Some(cfg) = cfg {
        analyzer.config = config(cfg);
    }
    analyzer
}

pub fn finding(line: u32) -> Finding {
    Finding::range(["paths", "/pets"], Range::new(line, 0, line, 8))
}

/// Result with one finding per `(rule, severity)` entry.
pub fn result_with(analyzer: &str, findings: &[(&str, Severity)]) -> AnalysisResult {
    let mut result = AnalysisResult::new();
    for (line, (name, severity)) in findings.iter().enumerate() {
        result
            .add_rule_finding(&rule(analyzer, name, *severity), finding(line as u32))
            .expect("registered rule");
    }
    result
}

/// What a plugin was called with.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginCall {
    pub doc: Option<String>,
    pub config: AnalyzerConfig,
    pub service_name_id: Option<String>,
}

/// Plugin returning a fixed result (or failing) and recording its calls.
pub struct StaticAnalyzer {
    name: String,
    findings: Vec<(String, Severity)>,
    fail: bool,
    pub calls: Arc<Mutex<Vec<PluginCall>>>,
}

impl StaticAnalyzer {
    pub fn new(name: &str, findings: &[(&str, Severity)]) -> Self {
        Self {
            name: name.to_string(),
            findings: findings
                .iter()
                .map(|(rule, severity)| (rule.to_string(), *severity))
                .collect(),
            fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(name, &[])
        }
    }
}

impl SpecDocAnalyzer for StaticAnalyzer {
    fn name(&self) -> &str {
        &self.name
    }

    fn analyze(
        &self,
        doc: Option<&str>,
        config: &AnalyzerConfig,
        service_name_id: Option<&str>,
    ) -> anyhow::Result<AnalysisResult> {
        self.calls.lock().push(PluginCall {
            doc: doc.map(str::to_string),
            config: config.clone(),
            service_name_id: service_name_id.map(str::to_string),
        });
        anyhow::ensure!(!self.fail, "{} backend unavailable", self.name);

        let findings: Vec<(&str, Severity)> = self
            .findings
            .iter()
            .map(|(rule, severity)| (rule.as_str(), *severity))
            .collect();
        Ok(result_with(&self.name, &findings))
    }
}

/// Store seeded with a catalog, a service and one spec of that service.
pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub service: Service,
    pub spec: Spec,
}

impl Fixture {
    pub fn new(catalog: Vec<Analyzer>) -> Self {
        Self::with_service(catalog, Service::new("petstore"))
    }

    pub fn with_service(catalog: Vec<Analyzer>, service: Service) -> Self {
        let store = Arc::new(MemoryStore::with_analyzers(catalog));
        let spec = Spec::new(service.id, Some("openapi: 3.0.0".to_string()));
        store.put_service(service.clone());
        store.put_spec(spec.clone());
        Self {
            store,
            service,
            spec,
        }
    }

    pub fn engine(&self, plugins: PluginRegistry) -> AnalysisService {
        AnalysisService::new(Repositories::memory(self.store.clone()), plugins)
    }
}
