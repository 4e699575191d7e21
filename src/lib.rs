// Export modules for library usage
pub mod aggregation;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod observability;
pub mod pipeline;
pub mod plugins;
pub mod report;
pub mod storage;

// Re-export commonly used types
pub use crate::aggregation::{
    AnalysisResult, Findings, RuleFindings, SeverityFindings, SeverityStats, Summary,
    SummaryStats, UnregisteredRulePolicy,
};

pub use crate::core::{
    default_severity_weights, AnalysisStatus, Analyzer, AnalyzerStatus, Finding, FindingType,
    Position, Range, Rule, Service, ServiceSummary, Severity, SeverityWeights, Spec,
    SpecAnalysis, SpecDiff,
};

pub use crate::config::{AnalyzerConfig, AnalyzerConfigMap, AnalyzersScoreConfigs, ScoreConfig};

pub use crate::errors::{Error, Result};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};

pub use crate::pipeline::{spawn_background_analysis, AnalysisOutcome, AnalysisService, AnalyzeRequest};

pub use crate::plugins::{PluginRegistry, ResultAdapter, SpecDocAnalyzer};

pub use crate::report::{RuleCatalog, SpecAnalysisReport, SpecReport};

pub use crate::storage::{MemoryStore, Repositories};
