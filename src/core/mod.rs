pub mod entities;
pub mod finding;
pub mod rule;
pub mod severity;

pub use entities::{
    AnalysisStatus, Analyzer, AnalyzerStatus, DiffStatus, Service, ServiceSummary, Spec,
    SpecAnalysis, SpecDiff,
};
pub use finding::{Finding, FindingType, Position, Range};
pub use rule::Rule;
pub use severity::{default_severity_weights, Severity, SeverityWeights};
