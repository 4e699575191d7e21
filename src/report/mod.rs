//! Scoring reporter.
//!
//! Reports are request-scoped: they are built from persisted
//! [`SpecAnalysis`](crate::core::SpecAnalysis) rows, a resolved weight table
//! and the rule catalog, and can be rebuilt at any time without re-running
//! plugins.

mod catalog;
mod spec_report;

pub use catalog::RuleCatalog;
pub use spec_report::{weighted_spec_score, SpecAnalysisReport, SpecReport};
