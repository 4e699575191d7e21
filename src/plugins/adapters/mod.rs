//! Adapters from native plugin output to [`crate::aggregation::AnalysisResult`].

mod drift;
mod lint;
mod text_scan;

pub use drift::{DriftEvent, DriftReport};
pub use lint::{LintReport, LintViolation};
pub use text_scan::{TextScanHit, TextScanReport};
