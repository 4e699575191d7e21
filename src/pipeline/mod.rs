//! Analysis orchestration: pick the working analyzer set, merge configuration
//! tiers, dispatch plugins, then score and persist the results.

mod background;
mod dispatch;
mod request;
mod service;

pub use background::spawn_background_analysis;
pub use dispatch::PluginJob;
pub use request::{AnalysisOutcome, AnalyzeRequest};
pub use service::AnalysisService;
