use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{error, info};
use uuid::Uuid;

use super::{AnalyzeRequest, AnalysisService};

/// Analyze and store `spec_id` on a detached thread.
///
/// Fire-and-forget: the outcome is only logged, nothing is retried, and the
/// handle may be dropped. A spec without analyses afterwards is a normal
/// state for callers.
pub fn spawn_background_analysis(
    service: Arc<AnalysisService>,
    request: AnalyzeRequest,
    spec_id: Uuid,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("specscore-analysis-{}", spec_id))
        .spawn(move || match service.analyze_and_store(&request, spec_id) {
            Ok(outcome) => info!(
                spec_id = %spec_id,
                spec_score = outcome.spec_score,
                analyzed = outcome.analyses.len(),
                "Background analysis stored"
            ),
            Err(e) => error!(spec_id = %spec_id, error = %e, "Background analysis failed"),
        })
}
