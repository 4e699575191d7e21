//! Plugin invocation, sequential or on a bounded pool.

use rayon::prelude::*;
use tracing::{debug, dispatcher, warn, Span};
use uuid::Uuid;

use crate::config::AnalyzerConfig;
use crate::core::{AnalysisStatus, SpecAnalysis};
use crate::errors::Error;
use crate::plugins::PluginRegistry;

/// One plugin call of an analysis run.
#[derive(Debug, Clone)]
pub struct PluginJob {
    pub analyzer: String,
    pub config: AnalyzerConfig,
    pub service_name_id: String,
}

pub(crate) struct Dispatch<'a> {
    pub plugins: &'a PluginRegistry,
    pub doc: Option<&'a str>,
    pub spec_id: Uuid,
    pub service_id: Uuid,
}

impl Dispatch<'_> {
    /// Run every job; failed or missing plugins are logged and left out.
    /// Output follows job order regardless of `max_parallel`.
    pub fn run(&self, jobs: &[PluginJob], max_parallel: usize) -> Vec<SpecAnalysis> {
        let results = if max_parallel > 1 && jobs.len() > 1 {
            self.run_pooled(jobs, max_parallel)
        } else {
            jobs.iter().map(|job| self.run_one(job)).collect()
        };
        results.into_iter().flatten().collect()
    }

    fn run_pooled(&self, jobs: &[PluginJob], max_parallel: usize) -> Vec<Option<SpecAnalysis>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(max_parallel)
            .thread_name(|i| format!("specscore-plugin-{}", i))
            .build();
        // Workers start outside the caller's span and subscriber.
        let span = Span::current();
        let subscriber = dispatcher::get_default(|d| d.clone());
        match pool {
            Ok(pool) => pool.install(|| {
                jobs.par_iter()
                    .map(|job| {
                        dispatcher::with_default(&subscriber, || {
                            span.in_scope(|| self.run_one(job))
                        })
                    })
                    .collect()
            }),
            Err(e) => {
                warn!(error = %e, "Plugin pool unavailable, dispatching sequentially");
                jobs.iter().map(|job| self.run_one(job)).collect()
            }
        }
    }

    fn run_one(&self, job: &PluginJob) -> Option<SpecAnalysis> {
        let Some(plugin) = self.plugins.get(&job.analyzer) else {
            warn!(analyzer = %job.analyzer, "No plugin registered, skipping analyzer");
            return None;
        };

        debug!(
            analyzer = %job.analyzer,
            service_name_id = %job.service_name_id,
            "Dispatching plugin"
        );
        let result = match plugin.analyze(self.doc, &job.config, Some(&job.service_name_id)) {
            Ok(result) => result,
            Err(e) => {
                let error = Error::plugin(&job.analyzer, format!("{:#}", e));
                warn!(error = %error, "Skipping analyzer");
                return None;
            }
        };

        let mut analysis = SpecAnalysis::new(&job.analyzer, self.spec_id, self.service_id)
            .with_config(job.config.clone());
        if let Err(e) = analysis.set_result(Some(result), Some(AnalysisStatus::Analyzed)) {
            warn!(analyzer = %job.analyzer, error = %e, "Discarding analyzer result");
            return None;
        }
        Some(analysis)
    }
}
