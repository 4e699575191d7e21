use std::io::Write;

use crate::config::AnalyzersScoreConfigs;
use crate::core::{Severity, SpecAnalysis};
use crate::pipeline::AnalysisOutcome;

pub use super::writers::{MarkdownWriter, TerminalWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

pub trait OutputWriter {
    fn write_outcome(&mut self, outcome: &AnalysisOutcome) -> anyhow::Result<()>;

    fn write_weights(
        &mut self,
        configs: &AnalyzersScoreConfigs,
        warnings: &[String],
    ) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_outcome(&mut self, outcome: &AnalysisOutcome) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(outcome)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    fn write_weights(
        &mut self,
        configs: &AnalyzersScoreConfigs,
        warnings: &[String],
    ) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "analyzers": configs,
            "warnings": warnings,
        }))?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }
}

pub fn create_writer(format: OutputFormat, writer: Box<dyn Write>) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

/// One line per triggered rule: (severity, rule, occurrences, message, mitigation).
pub(crate) fn rule_rows(analysis: &SpecAnalysis) -> Vec<(Severity, &str, usize, &str, &str)> {
    let Some(result) = analysis.result.as_ref() else {
        return Vec::new();
    };
    Severity::ALL
        .into_iter()
        .rev()
        .filter_map(|severity| result.severity_findings(severity).map(|b| (severity, b)))
        .flat_map(|(severity, bucket)| {
            bucket.rules.iter().map(move |(name, group)| {
                (
                    severity,
                    name.as_str(),
                    group.data.len(),
                    group.message.as_str(),
                    group.mitigation.as_str(),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::AnalysisResult;
    use crate::core::{AnalysisStatus, Finding, Rule, ServiceSummary};
    use uuid::Uuid;

    fn sample_outcome() -> AnalysisOutcome {
        let mut result = AnalysisResult::new();
        let rule = Rule::new("lint", "operation-tags", Severity::Warning)
            .with_description("Operations must have tags")
            .with_mitigation("Add a tag");
        result
            .add_rule_finding(&rule, Finding::range(["paths", "/pets"], Default::default()))
            .unwrap();
        let error = Rule::new("lint", "no-eval", Severity::Error).with_description("No eval");
        result
            .add_rule_finding(&error, Finding::range(["info"], Default::default()))
            .unwrap();

        let mut analysis = SpecAnalysis::new("lint", Uuid::new_v4(), Uuid::new_v4());
        analysis
            .set_result(Some(result), Some(AnalysisStatus::Analyzed))
            .unwrap();
        analysis.set_score(64);
        AnalysisOutcome {
            spec_score: 65,
            summary: ServiceSummary::default(),
            analyses: vec![analysis],
            weight_warnings: vec!["Analyzer weights sum to 0.500 instead of 1.0".to_string()],
        }
    }

    #[test]
    fn test_rule_rows_most_severe_first() {
        let outcome = sample_outcome();
        let rows = rule_rows(&outcome.analyses[0]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, Severity::Error);
        assert_eq!(
            rows[1],
            (
                Severity::Warning,
                "operation-tags",
                1,
                "Operations must have tags",
                "Add a tag"
            )
        );
    }

    #[test]
    fn test_json_writer_round_trips_outcome() {
        let outcome = sample_outcome();
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer).write_outcome(&outcome).unwrap();

        let parsed: AnalysisOutcome = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed, outcome);
    }
}
