use std::io::Write;

use crate::config::AnalyzersScoreConfigs;
use crate::core::Severity;
use crate::io::output::{rule_rows, OutputWriter};
use crate::pipeline::AnalysisOutcome;

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_outcome(&mut self, outcome: &AnalysisOutcome) -> anyhow::Result<()> {
        let writers: Vec<fn(&mut Self, &AnalysisOutcome) -> anyhow::Result<()>> = vec![
            |w, o| w.write_header(o),
            |w, o| w.write_analyzer_table(o),
            |w, o| w.write_findings(o),
            |w, o| w.write_warnings(&o.weight_warnings),
        ];

        writers.iter().try_for_each(|writer| writer(self, outcome))
    }

    fn write_weights(
        &mut self,
        configs: &AnalyzersScoreConfigs,
        warnings: &[String],
    ) -> anyhow::Result<()> {
        writeln!(self.writer, "# Analyzer Weights")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Analyzer | Weight | Error | Warning | Info | Hint |"
        )?;
        writeln!(self.writer, "|----------|--------|-------|---------|------|------|")?;
        for (name, config) in configs.iter() {
            writeln!(
                self.writer,
                "| {} | {:.3} | {} | {} | {} | {} |",
                name,
                config.analyzer_weight,
                config.severity_weight(Severity::Error),
                config.severity_weight(Severity::Warning),
                config.severity_weight(Severity::Info),
                config.severity_weight(Severity::Hint),
            )?;
        }
        writeln!(self.writer)?;
        self.write_warnings(warnings)
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, outcome: &AnalysisOutcome) -> anyhow::Result<()> {
        writeln!(self.writer, "# Spec Score Report")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "**Spec score:** {}/100", outcome.spec_score)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_analyzer_table(&mut self, outcome: &AnalysisOutcome) -> anyhow::Result<()> {
        writeln!(self.writer, "## Analyzers")?;
        writeln!(self.writer)?;
        if outcome.analyses.is_empty() {
            writeln!(self.writer, "_No analyzer produced a result._")?;
            writeln!(self.writer)?;
            return Ok(());
        }

        writeln!(
            self.writer,
            "| Analyzer | Score | Errors | Warnings | Info | Hints |"
        )?;
        writeln!(self.writer, "|----------|-------|--------|----------|------|-------|")?;
        for analysis in &outcome.analyses {
            let occurrences = |severity: Severity| {
                analysis
                    .result
                    .as_ref()
                    .map_or(0, |r| r.stats().severity(severity).occurrences)
            };
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} | {} |",
                analysis.analyzer,
                analysis.score,
                occurrences(Severity::Error),
                occurrences(Severity::Warning),
                occurrences(Severity::Info),
                occurrences(Severity::Hint),
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_findings(&mut self, outcome: &AnalysisOutcome) -> anyhow::Result<()> {
        for analysis in &outcome.analyses {
            let rows = rule_rows(analysis);
            if rows.is_empty() {
                continue;
            }
            writeln!(self.writer, "## {} findings", analysis.analyzer)?;
            writeln!(self.writer)?;
            for (severity, rule, occurrences, message, mitigation) in rows {
                writeln!(
                    self.writer,
                    "- **{}** `{}` ({} occurrence{}): {}",
                    severity,
                    rule,
                    occurrences,
                    if occurrences == 1 { "" } else { "s" },
                    message
                )?;
                if !mitigation.is_empty() {
                    writeln!(self.writer, "  - Mitigation: {}", mitigation)?;
                }
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_warnings(&mut self, warnings: &[String]) -> anyhow::Result<()> {
        if warnings.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## Configuration warnings")?;
        writeln!(self.writer)?;
        for warning in warnings {
            writeln!(self.writer, "- {}", warning)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}
