use std::io::Write;

use colored::*;

use crate::config::AnalyzersScoreConfigs;
use crate::core::Severity;
use crate::io::output::{rule_rows, OutputWriter};
use crate::pipeline::AnalysisOutcome;

const RULE_LINE: &str = "───────────────────────────────────────────";

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

fn score_label(score: i64) -> ColoredString {
    let text = score.to_string();
    if score >= 80 {
        text.green().bold()
    } else if score >= 50 {
        text.yellow().bold()
    } else {
        text.red().bold()
    }
}

fn severity_label(severity: Severity) -> ColoredString {
    let name = severity.name().to_uppercase();
    match severity {
        Severity::Error => name.red(),
        Severity::Warning => name.yellow(),
        Severity::Info => name.blue(),
        Severity::Hint => name.dimmed(),
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_outcome(&mut self, outcome: &AnalysisOutcome) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "SPEC SCORE".bold().cyan())?;
        writeln!(self.writer, "{}", RULE_LINE)?;
        writeln!(
            self.writer,
            "Overall: {}/100 across {} analyzer(s)",
            score_label(outcome.spec_score),
            outcome.analyses.len()
        )?;

        for analysis in &outcome.analyses {
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "{} {}",
                analysis.analyzer.bold(),
                score_label(analysis.score)
            )?;
            for (severity, rule, occurrences, message, mitigation) in rule_rows(analysis) {
                writeln!(
                    self.writer,
                    "  {:<8} {} x{}  {}",
                    severity_label(severity),
                    rule,
                    occurrences,
                    message
                )?;
                if !mitigation.is_empty() {
                    writeln!(self.writer, "           {} {}", "fix:".dimmed(), mitigation)?;
                }
            }
        }

        for warning in &outcome.weight_warnings {
            writeln!(self.writer, "{} {}", "warning:".yellow(), warning)?;
        }
        Ok(())
    }

    fn write_weights(
        &mut self,
        configs: &AnalyzersScoreConfigs,
        warnings: &[String],
    ) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "ANALYZER WEIGHTS".bold().cyan())?;
        writeln!(self.writer, "{}", RULE_LINE)?;
        for (name, config) in configs.iter() {
            let severities = Severity::ALL
                .into_iter()
                .rev()
                .map(|s| format!("{}={}", s, config.severity_weight(s)))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(
                self.writer,
                "{:<24} {:>6.1}%  {}",
                name,
                config.analyzer_weight * 100.0,
                severities
            )?;
        }
        writeln!(
            self.writer,
            "{:<24} {:>6.1}%",
            "total",
            configs.weight_sum() * 100.0
        )?;
        for warning in warnings {
            writeln!(self.writer, "{} {}", "warning:".yellow(), warning)?;
        }
        Ok(())
    }
}
