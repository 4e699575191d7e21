use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "specscore")]
#[command(about = "Aggregate API spec analyzer findings into weighted quality scores", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run analyzers over recorded findings for a spec and score them
    Analyze {
        /// API spec document
        #[arg(long)]
        spec: PathBuf,

        /// Recorded analyzer output as <analyzer>=<file.json> (repeatable)
        #[arg(long = "findings", value_parser = parse_findings_arg)]
        findings: Vec<(String, PathBuf)>,

        /// Analyzers to run (defaults to every active analyzer)
        #[arg(long, value_delimiter = ',')]
        analyzers: Option<Vec<String>>,

        /// Service name (defaults to [service] in the config, then the spec file name)
        #[arg(long)]
        service: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Recompute scores from stored spec analyses without running analyzers
    Score {
        /// JSON array of spec analyses
        #[arg(long)]
        analyses: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Show the resolved analyzer weight table
    Weights {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct CommonArgs {
    /// Configuration file (defaults to the nearest .specscore.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Increase logging verbosity
    /// -v: info, -vv: debug, -vvv: trace
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::io::output::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

/// Parse `<analyzer>=<path>`.
pub fn parse_findings_arg(value: &str) -> Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(format!(
            "expected <analyzer>=<file.json>, got '{}'",
            value
        )),
    }
}

impl Commands {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::Analyze { common, .. }
            | Commands::Score { common, .. }
            | Commands::Weights { common } => common,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_command() {
        let cli = Cli::try_parse_from([
            "specscore",
            "analyze",
            "--spec",
            "petstore.yaml",
            "--findings",
            "lint=lint.json",
            "--findings",
            "drift=drift.json",
            "--analyzers",
            "lint,drift",
            "--format",
            "json",
            "-vv",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze {
                spec,
                findings,
                analyzers,
                common,
                ..
            } => {
                assert_eq!(spec, PathBuf::from("petstore.yaml"));
                assert_eq!(
                    findings,
                    vec![
                        ("lint".to_string(), PathBuf::from("lint.json")),
                        ("drift".to_string(), PathBuf::from("drift.json")),
                    ]
                );
                assert_eq!(
                    analyzers,
                    Some(vec!["lint".to_string(), "drift".to_string()])
                );
                assert_eq!(common.format, OutputFormat::Json);
                assert_eq!(common.verbosity, 2);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_findings_arg_requires_name_and_path() {
        assert!(parse_findings_arg("lint").is_err());
        assert!(parse_findings_arg("=lint.json").is_err());
        assert!(parse_findings_arg("lint=").is_err());
        assert_eq!(
            parse_findings_arg("lint = out/lint.json").unwrap(),
            ("lint".to_string(), PathBuf::from("out/lint.json"))
        );
    }

    #[test]
    fn test_weights_defaults() {
        let cli = Cli::try_parse_from(["specscore", "weights"]).unwrap();
        let common = cli.command.common();
        assert_eq!(common.format, OutputFormat::Terminal);
        assert!(common.config.is_none());
    }
}
