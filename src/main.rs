use anyhow::Result;
use specscore::cli::{self, Commands};
use specscore::commands::{self, AnalyzeArgs};
use specscore::observability::init_logging;

fn main() -> Result<()> {
    let cli = cli::parse_args();
    init_logging(cli.command.common().verbosity);

    match cli.command {
        Commands::Analyze {
            spec,
            findings,
            analyzers,
            service,
            common,
        } => {
            let args = AnalyzeArgs {
                spec,
                findings,
                analyzers,
                service,
            };
            commands::handle_analyze(args, &common)
        }
        Commands::Score { analyses, common } => commands::handle_score(&analyses, &common),
        Commands::Weights { common } => commands::handle_weights(&common),
    }
}
