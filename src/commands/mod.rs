//! CLI command implementations.
//!
//! - **analyze**: replay recorded analyzer output for a spec and score it
//! - **score**: recompute scores from stored spec analyses
//! - **weights**: print the resolved analyzer weight table

pub mod analyze;
pub mod score;
pub mod weights;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::CommonArgs;
use crate::config::{load_config, load_config_from_path, SpecscoreConfig};
use crate::core::Analyzer;
use crate::io::{create_writer, OutputWriter};

pub use analyze::{handle_analyze, run_analyze, AnalyzeArgs};
pub use score::{handle_score, run_score};
pub use weights::{handle_weights, resolve_weights};

/// An explicit path must load; otherwise the nearest config file or defaults.
pub fn load_cli_config(path: Option<&Path>) -> Result<SpecscoreConfig> {
    match path {
        Some(path) => Ok(load_config_from_path(path)?),
        None => Ok(load_config()),
    }
}

/// Configured catalog plus an active, rule-less entry for every analyzer in
/// `names` it does not declare.
pub(crate) fn catalog_with<'a>(
    config: &SpecscoreConfig,
    names: impl IntoIterator<Item = &'a str>,
) -> Vec<Analyzer> {
    let mut catalog = config.analyzers.clone();
    for name in names {
        if !catalog.iter().any(|a| a.name_id == name) {
            debug!(analyzer = %name, "Adding uncataloged analyzer");
            catalog.push(Analyzer::new(name));
        }
    }
    catalog
}

pub fn output_writer(common: &CommonArgs) -> Result<Box<dyn OutputWriter>> {
    let sink: Box<dyn Write> = match &common.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?,
        )),
        None => Box::new(io::stdout()),
    };
    Ok(create_writer(common.format.into(), sink))
}
