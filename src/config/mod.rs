//! Configuration: analyzer config tiers, score weighting and the
//! `.specscore.toml` file.

pub mod analyzer_config;
mod core;
mod loader;
mod scoring;
pub mod template;

pub use analyzer_config::{
    merge_config_maps, merge_into, resolve_service_name_id, AnalyzerConfig, AnalyzerConfigMap,
    SCORE_CONFIG_KEY, SERVICE_NAME_ID_KEY, SERVICE_NAME_ID_TEMPLATE_KEY,
};
pub use self::core::{
    default_max_parallel_plugins, EngineSettings, ServiceSettings, SpecscoreConfig,
};
pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use scoring::{explicit_score_config, AnalyzersScoreConfigs, ScoreConfig};
