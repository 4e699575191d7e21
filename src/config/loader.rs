use std::collections::BTreeSet;
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::SpecscoreConfig;
use crate::errors::{Error, Result};

/// File name searched for in the working directory and its ancestors
pub const CONFIG_FILE_NAME: &str = ".specscore.toml";

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> std::result::Result<SpecscoreConfig, String> {
    let config = toml::from_str::<SpecscoreConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    if config.engine.max_parallel_plugins == 0 {
        return Err("engine.max_parallel_plugins must be at least 1".to_string());
    }

    let mut seen = BTreeSet::new();
    if let Some(duplicate) = config
        .analyzers
        .iter()
        .map(|a| a.name_id.as_str())
        .find(|name| !seen.insert(*name))
    {
        return Err(format!("Analyzer '{}' is declared more than once", duplicate));
    }

    Ok(config)
}

/// Load an explicitly requested config file; any failure is an error.
pub fn load_config_from_path(path: &Path) -> Result<SpecscoreConfig> {
    let contents = read_config_file(path)?;
    parse_and_validate_config(&contents)
        .map_err(|e| Error::Configuration(format!("{} ({})", e, path.display())))
}

/// Pure function to try loading config from a specific path
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<SpecscoreConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for a config file.
pub fn load_config_from(start: PathBuf) -> SpecscoreConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            SpecscoreConfig::default()
        })
}

pub fn load_config() -> SpecscoreConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            SpecscoreConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AnalyzerStatus, Severity};
    use indoc::indoc;
    use tempfile::TempDir;

    const SAMPLE: &str = indoc! {r#"
        [engine]
        max_parallel_plugins = 2

        [[analyzers]]
        name_id = "lint"
        status = "active"

        [analyzers.config.score_config]
        analyzer_weight = 0.6

        [analyzers.config.score_config.severity_weights]
        error = 10
        warning = 5

        [[analyzers.rules]]
        name_id = "operation-tags"
        severity = "warning"
        description = "Operations must have tags"
        mitigation = "Add at least one tag"

        [[analyzers]]
        name_id = "drift"
        status = "inactive"

        [service]
        name_id = "petstore"
        base_name = "pets"

        [service.analyzers_config.lint]
        service_name_id_template = "{{.nameID}}-prod"
    "#};

    #[test]
    fn test_parse_sample() {
        let config = parse_and_validate_config(SAMPLE).unwrap();
        assert_eq!(config.engine.max_parallel_plugins, 2);
        assert_eq!(config.analyzers.len(), 2);

        let lint = &config.analyzers[0];
        assert_eq!(lint.config["score_config"]["analyzer_weight"], 0.6);
        assert_eq!(lint.rules[0].severity, Severity::Warning);
        assert_eq!(config.analyzers[1].status, AnalyzerStatus::Inactive);
        assert_eq!(config.active_analyzers().count(), 1);

        let service = config.service("unused");
        assert_eq!(service.name_id, "petstore");
        assert_eq!(service.base_name(), "pets");
        assert_eq!(
            service.analyzers_config["lint"]["service_name_id_template"],
            "{{.nameID}}-prod"
        );
    }

    #[test]
    fn test_rejects_zero_parallelism() {
        let err = parse_and_validate_config("[engine]\nmax_parallel_plugins = 0\n").unwrap_err();
        assert!(err.contains("max_parallel_plugins"));
    }

    #[test]
    fn test_rejects_duplicate_analyzers() {
        let contents = indoc! {r#"
            [[analyzers]]
            name_id = "lint"

            [[analyzers]]
            name_id = "lint"
        "#};
        let err = parse_and_validate_config(contents).unwrap_err();
        assert!(err.contains("'lint'"));
    }

    #[test]
    fn test_load_from_ancestor_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), SAMPLE).unwrap();
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let config = load_config_from(nested);
        assert_eq!(config.analyzers.len(), 2);
    }

    #[test]
    fn test_invalid_discovered_config_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "not = [valid").unwrap();
        let config = load_config_from(temp.path().to_path_buf());
        assert!(config.analyzers.is_empty());
    }

    #[test]
    fn test_explicit_path_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.toml");
        fs::write(&path, "not = [valid").unwrap();
        assert!(matches!(
            load_config_from_path(&path),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            load_config_from_path(&temp.path().join("missing.toml")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_directory_ancestors_depth() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c"), PathBuf::from("/a/b")]);
    }
}
