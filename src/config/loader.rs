use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::core::DrillbookConfig;
use crate::classify::{DivisorClassifier, SpeedClassifier};
use crate::errors::{format_error_list, DrillError};
use crate::pipeline::validate_tag;

/// File name searched for in the working directory and its ancestors
pub const CONFIG_FILE_NAME: &str = ".drillbook.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "DRILLBOOK_CONFIG";

const MAX_TRAVERSAL_DEPTH: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", config_label(.path))]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration:\n{0}")]
    Invalid(String),
}

fn config_label(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "configuration".to_string(),
    }
}

impl From<ConfigLoadError> for DrillError {
    fn from(err: ConfigLoadError) -> Self {
        match &err {
            ConfigLoadError::Read { path, .. }
            | ConfigLoadError::Parse {
                path: Some(path), ..
            } => DrillError::config_with_path(err.to_string(), path),
            _ => DrillError::config(err.to_string()),
        }
    }
}

/// Read a config file into a string
pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse TOML and check that every section builds a usable classifier.
///
/// Problems from all sections are accumulated into one `Invalid` error.
pub fn parse_and_validate_config(contents: &str) -> Result<DrillbookConfig, ConfigLoadError> {
    parse_config_at(contents, None)
}

fn parse_config_at(
    contents: &str,
    path: Option<&Path>,
) -> Result<DrillbookConfig, ConfigLoadError> {
    let config =
        toml::from_str::<DrillbookConfig>(contents).map_err(|source| ConfigLoadError::Parse {
            path: path.map(Path::to_path_buf),
            source,
        })?;

    let problems: Vec<DrillError> = [
        DivisorClassifier::from_config(&config.classifier()).err(),
        SpeedClassifier::from_config(&config.speed()).err(),
        validate_tag(&config.pipeline().tag).err(),
    ]
    .into_iter()
    .flatten()
    .collect();

    if problems.is_empty() {
        Ok(config)
    } else {
        Err(ConfigLoadError::Invalid(format_error_list(&problems)))
    }
}

/// Load a config file that the user named explicitly; any failure is fatal.
pub fn load_config_from_path(path: &Path) -> Result<DrillbookConfig, ConfigLoadError> {
    let contents = read_config_file(path).map_err(|source| ConfigLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config_at(&contents, Some(path))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Try loading a discovered config; failures are logged and skipped
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<DrillbookConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_config_at(&contents, Some(config_path)) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{} ({}). Using defaults.", e, config_path.display());
            Some(DrillbookConfig::default())
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

/// Generate `start` and its ancestors, at most `max_depth` directories
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

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("drillbook").join("config.toml"))
}

/// Resolve configuration: `DRILLBOOK_CONFIG`, then `.drillbook.toml` in the
/// working directory or an ancestor, then the user config directory, then
/// defaults.
pub fn load_config() -> DrillbookConfig {
    if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
        if let Some(config) = try_load_config_from_path(Path::new(&explicit)) {
            return config;
        }
    }

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return DrillbookConfig::default();
        }
    };

    directory_ancestors(current, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .chain(user_config_path())
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            DrillbookConfig::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CONFIG_TOML;
    use indoc::indoc;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_template_matches_defaults() {
        let config = parse_and_validate_config(DEFAULT_CONFIG_TOML).unwrap();
        let defaults = DrillbookConfig::default();
        assert_eq!(config.classifier().rules, defaults.classifier().rules);
        assert_eq!(config.speed(), defaults.speed());
        assert_eq!(config.pipeline(), defaults.pipeline());
        assert_eq!(config.classifier().fallback.as_deref(), Some(""));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_and_validate_config("").unwrap();
        assert_eq!(config, DrillbookConfig::default());
        assert_eq!(config.speed().limit, 70.0);
    }

    #[test]
    fn test_partial_section() {
        let config = parse_and_validate_config(indoc! {r#"
            [speed]
            limit = 80.0
        "#})
        .unwrap();
        assert_eq!(config.speed().limit, 80.0);
        assert_eq!(config.speed().increment, 5.0);
        assert_eq!(config.speed().suspension_threshold, 12);
    }

    #[test]
    fn test_invalid_sections_accumulate() {
        let err = parse_and_validate_config(indoc! {r#"
            [speed]
            limit = -1.0

            [pipeline]
            tag = ""

            [[classifier.rules]]
            label = "Zero"
            divisors = [0]
        "#})
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("zero divisor"), "{}", message);
        assert!(message.contains("limit must be positive"), "{}", message);
        assert!(message.contains("tag must be"), "{}", message);
    }

    #[test]
    fn test_parse_error() {
        let err = parse_and_validate_config("[speed\nlimit = 1").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse { path: None, .. }));
        assert!(err.to_string().starts_with("Failed to parse configuration: "));
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.toml");
        fs::write(&path, "[pipeline\ntag = 1").unwrap();

        let err = load_config_from_path(&path).unwrap_err();
        assert!(
            err.to_string()
                .starts_with(&format!("Failed to parse {}: ", path.display())),
            "{}",
            err
        );
        assert!(!err.to_string().contains(".drillbook.toml"));
        let drill: DrillError = err.into();
        assert_eq!(drill.path(), Some(&path));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[pipeline]\ntag = \"p\"").unwrap();
        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.pipeline().tag, "p");
    }

    #[test]
    fn test_missing_explicit_path_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = load_config_from_path(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Read { .. }));
        let drill: DrillError = err.into();
        assert!(drill.path().is_some());
    }

    #[test]
    fn test_discovered_invalid_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[speed]\nlimit = 0.0\n").unwrap();
        assert_eq!(
            try_load_config_from_path(&path),
            Some(DrillbookConfig::default())
        );
        assert_eq!(try_load_config_from_path(&dir.path().join("nope.toml")), None);
    }

    #[test]
    fn test_directory_ancestors_depth() {
        let dirs: Vec<PathBuf> = directory_ancestors(PathBuf::from("/a/b/c"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c"), PathBuf::from("/a/b")]);
        let all: Vec<PathBuf> = directory_ancestors(PathBuf::from("/a/b"), 10).collect();
        assert_eq!(all.len(), 3);
    }
}
