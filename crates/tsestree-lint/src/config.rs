//! Configuration loading
//!
//! Reads `tsestree.toml`: a `[parser]` table with conversion options and a
//! `[rules]` table that enables, disables, or re-grades rules.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tsestree_core::ParseOptions;

use crate::rules::Severity;

pub const CONFIG_FILENAME: &str = "tsestree.toml";

const KNOWN_TOP_LEVEL_KEYS: &[&str] = &["parser", "rules"];
const KNOWN_RULES_KEYS: &[&str] = &["enabled", "disabled", "severity"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid TOML in '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct ConfigResult {
    pub config: Config,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub parser: ParseOptions,
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    pub enabled: Vec<String>,
    pub disabled: Vec<String>,
    pub severity: HashMap<String, SeverityValue>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SeverityValue {
    Error,
    Warning,
    Info,
    Hint,
}

impl From<SeverityValue> for Severity {
    fn from(value: SeverityValue) -> Self {
        match value {
            SeverityValue::Error => Severity::Error,
            SeverityValue::Warning => Severity::Warning,
            SeverityValue::Info => Severity::Info,
            SeverityValue::Hint => Severity::Hint,
        }
    }
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse(path: &Path, content: &str) -> Result<Config, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = read(path)?;
    parse(path, &content)
}

pub fn load_config_with_warnings(path: &Path) -> Result<ConfigResult, ConfigError> {
    let content = read(path)?;
    let config = parse(path, &content)?;
    let warnings = detect_unknown_keys(&content);
    for warning in &warnings {
        tracing::warn!(path = %path.display(), "{warning}");
    }

    Ok(ConfigResult { config, warnings })
}

fn detect_unknown_keys(content: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    let table: toml::Table = match content.parse() {
        Ok(t) => t,
        Err(_) => return warnings,
    };

    let known_top: HashSet<&str> = KNOWN_TOP_LEVEL_KEYS.iter().copied().collect();
    for key in table.keys() {
        if !known_top.contains(key.as_str()) {
            warnings.push(format!("Unknown config option: '{}'", key));
        }
    }

    if let Some(toml::Value::Table(rules)) = table.get("rules") {
        let known_rules: HashSet<&str> = KNOWN_RULES_KEYS.iter().copied().collect();
        for key in rules.keys() {
            if !known_rules.contains(key.as_str()) {
                warnings.push(format!("Unknown config option in [rules]: '{}'", key));
            }
        }
    }

    warnings
}

pub fn load_config_or_default(start_dir: &Path) -> Config {
    find_config_file(start_dir)
        .and_then(|path| load_config(&path).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn create_temp_dir() -> tempfile::TempDir {
        tempfile::tempdir().expect("Failed to create temp dir")
    }

    #[test]
    fn load_config_from_file() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &config_path,
            r#"
[parser]
jsx = true
errorOnUnknownASTType = true

[rules]
enabled = ["no-unused-private-class-members"]
disabled = ["C002"]

[rules.severity]
no-unused-private-class-members = "error"
"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();

        assert!(config.parser.jsx);
        assert!(config.parser.error_on_unknown_ast_type);
        assert!(config.parser.range);
        assert_eq!(config.rules.enabled, vec!["no-unused-private-class-members"]);
        assert_eq!(config.rules.disabled, vec!["C002"]);
        assert_eq!(
            config.rules.severity.get("no-unused-private-class-members"),
            Some(&SeverityValue::Error)
        );
    }

    #[test]
    fn default_config_when_missing() {
        let dir = create_temp_dir();
        let config = load_config_or_default(dir.path());

        assert_eq!(config, Config::default());
        assert!(config.rules.enabled.is_empty());
    }

    #[test]
    fn error_on_invalid_toml() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "this is not valid { toml }").unwrap();

        match load_config(&config_path) {
            Err(ConfigError::ParseError { path, message }) => {
                assert_eq!(path, config_path);
                assert!(!message.is_empty());
            }
            other => panic!("Expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = create_temp_dir();
        let result = load_config(&dir.path().join(CONFIG_FILENAME));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn find_config_file_in_parent_directory() {
        let parent = create_temp_dir();
        let child = parent.path().join("subdir");
        fs::create_dir(&child).unwrap();
        let config_path = parent.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "").unwrap();

        assert_eq!(find_config_file(&child), Some(config_path.clone()));
        assert_eq!(find_config_file(parent.path()), Some(config_path));
    }

    #[test]
    fn find_config_file_returns_none_when_not_found() {
        let dir = create_temp_dir();

        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn empty_config_file_uses_defaults() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "").unwrap();

        let config = load_config(&config_path).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn unknown_keys_produce_warnings() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "include = []\n[rules]\nquality = true\n").unwrap();

        let result = load_config_with_warnings(&config_path).unwrap();

        assert_eq!(
            result.warnings,
            vec![
                "Unknown config option: 'include'".to_string(),
                "Unknown config option in [rules]: 'quality'".to_string(),
            ]
        );
    }

    #[test]
    fn severity_value_converts_to_severity() {
        assert_eq!(Severity::from(SeverityValue::Error), Severity::Error);
        assert_eq!(Severity::from(SeverityValue::Warning), Severity::Warning);
        assert_eq!(Severity::from(SeverityValue::Info), Severity::Info);
        assert_eq!(Severity::from(SeverityValue::Hint), Severity::Hint);
    }

    #[test]
    fn config_error_display_is_helpful() {
        let err = ConfigError::ParseError {
            path: PathBuf::from("/path/to/tsestree.toml"),
            message: "expected `=`".to_string(),
        };

        let msg = err.to_string();

        assert!(msg.contains("/path/to/tsestree.toml"));
        assert!(msg.contains("expected `=`"));
    }
}
