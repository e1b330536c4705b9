//! Configuration loading and store factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mockexam_core::scoring::ScoringScheme;
use mockexam_core::session::{SessionConfig, DEFAULT_DURATION_SECS};
use mockexam_core::traits::{StatsStore, DEFAULT_QUESTION_COUNT};

use crate::stats_file::JsonStatsStore;
use crate::toml_supply::TomlQuestionSupply;

/// Session defaults from the `[session]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDefaults {
    #[serde(default = "default_duration")]
    pub duration_secs: u64,
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    #[serde(default = "default_correct_marks")]
    pub correct_marks: i64,
    #[serde(default = "default_wrong_penalty")]
    pub wrong_penalty: i64,
    #[serde(default = "default_true")]
    pub shuffle: bool,
}

fn default_duration() -> u64 {
    DEFAULT_DURATION_SECS
}
fn default_question_count() -> usize {
    DEFAULT_QUESTION_COUNT
}
fn default_correct_marks() -> i64 {
    ScoringScheme::default().correct_marks
}
fn default_wrong_penalty() -> i64 {
    ScoringScheme::default().wrong_penalty
}
fn default_true() -> bool {
    true
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            duration_secs: default_duration(),
            question_count: default_question_count(),
            correct_marks: default_correct_marks(),
            wrong_penalty: default_wrong_penalty(),
            shuffle: true,
        }
    }
}

impl SessionDefaults {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            duration_secs: self.duration_secs,
            scheme: ScoringScheme {
                correct_marks: self.correct_marks,
                wrong_penalty: self.wrong_penalty,
            },
        }
    }
}

/// Top-level mockexam configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockexamConfig {
    /// Directory of TOML question banks.
    #[serde(default = "default_bank_dir")]
    pub bank_dir: PathBuf,
    /// JSON file holding cumulative user stats.
    #[serde(default = "default_stats_path")]
    pub stats_path: PathBuf,
    /// Name under which stats are recorded.
    #[serde(default = "default_user")]
    pub user: String,
    /// Output directory for session reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub session: SessionDefaults,
}

fn default_bank_dir() -> PathBuf {
    PathBuf::from("./question-banks")
}
fn default_stats_path() -> PathBuf {
    PathBuf::from("./mockexam-results/stats.json")
}
fn default_user() -> String {
    "default".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./mockexam-results")
}

impl Default for MockexamConfig {
    fn default() -> Self {
        Self {
            bank_dir: default_bank_dir(),
            stats_path: default_stats_path(),
            user: default_user(),
            output_dir: default_output_dir(),
            session: SessionDefaults::default(),
        }
    }
}

impl MockexamConfig {
    pub fn question_supply(&self) -> Result<TomlQuestionSupply> {
        TomlQuestionSupply::load(&self.bank_dir)
            .with_context(|| format!("failed to load question banks from {}", self.bank_dir.display()))
    }

    pub fn stats_store(&self) -> Arc<dyn StatsStore> {
        Arc::new(JsonStatsStore::new(&self.stats_path))
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Expand `${VAR}` references once. Substituted values are not expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `mockexam.toml` in the current directory
/// 2. `~/.config/mockexam/config.toml`
///
/// Environment variable overrides: `MOCKEXAM_BANK_DIR`, `MOCKEXAM_STATS_PATH`, `MOCKEXAM_USER`.
pub fn load_config() -> Result<MockexamConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<MockexamConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("mockexam.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => MockexamConfig::default(),
    };

    if let Ok(dir) = std::env::var("MOCKEXAM_BANK_DIR") {
        config.bank_dir = PathBuf::from(dir);
    }
    if let Ok(path) = std::env::var("MOCKEXAM_STATS_PATH") {
        config.stats_path = PathBuf::from(path);
    }
    if let Ok(user) = std::env::var("MOCKEXAM_USER") {
        config.user = user;
    }

    config.bank_dir = resolve_path(&config.bank_dir);
    config.stats_path = resolve_path(&config.stats_path);
    config.output_dir = resolve_path(&config.output_dir);

    if config.session.duration_secs == 0 {
        anyhow::bail!("session.duration_secs must be at least 1");
    }
    if config.session.question_count == 0 {
        anyhow::bail!("session.question_count must be at least 1");
    }

    Ok(config)
}

/// Parse a config document.
pub fn parse_config(content: &str) -> Result<MockexamConfig> {
    Ok(toml::from_str(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("mockexam"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_MOCKEXAM_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_MOCKEXAM_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_MOCKEXAM_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_MOCKEXAM_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_expand_values() {
        std::env::set_var("_MOCKEXAM_SELF_REF", "${_MOCKEXAM_SELF_REF}");
        assert_eq!(
            resolve_env_vars("${_MOCKEXAM_SELF_REF}/banks"),
            "${_MOCKEXAM_SELF_REF}/banks"
        );
        std::env::set_var("_MOCKEXAM_NESTED_REF", "${HOME}");
        assert_eq!(resolve_env_vars("a-${_MOCKEXAM_NESTED_REF}-b"), "a-${HOME}-b");
        std::env::remove_var("_MOCKEXAM_SELF_REF");
        std::env::remove_var("_MOCKEXAM_NESTED_REF");
    }

    #[test]
    fn default_config() {
        let config = MockexamConfig::default();
        assert_eq!(config.session.duration_secs, 1800);
        assert_eq!(config.session.question_count, 30);
        assert!(config.session.shuffle);
        assert_eq!(config.session.session_config(), SessionConfig::default());
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config(
            r#"
bank_dir = "/srv/banks"
user = "asha"

[session]
duration_secs = 600
wrong_penalty = 0
"#,
        )
        .unwrap();
        assert_eq!(config.bank_dir, PathBuf::from("/srv/banks"));
        assert_eq!(config.user, "asha");
        assert_eq!(config.session.duration_secs, 600);
        assert_eq!(config.session.question_count, 30);
        assert_eq!(config.session.session_config().scheme.wrong_penalty, 0);
        assert_eq!(config.session.session_config().scheme.correct_marks, 4);
    }

    #[test]
    fn explicit_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_with_zero_duration_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mockexam.toml");
        std::fs::write(&path, "[session]\nduration_secs = 0\n").unwrap();
        assert!(load_config_from(Some(&path)).is_err());
    }
}
