//! CLI configuration.
//!
//! Controls where reports go and how much history the views list. The
//! aggregation rules themselves are fixed and not configurable.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use studytrack_core::dashboard::DashboardLimits;

/// Top-level studytrack configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudytrackConfig {
    /// Output directory for saved reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Output format used when `--format` is not given.
    #[serde(default = "default_format")]
    pub default_format: String,
    /// Directory holding `study_plans.json` and `mock_tests.json`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// History entries listed by the analytics views.
    #[serde(default = "default_recent_tests_limit")]
    pub recent_tests_limit: usize,
    /// Recent tests listed on the dashboard.
    #[serde(default = "default_dashboard_limit")]
    pub dashboard_recent_limit: usize,
    /// Upcoming plans listed on the dashboard.
    #[serde(default = "default_dashboard_limit")]
    pub dashboard_upcoming_limit: usize,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./studytrack-results")
}
fn default_format() -> String {
    "text".to_string()
}
fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_recent_tests_limit() -> usize {
    10
}
fn default_dashboard_limit() -> usize {
    5
}

impl Default for StudytrackConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            default_format: default_format(),
            data_dir: default_data_dir(),
            recent_tests_limit: default_recent_tests_limit(),
            dashboard_recent_limit: default_dashboard_limit(),
            dashboard_upcoming_limit: default_dashboard_limit(),
        }
    }
}

impl StudytrackConfig {
    pub fn dashboard_limits(&self) -> DashboardLimits {
        DashboardLimits {
            recent_tests: self.dashboard_recent_limit,
            upcoming_plans: self.dashboard_upcoming_limit,
        }
    }

    pub fn study_plans_path(&self) -> PathBuf {
        self.data_dir.join("study_plans.json")
    }

    pub fn mock_tests_path(&self) -> PathBuf {
        self.data_dir.join("mock_tests.json")
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `studytrack.toml` in the current directory
/// 2. `~/.config/studytrack/config.toml`
///
/// `STUDYTRACK_OUTPUT_DIR` overrides `output_dir`.
pub fn load_config_from(path: Option<&Path>) -> Result<StudytrackConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("studytrack.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<StudytrackConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => StudytrackConfig::default(),
    };

    if let Ok(dir) = std::env::var("STUDYTRACK_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }

    config.output_dir = resolve_path(&config.output_dir);
    config.data_dir = resolve_path(&config.data_dir);

    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("studytrack"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_STUDYTRACK_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_STUDYTRACK_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_STUDYTRACK_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("unterminated ${oops"), "unterminated ${oops");
        std::env::remove_var("_STUDYTRACK_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_expand_substituted_values() {
        std::env::set_var("_STUDYTRACK_SELF_REF", "${_STUDYTRACK_SELF_REF}");
        assert_eq!(
            resolve_env_vars("out/${_STUDYTRACK_SELF_REF}/x"),
            "out/${_STUDYTRACK_SELF_REF}/x"
        );
        std::env::remove_var("_STUDYTRACK_SELF_REF");
    }

    #[test]
    fn resolve_env_vars_handles_several_references() {
        std::env::set_var("_STUDYTRACK_A", "a");
        std::env::set_var("_STUDYTRACK_B", "b");
        assert_eq!(
            resolve_env_vars("${_STUDYTRACK_A}-${_STUDYTRACK_B}-${_STUDYTRACK_UNSET_X}"),
            "a-b-"
        );
        std::env::remove_var("_STUDYTRACK_A");
        std::env::remove_var("_STUDYTRACK_B");
    }

    #[test]
    fn default_config() {
        let config = StudytrackConfig::default();
        assert_eq!(config.default_format, "text");
        assert_eq!(config.recent_tests_limit, 10);
        assert_eq!(config.dashboard_limits(), DashboardLimits::default());
        assert_eq!(config.mock_tests_path(), PathBuf::from("./mock_tests.json"));
    }

    #[test]
    fn parse_partial_config() {
        let config: StudytrackConfig = toml::from_str(
            r#"
output_dir = "reports"
recent_tests_limit = 3
"#,
        )
        .unwrap();
        assert_eq!(config.output_dir, PathBuf::from("reports"));
        assert_eq!(config.recent_tests_limit, 3);
        assert_eq!(config.dashboard_upcoming_limit, 5);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studytrack.toml");
        std::fs::write(&path, "default_format = \"markdown\"\ndata_dir = \"data\"\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_format, "markdown");
        assert_eq!(config.study_plans_path(), PathBuf::from("data/study_plans.json"));
    }
}
