use crate::error::{GhOpsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Represents the complete configuration for gh-release-ops.
///
/// Contains GitHub endpoint settings, the PR-label-to-bump-policy mapping,
/// release asset settings and the hand-off file names used between pipeline
/// stages. Everything has a sensible default; a config file only overrides.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default = "default_labels")]
    pub labels: HashMap<String, String>,

    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub handoff: HandoffConfig,
}

/// GitHub endpoint configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GithubConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_uploads_base")]
    pub uploads_base: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Release asset configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_asset_file")]
    pub asset_file: String,

    #[serde(default = "default_asset_content_type")]
    pub asset_content_type: String,
}

/// Hand-off file names used to pass versions between pipeline stages.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HandoffConfig {
    #[serde(default = "default_current_file")]
    pub current_file: String,

    #[serde(default = "default_new_file")]
    pub new_file: String,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_uploads_base() -> String {
    "https://uploads.github.com".to_string()
}

fn default_user_agent() -> String {
    format!("gh-release-ops/{}", env!("CARGO_PKG_VERSION"))
}

/// Returns the default mapping from PR labels to bump policies.
fn default_labels() -> HashMap<String, String> {
    let mut map = HashMap::new();
    map.insert("semver:major".to_string(), "major".to_string());
    map.insert("semver:minor".to_string(), "minor".to_string());
    map.insert("semver:patch".to_string(), "patch".to_string());
    map
}

fn default_asset_file() -> String {
    "release.tar.gz".to_string()
}

fn default_asset_content_type() -> String {
    "application/gzip".to_string()
}

fn default_current_file() -> String {
    "current_version.txt".to_string()
}

fn default_new_file() -> String {
    "new_version.txt".to_string()
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            api_base: default_api_base(),
            uploads_base: default_uploads_base(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            asset_file: default_asset_file(),
            asset_content_type: default_asset_content_type(),
        }
    }
}

impl Default for HandoffConfig {
    fn default() -> Self {
        HandoffConfig {
            current_file: default_current_file(),
            new_file: default_new_file(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            github: GithubConfig::default(),
            labels: default_labels(),
            release: ReleaseConfig::default(),
            handoff: HandoffConfig::default(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `ghops.toml` in current directory
/// 3. `.ghops.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./ghops.toml").exists() {
        fs::read_to_string("./ghops.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".ghops.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str).map_err(|e| GhOpsError::config(e.to_string()))?;
    Ok(config)
}
