// Lint configuration loading and TOML parsing

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::models::requirement::normalize_name;
use crate::services::validator::Rule;
use crate::utils::error::{ReqlintError, Result};

/// File name looked up next to the manifest and in the user config dir
pub const CONFIG_FILE_NAME: &str = "reqlint.toml";

/// Severity level a rule can be set to in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Error,
    Warn,
    Off,
}

/// On-disk configuration shape
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigToml {
    /// Rule id -> level overrides
    #[serde(default)]
    rules: HashMap<String, RuleLevel>,
    /// Package names exempt from duplicate-package and unpinned
    #[serde(default)]
    ignore: Vec<String>,
}

/// Lint configuration: per-rule levels plus an ignore list
#[derive(Debug, Clone, Default)]
pub struct LintConfig {
    levels: HashMap<&'static str, RuleLevel>,
    ignore: HashSet<String>,
}

impl LintConfig {
    /// Load configuration with the standard search order: an explicit
    /// `--config` path, then `reqlint.toml` next to the manifest, then
    /// the user config directory, then defaults
    pub fn load(explicit: Option<&Path>, manifest_dir: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ReqlintError::Config(format!(
                    "config file '{}' not found",
                    path.display()
                )));
            }
            return Self::load_file(path);
        }

        if let Some(dir) = manifest_dir {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Self::load_file(&candidate);
            }
        }

        if let Some(candidate) = user_config_path() {
            if candidate.is_file() {
                return Self::load_file(&candidate);
            }
        }

        Ok(Self::default())
    }

    fn load_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading lint config");
        let content = fs::read_to_string(path).map_err(|err| {
            ReqlintError::Config(format!("failed to read {}: {}", path.display(), err))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: ConfigToml = toml::from_str(content)
            .map_err(|err| ReqlintError::Config(format!("invalid {}: {}", CONFIG_FILE_NAME, err)))?;

        let mut config = Self::default();
        for (id, level) in raw.rules {
            let rule = Rule::from_id(&id).ok_or_else(|| {
                let known: Vec<&str> = Rule::all().iter().map(|r| r.id()).collect();
                ReqlintError::Config(format!(
                    "unknown rule '{}' (known rules: {})",
                    id,
                    known.join(", ")
                ))
            })?;
            config.levels.insert(rule.id(), level);
        }
        config.ignore = raw
            .ignore
            .iter()
            .map(|name| normalize_name(name))
            .collect();
        Ok(config)
    }

    /// Effective level for a rule: explicit override or the default
    pub fn rule_level(&self, rule: Rule) -> RuleLevel {
        self.levels
            .get(rule.id())
            .copied()
            .unwrap_or_else(|| rule.default_level())
    }

    /// Whether a normalized package name is exempt
    pub fn is_ignored(&self, normalized: &str) -> bool {
        self.ignore.contains(normalized)
    }

    /// Override one rule's level (used by tests and flag handling)
    pub fn with_level(mut self, rule: Rule, level: RuleLevel) -> Self {
        self.levels.insert(rule.id(), level);
        self
    }

    /// Add one package to the ignore list
    pub fn with_ignore(mut self, name: &str) -> Self {
        self.ignore.insert(normalize_name(name));
        self
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("reqlint").join(CONFIG_FILE_NAME))
}
