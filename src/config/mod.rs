// Copyright 2024 zhlinh and luacheck-review Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Configuration system for luacheck-review with hierarchical precedence.
//!
//! Configuration is loaded and merged from multiple sources with the following precedence
//! (higher precedence overrides lower):
//!
//! 1. CLI arguments (highest)
//! 2. File passed with `--config`
//! 3. Project config (.luacheck-review/config.toml in project root)
//! 4. User config (~/.luacheck-review/config.toml)
//! 5. Built-in defaults (lowest)

use crate::{Limit, RunConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the configuration file.
pub const CONFIG_DIR: &str = ".luacheck-review";

fn user_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Review service: github, gitlab or bitbucket_server
    #[serde(default)]
    pub service: Option<String>,

    /// Post one comment per finding anchored at its line
    #[serde(default, alias = "inline")]
    pub inline_mode: Option<bool>,

    /// Maximum number of comments to post
    #[serde(default)]
    pub limit: Option<Limit>,

    /// Read pre-generated reports instead of running luacheck
    #[serde(default)]
    pub skip_lint: Option<bool>,

    /// Pre-generated JUnit report (skip_lint only)
    #[serde(default)]
    pub report_file: Option<PathBuf>,

    /// Glob for pre-generated JUnit reports (skip_lint only)
    #[serde(default)]
    pub report_files_pattern: Option<String>,

    /// Base ref the change is compared against
    #[serde(default)]
    pub base: Option<String>,

    /// luacheck executable name or path
    #[serde(default, alias = "luacheck")]
    pub executable: Option<String>,

    /// Web URL of the repository used for source links
    #[serde(default)]
    pub repo_url: Option<String>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::ReviewError::Config(format!("Failed to read config: {}", e)))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext {
            "yml" | "yaml" => serde_yaml::from_str(&content)
                .map_err(|e| crate::ReviewError::Config(format!("Failed to parse YAML: {}", e))),
            "toml" => Self::from_toml_str(&content),
            "json" => serde_json::from_str(&content)
                .map_err(|e| crate::ReviewError::Config(format!("Failed to parse JSON: {}", e))),
            _ => Err(crate::ReviewError::Config(format!(
                "Unsupported config format: {}",
                ext
            ))),
        }
    }

    /// Parse TOML configuration text
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        toml::from_str(content)
            .map_err(|e| crate::ReviewError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Load built-in default configuration
    pub fn built_in_defaults() -> Self {
        Config {
            inline_mode: Some(false),
            skip_lint: Some(false),
            executable: Some("luacheck".to_string()),
            ..Default::default()
        }
    }

    /// Load user-level configuration from `<home>/.luacheck-review/config.toml`.
    /// A missing file is `None`; an unreadable or invalid one is an error.
    pub fn load_user_config_in(home: &Path) -> crate::Result<Option<Self>> {
        let config_path = home.join(CONFIG_DIR).join("config.toml");
        if !config_path.exists() {
            return Ok(None);
        }
        log::debug!("Loading user config {}", config_path.display());
        Self::load(&config_path).map(Some).map_err(|e| match e {
            crate::ReviewError::Config(msg) => {
                crate::ReviewError::Config(format!("{}: {}", config_path.display(), msg))
            }
            other => other,
        })
    }

    /// Load project-level configuration from the given directory
    /// Searches for .luacheck-review/config.toml in the start directory and parent directories
    pub fn load_project_config(start_dir: &Path) -> crate::Result<Option<Self>> {
        let mut current = start_dir.to_path_buf();
        loop {
            let config_path = Self::project_config_path(&current);
            if config_path.exists() {
                log::debug!("Loading project config {}", config_path.display());
                return Self::load(&config_path).map(Some);
            }

            if !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Merge another configuration into this one.
    /// Values from `other` override values in `self`.
    pub fn merge(&mut self, other: Config) {
        macro_rules! merge_field {
            ($($field:ident),*) => {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field;
                    }
                )*
            };
        }

        merge_field!(
            service,
            inline_mode,
            limit,
            skip_lint,
            report_file,
            report_files_pattern,
            base,
            executable,
            repo_url
        );
    }

    /// Load and merge configuration from all file sources with proper precedence.
    /// Precedence: explicit file > project > user > built-in
    pub fn load_merged(project_dir: &Path, explicit: Option<&Path>) -> crate::Result<Self> {
        Self::load_merged_in(user_home().as_deref(), project_dir, explicit)
    }

    /// Like [`Config::load_merged`], with the user layer read below `home`.
    pub fn load_merged_in(
        home: Option<&Path>,
        project_dir: &Path,
        explicit: Option<&Path>,
    ) -> crate::Result<Self> {
        let mut config = Self::built_in_defaults();

        if let Some(home) = home {
            if let Some(user_config) = Self::load_user_config_in(home)? {
                config.merge(user_config);
            }
        }

        if let Some(project_config) = Self::load_project_config(project_dir)? {
            config.merge(project_config);
        }

        if let Some(path) = explicit {
            config.merge(Self::load(path)?);
        }

        Ok(config)
    }

    /// Options for the linting core.
    pub fn to_run_config(&self) -> RunConfig {
        RunConfig {
            skip_lint: self.skip_lint.unwrap_or(false),
            report_file: self.report_file.clone(),
            report_files_pattern: self.report_files_pattern.clone(),
            limit: self.limit,
        }
    }

    /// Get the path for a project config file
    pub fn project_config_path(project_dir: &Path) -> PathBuf {
        project_dir.join(CONFIG_DIR).join("config.toml")
    }
}
