//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static WORKSPACE_CONFIG_PATH: &str = ".ctxcopy/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub clipboard: ClipboardSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Defaults {
    #[serde(default)]
    scratch_dir: Option<String>,
    #[serde(default)]
    announce_failures: Option<bool>,
}

impl Defaults {
    /// Directory for aggregate scratch documents. Unset or empty means the
    /// system temp directory plus `ctxcopy`.
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join("ctxcopy"))
    }

    /// Whether skipped documents get a per-file stderr line on top of the log
    /// output.
    pub fn announce_failures(&self) -> bool {
        self.announce_failures.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ClipboardSettings {
    #[serde(default)]
    allow_fallback_commands: Option<bool>,
}

impl ClipboardSettings {
    pub fn allow_fallback_commands(&self) -> bool {
        self.allow_fallback_commands.unwrap_or(true)
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    scratch_dir: Option<String>,
    announce_failures: Option<bool>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            scratch_dir: env::var("CTXCOPY_SCRATCH_DIR").ok(),
            announce_failures: env::var("CTXCOPY_ANNOUNCE_FAILURES")
                .ok()
                .map(|value| matches!(value.as_str(), "1" | "true" | "yes")),
        }
    }

    #[cfg(test)]
    fn for_tests(scratch_dir: &str, announce_failures: bool) -> Self {
        Self {
            scratch_dir: Some(scratch_dir.to_owned()),
            announce_failures: Some(announce_failures),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config,
    /// and env overrides.
    pub fn load(workspace_root: Option<&Path>) -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_root.map(|root| root.join(WORKSPACE_CONFIG_PATH));
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut config = Self::from_str(&DEFAULT_CONFIG)?;

        if let Some(global_path) = global.filter(|path| path.exists()) {
            config = config.merge(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            config = config.merge(Self::from_file(&workspace_path)?);
        }

        Ok(apply_env_overrides(config, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).context("failed to parse TOML config")?;
        Ok(config)
    }

    fn merge(self, overlay: Self) -> Self {
        Self {
            defaults: Defaults {
                scratch_dir: overlay.defaults.scratch_dir.or(self.defaults.scratch_dir),
                announce_failures: overlay
                    .defaults
                    .announce_failures
                    .or(self.defaults.announce_failures),
            },
            clipboard: ClipboardSettings {
                allow_fallback_commands: overlay
                    .clipboard
                    .allow_fallback_commands
                    .or(self.clipboard.allow_fallback_commands),
            },
        }
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("ctxcopy/config.toml"))
}

/// Walk up from `start` to the nearest directory containing `.git`.
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(scratch_dir) = env.scratch_dir {
        config.defaults.scratch_dir = Some(scratch_dir);
    }
    if let Some(announce) = env.announce_failures {
        config.defaults.announce_failures = Some(announce);
    }
    config
}
