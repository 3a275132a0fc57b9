//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/asciitree/asciitree.toml`
//! 3. Local config: `<dir>/.asciitree.toml` (the directory being rendered)
//! 4. Environment variables: `ASCIITREE_*` prefix
//! 5. Command-line flags (applied by the CLI via [`Settings::merge_with`])

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// Unified configuration for asciitree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Order siblings by name
    pub sort: bool,
    /// List directories before files
    pub dirs_first: bool,
    /// Include entries whose name starts with `.`
    pub show_hidden: bool,
    /// Descend into symlinked directories
    pub follow_links: bool,
    /// Append file sizes as a second label line
    pub show_size: bool,
    /// Maximum directory depth (unlimited if unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    /// Regex patterns; matching entry names are skipped
    pub exclude: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sort: true,
            dirs_first: false,
            show_hidden: false,
            follow_links: false,
            show_size: false,
            max_depth: None,
            exclude: Vec::new(),
        }
    }
}

/// Raw settings for intermediate parsing (all fields optional to detect "not specified").
///
/// Used during layered config merging to distinguish between:
/// - `None` → field not specified, inherit from base
/// - `Some([])` → explicit empty array
/// - `Some([...])` → explicit values to merge
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub sort: Option<bool>,
    pub dirs_first: Option<bool>,
    pub show_hidden: Option<bool>,
    pub follow_links: Option<bool>,
    pub show_size: Option<bool>,
    pub max_depth: Option<usize>,
    pub exclude: Option<Vec<String>>,
}

/// Get the XDG config directory for asciitree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "asciitree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("asciitree.toml"))
}

/// Get the path to the local config file in a rendered directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".asciitree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
    /// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(pattern.clone());
            }
        }

        // Convert to sorted Vec for deterministic output
        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Merge overlay config onto self (base).
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - `exclude`: union merge with negation support (if overlay specified)
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            exclude: overlay
                .exclude
                .as_ref()
                .map(|o| Self::merge_array(&self.exclude, o))
                .unwrap_or_else(|| self.exclude.clone()),
            ..self.apply_scalars(overlay)
        }
    }

    /// Apply global config onto defaults with REPLACE semantics for arrays.
    ///
    /// Unlike `merge_with()` which uses union semantics, this method replaces
    /// `exclude` entirely if the global config specifies it.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            exclude: global
                .exclude
                .clone()
                .unwrap_or_else(|| self.exclude.clone()),
            ..self.apply_scalars(global)
        }
    }

    fn apply_scalars(&self, overlay: &RawSettings) -> Self {
        Self {
            sort: overlay.sort.unwrap_or(self.sort),
            dirs_first: overlay.dirs_first.unwrap_or(self.dirs_first),
            show_hidden: overlay.show_hidden.unwrap_or(self.show_hidden),
            follow_links: overlay.follow_links.unwrap_or(self.follow_links),
            show_size: overlay.show_size.unwrap_or(self.show_size),
            max_depth: overlay.max_depth.or(self.max_depth),
            exclude: self.exclude.clone(),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory whose `.asciitree.toml` is merged in
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE (global defines the real baseline)
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE (explicit user override)
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_files(global_config_path().as_deref(), local_dir)?.with_env_overrides()
    }

    /// Load only the file layers: defaults, then `global` (if it exists),
    /// then the local config of `local_dir`. Environment is not consulted.
    pub fn load_files(
        global: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Load global config (REPLACES defaults)
        if let Some(global_path) = global {
            if global_path.exists() {
                debug!("loading global config: {}", global_path.display());
                let raw = load_raw_settings(global_path)?;
                current = current.apply_global(&raw);
            }
        }

        // 3. Load and merge local config (UNION with global)
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("loading local config: {}", local_path.display());
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        Ok(current)
    }

    /// Apply ASCIITREE_* environment variables as explicit overrides.
    ///
    /// Unset variables leave the setting alone; a value that does not parse
    /// is a config error, same as in a TOML file.
    pub fn with_env_overrides(mut self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let builder = Config::builder().add_source(
            Environment::with_prefix("ASCIITREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("exclude"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Some(val) = env_value(&config, "sort")? {
            self.sort = val;
        }
        if let Some(val) = env_value(&config, "dirs_first")? {
            self.dirs_first = val;
        }
        if let Some(val) = env_value(&config, "show_hidden")? {
            self.show_hidden = val;
        }
        if let Some(val) = env_value(&config, "follow_links")? {
            self.follow_links = val;
        }
        if let Some(val) = env_value(&config, "show_size")? {
            self.show_size = val;
        }
        if let Some(val) = env_value::<usize>(&config, "max_depth")? {
            self.max_depth = Some(val);
        }
        if let Some(val) = env_value(&config, "exclude")? {
            self.exclude = val;
        }

        Ok(self)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# asciitree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/asciitree/asciitree.toml  (defines your baseline)
#   Local:  <dir>/.asciitree.toml               (per-directory additions)
#   Env:    ASCIITREE_* environment variables   (explicit overrides)
#   Flags:  command-line options
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global.
#   Use "!pattern" in local config to REMOVE an inherited pattern:
#     exclude = ["^dist$", "!^target$"]

# Order siblings by name
# sort = true

# List directories before files
# dirs_first = false

# Include hidden entries (names starting with '.')
# show_hidden = false

# Descend into symlinked directories
# follow_links = false

# Show file sizes below file names
# show_size = false

# Maximum directory depth
# max_depth = 3

# Regex patterns matched against entry names
# exclude = ["^target$", "^node_modules$"]
"#
        .to_string()
    }
}

/// Typed lookup of one env key; `None` when the variable is not set.
fn env_value<T: DeserializeOwned>(
    config: &Config,
    key: &str,
) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApplicationError::Config {
            message: format!("ASCIITREE_{}: {}", key.to_uppercase(), e),
        }),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
