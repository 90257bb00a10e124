//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/sbml-notes/sbml-notes.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `SBML_NOTES_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{AmpersandMode, Sanitizer, SbmlTarget};

/// Default base for stable-id detail pages.
pub const DEFAULT_REACTOME_URI: &str = "https://reactome.org/content/detail/";

/// Unified configuration for sbml-notes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base URI prepended to stable ids in CV terms
    pub reactome_uri: String,
    /// SBML level quoted in notes
    pub sbml_level: u32,
    /// SBML version quoted in notes
    pub sbml_version: u32,
    /// Toolchain version named in the provenance annotation
    pub jsbml_version: String,
    /// How `&` in free text is neutralized
    pub ampersand: AmpersandMode,
    /// Separator between notes segments
    pub separator: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reactome_uri: DEFAULT_REACTOME_URI.to_string(),
            sbml_level: 3,
            sbml_version: 1,
            jsbml_version: "1.6.1".to_string(),
            ampersand: AmpersandMode::default(),
            separator: "\n".to_string(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub reactome_uri: Option<String>,
    pub sbml_level: Option<u32>,
    pub sbml_version: Option<u32>,
    pub jsbml_version: Option<String>,
    pub ampersand: Option<AmpersandMode>,
    pub separator: Option<String>,
}

/// Get the XDG config directory for sbml-notes.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sbml-notes").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("sbml-notes.toml"))
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
    /// Sanitizer configured for these settings.
    pub fn sanitizer(&self) -> Sanitizer {
        Sanitizer::new(self.ampersand)
    }

    pub fn sbml_target(&self) -> SbmlTarget {
        SbmlTarget {
            level: self.sbml_level,
            version: self.sbml_version,
        }
    }

    /// Detail page URI for a stable id.
    pub fn reactome_url(&self, st_id: &str) -> String {
        format!("{}{}", self.reactome_uri, st_id)
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            reactome_uri: overlay
                .reactome_uri
                .clone()
                .unwrap_or_else(|| self.reactome_uri.clone()),
            sbml_level: overlay.sbml_level.unwrap_or(self.sbml_level),
            sbml_version: overlay.sbml_version.unwrap_or(self.sbml_version),
            jsbml_version: overlay
                .jsbml_version
                .clone()
                .unwrap_or_else(|| self.jsbml_version.clone()),
            ampersand: overlay.ampersand.unwrap_or(self.ampersand),
            separator: overlay
                .separator
                .clone()
                .unwrap_or_else(|| self.separator.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file, applied over the global one
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit config file must exist when given
        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        Ok(current)
    }

    /// Apply SBML_NOTES_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("SBML_NOTES").separator("__"))
            .build()
            .map_err(config_err)?;
        Self::apply_overrides(settings, &config)
    }

    /// Keys missing from `config` inherit; present keys must be valid.
    fn apply_overrides(mut settings: Self, config: &Config) -> Result<Self, ApplicationError> {
        if let Some(val) = optional("reactome_uri", config.get_string("reactome_uri"))? {
            settings.reactome_uri = val;
        }
        if let Some(val) = optional("sbml_level", config.get_int("sbml_level"))? {
            settings.sbml_level = u32::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("sbml_level out of range: {val}"),
            })?;
        }
        if let Some(val) = optional("sbml_version", config.get_int("sbml_version"))? {
            settings.sbml_version = u32::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("sbml_version out of range: {val}"),
            })?;
        }
        if let Some(val) = optional("jsbml_version", config.get_string("jsbml_version"))? {
            settings.jsbml_version = val;
        }
        if let Some(val) = optional("ampersand", config.get::<AmpersandMode>("ampersand"))? {
            settings.ampersand = val;
        }
        if let Some(val) = optional("separator", config.get_string("separator"))? {
            settings.separator = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# sbml-notes configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/sbml-notes/sbml-notes.toml
#   File:   --config <path>
#   Env:    SBML_NOTES_* environment variables (explicit overrides)

# Base URI for stable-id CV terms
# reactome_uri = "https://reactome.org/content/detail/"

# SBML level/version quoted in complex notes
# sbml_level = 3
# sbml_version = 1

# Toolchain version named in the provenance annotation
# jsbml_version = "1.6.1"

# Ampersands in free text: "word" (" and ") or "space"
# ampersand = "word"

# Separator between notes segments
# separator = "\n"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Missing key is `None`; a present but invalid value is an error naming the key.
fn optional<T>(key: &str, value: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match value {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApplicationError::Config {
            message: format!("invalid {key}: {e}"),
        }),
    }
}
