use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::merge::{merge, merge_fields};

pub const DEFAULT_CONFIG_FILE: &str = ".config";
/// File-name placeholder that expands to `<Name>_<resume stem>`.
pub const DEFAULT_FILE_NAME: &str = "default";

const LOG_LEVELS: &[&str] = &["debug", "info", "warn", "error"];

/// Application configuration.
///
/// Layered as `defaults ← config file ← environment ← command line`; each
/// layer only overrides the values it actually sets (empty strings and
/// `false` leave the layer below untouched).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base résumé that fills in anything the application résumé leaves out.
    pub base: String,
    pub template: String,
    pub tex: String,
    /// Output file stem for the résumé.
    pub pdf: String,
    pub cover_file: String,
    pub order: String,
    pub cover: bool,
    pub log_level: String,
}

merge_fields!(Config {
    base,
    template,
    tex,
    pdf,
    cover_file,
    order,
    cover,
    log_level,
});

impl Config {
    pub fn defaults() -> Self {
        Config {
            base: String::new(),
            template: "./templates".to_string(),
            tex: "tex".to_string(),
            pdf: DEFAULT_FILE_NAME.to_string(),
            cover_file: DEFAULT_FILE_NAME.to_string(),
            order: "all".to_string(),
            cover: false,
            log_level: "error".to_string(),
        }
    }

    /// Reads a YAML config file. A missing file is `Ok(None)`; a malformed one is an error.
    pub fn from_file(path: &Path) -> Result<Option<Self>, AppError> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        if raw.trim().is_empty() {
            return Ok(Some(Config::default()));
        }
        let config = serde_yaml_ng::from_str(&raw).map_err(|e| {
            AppError::Config(format!("could not decode {}: {e}", path.display()))
        })?;
        Ok(Some(config))
    }

    /// Environment overrides. Loads `.env` if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Config {
            base: lookup("RESUMAKE_BASE").unwrap_or_default(),
            template: lookup("RESUMAKE_TEMPLATE_DIR").unwrap_or_default(),
            tex: lookup("RESUMAKE_TEX_DIR").unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Builds the effective configuration from defaults, the file at `path`,
    /// and `overrides` applied in order.
    pub fn load(path: &Path, overrides: &[Config]) -> Result<Self, AppError> {
        let mut config = Config::defaults();
        match Config::from_file(path)? {
            Some(file) => {
                merge(&mut config, &file);
                info!("Loaded configuration from {}", path.display());
            }
            None => debug!("No configuration file at {}, using defaults", path.display()),
        }
        for layer in overrides {
            merge(&mut config, layer);
        }
        config.template = resolve_template_dir(&config.template)
            .to_string_lossy()
            .into_owned();
        Ok(config)
    }

    /// The log level as a tracing directive, or `None` if it is not one of
    /// `debug`, `info`, `warn`, `error`.
    pub fn tracing_level(&self) -> Option<&'static str> {
        let wanted = self.log_level.trim().to_lowercase();
        LOG_LEVELS.iter().copied().find(|level| *level == wanted)
    }

    pub fn base_file(&self) -> Option<&Path> {
        (!self.base.is_empty()).then(|| Path::new(self.base.as_str()))
    }
}

/// A template path that names a file resolves to the file's directory.
fn resolve_template_dir(template: &str) -> PathBuf {
    let path = PathBuf::from(template);
    if path.is_file() {
        if let Some(parent) = path.parent() {
            return parent.to_path_buf();
        }
    }
    path
}
