mod schema;

pub use schema::{Config, ConditionTypeConfig, Settings, DEFAULT_LOG_LEVEL};

use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::conditions::{
    ConditionError, ConditionTemplate, ConditionType, ParameterType, TemplateRegistry,
    MAX_CONDITION_PARAMETERS,
};

const CONFIG_ENV_VAR: &str = "SCRIPTCOND_CONFIG";

pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }

    // ~/.scriptcond/config.json
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".scriptcond").join("config.json"))
}

/// `--config` wins over the environment and the default location
pub fn get_config_path_with_override(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => get_config_path(),
    }
}

/// load from the default location; a missing file yields defaults
pub fn load() -> Result<Config> {
    load_from(&get_config_path()?)
}

pub fn load_with_override(path: Option<&Path>) -> Result<Config> {
    load_from(&get_config_path_with_override(path)?)
}

pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// parse config text; plain JSON and JSON5 are both accepted
pub fn parse(content: &str) -> Result<Config> {
    let config: Config = json5::from_str(content)?;
    Ok(config)
}

/// Verify configuration file and return a list of errors
pub fn verify(path: &Path) -> Result<Vec<String>> {
    let mut errors = Vec::new();

    if !path.exists() {
        return Err(anyhow!("config file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config = match parse(&content) {
        Ok(c) => c,
        Err(e) => {
            return Err(anyhow!("invalid config: {}", e));
        }
    };

    let mut ids = HashSet::new();
    let mut names = HashSet::new();

    // replays registry() so collisions with builtin names are caught in order
    let mut registry = if config.settings.include_builtin_types {
        TemplateRegistry::builtin()
    } else {
        TemplateRegistry::new()
    };

    for (i, ty) in config.condition_types.iter().enumerate() {
        let prefix = format!("condition_types[{}]", i);

        if ty.name.trim().is_empty() {
            errors.push(format!("{}: name must not be empty", prefix));
        }

        if !ids.insert(ty.id) {
            errors.push(format!("{}: duplicate id {}", prefix, ty.id));
        }

        if !names.insert(ty.name.as_str()) {
            errors.push(format!("{}: duplicate name '{}'", prefix, ty.name));
        }

        if ty.params.len() > MAX_CONDITION_PARAMETERS {
            errors.push(format!(
                "{}: {} parameters, at most {} allowed",
                prefix,
                ty.params.len(),
                MAX_CONDITION_PARAMETERS
            ));
        }

        let inserted = registry.insert(ConditionTemplate::new(ty.id, ty.name.clone(), ty.params.clone()));
        if let Err(e) = inserted {
            // clashes with earlier config entries are reported as duplicate names above
            if let ConditionError::DuplicateName { existing, .. } = &e {
                if !ids.contains(existing) {
                    errors.push(format!("{}: {}", prefix, e));
                }
            }
        }
    }

    Ok(errors)
}

impl Config {
    /// registry described by this config: the builtin table (unless disabled)
    /// with `condition_types` added on top, replacing entries with the same id
    pub fn registry(&self) -> Result<TemplateRegistry, ConditionError> {
        let mut registry = if self.settings.include_builtin_types {
            TemplateRegistry::builtin()
        } else {
            TemplateRegistry::new()
        };

        for ty in &self.condition_types {
            let replaced = registry.insert(ConditionTemplate::new(
                ty.id,
                ty.name.clone(),
                ty.params.clone(),
            ))?;
            if let Some(old) = replaced {
                debug!(id = %ty.id, old = %old.internal_name, new = %ty.name, "config overrides condition type");
            }
        }

        Ok(registry)
    }
}

/// generates a default config with one example condition type
pub fn default_with_examples() -> Config {
    Config {
        condition_types: vec![ConditionTypeConfig {
            id: ConditionType(100),
            name: "UNIT_HEALTH_BELOW".to_string(),
            params: vec![ParameterType::Unit, ParameterType::Int],
        }],
        settings: Settings::default(),
    }
}
