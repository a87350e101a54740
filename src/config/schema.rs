use serde::{Deserialize, Serialize};

use crate::conditions::{ConditionType, ParameterType};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// extra or overriding condition types
    #[serde(default)]
    pub condition_types: Vec<ConditionTypeConfig>,
    #[serde(default)]
    pub settings: Settings,
}

/// one condition type declared in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionTypeConfig {
    pub id: ConditionType,
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParameterType>,
}

pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// start from the standard condition table before applying `condition_types`
    #[serde(default = "default_include_builtin_types")]
    pub include_builtin_types: bool,
    /// tracing filter used when neither `SCRIPTCOND_LOG` nor `--verbose` is set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_include_builtin_types() -> bool {
    true
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            include_builtin_types: true,
            log_level: default_log_level(),
        }
    }
}
