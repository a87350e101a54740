//! stderr logging for the binary

use std::env;
use std::path::Path;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{self, DEFAULT_LOG_LEVEL};

const LOG_ENV_VAR: &str = "SCRIPTCOND_LOG";

/// pick the filter directive: env var, then `-v` count, then config
fn filter_directive(env_value: Option<String>, verbose: u8, config_level: Option<String>) -> String {
    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        return value;
    }
    match verbose {
        0 => config_level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

pub fn init(verbose: u8, config_path: Option<&Path>) {
    // a broken config is reported by the command itself
    let config_level = config::load_with_override(config_path)
        .ok()
        .map(|c| c.settings.log_level);

    let directive = filter_directive(env::var(LOG_ENV_VAR).ok(), verbose, config_level);
    let filter =
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
