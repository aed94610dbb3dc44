//! Environment variable overrides.

use crate::error::ConfigError;

use super::Config;

pub(super) fn apply_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(value) = non_empty(env_lookup, "CODELY_POLL_INTERVAL_MS") {
        config.ui.status_poll_interval_ms = value.parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid CODELY_POLL_INTERVAL_MS value `{value}`: expected milliseconds"
            ))
        })?;
    }
    if let Some(value) = non_empty(env_lookup, "CODELY_MANAGER_WIDTH") {
        config.ui.manager_width = value.parse::<u16>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid CODELY_MANAGER_WIDTH value `{value}`: expected columns"
            ))
        })?;
    }
    if let Some(value) = non_empty(env_lookup, "CODELY_DEFAULT_COMMAND") {
        config.default_command = value;
    }
    Ok(())
}

fn non_empty<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
