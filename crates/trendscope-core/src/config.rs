use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if a numeric variable fails to parse.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("TRENDSCOPE_LOG_LEVEL", "info");
    let cache_dir = PathBuf::from(or_default("TRENDSCOPE_CACHE_DIR", "./cache"));
    let keywords_path = lookup("TRENDSCOPE_KEYWORDS_PATH").ok().map(PathBuf::from);

    let fetch_request_timeout_secs = parse_u64("TRENDSCOPE_FETCH_REQUEST_TIMEOUT_SECS", "30")?;
    let fetch_deadline_secs = parse_u64("TRENDSCOPE_FETCH_DEADLINE_SECS", "10")?;
    let fetch_max_concurrent = parse_usize("TRENDSCOPE_FETCH_MAX_CONCURRENT", "16")?;
    let fetch_user_agent = or_default(
        "TRENDSCOPE_FETCH_USER_AGENT",
        "trendscope/0.1 (trend-intelligence)",
    );
    let fetch_max_retries = parse_u32("TRENDSCOPE_FETCH_MAX_RETRIES", "2")?;
    let fetch_retry_backoff_base_secs =
        parse_u64("TRENDSCOPE_FETCH_RETRY_BACKOFF_BASE_SECS", "1")?;
    let ai_insight_api_key = lookup("TRENDSCOPE_AI_INSIGHT_API_KEY").ok();

    Ok(AppConfig {
        log_level,
        cache_dir,
        keywords_path,
        fetch_request_timeout_secs,
        fetch_deadline_secs,
        fetch_max_concurrent,
        fetch_user_agent,
        fetch_max_retries,
        fetch_retry_backoff_base_secs,
        ai_insight_api_key,
    })
}
