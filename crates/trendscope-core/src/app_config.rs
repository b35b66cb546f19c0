use std::path::PathBuf;

/// Application configuration, read once at startup from environment
/// variables. See [`crate::load_app_config`].
#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Directory holding one cached `PipelineResult` JSON file per business.
    pub cache_dir: PathBuf,
    /// Optional on-disk keyword pack overriding the compiled-in default.
    pub keywords_path: Option<PathBuf>,
    pub fetch_request_timeout_secs: u64,
    /// Per-adapter-call deadline in deep mode.
    pub fetch_deadline_secs: u64,
    /// Upper bound on in-flight adapter calls in deep mode.
    pub fetch_max_concurrent: usize,
    pub fetch_user_agent: String,
    pub fetch_max_retries: u32,
    pub fetch_retry_backoff_base_secs: u64,
    /// API key for the AI-insight synthesis service, when configured.
    pub ai_insight_api_key: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("cache_dir", &self.cache_dir)
            .field("keywords_path", &self.keywords_path)
            .field(
                "fetch_request_timeout_secs",
                &self.fetch_request_timeout_secs,
            )
            .field("fetch_deadline_secs", &self.fetch_deadline_secs)
            .field("fetch_max_concurrent", &self.fetch_max_concurrent)
            .field("fetch_user_agent", &self.fetch_user_agent)
            .field("fetch_max_retries", &self.fetch_max_retries)
            .field(
                "fetch_retry_backoff_base_secs",
                &self.fetch_retry_backoff_base_secs,
            )
            .field(
                "ai_insight_api_key",
                &self.ai_insight_api_key.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
