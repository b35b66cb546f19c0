use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Every adapter call failed or returned empty. The only fetch-stage
    /// condition that halts a run.
    #[error("No trends fetched from any source")]
    NoTrendsFetched,

    #[error("invalid business profile: {0}")]
    InvalidProfile(String),

    #[error("configuration error: {0}")]
    Config(#[from] trendscope_core::ConfigError),

    #[error("source setup error: {0}")]
    Source(#[from] trendscope_sources::SourceError),

    #[error("cache I/O error for {business_id}: {source}")]
    CacheIo {
        business_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cache serialization error: {0}")]
    CacheSerde(#[from] serde_json::Error),
}
