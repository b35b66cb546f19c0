//! The adapter trait and the default adapter registry.

use std::sync::Arc;

use async_trait::async_trait;

use trendscope_core::{AppConfig, Query, RawTrendItem};

use crate::adapters::{
    AiInsightAdapter, ForumAdapter, KeywordResearchAdapter, LocalDensityAdapter, NewsAdapter,
    ProfessionalNetworkAdapter, SearchAdapter, ShoppingAdapter, SuggestAdapter, VelocityAdapter,
    VideoAdapter, WeatherAdapter,
};
use crate::client::HttpClient;
use crate::error::SourceError;

/// What kind of data a source contributes. The fetch stage selects
/// adapters by capability, per routing category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    GenericSearch,
    News,
    Autocomplete,
    Video,
    ForumMining,
    AiInsight,
    WeatherOpportunity,
    LocalDensity,
    ProfessionalNetwork,
    KeywordResearch,
    TrendVelocity,
    Shopping,
}

/// One external data source.
///
/// `fetch` either resolves with zero-or-more items or returns an error;
/// implementations must never panic. Returned items carry the adapter's
/// id as their `source` and the query's intent.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Stable source identifier, used for corroboration counting.
    fn id(&self) -> &'static str;

    fn capability(&self) -> Capability;

    async fn fetch(&self, query: &Query) -> Result<Vec<RawTrendItem>, SourceError>;
}

/// Build the full default adapter set from application config.
///
/// All twelve adapters are constructed; the fetch stage decides which of
/// them run for a given category.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the shared HTTP client cannot be built.
pub fn build_registry(config: &AppConfig) -> Result<Vec<Arc<dyn SourceAdapter>>, SourceError> {
    let client = HttpClient::new(
        config.fetch_request_timeout_secs,
        &config.fetch_user_agent,
        config.fetch_max_retries,
        config.fetch_retry_backoff_base_secs,
    )?;

    Ok(vec![
        Arc::new(SearchAdapter::new(client.clone())),
        Arc::new(NewsAdapter::new(client.clone())),
        Arc::new(SuggestAdapter::new(client.clone())),
        Arc::new(VideoAdapter::new(client.clone())),
        Arc::new(ForumAdapter::new(client.clone())),
        Arc::new(AiInsightAdapter::new(
            client.clone(),
            config.ai_insight_api_key.clone(),
        )),
        Arc::new(WeatherAdapter::new(client.clone())),
        Arc::new(LocalDensityAdapter::new(client.clone())),
        Arc::new(ProfessionalNetworkAdapter::new(client.clone())),
        Arc::new(KeywordResearchAdapter::new(client.clone())),
        Arc::new(VelocityAdapter::new(client.clone())),
        Arc::new(ShoppingAdapter::new(client)),
    ])
}
