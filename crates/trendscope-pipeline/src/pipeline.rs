//! The pipeline runner: eight barrier-synchronized stages from a
//! business profile to a cached, ranked trend report.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use trendscope_core::{
    AppConfig, BusinessProfile, KeywordLibrary, PipelineResult, PipelineStats,
};
use trendscope_sources::{build_registry, SourceAdapter};
use uuid::Uuid;

use crate::cache::{JsonFileCache, TrendCache};
use crate::error::PipelineError;
use crate::fetch::{FetchOrchestrator, FetchStrategy};
use crate::lifecycle::detect_lifecycle;
use crate::prioritize::prioritize_trends;
use crate::query_gen::{generate_queries, QueryVolume};
use crate::router::route_category;
use crate::score::{score_trends, DEFAULT_THRESHOLD};
use crate::state::{PipelineStage, PipelineState, StatePublisher};
use crate::triggers::{derive_triggers, match_triggers};
use crate::validate::validate_trends;

/// Per-run knobs. `Default` matches the standard interactive run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub volume: QueryVolume,
    pub min_sources: usize,
    pub relevance_threshold: f64,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            volume: QueryVolume::Standard,
            min_sources: 2,
            relevance_threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Orchestrates the full stage sequence and owns the observable state.
///
/// At most one run per business at a time is assumed; a new run
/// overwrites the observable state of the previous one.
pub struct TrendPipeline {
    orchestrator: FetchOrchestrator,
    keywords: KeywordLibrary,
    cache: Arc<dyn TrendCache>,
    state: StatePublisher,
}

impl TrendPipeline {
    #[must_use]
    pub fn new(
        adapters: Vec<Arc<dyn SourceAdapter>>,
        config: &AppConfig,
        keywords: KeywordLibrary,
        cache: Arc<dyn TrendCache>,
    ) -> Self {
        TrendPipeline {
            orchestrator: FetchOrchestrator::new(
                adapters,
                config.fetch_deadline_secs,
                config.fetch_max_concurrent,
            ),
            keywords,
            cache,
            state: StatePublisher::new(),
        }
    }

    /// Standard assembly: full adapter registry, keyword library from
    /// the configured path (builtin otherwise), file-backed cache.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built or the keyword file is
    /// missing or malformed.
    pub fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        let adapters = build_registry(config)?;
        let keywords = match &config.keywords_path {
            Some(path) => KeywordLibrary::load(path)?,
            None => KeywordLibrary::builtin()?,
        };
        let cache = Arc::new(JsonFileCache::new(config.cache_dir.clone()));
        Ok(TrendPipeline::new(adapters, config, keywords, cache))
    }

    /// Observe stage transitions across the run.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    /// Run the full pipeline for one business.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure; the observable state carries
    /// the same message in its `error` field.
    pub async fn run(
        &self,
        profile: &BusinessProfile,
        options: RunOptions,
    ) -> Result<PipelineResult, PipelineError> {
        match self.run_inner(profile, options).await {
            Ok(result) => {
                self.state.complete(format!(
                    "{} trends, {} content-ready",
                    result.stats.relevant_count, result.stats.content_ready_count
                ));
                Ok(result)
            }
            Err(err) => {
                self.state.fail(err.to_string());
                Err(err)
            }
        }
    }

    async fn run_inner(
        &self,
        profile: &BusinessProfile,
        options: RunOptions,
    ) -> Result<PipelineResult, PipelineError> {
        profile
            .validate()
            .map_err(|err| PipelineError::InvalidProfile(err.to_string()))?;

        self.state
            .enter(PipelineStage::GeneratingQueries, "generating queries");
        let queries = generate_queries(profile, options.volume);
        let category = route_category(profile);
        let pack = self.keywords.pack(category.category).clone();
        tracing::info!(
            business_id = %profile.business_id,
            category = %category.category,
            queries = queries.len(),
            "run planned"
        );

        let strategy = match options.volume {
            QueryVolume::Standard => FetchStrategy::Progressive,
            QueryVolume::Deep => FetchStrategy::Deep,
        };
        self.state.enter(PipelineStage::Fetching, "fetching trends");
        let fetched = self
            .orchestrator
            .run(category.category, &queries, strategy)
            .await?;
        self.state.set_sources(fetched.sources_used.clone());

        self.state
            .enter(PipelineStage::Validating, "validating across sources");
        let raw_trends = fetched.trends.clone();
        let validated = validate_trends(fetched.trends, options.min_sources);
        let validated_count = validated.iter().filter(|t| t.is_validated).count();

        self.state.enter(PipelineStage::Scoring, "scoring relevance");
        let pool = score_trends(validated, profile, &pack, options.relevance_threshold);
        let relevant_count = pool.iter().filter(|t| t.is_relevant).count();

        self.state
            .enter(PipelineStage::Prioritizing, "prioritizing by emotional quotient");
        let mut prioritized = prioritize_trends(pool, profile, pack.default_eq);
        detect_lifecycle(&mut prioritized, Utc::now());

        self.state
            .enter(PipelineStage::Matching, "matching customer triggers");
        let triggers = derive_triggers(profile);
        let trends = match_triggers(prioritized, &triggers);

        let stats = PipelineStats {
            raw_count: raw_trends.len(),
            validated_count,
            relevant_count,
            content_ready_count: trends.iter().filter(|t| t.is_content_ready).count(),
        };
        let result = PipelineResult {
            business_id: profile.business_id.clone(),
            run_id: Uuid::new_v4(),
            trends,
            raw_trends,
            queries,
            category,
            stats,
            sources_used: fetched.sources_used,
            completed_at: Utc::now(),
        };

        self.cache.save(&profile.business_id, &result).await?;
        Ok(result)
    }

    /// Last completed result for a business, if any survives in the
    /// cache.
    ///
    /// # Errors
    ///
    /// Fails on cache I/O or a corrupt entry.
    pub async fn load_cached(
        &self,
        business_id: &str,
    ) -> Result<Option<PipelineResult>, PipelineError> {
        self.cache.load(business_id).await
    }

    /// Drop the cached result for one business.
    ///
    /// # Errors
    ///
    /// Fails on cache I/O.
    pub async fn clear_cached(&self, business_id: &str) -> Result<(), PipelineError> {
        self.cache.clear(business_id).await
    }
}
