//! End-to-end pipeline runs over canned adapters.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use trendscope_core::{AppConfig, BusinessProfile, Category, KeywordLibrary, Query, RawTrendItem};
use trendscope_pipeline::{
    MemoryCache, PipelineError, PipelineStage, RunOptions, TrendPipeline,
};
use trendscope_sources::{Capability, SourceAdapter, SourceError};

struct StaticAdapter {
    name: &'static str,
    capability: Capability,
    items: Vec<(&'static str, &'static str)>,
}

#[async_trait]
impl SourceAdapter for StaticAdapter {
    fn id(&self) -> &'static str {
        self.name
    }

    fn capability(&self) -> Capability {
        self.capability
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<RawTrendItem>, SourceError> {
        Ok(self
            .items
            .iter()
            .map(|(title, description)| {
                RawTrendItem::new(
                    self.name,
                    (*title).to_string(),
                    (*description).to_string(),
                    None,
                    // Fixed date keeps two identical runs byte-identical.
                    Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).single(),
                    query.intent,
                )
            })
            .collect())
    }
}

struct FailingAdapter;

#[async_trait]
impl SourceAdapter for FailingAdapter {
    fn id(&self) -> &'static str {
        "broken_source"
    }

    fn capability(&self) -> Capability {
        Capability::Video
    }

    async fn fetch(&self, _query: &Query) -> Result<Vec<RawTrendItem>, SourceError> {
        Err(SourceError::NotConfigured("no credentials".to_string()))
    }
}

fn config() -> AppConfig {
    AppConfig {
        log_level: "debug".to_string(),
        cache_dir: PathBuf::from("./cache"),
        keywords_path: None,
        fetch_request_timeout_secs: 5,
        fetch_deadline_secs: 5,
        fetch_max_concurrent: 8,
        fetch_user_agent: "trendscope-test".to_string(),
        fetch_max_retries: 0,
        fetch_retry_backoff_base_secs: 1,
        ai_insight_api_key: None,
    }
}

fn saas_profile() -> BusinessProfile {
    BusinessProfile {
        business_id: "acme-analytics".to_string(),
        business_name: "Acme Analytics".to_string(),
        industry: "marketing analytics software".to_string(),
        target_customer: "b2b marketing teams at software companies".to_string(),
        pain_points: vec![
            "attribution reporting".to_string(),
            "wasted ad spend".to_string(),
        ],
        differentiators: vec!["real-time dashboards".to_string()],
        products: vec!["analytics platform".to_string()],
        core_function: Some("track marketing campaign performance".to_string()),
        market_signals: vec!["national".to_string(), "saas".to_string(), "b2b".to_string()],
        emotional_drivers: vec!["confidence".to_string()],
        functional_drivers: vec!["automation".to_string()],
        service_area: None,
        emotional_quotient: None,
    }
}

const ON_TOPIC_TITLE: &str = "Rising demand for marketing analytics software";
const ON_TOPIC_DESC: &str = "b2b marketing teams at software companies adopting analytics \
     platform automation for attribution reporting and marketing campaign performance";

fn corroborating_adapters() -> Vec<Arc<dyn SourceAdapter>> {
    vec![
        Arc::new(StaticAdapter {
            name: "alpha_search",
            capability: Capability::GenericSearch,
            items: vec![
                (ON_TOPIC_TITLE, ON_TOPIC_DESC),
                ("HVAC repair demand spikes", "furnace maintenance season"),
            ],
        }),
        Arc::new(StaticAdapter {
            name: "beta_news",
            capability: Capability::News,
            items: vec![(ON_TOPIC_TITLE, "industry press coverage of the shift")],
        }),
        Arc::new(FailingAdapter),
    ]
}

fn pipeline(adapters: Vec<Arc<dyn SourceAdapter>>) -> TrendPipeline {
    TrendPipeline::new(
        adapters,
        &config(),
        KeywordLibrary::builtin().unwrap(),
        Arc::new(MemoryCache::new()),
    )
}

#[tokio::test]
async fn full_run_corroborates_scores_and_matches() {
    let pipeline = pipeline(corroborating_adapters());
    let rx = pipeline.subscribe();

    let result = pipeline
        .run(&saas_profile(), RunOptions::default())
        .await
        .unwrap();

    assert_eq!(result.category.category, Category::NationalSaasB2b);
    assert_eq!(rx.borrow().stage, PipelineStage::Complete);
    assert!(result.sources_used.contains(&"alpha_search".to_string()));
    assert!(result.sources_used.contains(&"beta_news".to_string()));
    assert!(!result.sources_used.contains(&"broken_source".to_string()));

    let on_topic = result
        .trends
        .iter()
        .find(|t| t.title() == ON_TOPIC_TITLE)
        .expect("on-topic trend survives the pipeline");
    assert!(on_topic.trend.trend.trend.is_validated);
    assert_eq!(on_topic.trend.trend.trend.corroborating_sources.len(), 2);
    assert!(on_topic.trend.trend.is_relevant);
    assert!(on_topic.is_content_ready);
    assert!(on_topic.primary_trigger.is_some());

    assert!(result.stats.raw_count >= 2);
    assert!(result.stats.content_ready_count >= 1);
}

#[tokio::test]
async fn content_ready_implies_validated_and_relevant() {
    let pipeline = pipeline(corroborating_adapters());
    let result = pipeline
        .run(&saas_profile(), RunOptions::default())
        .await
        .unwrap();
    for trend in &result.trends {
        if trend.is_content_ready {
            assert!(trend.trend.trend.trend.is_validated);
            assert!(trend.trend.trend.is_relevant);
        }
    }
}

#[tokio::test]
async fn negative_keyword_items_never_rank_as_relevant() {
    let pipeline = pipeline(corroborating_adapters());
    let result = pipeline
        .run(&saas_profile(), RunOptions::default())
        .await
        .unwrap();
    for trend in &result.trends {
        if trend.title().contains("HVAC") {
            assert!(!trend.trend.trend.is_relevant);
            assert!(trend.trend.trend.relevance.overall.abs() < f64::EPSILON);
        }
    }
}

#[tokio::test]
async fn empty_sources_end_in_error_state_with_message() {
    let empty: Vec<Arc<dyn SourceAdapter>> = vec![
        Arc::new(StaticAdapter {
            name: "alpha_search",
            capability: Capability::GenericSearch,
            items: vec![],
        }),
        Arc::new(FailingAdapter),
    ];
    let pipeline = pipeline(empty);
    let rx = pipeline.subscribe();

    let err = pipeline
        .run(&saas_profile(), RunOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::NoTrendsFetched));
    assert_eq!(err.to_string(), "No trends fetched from any source");

    let state = rx.borrow();
    assert_eq!(state.stage, PipelineStage::Error);
    assert_eq!(
        state.error.as_deref(),
        Some("No trends fetched from any source")
    );
}

#[tokio::test]
async fn identical_inputs_produce_identical_ranked_output() {
    let profile = saas_profile();
    let first = pipeline(corroborating_adapters())
        .run(&profile, RunOptions::default())
        .await
        .unwrap();
    let second = pipeline(corroborating_adapters())
        .run(&profile, RunOptions::default())
        .await
        .unwrap();

    // run_id and completed_at legitimately differ; the ranked content
    // must not.
    assert_eq!(
        serde_json::to_value(&first.trends).unwrap(),
        serde_json::to_value(&second.trends).unwrap()
    );
    assert_eq!(
        serde_json::to_value(&first.stats).unwrap(),
        serde_json::to_value(&second.stats).unwrap()
    );
    assert_eq!(first.sources_used, second.sources_used);
}

#[tokio::test]
async fn results_are_cached_per_business() {
    let pipeline = pipeline(corroborating_adapters());
    let profile = saas_profile();
    let result = pipeline.run(&profile, RunOptions::default()).await.unwrap();

    let cached = pipeline
        .load_cached(&profile.business_id)
        .await
        .unwrap()
        .expect("result cached after a successful run");
    assert_eq!(cached.run_id, result.run_id);

    assert!(pipeline.load_cached("someone-else").await.unwrap().is_none());

    pipeline.clear_cached(&profile.business_id).await.unwrap();
    assert!(pipeline
        .load_cached(&profile.business_id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn invalid_profile_is_rejected_before_fetching() {
    let pipeline = pipeline(corroborating_adapters());
    let mut profile = saas_profile();
    profile.business_id = String::new();
    let err = pipeline.run(&profile, RunOptions::default()).await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidProfile(_)));
}
