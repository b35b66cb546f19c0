use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Which kind of source a query is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Search,
    News,
    Video,
    Social,
    Ai,
}

/// What a query is trying to surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    Trend,
    PainPoint,
    Opportunity,
    Industry,
    Product,
}

/// One generated search query. Immutable; consumed only by the fetch stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    pub query_type: QueryType,
    pub intent: QueryIntent,
    /// Higher runs first. 0–100.
    pub priority: u8,
}

/// Deterministic trend item id: hex SHA-256 over source, URL (or title
/// when no URL exists), and title. Identical inputs always hash to the
/// same id, which the idempotence guarantee depends on.
#[must_use]
pub fn trend_id(source: &str, source_url: Option<&str>, title: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update(b"\n");
    hasher.update(source_url.unwrap_or(title).as_bytes());
    hasher.update(b"\n");
    hasher.update(title.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// One item returned by one adapter call. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTrendItem {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Adapter id that produced this item.
    pub source: String,
    pub source_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    /// Numeric side-channel data, e.g. `trend_velocity` or `engagement`.
    #[serde(default)]
    pub metadata: BTreeMap<String, f64>,
    pub query_intent: QueryIntent,
}

impl RawTrendItem {
    /// Build an item with its id derived from source + URL + title.
    #[must_use]
    pub fn new(
        source: &str,
        title: String,
        description: String,
        source_url: Option<String>,
        published_at: Option<DateTime<Utc>>,
        query_intent: QueryIntent,
    ) -> Self {
        let id = trend_id(source, source_url.as_deref(), &title);
        Self {
            id,
            title,
            description,
            source: source.to_string(),
            source_url,
            published_at,
            metadata: BTreeMap::new(),
            query_intent,
        }
    }

    /// Title and description joined for text matching.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// Trend after multi-source corroboration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatedTrend {
    pub item: RawTrendItem,
    pub is_validated: bool,
    /// Monotonic in the corroborating-source count, 0–100.
    pub validation_score: f64,
    pub corroborating_sources: BTreeSet<String>,
}

/// Per-dimension relevance breakdown for one trend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevanceScore {
    /// Weighted overall score, 0–100.
    pub overall: f64,
    /// Dimension name -> dimension score (0–100).
    pub breakdown: BTreeMap<String, f64>,
    pub matched_keywords: Vec<String>,
    pub passes_core_function_check: bool,
}

/// Trend after relevance scoring and gating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredTrend {
    pub trend: ValidatedTrend,
    pub relevance: RelevanceScore,
    pub is_relevant: bool,
}

impl ScoredTrend {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.trend.item.id
    }
}

/// Market maturity classification of a trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStage {
    Emerging,
    Growing,
    Peak,
    Declining,
    Evergreen,
}

impl LifecycleStage {
    /// Human-readable label for dashboards and log lines.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LifecycleStage::Emerging => "Emerging — early signal, low corroboration",
            LifecycleStage::Growing => "Growing — accelerating interest",
            LifecycleStage::Peak => "Peak — broad, heavily corroborated",
            LifecycleStage::Declining => "Declining — aging signal",
            LifecycleStage::Evergreen => "Evergreen — persistent baseline demand",
        }
    }
}

impl std::fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LifecycleStage::Emerging => "emerging",
            LifecycleStage::Growing => "growing",
            LifecycleStage::Peak => "peak",
            LifecycleStage::Declining => "declining",
            LifecycleStage::Evergreen => "evergreen",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleInfo {
    pub stage: LifecycleStage,
    pub stage_label: String,
}

/// Trend after EQ re-ranking and lifecycle classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleTrend {
    pub trend: ScoredTrend,
    /// Relevance blended with emotional-driver density, 0–100.
    pub eq_adjusted_score: f64,
    pub lifecycle: LifecycleInfo,
}

impl LifecycleTrend {
    #[must_use]
    pub fn id(&self) -> &str {
        self.trend.id()
    }
}

/// Which customer motivation a trigger speaks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCategory {
    Pain,
    Desire,
    Fear,
    Aspiration,
}

/// A pain/desire/fear/aspiration signal derived from the business profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerTrigger {
    pub category: TriggerCategory,
    pub phrase: String,
    pub keywords: Vec<String>,
}

/// A trigger matched against a trend, with match strength 0–100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerMatch {
    pub trigger: CustomerTrigger,
    pub strength: f64,
}

/// Suggested content framing for a matched trend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentMatch {
    pub suggested_hook: String,
    pub content_angles: Vec<String>,
}

/// Final pipeline record: a trend with its trigger match attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendWithMatches {
    pub trend: LifecycleTrend,
    pub primary_trigger: Option<TriggerMatch>,
    pub best_match: Option<ContentMatch>,
    pub is_content_ready: bool,
}

impl TrendWithMatches {
    #[must_use]
    pub fn id(&self) -> &str {
        self.trend.id()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.trend.trend.trend.item.title
    }
}

/// Closed routing category set. Slugs (kebab-case) key the keyword packs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    LocalB2bService,
    LocalB2cService,
    RegionalB2bAgency,
    RegionalB2cRetail,
    NationalSaasB2b,
    NationalProductB2c,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::LocalB2bService,
        Category::LocalB2cService,
        Category::RegionalB2bAgency,
        Category::RegionalB2cRetail,
        Category::NationalSaasB2b,
        Category::NationalProductB2c,
    ];

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Category::LocalB2bService => "local-b2b-service",
            Category::LocalB2cService => "local-b2c-service",
            Category::RegionalB2bAgency => "regional-b2b-agency",
            Category::RegionalB2cRetail => "regional-b2c-retail",
            Category::NationalSaasB2b => "national-saas-b2b",
            Category::NationalProductB2c => "national-product-b2c",
        }
    }

    #[must_use]
    pub fn is_local(self) -> bool {
        matches!(
            self,
            Category::LocalB2bService | Category::LocalB2cService
        )
    }

    #[must_use]
    pub fn is_b2b(self) -> bool {
        matches!(
            self,
            Category::LocalB2bService | Category::RegionalB2bAgency | Category::NationalSaasB2b
        )
    }

    #[must_use]
    pub fn is_national(self) -> bool {
        matches!(
            self,
            Category::NationalSaasB2b | Category::NationalProductB2c
        )
    }

    #[must_use]
    pub fn is_retail(self) -> bool {
        matches!(
            self,
            Category::RegionalB2cRetail | Category::NationalProductB2c
        )
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Router output: category, confidence, and the signals that drove it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutedCategory {
    pub category: Category,
    /// 0.0–1.0.
    pub confidence: f64,
    pub signals: Vec<String>,
}

/// Stage-by-stage counts making partial degradation observable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PipelineStats {
    pub raw_count: usize,
    pub validated_count: usize,
    pub relevant_count: usize,
    pub content_ready_count: usize,
}

/// Complete pipeline output; the unit persisted to the keyed cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub business_id: String,
    pub run_id: Uuid,
    pub trends: Vec<TrendWithMatches>,
    pub raw_trends: Vec<RawTrendItem>,
    pub queries: Vec<Query>,
    pub category: RoutedCategory,
    pub stats: PipelineStats,
    pub sources_used: Vec<String>,
    pub completed_at: DateTime<Utc>,
}
