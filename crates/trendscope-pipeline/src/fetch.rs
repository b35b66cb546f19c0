//! Fetch orchestration: concurrent fan-out over the source adapters.
//!
//! Adapter selection is a dispatch table keyed by routing category, not
//! conditionals scattered through the loop. Two strategies: progressive
//! (sequential, category-gated, few queries per adapter) and deep
//! (every eligible adapter × query pair in flight concurrently, each
//! raced against a fixed deadline, collected with all-settled
//! semantics — failures and timeouts are logged and contribute nothing).

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};

use trendscope_core::{Category, Query, QueryType, RawTrendItem};
use trendscope_sources::{Capability, SourceAdapter};

use crate::error::PipelineError;

/// How the orchestrator schedules adapter calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Dependency-ordered sequential calls, few queries per adapter.
    Progressive,
    /// All eligible calls concurrently; higher coverage, higher latency
    /// variance.
    Deep,
}

/// Merged fetch output: the flat bag of raw items and the adapters that
/// actually contributed.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub trends: Vec<RawTrendItem>,
    pub sources_used: Vec<String>,
}

const UNIVERSAL: [Capability; 6] = [
    Capability::GenericSearch,
    Capability::News,
    Capability::Autocomplete,
    Capability::Video,
    Capability::ForumMining,
    Capability::AiInsight,
];

/// Dispatch table: ordered adapter capabilities per routing category.
/// Universal capabilities always run; the tail is category-specific.
pub(crate) fn capabilities_for(category: Category) -> Vec<Capability> {
    let mut caps = UNIVERSAL.to_vec();
    if category.is_local() {
        caps.push(Capability::WeatherOpportunity);
        caps.push(Capability::LocalDensity);
    }
    if category.is_b2b() {
        caps.push(Capability::ProfessionalNetwork);
    }
    if category.is_national() {
        caps.push(Capability::KeywordResearch);
        caps.push(Capability::TrendVelocity);
    }
    if category.is_retail() {
        caps.push(Capability::Shopping);
    }
    caps
}

/// Which query type a capability consumes. Capabilities without a
/// specialized type take the generic search queries.
fn preferred_query_type(capability: Capability) -> QueryType {
    match capability {
        Capability::News => QueryType::News,
        Capability::Video => QueryType::Video,
        Capability::ForumMining | Capability::ProfessionalNetwork => QueryType::Social,
        Capability::AiInsight => QueryType::Ai,
        _ => QueryType::Search,
    }
}

/// The top `limit` queries of the capability's preferred type, falling
/// back to the overall top queries when none match.
fn queries_for<'a>(capability: Capability, queries: &'a [Query], limit: usize) -> Vec<&'a Query> {
    let preferred = preferred_query_type(capability);
    let matching: Vec<&Query> = queries
        .iter()
        .filter(|q| q.query_type == preferred)
        .take(limit)
        .collect();
    if matching.is_empty() {
        queries.iter().take(limit).collect()
    } else {
        matching
    }
}

pub struct FetchOrchestrator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    deadline: Duration,
    max_concurrent: usize,
}

impl FetchOrchestrator {
    #[must_use]
    pub fn new(
        adapters: Vec<Arc<dyn SourceAdapter>>,
        deadline_secs: u64,
        max_concurrent: usize,
    ) -> Self {
        Self {
            adapters,
            deadline: Duration::from_secs(deadline_secs),
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Execute all eligible adapter calls for `category` and merge their
    /// outputs, tolerating individual failures.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NoTrendsFetched`] iff the merged item
    /// list is empty — the only fetch condition that halts a run.
    pub async fn run(
        &self,
        category: Category,
        queries: &[Query],
        strategy: FetchStrategy,
    ) -> Result<FetchOutcome, PipelineError> {
        let calls = self.plan_calls(category, queries, strategy);
        tracing::info!(
            category = %category,
            strategy = ?strategy,
            planned_calls = calls.len(),
            "starting fetch"
        );

        let outcome = match strategy {
            FetchStrategy::Progressive => self.run_progressive(&calls).await,
            FetchStrategy::Deep => self.run_deep(calls).await,
        };

        if outcome.trends.is_empty() {
            return Err(PipelineError::NoTrendsFetched);
        }
        tracing::info!(
            items = outcome.trends.len(),
            sources = outcome.sources_used.len(),
            "fetch complete"
        );
        Ok(outcome)
    }

    /// Expand the dispatch table into concrete (adapter, query) calls.
    fn plan_calls<'a>(
        &self,
        category: Category,
        queries: &'a [Query],
        strategy: FetchStrategy,
    ) -> Vec<(Arc<dyn SourceAdapter>, &'a Query)> {
        let per_adapter = match strategy {
            FetchStrategy::Progressive => 2,
            FetchStrategy::Deep => 5,
        };
        let mut calls = Vec::new();
        for capability in capabilities_for(category) {
            for adapter in self
                .adapters
                .iter()
                .filter(|a| a.capability() == capability)
            {
                for query in queries_for(capability, queries, per_adapter) {
                    calls.push((Arc::clone(adapter), query));
                }
            }
        }
        calls
    }

    async fn run_progressive(
        &self,
        calls: &[(Arc<dyn SourceAdapter>, &Query)],
    ) -> FetchOutcome {
        let mut trends = Vec::new();
        let mut sources_used = HashSet::new();
        for (adapter, query) in calls {
            let fetched = self.timed_fetch(adapter, query).await;
            collect_settled(adapter.id(), fetched, &mut trends, &mut sources_used);
        }
        finish(trends, sources_used)
    }

    async fn run_deep(&self, calls: Vec<(Arc<dyn SourceAdapter>, &Query)>) -> FetchOutcome {
        let settled: Vec<(&'static str, Option<Result<Vec<RawTrendItem>, trendscope_sources::SourceError>>)> =
            stream::iter(calls)
                .map(|(adapter, query)| async move {
                    let source = adapter.id();
                    let fetched = tokio::time::timeout(self.deadline, adapter.fetch(query))
                        .await
                        .ok();
                    (source, fetched)
                })
                .buffer_unordered(self.max_concurrent)
                .collect()
                .await;

        let mut trends = Vec::new();
        let mut sources_used = HashSet::new();
        for (source, fetched) in settled {
            collect_settled(source, fetched, &mut trends, &mut sources_used);
        }
        finish(trends, sources_used)
    }

    async fn timed_fetch(
        &self,
        adapter: &Arc<dyn SourceAdapter>,
        query: &Query,
    ) -> Option<Result<Vec<RawTrendItem>, trendscope_sources::SourceError>> {
        tokio::time::timeout(self.deadline, adapter.fetch(query))
            .await
            .ok()
    }
}

/// Fold one settled call into the merged output. `None` means the
/// deadline elapsed; `Some(Err)` an adapter failure. Both contribute
/// zero items.
fn collect_settled(
    source: &str,
    fetched: Option<Result<Vec<RawTrendItem>, trendscope_sources::SourceError>>,
    trends: &mut Vec<RawTrendItem>,
    sources_used: &mut HashSet<String>,
) {
    match fetched {
        Some(Ok(items)) => {
            if !items.is_empty() {
                tracing::debug!(source, count = items.len(), "adapter returned items");
                sources_used.insert(source.to_string());
                trends.extend(items);
            }
        }
        Some(Err(e)) => {
            tracing::warn!(source, error = %e, "adapter call failed");
        }
        None => {
            tracing::warn!(source, "adapter call timed out");
        }
    }
}

fn finish(mut trends: Vec<RawTrendItem>, sources_used: HashSet<String>) -> FetchOutcome {
    // The same adapter can return the same item for overlapping queries.
    let mut seen = HashSet::new();
    trends.retain(|item| seen.insert(item.id.clone()));

    let mut sources_used: Vec<String> = sources_used.into_iter().collect();
    sources_used.sort();
    FetchOutcome {
        trends,
        sources_used,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn universal_capabilities_run_for_every_category() {
        for category in Category::ALL {
            let caps = capabilities_for(category);
            for universal in UNIVERSAL {
                assert!(caps.contains(&universal), "{category} missing {universal:?}");
            }
        }
    }

    #[test]
    fn local_categories_add_weather_and_density() {
        let caps = capabilities_for(Category::LocalB2cService);
        assert!(caps.contains(&Capability::WeatherOpportunity));
        assert!(caps.contains(&Capability::LocalDensity));
        assert!(!caps.contains(&Capability::KeywordResearch));
    }

    #[test]
    fn national_saas_adds_b2b_and_national_capabilities() {
        let caps = capabilities_for(Category::NationalSaasB2b);
        assert!(caps.contains(&Capability::ProfessionalNetwork));
        assert!(caps.contains(&Capability::KeywordResearch));
        assert!(caps.contains(&Capability::TrendVelocity));
        assert!(!caps.contains(&Capability::Shopping));
        assert!(!caps.contains(&Capability::WeatherOpportunity));
    }

    #[test]
    fn retail_adds_shopping() {
        assert!(capabilities_for(Category::RegionalB2cRetail).contains(&Capability::Shopping));
        assert!(capabilities_for(Category::NationalProductB2c).contains(&Capability::Shopping));
    }

    #[test]
    fn queries_fall_back_to_top_queries_when_no_type_match() {
        let queries = vec![Query {
            text: "only search".to_string(),
            query_type: QueryType::Search,
            intent: trendscope_core::QueryIntent::Trend,
            priority: 50,
        }];
        let picked = queries_for(Capability::News, &queries, 2);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].text, "only search");
    }
}
