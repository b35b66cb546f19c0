//! Keyword-research adapter.
//!
//! Reads the keyword-metrics sidecar: search volume and growth per term
//! related to a query. Growth is the signal; volume is context.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use trendscope_core::{Query, RawTrendItem};

use crate::adapter::{Capability, SourceAdapter};
use crate::client::HttpClient;
use crate::error::SourceError;

const DEFAULT_BASE_URL: &str = "http://localhost:8092";

#[derive(Debug, Deserialize)]
struct KeywordResponse {
    keywords: Vec<KeywordMetric>,
}

#[derive(Debug, Deserialize)]
struct KeywordMetric {
    term: String,
    monthly_volume: Option<f64>,
    growth_pct: Option<f64>,
}

pub struct KeywordResearchAdapter {
    client: HttpClient,
    base_url: String,
}

impl KeywordResearchAdapter {
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SourceAdapter for KeywordResearchAdapter {
    fn id(&self) -> &'static str {
        "keyword_research"
    }

    fn capability(&self) -> Capability {
        Capability::KeywordResearch
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<RawTrendItem>, SourceError> {
        let encoded = utf8_percent_encode(&query.text, NON_ALPHANUMERIC).to_string();
        let url = format!("{}/v1/keywords?q={encoded}", self.base_url);
        let response: KeywordResponse = self.client.get_json(&url, "keyword metrics").await?;
        Ok(response
            .keywords
            .into_iter()
            .map(|metric| {
                let volume = metric.monthly_volume.unwrap_or_default();
                let growth = metric.growth_pct.unwrap_or_default();
                let mut item = RawTrendItem::new(
                    self.id(),
                    format!("Search interest: {}", metric.term),
                    format!("{volume:.0} monthly searches, {growth:+.0}% growth"),
                    None,
                    None,
                    query.intent,
                );
                item.metadata.insert("monthly_volume".to_string(), volume);
                item.metadata.insert("growth_pct".to_string(), growth);
                item
            })
            .collect())
    }
}
