//! AI-insight synthesis adapter.
//!
//! Talks to the insight sidecar service, which synthesizes market
//! observations from a query using an LLM behind its own API. From this
//! crate's point of view it is just another JSON source; the adapter is
//! disabled (returns `NotConfigured`) when no API key is present.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use trendscope_core::{Query, RawTrendItem};

use crate::adapter::{Capability, SourceAdapter};
use crate::client::HttpClient;
use crate::error::SourceError;

const DEFAULT_BASE_URL: &str = "http://localhost:8090";

#[derive(Debug, Deserialize)]
struct InsightResponse {
    insights: Vec<Insight>,
}

#[derive(Debug, Deserialize)]
struct Insight {
    title: String,
    summary: String,
    confidence: Option<f64>,
}

pub struct AiInsightAdapter {
    client: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl AiInsightAdapter {
    #[must_use]
    pub fn new(client: HttpClient, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SourceAdapter for AiInsightAdapter {
    fn id(&self) -> &'static str {
        "ai_insight"
    }

    fn capability(&self) -> Capability {
        Capability::AiInsight
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<RawTrendItem>, SourceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(SourceError::NotConfigured(
                "ai_insight requires TRENDSCOPE_AI_INSIGHT_API_KEY".to_string(),
            ));
        };
        let encoded = utf8_percent_encode(&query.text, NON_ALPHANUMERIC).to_string();
        let url = format!("{}/v1/insights?q={encoded}", self.base_url);
        let response: InsightResponse = self
            .client
            .get_json_with_bearer(&url, api_key, "ai insight")
            .await?;
        Ok(response
            .insights
            .into_iter()
            .map(|insight| {
                let mut item = RawTrendItem::new(
                    self.id(),
                    insight.title,
                    insight.summary,
                    None,
                    None,
                    query.intent,
                );
                if let Some(confidence) = insight.confidence {
                    item.metadata.insert("confidence".to_string(), confidence);
                }
                item
            })
            .collect())
    }
}
