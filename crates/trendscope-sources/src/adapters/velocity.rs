//! Content-engagement / trend-velocity adapter.
//!
//! The engagement sidecar aggregates cross-platform content metrics per
//! topic. Its `velocity` value (rate of change of engagement) feeds the
//! lifecycle detector downstream via item metadata.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use trendscope_core::{Query, RawTrendItem};

use crate::adapter::{Capability, SourceAdapter};
use crate::client::HttpClient;
use crate::error::SourceError;

const DEFAULT_BASE_URL: &str = "http://localhost:8093";

#[derive(Debug, Deserialize)]
struct TopicsResponse {
    topics: Vec<Topic>,
}

#[derive(Debug, Deserialize)]
struct Topic {
    topic: String,
    summary: Option<String>,
    velocity: Option<f64>,
    engagement: Option<f64>,
}

pub struct VelocityAdapter {
    client: HttpClient,
    base_url: String,
}

impl VelocityAdapter {
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
impl SourceAdapter for VelocityAdapter {
    fn id(&self) -> &'static str {
        "trend_velocity"
    }

    fn capability(&self) -> Capability {
        Capability::TrendVelocity
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<RawTrendItem>, SourceError> {
        let encoded = utf8_percent_encode(&query.text, NON_ALPHANUMERIC).to_string();
        let url = format!("{}/v1/topics?q={encoded}", self.base_url);
        let response: TopicsResponse = self.client.get_json(&url, "trend velocity").await?;
        Ok(response
            .topics
            .into_iter()
            .map(|topic| {
                let mut item = RawTrendItem::new(
                    self.id(),
                    topic.topic,
                    topic.summary.unwrap_or_default(),
                    None,
                    None,
                    query.intent,
                );
                if let Some(velocity) = topic.velocity {
                    item.metadata.insert("trend_velocity".to_string(), velocity);
                }
                if let Some(engagement) = topic.engagement {
                    item.metadata.insert("engagement".to_string(), engagement);
                }
                item
            })
            .collect())
    }
}
