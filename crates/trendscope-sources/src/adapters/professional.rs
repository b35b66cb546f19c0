//! Professional-network search adapter.
//!
//! Reads from the pro-network proxy sidecar, which fronts the upstream
//! professional network's search API and normalizes posts to JSON.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use trendscope_core::{Query, RawTrendItem};

use crate::adapter::{Capability, SourceAdapter};
use crate::client::HttpClient;
use crate::error::SourceError;

const DEFAULT_BASE_URL: &str = "http://localhost:8091";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    posts: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    title: String,
    excerpt: Option<String>,
    url: Option<String>,
    published_at: Option<DateTime<Utc>>,
    engagement: Option<f64>,
}

pub struct ProfessionalNetworkAdapter {
    client: HttpClient,
    base_url: String,
}

impl ProfessionalNetworkAdapter {
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
impl SourceAdapter for ProfessionalNetworkAdapter {
    fn id(&self) -> &'static str {
        "professional_network"
    }

    fn capability(&self) -> Capability {
        Capability::ProfessionalNetwork
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<RawTrendItem>, SourceError> {
        let encoded = utf8_percent_encode(&query.text, NON_ALPHANUMERIC).to_string();
        let url = format!("{}/v1/posts/search?q={encoded}", self.base_url);
        let response: SearchResponse = self.client.get_json(&url, "pro-network search").await?;
        Ok(response
            .posts
            .into_iter()
            .map(|post| {
                let mut item = RawTrendItem::new(
                    self.id(),
                    post.title,
                    post.excerpt.unwrap_or_default(),
                    post.url,
                    post.published_at,
                    query.intent,
                );
                if let Some(engagement) = post.engagement {
                    item.metadata.insert("engagement".to_string(), engagement);
                }
                item
            })
            .collect())
    }
}
