//! Generic web search adapter (Bing search RSS).

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use trendscope_core::{Query, RawTrendItem};

use crate::adapter::{Capability, SourceAdapter};
use crate::client::HttpClient;
use crate::error::SourceError;
use crate::parse_helpers::parse_rss_feed;

const DEFAULT_BASE_URL: &str = "https://www.bing.com";
const MAX_ITEMS: usize = 20;

pub struct SearchAdapter {
    client: HttpClient,
    base_url: String,
}

impl SearchAdapter {
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the endpoint, e.g. to point at a mock server in tests.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SourceAdapter for SearchAdapter {
    fn id(&self) -> &'static str {
        "search"
    }

    fn capability(&self) -> Capability {
        Capability::GenericSearch
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<RawTrendItem>, SourceError> {
        let encoded = utf8_percent_encode(&query.text, NON_ALPHANUMERIC).to_string();
        let url = format!("{}/search?q={encoded}&format=rss", self.base_url);
        let body = self.client.get_text(&url).await?;
        let entries = parse_rss_feed(&body, MAX_ITEMS)?;
        Ok(entries
            .into_iter()
            .map(|entry| {
                RawTrendItem::new(
                    self.id(),
                    entry.title,
                    entry.description,
                    Some(entry.link),
                    entry.published_at,
                    query.intent,
                )
            })
            .collect())
    }
}
