//! News adapter (Google News RSS search).

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use trendscope_core::{Query, RawTrendItem};

use crate::adapter::{Capability, SourceAdapter};
use crate::client::HttpClient;
use crate::error::SourceError;
use crate::parse_helpers::parse_rss_feed;

const DEFAULT_BASE_URL: &str = "https://news.google.com";
const MAX_ITEMS: usize = 25;

pub struct NewsAdapter {
    client: HttpClient,
    base_url: String,
}

impl NewsAdapter {
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
impl SourceAdapter for NewsAdapter {
    fn id(&self) -> &'static str {
        "news"
    }

    fn capability(&self) -> Capability {
        Capability::News
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<RawTrendItem>, SourceError> {
        let encoded = utf8_percent_encode(&query.text, NON_ALPHANUMERIC).to_string();
        let url = format!(
            "{}/rss/search?q={encoded}&hl=en-US&gl=US&ceid=US:en",
            self.base_url
        );
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
