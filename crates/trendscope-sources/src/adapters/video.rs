//! Video adapter (YouTube Atom search feed, parsed with feed-rs).

use async_trait::async_trait;
use chrono::Utc;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use trendscope_core::{Query, RawTrendItem};

use crate::adapter::{Capability, SourceAdapter};
use crate::client::HttpClient;
use crate::error::SourceError;

const DEFAULT_BASE_URL: &str = "https://www.youtube.com";
const MAX_ITEMS: usize = 15;

pub struct VideoAdapter {
    client: HttpClient,
    base_url: String,
}

impl VideoAdapter {
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

/// Turn an Atom feed body into trend items for `query`.
fn parse_atom(
    source: &'static str,
    body: &str,
    query: &Query,
) -> Result<Vec<RawTrendItem>, SourceError> {
    let feed = feed_rs::parser::parse(body.as_bytes())
        .map_err(|e| SourceError::Feed(e.to_string()))?;
    Ok(feed
        .entries
        .into_iter()
        .take(MAX_ITEMS)
        .map(|entry| {
            let title = entry.title.map(|t| t.content).unwrap_or_default();
            let description = entry
                .summary
                .map(|s| s.content)
                .or_else(|| {
                    entry
                        .media
                        .first()
                        .and_then(|m| m.description.clone().map(|d| d.content))
                })
                .unwrap_or_default();
            let link = entry.links.first().map(|l| l.href.clone());
            let published = entry
                .published
                .or(entry.updated)
                .map(|dt| dt.with_timezone(&Utc));
            RawTrendItem::new(source, title, description, link, published, query.intent)
        })
        .filter(|item| !item.title.is_empty())
        .collect())
}

#[async_trait]
impl SourceAdapter for VideoAdapter {
    fn id(&self) -> &'static str {
        "video"
    }

    fn capability(&self) -> Capability {
        Capability::Video
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<RawTrendItem>, SourceError> {
        let encoded = utf8_percent_encode(&query.text, NON_ALPHANUMERIC).to_string();
        let url = format!("{}/feeds/videos.xml?search_query={encoded}", self.base_url);
        let body = self.client.get_text(&url).await?;
        parse_atom(self.id(), &body, query)
    }
}
