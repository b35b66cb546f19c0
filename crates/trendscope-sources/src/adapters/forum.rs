//! Forum mining adapter (Reddit public search API).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use trendscope_core::{Query, RawTrendItem};

use crate::adapter::{Capability, SourceAdapter};
use crate::client::HttpClient;
use crate::error::SourceError;

const DEFAULT_BASE_URL: &str = "https://www.reddit.com";
const PAGE_LIMIT: usize = 25;
const MAX_DESCRIPTION_CHARS: usize = 280;

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    title: Option<String>,
    selftext: Option<String>,
    permalink: Option<String>,
    created_utc: Option<f64>,
    num_comments: Option<f64>,
    score: Option<f64>,
}

pub struct ForumAdapter {
    client: HttpClient,
    base_url: String,
}

impl ForumAdapter {
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

fn to_item(source: &'static str, base_url: &str, post: PostData, query: &Query) -> Option<RawTrendItem> {
    let title = post.title?;
    if title.trim().is_empty() {
        return None;
    }
    let mut description = post.selftext.unwrap_or_default();
    if description.len() > MAX_DESCRIPTION_CHARS {
        let cut = description
            .char_indices()
            .take_while(|(i, c)| i + c.len_utf8() <= MAX_DESCRIPTION_CHARS)
            .last()
            .map_or(0, |(i, c)| i + c.len_utf8());
        description.truncate(cut);
    }
    let url = post.permalink.map(|p| format!("{base_url}{p}"));
    #[allow(clippy::cast_possible_truncation)]
    let published_at: Option<DateTime<Utc>> = post
        .created_utc
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts as i64, 0));

    let mut item = RawTrendItem::new(source, title, description, url, published_at, query.intent);
    if let Some(comments) = post.num_comments {
        item.metadata.insert("comment_count".to_string(), comments);
    }
    if let Some(score) = post.score {
        item.metadata.insert("engagement".to_string(), score);
    }
    Some(item)
}

#[async_trait]
impl SourceAdapter for ForumAdapter {
    fn id(&self) -> &'static str {
        "forum"
    }

    fn capability(&self) -> Capability {
        Capability::ForumMining
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<RawTrendItem>, SourceError> {
        let encoded = utf8_percent_encode(&query.text, NON_ALPHANUMERIC).to_string();
        let url = format!(
            "{}/search.json?q={encoded}&sort=relevance&t=year&limit={PAGE_LIMIT}",
            self.base_url
        );
        let listing: Listing = self.client.get_json(&url, "reddit search").await?;
        Ok(listing
            .data
            .children
            .into_iter()
            .filter_map(|post| to_item(self.id(), &self.base_url, post.data, query))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendscope_core::{QueryIntent, QueryType};

    fn query() -> Query {
        Query {
            text: "hvac problems".to_string(),
            query_type: QueryType::Social,
            intent: QueryIntent::PainPoint,
            priority: 40,
        }
    }

    #[test]
    fn post_becomes_item_with_metadata() {
        let post = PostData {
            title: Some("AC died during heatwave".to_string()),
            selftext: Some("Third time this summer".to_string()),
            permalink: Some("/r/hvacadvice/comments/1/ac_died/".to_string()),
            created_utc: Some(1_722_500_000.0),
            num_comments: Some(42.0),
            score: Some(310.0),
        };
        let item = to_item("forum", "https://www.reddit.com", post, &query()).unwrap();
        assert_eq!(item.source, "forum");
        assert_eq!(
            item.source_url.as_deref(),
            Some("https://www.reddit.com/r/hvacadvice/comments/1/ac_died/")
        );
        assert_eq!(item.metadata.get("comment_count"), Some(&42.0));
        assert_eq!(item.metadata.get("engagement"), Some(&310.0));
        assert!(item.published_at.is_some());
    }

    #[test]
    fn post_without_title_is_skipped() {
        let post = PostData {
            title: None,
            selftext: Some("body only".to_string()),
            permalink: None,
            created_utc: None,
            num_comments: None,
            score: None,
        };
        assert!(to_item("forum", "https://www.reddit.com", post, &query()).is_none());
    }

    #[test]
    fn long_selftext_is_truncated_on_char_boundary() {
        let post = PostData {
            title: Some("t".to_string()),
            selftext: Some("é".repeat(400)),
            permalink: None,
            created_utc: None,
            num_comments: None,
            score: None,
        };
        let item = to_item("forum", "https://www.reddit.com", post, &query()).unwrap();
        assert!(item.description.len() <= MAX_DESCRIPTION_CHARS);
        assert!(item.description.chars().all(|c| c == 'é'));
    }
}
