//! Autocomplete adapter (DuckDuckGo suggestion API).
//!
//! Suggestion phrases are weak signals on their own, but they surface
//! what people actually type — a cheap proxy for rising search intent.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use trendscope_core::{Query, RawTrendItem};

use crate::adapter::{Capability, SourceAdapter};
use crate::client::HttpClient;
use crate::error::SourceError;

const DEFAULT_BASE_URL: &str = "https://duckduckgo.com";

#[derive(Debug, Deserialize)]
struct Suggestion {
    phrase: String,
}

pub struct SuggestAdapter {
    client: HttpClient,
    base_url: String,
}

impl SuggestAdapter {
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
impl SourceAdapter for SuggestAdapter {
    fn id(&self) -> &'static str {
        "autocomplete"
    }

    fn capability(&self) -> Capability {
        Capability::Autocomplete
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<RawTrendItem>, SourceError> {
        let encoded = utf8_percent_encode(&query.text, NON_ALPHANUMERIC).to_string();
        let url = format!("{}/ac/?q={encoded}", self.base_url);
        let suggestions: Vec<Suggestion> = self.client.get_json(&url, "autocomplete").await?;
        Ok(suggestions
            .into_iter()
            // The echo of the query itself carries no information.
            .filter(|s| !s.phrase.eq_ignore_ascii_case(&query.text))
            .map(|s| {
                RawTrendItem::new(
                    self.id(),
                    s.phrase,
                    format!("autocomplete completion for \"{}\"", query.text),
                    None,
                    None,
                    query.intent,
                )
            })
            .collect())
    }
}
