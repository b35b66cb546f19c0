//! Local business density adapter (OpenStreetMap Nominatim).
//!
//! Counts how many competing establishments a geocoding search surfaces
//! and emits a single summary item. A crowded local market and an empty
//! one are both signals worth ranking downstream.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use trendscope_core::{Query, RawTrendItem};

use crate::adapter::{Capability, SourceAdapter};
use crate::client::HttpClient;
use crate::error::SourceError;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const RESULT_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
struct Place {
    display_name: String,
    #[serde(default)]
    importance: f64,
}

pub struct LocalDensityAdapter {
    client: HttpClient,
    base_url: String,
}

impl LocalDensityAdapter {
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

fn summarize(source: &'static str, places: &[Place], query: &Query) -> Vec<RawTrendItem> {
    if places.is_empty() {
        return Vec::new();
    }
    #[allow(clippy::cast_precision_loss)]
    let count = places.len() as f64;
    let mean_importance = places.iter().map(|p| p.importance).sum::<f64>() / count;
    let top: Vec<&str> = places
        .iter()
        .take(3)
        .map(|p| p.display_name.as_str())
        .collect();

    let mut item = RawTrendItem::new(
        source,
        format!("Local market density for \"{}\"", query.text),
        format!(
            "{} establishments matched; most prominent: {}",
            places.len(),
            top.join("; ")
        ),
        None,
        None,
        query.intent,
    );
    item.metadata.insert("business_count".to_string(), count);
    item.metadata
        .insert("mean_importance".to_string(), mean_importance);
    vec![item]
}

#[async_trait]
impl SourceAdapter for LocalDensityAdapter {
    fn id(&self) -> &'static str {
        "local_density"
    }

    fn capability(&self) -> Capability {
        Capability::LocalDensity
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<RawTrendItem>, SourceError> {
        let encoded = utf8_percent_encode(&query.text, NON_ALPHANUMERIC).to_string();
        let url = format!(
            "{}/search?q={encoded}&format=jsonv2&limit={RESULT_LIMIT}",
            self.base_url
        );
        let places: Vec<Place> = self.client.get_json(&url, "nominatim search").await?;
        Ok(summarize(self.id(), &places, query))
    }
}
