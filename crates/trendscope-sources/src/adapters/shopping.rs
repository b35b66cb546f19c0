//! Shopping / price-trend adapter.
//!
//! Reads the commerce sidecar: demand index and price movement per
//! product family matching a query. Relevant only for retail categories.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use trendscope_core::{Query, RawTrendItem};

use crate::adapter::{Capability, SourceAdapter};
use crate::client::HttpClient;
use crate::error::SourceError;

const DEFAULT_BASE_URL: &str = "http://localhost:8094";

#[derive(Debug, Deserialize)]
struct ProductsResponse {
    products: Vec<ProductTrend>,
}

#[derive(Debug, Deserialize)]
struct ProductTrend {
    name: String,
    url: Option<String>,
    price_trend_pct: Option<f64>,
    demand_index: Option<f64>,
}

pub struct ShoppingAdapter {
    client: HttpClient,
    base_url: String,
}

impl ShoppingAdapter {
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
impl SourceAdapter for ShoppingAdapter {
    fn id(&self) -> &'static str {
        "shopping"
    }

    fn capability(&self) -> Capability {
        Capability::Shopping
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<RawTrendItem>, SourceError> {
        let encoded = utf8_percent_encode(&query.text, NON_ALPHANUMERIC).to_string();
        let url = format!("{}/v1/products/trends?q={encoded}", self.base_url);
        let response: ProductsResponse = self.client.get_json(&url, "shopping trends").await?;
        Ok(response
            .products
            .into_iter()
            .map(|product| {
                let price = product.price_trend_pct.unwrap_or_default();
                let demand = product.demand_index.unwrap_or_default();
                let mut item = RawTrendItem::new(
                    self.id(),
                    format!("Demand shift: {}", product.name),
                    format!("price trend {price:+.0}%, demand index {demand:.0}"),
                    product.url,
                    None,
                    query.intent,
                );
                item.metadata.insert("price_trend_pct".to_string(), price);
                item.metadata.insert("demand_index".to_string(), demand);
                item
            })
            .collect())
    }
}
