//! Weather-opportunity adapter (Open-Meteo daily forecast).
//!
//! For local service categories, forecast extremes translate directly
//! into demand: a heatwave fills an HVAC company's phone lines, a cold
//! snap a plumber's. The adapter turns forecast extremes into trend
//! items rather than exposing raw weather data downstream.

use async_trait::async_trait;
use serde::Deserialize;

use trendscope_core::{Query, RawTrendItem};

use crate::adapter::{Capability, SourceAdapter};
use crate::client::HttpClient;
use crate::error::SourceError;

const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";
// Continental-US centroid; callers with a geocoded service area override.
const DEFAULT_LATITUDE: f64 = 39.8;
const DEFAULT_LONGITUDE: f64 = -98.6;

const HEAT_THRESHOLD_C: f64 = 32.0;
const COLD_THRESHOLD_C: f64 = -5.0;
const HEAVY_RAIN_MM: f64 = 25.0;

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: Daily,
}

#[derive(Debug, Deserialize)]
struct Daily {
    time: Vec<String>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    precipitation_sum: Vec<f64>,
}

pub struct WeatherAdapter {
    client: HttpClient,
    base_url: String,
    latitude: f64,
    longitude: f64,
}

impl WeatherAdapter {
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }
}

/// Convert forecast extremes into opportunity items. Days without an
/// extreme contribute nothing.
fn opportunities(
    source: &'static str,
    forecast: &ForecastResponse,
    query: &Query,
) -> Vec<RawTrendItem> {
    let daily = &forecast.daily;
    let mut items = Vec::new();

    for (i, date) in daily.time.iter().enumerate() {
        let max = daily.temperature_2m_max.get(i).copied();
        let min = daily.temperature_2m_min.get(i).copied();
        let rain = daily.precipitation_sum.get(i).copied();

        let (title, description, metric, value) = if max.is_some_and(|t| t >= HEAT_THRESHOLD_C) {
            (
                format!("Heat spike forecast for {date}"),
                format!(
                    "Daily high of {:.0}C expected — demand surge window for cooling, hydration, and heat-mitigation services",
                    max.unwrap_or_default()
                ),
                "peak_temp_c",
                max.unwrap_or_default(),
            )
        } else if min.is_some_and(|t| t <= COLD_THRESHOLD_C) {
            (
                format!("Cold snap forecast for {date}"),
                format!(
                    "Daily low of {:.0}C expected — demand surge window for heating, pipe protection, and emergency repair",
                    min.unwrap_or_default()
                ),
                "low_temp_c",
                min.unwrap_or_default(),
            )
        } else if rain.is_some_and(|p| p >= HEAVY_RAIN_MM) {
            (
                format!("Heavy precipitation forecast for {date}"),
                format!(
                    "{:.0}mm expected — demand surge window for drainage, roofing, and water-damage services",
                    rain.unwrap_or_default()
                ),
                "precipitation_mm",
                rain.unwrap_or_default(),
            )
        } else {
            continue;
        };

        let mut item = RawTrendItem::new(source, title, description, None, None, query.intent);
        item.metadata.insert(metric.to_string(), value);
        items.push(item);
    }

    items
}

#[async_trait]
impl SourceAdapter for WeatherAdapter {
    fn id(&self) -> &'static str {
        "weather"
    }

    fn capability(&self) -> Capability {
        Capability::WeatherOpportunity
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<RawTrendItem>, SourceError> {
        let url = format!(
            "{}/v1/forecast?latitude={}&longitude={}&daily=temperature_2m_max,temperature_2m_min,precipitation_sum&forecast_days=7&timezone=UTC",
            self.base_url, self.latitude, self.longitude
        );
        let forecast: ForecastResponse = self.client.get_json(&url, "weather forecast").await?;
        Ok(opportunities(self.id(), &forecast, query))
    }
}
