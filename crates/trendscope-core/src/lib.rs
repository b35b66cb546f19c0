//! Shared domain types and configuration for the trendscope pipeline.
//!
//! Everything downstream crates agree on lives here: the immutable
//! [`BusinessProfile`], the trend record types that each pipeline stage
//! enriches, application configuration from environment variables, and
//! the category keyword packs loaded from YAML.

mod app_config;
mod config;
mod error;
mod keywords;
mod profile;
mod types;


pub use app_config::AppConfig;
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use keywords::{KeywordLibrary, KeywordPack};
pub use profile::{load_profile, BusinessProfile};
pub use types::{
    trend_id, Category, ContentMatch, CustomerTrigger, LifecycleInfo, LifecycleStage,
    LifecycleTrend, PipelineResult, PipelineStats, Query, QueryIntent, QueryType, RawTrendItem,
    RelevanceScore, RoutedCategory, ScoredTrend, TrendWithMatches, TriggerCategory, TriggerMatch,
    ValidatedTrend,
};
