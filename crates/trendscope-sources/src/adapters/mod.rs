//! The twelve source adapters.
//!
//! Universal: generic search, news, autocomplete, video, forum mining,
//! AI insight. Category-gated: weather opportunity and local density
//! (local), professional network (B2B), keyword research and trend
//! velocity (national), shopping (retail).

mod ai_insight;
mod forum;
mod keyword_research;
mod local_density;
mod news;
mod professional;
mod search;
mod shopping;
mod suggest;
mod velocity;
mod video;
mod weather;

pub use ai_insight::AiInsightAdapter;
pub use forum::ForumAdapter;
pub use keyword_research::KeywordResearchAdapter;
pub use local_density::LocalDensityAdapter;
pub use news::NewsAdapter;
pub use professional::ProfessionalNetworkAdapter;
pub use search::SearchAdapter;
pub use shopping::ShoppingAdapter;
pub use suggest::SuggestAdapter;
pub use velocity::VelocityAdapter;
pub use video::VideoAdapter;
pub use weather::WeatherAdapter;
