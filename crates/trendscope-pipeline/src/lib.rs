//! Trend intelligence pipeline: profile in, ranked content-ready
//! trends out.
//!
//! Eight barrier-synchronized stages: query generation, category
//! routing, multi-source fetch, cross-source validation, relevance
//! scoring, EQ prioritization, lifecycle classification, and trigger
//! matching. Only the fetch stage touches the network; everything else
//! is a pure transformation over in-memory collections.

pub mod cache;
pub mod error;
pub mod fetch;
pub mod lifecycle;
pub mod pipeline;
pub mod prioritize;
pub mod query_gen;
pub mod router;
pub mod score;
pub mod state;
pub mod triggers;
pub mod validate;

mod text;

pub use cache::{JsonFileCache, MemoryCache, TrendCache};
pub use error::PipelineError;
pub use fetch::{FetchOrchestrator, FetchOutcome, FetchStrategy};
pub use pipeline::{RunOptions, TrendPipeline};
pub use query_gen::{generate_queries, QueryVolume};
pub use router::route_category;
pub use state::{PipelineStage, PipelineState};
