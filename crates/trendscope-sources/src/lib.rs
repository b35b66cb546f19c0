//! Source adapters for the trendscope fetch stage.
//!
//! Each external data source sits behind the [`SourceAdapter`] trait:
//! one async `fetch(query) -> Vec<RawTrendItem>` per adapter, never a
//! synchronous panic. Adapters share an [`HttpClient`] wrapper carrying
//! timeouts, a descriptive user agent, and exponential-backoff retries
//! for transient failures. Feed-style sources (news, video) parse
//! RSS/Atom; the rest speak JSON.

pub mod adapter;
pub mod adapters;
pub mod client;
pub mod error;

mod parse_helpers;
mod retry;

pub use adapter::{build_registry, Capability, SourceAdapter};
pub use client::HttpClient;
pub use error::SourceError;
