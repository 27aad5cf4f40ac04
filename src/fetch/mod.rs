//! Concurrent discovery-and-fetch pipeline
//!
//! This module contains the core harvesting logic:
//! - Rate limiting shared across all workers of a stage
//! - A bounded, reusable worker pool
//! - Listing-page discovery and per-question content fetching
//! - Orchestration with an optional cache short-circuit

mod content;
mod discover;
mod http;
mod limiter;
mod pipeline;
mod pool;

pub use content::{compact, ContentFetcher};
pub use discover::{Discovery, PageDiscoverer};
pub use http::{build_http_client, fetch_text};
pub use limiter::RateLimiter;
pub use pipeline::{Pipeline, RunOptions, RunReport};
pub use pool::{BoundedPool, CountingObserver, NullObserver, ProgressObserver};
