//! Harvest module - registry search to deduplicated repository URLs.
//!
//! - **Cursor**: offset pagination via [`PaginationCursor`]
//! - **Normalize**: git/host eligibility and canonical URL form
//! - **Resolver**: per-package detail fetch via [`DetailResolver`]
//! - **Accumulator**: the deduplicating [`RepoUrlSet`]
//! - **Sink**: single-write persistence via [`RepoSink`]
//! - **Npms**: the HTTP [`NpmsClient`]

pub mod accumulator;
pub mod cursor;
pub mod normalize;
pub mod npms;
pub mod resolver;
pub mod sink;

// Re-export commonly used types
pub use accumulator::RepoUrlSet;
pub use cursor::{PaginationCursor, MAX_PAGE_SIZE};
pub use normalize::{canonicalize, is_eligible, normalize, DEFAULT_RECOGNIZED_HOST};
pub use npms::{NpmsClient, DEFAULT_REGISTRY_URL};
pub use resolver::{DetailResolver, Rejection, Resolution};
pub use sink::{JsonFileSink, RepoSink, SinkError};
