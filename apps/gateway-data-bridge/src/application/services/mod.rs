//! Bridge Services
//!
//! - `bridge`: session lifecycle, subscription dispatch, and request
//!   orchestration against the shared venue session
//! - `paginator`: the historical backfill engine
//! - `publisher`: result and status emission on the message bus

/// Data bridge orchestration.
pub mod bridge;

/// Historical backfill pagination.
pub mod paginator;

/// Result publishing.
pub mod publisher;
