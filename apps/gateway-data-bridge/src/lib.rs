#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Gateway Data Bridge - Market Data Gateway Bridge
//!
//! Bridges a single stateful venue gateway session to multiple logical
//! clients: a uniform subscribe/request interface for quotes, trades, and
//! bars, plus a paginated historical backfill engine that assembles
//! deduplicated, strictly-ordered result sets from a page-sized fetch
//! primitive.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Core market data and subscription types
//!   - `market_data`: Instruments, ticks, bars, and their ordering keys
//!   - `request`: Historical request values and terminal status events
//!   - `subscription`: Subscription keys and registry membership
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: Interfaces for the venue session and instrument directory
//!   - `services`: Bridge orchestration, backfill pagination, publishing
//!
//! - **Infrastructure**: Adapters and ambient concerns
//!   - `bus`: Topic-keyed broadcast message distribution
//!   - `config`: Environment configuration
//!   - `metrics`: Metrics instrumentation
//!   - `telemetry`: Tracing setup
//!
//! # Data Flow
//!
//! ```text
//!  Client 1 ──┐
//!  Client 2 ──┼──► DataBridge ──► Venue Session (one shared connection)
//!  Client N ──┘        │
//!                      ▼
//!                 Message Bus ──► data.* and requests.* topics
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Core market data types with no I/O dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and ambient concerns.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::market_data::{
    AssetClass, Bar, BarAggregation, BarSpec, Contract, Instrument, InstrumentId, MarketDataType,
    QuoteTick, Tick, TickKind, TradeTick,
};
pub use domain::request::{
    HistoricalRequest, InstrumentRequest, RequestId, RequestStatus, StatusEvent,
};
pub use domain::subscription::{ClientId, DataKind, RegistryStats, SubscriptionKey};

// Ports and errors
pub use application::error::BridgeError;
pub use application::ports::{DirectoryError, InstrumentDirectory, VenueError, VenueSession};

// Services
pub use application::services::bridge::{BridgeOptions, DataBridge};
pub use application::services::paginator::{HistoricalPaginator, PaginatorConfig};
pub use application::services::publisher::ResultPublisher;

// Infrastructure
pub use infrastructure::bus::{
    BusConfig, BusEvent, BusPayload, MessageBus, SharedMessageBus, topics,
};
pub use infrastructure::config::{BridgeConfig, BusSettings};
pub use infrastructure::telemetry::init as init_telemetry;
