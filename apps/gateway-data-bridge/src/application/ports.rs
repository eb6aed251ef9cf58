//! Port Interfaces
//!
//! Driven (outbound) ports for the two external collaborators the bridge
//! consumes: the venue session that owns the physical gateway connection,
//! and the instrument directory that owns contract metadata.
//!
//! The session is assumed to serialize and rate-limit physical calls to
//! the external gateway itself; the bridge only sequences its own calls.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::market_data::{
    Bar, BarSpec, Instrument, InstrumentId, MarketDataType, Tick, TickKind,
};

// =============================================================================
// Errors
// =============================================================================

/// Errors surfaced by the venue session.
#[derive(Debug, Clone, thiserror::Error)]
pub enum VenueError {
    /// The session did not become ready within the wait bound.
    #[error("session not ready within {0:?}")]
    ReadyTimeout(Duration),

    /// A single venue call exceeded its timeout.
    #[error("venue call timed out after {0:?}")]
    RequestTimeout(Duration),

    /// The physical connection dropped mid-call.
    #[error("connection lost: {0}")]
    ConnectionLost(String),

    /// The venue rejected the call.
    #[error("venue rejected call ({code}): {message}")]
    Rejected {
        /// Venue error code.
        code: i32,
        /// Venue error message.
        message: String,
    },
}

/// Errors surfaced by the instrument directory.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DirectoryError {
    /// Loading instrument metadata failed.
    #[error("instrument directory load failed: {0}")]
    LoadFailed(String),
}

// =============================================================================
// Venue Session Port
// =============================================================================

/// Port for the stateful venue gateway session.
///
/// One physical connection, shared by every logical client of the bridge.
/// Streaming subscriptions are fire-and-forget against the session's own
/// dispatch; historical fetches return one bounded page per call and may
/// return an empty page without signalling "no more data" explicitly.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VenueSession: Send + Sync {
    /// Wait until the session is connected and ready, bounded by `timeout`.
    async fn await_ready(&self, timeout: Duration) -> Result<(), VenueError>;

    /// Select the market data type for all subsequent streams.
    async fn set_market_data_type(&self, kind: MarketDataType) -> Result<(), VenueError>;

    /// Start a streaming tick subscription.
    async fn subscribe_ticks(
        &self,
        instrument: &Instrument,
        tick_kind: TickKind,
        ignore_size_updates: bool,
    ) -> Result<(), VenueError>;

    /// Stop a streaming tick subscription.
    async fn unsubscribe_ticks(
        &self,
        instrument_id: &InstrumentId,
        tick_kind: TickKind,
    ) -> Result<(), VenueError>;

    /// Start a continuous realtime bar stream (5-second interval only).
    async fn subscribe_realtime_bars(
        &self,
        spec: &BarSpec,
        instrument: &Instrument,
        use_regular_hours: bool,
    ) -> Result<(), VenueError>;

    /// Start a polling historical bar stream for any other interval.
    async fn subscribe_historical_bars(
        &self,
        spec: &BarSpec,
        instrument: &Instrument,
        use_regular_hours: bool,
        handle_revisions: bool,
    ) -> Result<(), VenueError>;

    /// Stop a realtime bar stream.
    async fn unsubscribe_realtime_bars(
        &self,
        spec: &BarSpec,
        instrument_id: &InstrumentId,
    ) -> Result<(), VenueError>;

    /// Stop a historical bar stream.
    async fn unsubscribe_historical_bars(
        &self,
        spec: &BarSpec,
        instrument_id: &InstrumentId,
    ) -> Result<(), VenueError>;

    /// Fetch one page of historical ticks ending at `end`.
    ///
    /// Returns at most a venue-sized page; an empty page means no data was
    /// available for the queried slice.
    async fn fetch_historical_ticks(
        &self,
        instrument: &Instrument,
        tick_kind: TickKind,
        end: DateTime<Utc>,
        use_regular_hours: bool,
        timeout: Duration,
    ) -> Result<Vec<Tick>, VenueError>;

    /// Fetch one page of historical bars ending at `end`, covering the
    /// venue duration string `duration` (e.g. `"1 D"`).
    async fn fetch_historical_bars(
        &self,
        spec: &BarSpec,
        instrument: &Instrument,
        use_regular_hours: bool,
        end: DateTime<Utc>,
        duration: &str,
        timeout: Duration,
    ) -> Result<Vec<Bar>, VenueError>;

    /// Whether the session is currently running.
    fn is_running(&self) -> bool;

    /// Stop the session entirely.
    async fn stop(&self);
}

// =============================================================================
// Instrument Directory Port
// =============================================================================

/// Port for the instrument/contract directory.
///
/// Owns instrument metadata; the bridge only reads from it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InstrumentDirectory: Send + Sync {
    /// Load the configured instrument universe.
    async fn initialize(&self) -> Result<(), DirectoryError>;

    /// Resolve an already-loaded instrument.
    fn resolve(&self, instrument_id: &InstrumentId) -> Option<Instrument>;

    /// Load (or refresh) a single instrument's metadata.
    async fn load(&self, instrument_id: &InstrumentId) -> Result<(), DirectoryError>;

    /// All currently loaded instruments.
    fn list_all(&self) -> Vec<Instrument>;
}
