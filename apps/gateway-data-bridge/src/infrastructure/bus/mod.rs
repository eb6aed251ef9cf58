//! Message Bus
//!
//! Topic-keyed message distribution over a tokio broadcast channel.
//! Every bridge result (data payloads and terminal status events) is a
//! `BusEvent` published to all current receivers; receivers filter by
//! topic.
//!
//! # Topics
//!
//! - `data.quotes.{instrument}` / `data.trades.{instrument}` /
//!   `data.bars.{instrument}`: historical payloads, tagged with the
//!   request id.
//! - `data.instrument.{instrument}`: instrument metadata.
//! - `requests.{request_id}`: the per-request terminal status event.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::domain::market_data::{Bar, Instrument, InstrumentId, Tick};
use crate::domain::request::{RequestId, StatusEvent};
use crate::domain::subscription::DataKind;

// =============================================================================
// Topics
// =============================================================================

/// Topic-string scheme for bus events.
pub mod topics {
    use super::{DataKind, InstrumentId, RequestId};

    /// Per-request status topic.
    #[must_use]
    pub fn status(request_id: RequestId) -> String {
        format!("requests.{request_id}")
    }

    /// Kind-specific data topic for an instrument.
    #[must_use]
    pub fn data(kind: DataKind, instrument_id: &InstrumentId) -> String {
        format!("data.{}.{instrument_id}", kind.as_str())
    }

    /// Instrument metadata topic.
    #[must_use]
    pub fn instrument(instrument_id: &InstrumentId) -> String {
        format!("data.instrument.{instrument_id}")
    }
}

// =============================================================================
// Events
// =============================================================================

/// Payload of a bus event.
#[derive(Debug, Clone)]
pub enum BusPayload {
    /// Historical ticks (quotes or trades).
    Ticks(Vec<Tick>),
    /// Historical bars.
    Bars(Vec<Bar>),
    /// Instrument metadata.
    Instrument(Box<Instrument>),
    /// Terminal request status.
    Status(StatusEvent),
}

/// A single message on the bus.
#[derive(Debug, Clone)]
pub struct BusEvent {
    /// Topic the event is published under.
    pub topic: String,
    /// Correlation id of the originating request, if any.
    pub request_id: Option<RequestId>,
    /// The payload.
    pub payload: BusPayload,
}

// =============================================================================
// Message Bus
// =============================================================================

/// Default broadcast channel capacity.
const DEFAULT_CAPACITY: usize = 1_024;

/// Bus channel settings.
#[derive(Debug, Clone, Copy)]
pub struct BusConfig {
    /// Broadcast channel capacity.
    pub capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Topic-keyed broadcast bus.
///
/// Supports multiple receivers; a publish with no active receivers is
/// dropped, which is fine for a bus whose consumers decide what to listen
/// for.
#[derive(Debug)]
pub struct MessageBus {
    tx: broadcast::Sender<BusEvent>,
}

impl MessageBus {
    /// Create a bus with the given configuration.
    #[must_use]
    pub fn new(config: BusConfig) -> Self {
        Self {
            tx: broadcast::channel(config.capacity).0,
        }
    }

    /// Create a bus with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(BusConfig::default())
    }

    /// Publish an event to all current receivers.
    ///
    /// Returns the number of receivers that got the event, or `None` if
    /// there were no active receivers.
    pub fn publish(&self, event: BusEvent) -> Option<usize> {
        self.tx.send(event).ok()
    }

    /// Get a new receiver for all bus events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BusEvent> {
        self.tx.subscribe()
    }

    /// Number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Shared bus reference.
pub type SharedMessageBus = Arc<MessageBus>;

// =============================================================================
// Tests
// =============================================================================
