//! Result Publisher
//!
//! Translates completed request outcomes into bus traffic: the data
//! payload (if any) on the kind-specific topic, and the terminal status
//! event on the per-request status topic. The status event is emitted by
//! the bridge exactly once per request, whatever the outcome.

use crate::domain::market_data::{Bar, Instrument, Tick};
use crate::domain::request::{HistoricalRequest, RequestId, RequestStatus, StatusEvent};
use crate::infrastructure::bus::{BusEvent, BusPayload, SharedMessageBus, topics};
use crate::infrastructure::metrics;

/// Publishes request results and terminal status events.
pub struct ResultPublisher {
    bus: SharedMessageBus,
}

impl ResultPublisher {
    /// Create a publisher over the shared bus.
    #[must_use]
    pub const fn new(bus: SharedMessageBus) -> Self {
        Self { bus }
    }

    /// Publish a tick payload under the request's data topic.
    pub fn publish_ticks(&self, request: &HistoricalRequest, ticks: Vec<Tick>) {
        let count = ticks.len();
        let _ = self.bus.publish(BusEvent {
            topic: topics::data(request.kind, &request.instrument_id),
            request_id: Some(request.request_id),
            payload: BusPayload::Ticks(ticks),
        });
        metrics::record_records_returned(request.kind, count as u64);
        tracing::debug!(
            request_id = %request.request_id,
            instrument_id = %request.instrument_id,
            count,
            "published ticks"
        );
    }

    /// Publish a bar payload under the request's data topic.
    pub fn publish_bars(&self, request: &HistoricalRequest, bars: Vec<Bar>) {
        let count = bars.len();
        let _ = self.bus.publish(BusEvent {
            topic: topics::data(request.kind, &request.instrument_id),
            request_id: Some(request.request_id),
            payload: BusPayload::Bars(bars),
        });
        metrics::record_records_returned(request.kind, count as u64);
        tracing::debug!(
            request_id = %request.request_id,
            instrument_id = %request.instrument_id,
            count,
            "published bars"
        );
    }

    /// Publish instrument metadata.
    pub fn publish_instrument(&self, request_id: RequestId, instrument: Instrument) {
        let topic = topics::instrument(&instrument.id);
        tracing::debug!(
            request_id = %request_id,
            instrument_id = %instrument.id,
            "published instrument"
        );
        let _ = self.bus.publish(BusEvent {
            topic,
            request_id: Some(request_id),
            payload: BusPayload::Instrument(Box::new(instrument)),
        });
    }

    /// Publish loaded instrument metadata outside any request (connect-time
    /// directory sweep).
    pub fn publish_loaded_instrument(&self, instrument: Instrument) {
        let topic = topics::instrument(&instrument.id);
        let _ = self.bus.publish(BusEvent {
            topic,
            request_id: None,
            payload: BusPayload::Instrument(Box::new(instrument)),
        });
    }

    /// Publish the terminal status event for a request.
    pub fn publish_status(&self, request_id: RequestId, status: RequestStatus) {
        let _ = self.bus.publish(BusEvent {
            topic: topics::status(request_id),
            request_id: Some(request_id),
            payload: BusPayload::Status(StatusEvent { request_id, status }),
        });
        tracing::debug!(
            request_id = %request_id,
            status = status.as_str(),
            "published terminal status"
        );
    }
}

// =============================================================================
// Tests
// =============================================================================
