//! Metrics Instrumentation
//!
//! Records bridge metrics through the `metrics` facade. The embedding
//! process installs whatever recorder/exporter it wants; without one the
//! calls are no-ops.
//!
//! # Metrics Categories
//!
//! - **Requests**: historical request outcomes and page fetch counts
//! - **Subscriptions**: active subscription and attached client gauges

use metrics::{counter, describe_counter, describe_gauge, gauge};

use crate::domain::request::RequestStatus;
use crate::domain::subscription::DataKind;

// =============================================================================
// Metric Registration
// =============================================================================

/// Describe all bridge metrics.
///
/// Call once after installing a recorder so exporters carry help text.
pub fn describe_metrics() {
    describe_counter!(
        "gateway_bridge_requests_total",
        "Historical requests completed, labelled by terminal status"
    );
    describe_counter!(
        "gateway_bridge_pages_fetched_total",
        "Historical pages fetched from the venue session"
    );
    describe_counter!(
        "gateway_bridge_records_returned_total",
        "Records returned to callers after dedup and ordering"
    );
    describe_gauge!(
        "gateway_bridge_subscriptions_active",
        "Active venue subscriptions"
    );
    describe_gauge!(
        "gateway_bridge_clients_attached",
        "Logical clients attached to the shared session"
    );
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

const fn kind_label(kind: DataKind) -> &'static str {
    match kind {
        DataKind::Quote => "quotes",
        DataKind::Trade => "trades",
        DataKind::Bar(_) => "bars",
    }
}

/// Record a completed historical request.
pub fn record_request_completed(kind: DataKind, status: RequestStatus) {
    counter!(
        "gateway_bridge_requests_total",
        "kind" => kind_label(kind),
        "status" => status.as_str()
    )
    .increment(1);
}

/// Record one page fetch against the venue session.
pub fn record_page_fetched(kind: DataKind) {
    counter!(
        "gateway_bridge_pages_fetched_total",
        "kind" => kind_label(kind)
    )
    .increment(1);
}

/// Record records returned to a caller.
pub fn record_records_returned(kind: DataKind, count: u64) {
    counter!(
        "gateway_bridge_records_returned_total",
        "kind" => kind_label(kind)
    )
    .increment(count);
}

/// Update the active subscription gauge.
pub fn set_subscriptions_active(count: f64) {
    gauge!("gateway_bridge_subscriptions_active").set(count);
}

/// Update the attached client gauge.
pub fn set_clients_attached(count: f64) {
    gauge!("gateway_bridge_clients_attached").set(count);
}

// =============================================================================
// Tests
// =============================================================================
