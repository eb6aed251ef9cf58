//! Historical Request Values
//!
//! Immutable request values for the bounded backfill interface, plus the
//! terminal status event every request resolves to.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::market_data::InstrumentId;
use super::subscription::DataKind;

// =============================================================================
// Request Identity
// =============================================================================

/// Request correlation id, unique per historical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a fresh request id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// Historical Request
// =============================================================================

/// A bounded historical data request.
///
/// Immutable value: the target instrument and data kind, an optional
/// `[start, end]` window (`end` defaults to "now"), an optional record
/// limit (`0` = unbounded by count, bounded only by the window), and an
/// optional per-request timeout overriding the configured default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRequest {
    /// Correlation id, echoed on every resulting bus event.
    pub request_id: RequestId,
    /// Target instrument.
    pub instrument_id: InstrumentId,
    /// Requested data kind.
    pub kind: DataKind,
    /// Inclusive window start; `None` means "walk back until satisfied".
    pub start: Option<DateTime<Utc>>,
    /// Inclusive window end; `None` means "now".
    pub end: Option<DateTime<Utc>>,
    /// Record limit; `0` means unbounded by count.
    pub limit: usize,
    /// Per-request timeout override.
    pub timeout: Option<Duration>,
}

impl HistoricalRequest {
    /// Create a request with a fresh id and no bounds.
    #[must_use]
    pub fn new(instrument_id: InstrumentId, kind: DataKind) -> Self {
        Self {
            request_id: RequestId::new(),
            instrument_id,
            kind,
            start: None,
            end: None,
            limit: 0,
            timeout: None,
        }
    }

    /// Effective window end: the explicit end, or `now`.
    #[must_use]
    pub fn effective_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.end.unwrap_or(now)
    }

    /// Effective record limit.
    ///
    /// With no start and no limit the walk would never terminate, so the
    /// caller's default cap is substituted. An explicit start with limit 0
    /// means "fetch the whole window, however large" and stays 0.
    #[must_use]
    pub const fn effective_limit(&self, default_cap: usize) -> usize {
        if self.start.is_none() && self.limit == 0 {
            default_cap
        } else {
            self.limit
        }
    }
}

/// A single-instrument metadata request.
///
/// Metadata lookups are not time-windowed; any supplied start/end fields
/// are ignored with a warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentRequest {
    /// Correlation id.
    pub request_id: RequestId,
    /// Target instrument.
    pub instrument_id: InstrumentId,
    /// Ignored for metadata lookups.
    pub start: Option<DateTime<Utc>>,
    /// Ignored for metadata lookups.
    pub end: Option<DateTime<Utc>>,
}

impl InstrumentRequest {
    /// Create a metadata request with a fresh id.
    #[must_use]
    pub fn new(instrument_id: InstrumentId) -> Self {
        Self {
            request_id: RequestId::new(),
            instrument_id,
            start: None,
            end: None,
        }
    }
}

// =============================================================================
// Terminal Status
// =============================================================================

/// Terminal outcome of a historical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    /// The request produced a non-empty result.
    Success,
    /// The request produced nothing (legitimately empty, or aborted).
    Failed,
}

impl RequestStatus {
    /// Get the status name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failed => "Failed",
        }
    }
}

/// Terminal status event, emitted exactly once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    /// The request this event terminates.
    pub request_id: RequestId,
    /// Final status.
    pub status: RequestStatus,
}

// =============================================================================
// Tests
// =============================================================================
