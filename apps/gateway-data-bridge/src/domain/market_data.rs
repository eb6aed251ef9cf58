//! Market Data Types
//!
//! Core domain types for the bridge: instruments with their venue contract
//! descriptors, quote/trade ticks, and OHLCV bars.
//!
//! # Two Clocks
//!
//! Every record carries two timestamps: `ts_event` (the venue-reported
//! event time) and `ts_init` (the local receipt time). Ticks are ordered
//! by `ts_init`, bars by `ts_event`. The asymmetry is deliberate policy
//! (changing it would change result semantics) and is pinned by tests.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Instruments
// =============================================================================

/// Opaque instrument identifier (e.g. "EURUSD.IDEALPRO", "AAPL.NASDAQ").
pub type InstrumentId = String;

/// Asset class of an instrument.
///
/// The venue does not report trade prints for `CurrencyPair` instruments;
/// trade subscriptions and trade requests for that class are rejected
/// before any venue call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    /// Listed equity.
    Equity,
    /// Exchange-traded future.
    Future,
    /// Listed option.
    Option,
    /// Spot FX pair.
    CurrencyPair,
    /// Index (no tradeable contract).
    Index,
}

/// Venue-specific contract descriptor.
///
/// An arbitrary key/value attribute map carrying whatever the external
/// venue needs to address the instrument (symbol, exchange, currency,
/// contract month, ...). The bridge never interprets the attributes; it
/// passes them through to the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Raw venue attributes.
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Contract {
    /// Create a contract from an attribute map.
    #[must_use]
    pub const fn new(attributes: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { attributes }
    }

    /// Look up a string attribute.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(serde_json::Value::as_str)
    }
}

/// An instrument known to the directory.
///
/// Immutable once loaded; owned by the instrument directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Opaque identifier.
    pub id: InstrumentId,
    /// Asset class.
    pub asset_class: AssetClass,
    /// Venue contract descriptor.
    pub contract: Contract,
}

impl Instrument {
    /// Whether this instrument is currency-pair-like (no trade prints).
    #[must_use]
    pub const fn is_currency_pair(&self) -> bool {
        matches!(self.asset_class, AssetClass::CurrencyPair)
    }
}

// =============================================================================
// Tick and Bar Specifications
// =============================================================================

/// Kind of tick stream on the venue session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickKind {
    /// Top-of-book quote updates.
    BidAsk,
    /// Trade prints.
    AllLast,
}

impl TickKind {
    /// Venue query label for this tick kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BidAsk => "BID_ASK",
            Self::AllLast => "TRADES",
        }
    }
}

/// Market data type requested from the venue session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarketDataType {
    /// Live streaming data.
    #[default]
    RealTime,
    /// Last-known values frozen at market close.
    Frozen,
    /// Delayed data.
    Delayed,
    /// Delayed data frozen at market close.
    DelayedFrozen,
}

impl MarketDataType {
    /// Parse market data type from string.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "frozen" => Self::Frozen,
            "delayed" => Self::Delayed,
            "delayed_frozen" | "delayedfrozen" => Self::DelayedFrozen,
            _ => Self::RealTime,
        }
    }

    /// Get the market data type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RealTime => "realtime",
            Self::Frozen => "frozen",
            Self::Delayed => "delayed",
            Self::DelayedFrozen => "delayed_frozen",
        }
    }
}

/// Bar aggregation source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarAggregation {
    /// Fixed time interval.
    Time,
    /// Fixed tick count.
    Tick,
    /// Fixed traded volume.
    Volume,
}

/// Interval that maps to the venue's continuous realtime bar stream.
pub const REALTIME_BAR_INTERVAL: Duration = Duration::from_secs(5);

/// Bar specification: aggregation interval and source.
///
/// Only time-aggregated bars can be requested historically; the venue
/// aggregates nothing else server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarSpec {
    /// Aggregation interval.
    pub interval: Duration,
    /// Aggregation source.
    pub aggregation: BarAggregation,
}

impl BarSpec {
    /// Create a time-aggregated bar spec.
    #[must_use]
    pub const fn time(interval: Duration) -> Self {
        Self {
            interval,
            aggregation: BarAggregation::Time,
        }
    }

    /// Whether this spec aggregates by time.
    #[must_use]
    pub const fn is_time_aggregated(&self) -> bool {
        matches!(self.aggregation, BarAggregation::Time)
    }

    /// Whether this spec maps to the venue's continuous realtime bar
    /// stream rather than the polling historical bar stream.
    #[must_use]
    pub fn is_realtime_interval(&self) -> bool {
        self.interval == REALTIME_BAR_INTERVAL
    }
}

impl std::fmt::Display for BarSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.aggregation {
            BarAggregation::Time => "s",
            BarAggregation::Tick => "ticks",
            BarAggregation::Volume => "vol",
        };
        write!(f, "{}{tag}", self.interval.as_secs())
    }
}

// =============================================================================
// Records
// =============================================================================

/// Top-of-book quote tick.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteTick {
    /// Instrument identifier.
    pub instrument_id: InstrumentId,
    /// Best bid price.
    pub bid_price: Decimal,
    /// Best ask price.
    pub ask_price: Decimal,
    /// Bid size.
    pub bid_size: u32,
    /// Ask size.
    pub ask_size: u32,
    /// Venue-reported event time.
    pub ts_event: DateTime<Utc>,
    /// Local receipt time.
    pub ts_init: DateTime<Utc>,
}

/// Trade print tick.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeTick {
    /// Instrument identifier.
    pub instrument_id: InstrumentId,
    /// Trade price.
    pub price: Decimal,
    /// Trade size.
    pub size: u32,
    /// Venue-reported event time.
    pub ts_event: DateTime<Utc>,
    /// Local receipt time.
    pub ts_init: DateTime<Utc>,
}

/// A single tick, quote or trade.
///
/// One enum so the backfill paginator runs the same loop for both kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tick {
    /// Quote tick.
    Quote(QuoteTick),
    /// Trade tick.
    Trade(TradeTick),
}

impl Tick {
    /// Instrument identifier.
    #[must_use]
    pub fn instrument_id(&self) -> &InstrumentId {
        match self {
            Self::Quote(q) => &q.instrument_id,
            Self::Trade(t) => &t.instrument_id,
        }
    }

    /// Venue-reported event time.
    #[must_use]
    pub const fn ts_event(&self) -> DateTime<Utc> {
        match self {
            Self::Quote(q) => q.ts_event,
            Self::Trade(t) => t.ts_event,
        }
    }

    /// Local receipt time.
    #[must_use]
    pub const fn ts_init(&self) -> DateTime<Utc> {
        match self {
            Self::Quote(q) => q.ts_init,
            Self::Trade(t) => t.ts_init,
        }
    }

    /// The key ticks are ordered by: local receipt time.
    #[must_use]
    pub const fn ordering_key(&self) -> DateTime<Utc> {
        self.ts_init()
    }
}

/// OHLCV bar over a fixed interval.
///
/// Equality is structural: two bars for the same instant, prices, and
/// volume are identical, which is what boundary deduplication relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bar {
    /// Instrument identifier.
    pub instrument_id: InstrumentId,
    /// Bar specification.
    pub spec: BarSpec,
    /// Open price.
    pub open: Decimal,
    /// High price.
    pub high: Decimal,
    /// Low price.
    pub low: Decimal,
    /// Close price.
    pub close: Decimal,
    /// Traded volume.
    pub volume: u64,
    /// Venue-reported bar close time.
    pub ts_event: DateTime<Utc>,
    /// Local receipt time.
    pub ts_init: DateTime<Utc>,
}

impl Bar {
    /// The key bars are ordered by: venue event time.
    #[must_use]
    pub const fn ordering_key(&self) -> DateTime<Utc> {
        self.ts_event
    }
}

// =============================================================================
// Tests
// =============================================================================
