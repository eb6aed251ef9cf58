//! Shared test support: scripted port fakes and record builders.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use gateway_data_bridge::{
    AssetClass, Bar, BarSpec, BridgeOptions, Contract, DataBridge, DirectoryError, Instrument,
    InstrumentDirectory, InstrumentId, MarketDataType, MessageBus, QuoteTick, SharedMessageBus,
    Tick, TickKind, VenueError, VenueSession,
};

// =============================================================================
// Timestamps and Records
// =============================================================================

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn quote_tick_at(instrument_id: &str, ts_init: DateTime<Utc>) -> Tick {
    Tick::Quote(QuoteTick {
        instrument_id: instrument_id.to_string(),
        bid_price: Decimal::new(10850, 4),
        ask_price: Decimal::new(10852, 4),
        bid_size: 1_000_000,
        ask_size: 500_000,
        ts_event: ts_init - chrono::Duration::seconds(1),
        ts_init,
    })
}

pub fn bar_at(instrument_id: &str, spec: BarSpec, ts_event: DateTime<Utc>) -> Bar {
    Bar {
        instrument_id: instrument_id.to_string(),
        spec,
        open: Decimal::new(10850, 4),
        high: Decimal::new(10860, 4),
        low: Decimal::new(10840, 4),
        close: Decimal::new(10855, 4),
        volume: 1_200,
        ts_event,
        ts_init: ts_event + chrono::Duration::seconds(2),
    }
}

pub fn equity(id: &str) -> Instrument {
    Instrument {
        id: id.to_string(),
        asset_class: AssetClass::Equity,
        contract: Contract::default(),
    }
}

pub fn currency_pair(id: &str) -> Instrument {
    Instrument {
        id: id.to_string(),
        asset_class: AssetClass::CurrencyPair,
        contract: Contract::default(),
    }
}

// =============================================================================
// Scripted Venue Session
// =============================================================================

/// Readiness behavior of the scripted session.
pub enum ReadyMode {
    /// Always ready immediately.
    Immediate,
    /// Readiness wait fails immediately with a timeout.
    Timeout,
    /// Readiness wait suspends forever (until cancellation).
    Pending,
    /// Ready for the first `n` waits, timing out afterwards.
    ReadyTimes(usize),
}

/// A venue session that replays scripted pages and counts every call.
pub struct ScriptedVenue {
    ready_mode: ReadyMode,
    ready_calls: AtomicUsize,
    running: AtomicBool,

    tick_pages: Mutex<VecDeque<Vec<Tick>>>,
    bar_pages: Mutex<VecDeque<Vec<Bar>>>,
    endless_tick_page_size: Option<usize>,

    pub tick_fetches: AtomicUsize,
    pub bar_fetches: AtomicUsize,
    pub tick_fetch_ends: Mutex<Vec<DateTime<Utc>>>,
    pub bar_fetch_ends: Mutex<Vec<DateTime<Utc>>>,
    pub bar_fetch_durations: Mutex<Vec<String>>,

    pub tick_subscribes: AtomicUsize,
    pub tick_unsubscribes: AtomicUsize,
    pub realtime_bar_subscribes: AtomicUsize,
    pub historical_bar_subscribes: AtomicUsize,
    pub bar_unsubscribes: AtomicUsize,
    pub stops: AtomicUsize,
    pub market_data_type: Mutex<Option<MarketDataType>>,
}

impl ScriptedVenue {
    pub fn new() -> Self {
        Self {
            ready_mode: ReadyMode::Immediate,
            ready_calls: AtomicUsize::new(0),
            running: AtomicBool::new(true),
            tick_pages: Mutex::new(VecDeque::new()),
            bar_pages: Mutex::new(VecDeque::new()),
            endless_tick_page_size: None,
            tick_fetches: AtomicUsize::new(0),
            bar_fetches: AtomicUsize::new(0),
            tick_fetch_ends: Mutex::new(Vec::new()),
            bar_fetch_ends: Mutex::new(Vec::new()),
            bar_fetch_durations: Mutex::new(Vec::new()),
            tick_subscribes: AtomicUsize::new(0),
            tick_unsubscribes: AtomicUsize::new(0),
            realtime_bar_subscribes: AtomicUsize::new(0),
            historical_bar_subscribes: AtomicUsize::new(0),
            bar_unsubscribes: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            market_data_type: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_ready_mode(mut self, mode: ReadyMode) -> Self {
        self.ready_mode = mode;
        self
    }

    #[must_use]
    pub fn with_tick_pages(self, pages: Vec<Vec<Tick>>) -> Self {
        *self.tick_pages.lock() = pages.into();
        self
    }

    #[must_use]
    pub fn with_bar_pages(self, pages: Vec<Vec<Bar>>) -> Self {
        *self.bar_pages.lock() = pages.into();
        self
    }

    /// Produce non-empty pages forever, each stepping back from the
    /// queried end one second per tick.
    #[must_use]
    pub fn with_endless_ticks(mut self, page_size: usize) -> Self {
        self.endless_tick_page_size = Some(page_size);
        self
    }
}

impl Default for ScriptedVenue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VenueSession for ScriptedVenue {
    async fn await_ready(&self, timeout: Duration) -> Result<(), VenueError> {
        match self.ready_mode {
            ReadyMode::Immediate => Ok(()),
            ReadyMode::Timeout => Err(VenueError::ReadyTimeout(timeout)),
            ReadyMode::Pending => std::future::pending().await,
            ReadyMode::ReadyTimes(n) => {
                if self.ready_calls.fetch_add(1, Ordering::SeqCst) < n {
                    Ok(())
                } else {
                    Err(VenueError::ReadyTimeout(timeout))
                }
            }
        }
    }

    async fn set_market_data_type(&self, kind: MarketDataType) -> Result<(), VenueError> {
        *self.market_data_type.lock() = Some(kind);
        Ok(())
    }

    async fn subscribe_ticks(
        &self,
        _instrument: &Instrument,
        _tick_kind: TickKind,
        _ignore_size_updates: bool,
    ) -> Result<(), VenueError> {
        self.tick_subscribes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn unsubscribe_ticks(
        &self,
        _instrument_id: &InstrumentId,
        _tick_kind: TickKind,
    ) -> Result<(), VenueError> {
        self.tick_unsubscribes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn subscribe_realtime_bars(
        &self,
        _spec: &BarSpec,
        _instrument: &Instrument,
        _use_regular_hours: bool,
    ) -> Result<(), VenueError> {
        self.realtime_bar_subscribes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn subscribe_historical_bars(
        &self,
        _spec: &BarSpec,
        _instrument: &Instrument,
        _use_regular_hours: bool,
        _handle_revisions: bool,
    ) -> Result<(), VenueError> {
        self.historical_bar_subscribes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn unsubscribe_realtime_bars(
        &self,
        _spec: &BarSpec,
        _instrument_id: &InstrumentId,
    ) -> Result<(), VenueError> {
        self.bar_unsubscribes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn unsubscribe_historical_bars(
        &self,
        _spec: &BarSpec,
        _instrument_id: &InstrumentId,
    ) -> Result<(), VenueError> {
        self.bar_unsubscribes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn fetch_historical_ticks(
        &self,
        instrument: &Instrument,
        _tick_kind: TickKind,
        end: DateTime<Utc>,
        _use_regular_hours: bool,
        _timeout: Duration,
    ) -> Result<Vec<Tick>, VenueError> {
        self.tick_fetches.fetch_add(1, Ordering::SeqCst);
        self.tick_fetch_ends.lock().push(end);

        if let Some(page_size) = self.endless_tick_page_size {
            let page = (1..=page_size as i64)
                .map(|i| quote_tick_at(&instrument.id, end - chrono::Duration::seconds(i)))
                .collect();
            return Ok(page);
        }

        Ok(self.tick_pages.lock().pop_front().unwrap_or_default())
    }

    async fn fetch_historical_bars(
        &self,
        _spec: &BarSpec,
        _instrument: &Instrument,
        _use_regular_hours: bool,
        end: DateTime<Utc>,
        duration: &str,
        _timeout: Duration,
    ) -> Result<Vec<Bar>, VenueError> {
        self.bar_fetches.fetch_add(1, Ordering::SeqCst);
        self.bar_fetch_ends.lock().push(end);
        self.bar_fetch_durations.lock().push(duration.to_string());

        Ok(self.bar_pages.lock().pop_front().unwrap_or_default())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// Static Instrument Directory
// =============================================================================

/// A directory preloaded with a fixed instrument universe.
pub struct StaticDirectory {
    instruments: HashMap<InstrumentId, Instrument>,
}

impl StaticDirectory {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        Self {
            instruments: instruments
                .into_iter()
                .map(|i| (i.id.clone(), i))
                .collect(),
        }
    }
}

#[async_trait]
impl InstrumentDirectory for StaticDirectory {
    async fn initialize(&self) -> Result<(), DirectoryError> {
        Ok(())
    }

    fn resolve(&self, instrument_id: &InstrumentId) -> Option<Instrument> {
        self.instruments.get(instrument_id).cloned()
    }

    async fn load(&self, _instrument_id: &InstrumentId) -> Result<(), DirectoryError> {
        Ok(())
    }

    fn list_all(&self) -> Vec<Instrument> {
        self.instruments.values().cloned().collect()
    }
}

// =============================================================================
// Bridge Assembly
// =============================================================================

/// Wire a bridge over the scripted ports, the way the embedding process
/// would.
pub fn build_bridge(
    venue: Arc<ScriptedVenue>,
    instruments: Vec<Instrument>,
    options: BridgeOptions,
    cancel: CancellationToken,
) -> (Arc<DataBridge>, SharedMessageBus) {
    let bus: SharedMessageBus = Arc::new(MessageBus::with_defaults());
    let directory = Arc::new(StaticDirectory::new(instruments));
    let bridge = Arc::new(DataBridge::new(
        venue,
        directory,
        Arc::clone(&bus),
        options,
        cancel,
    ));
    (bridge, bus)
}
