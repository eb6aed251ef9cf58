//! Data Bridge
//!
//! The uniform subscribe/request surface over one shared venue session.
//! Subscription state lives in the registry; the session is always driven
//! from it, never the reverse. A key enters the registry only after the
//! matching venue call succeeded, and leaves it before the venue
//! unsubscribe is confirmed, so the registry's key set stays a subset of
//! the session's actual subscriptions.
//!
//! Historical requests run through the paginator and always terminate in
//! exactly one status event on the bus. Precondition failures on the
//! subscription path (no request id to answer on) are logged and returned
//! to the caller without bus traffic.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::application::error::BridgeError;
use crate::application::ports::{InstrumentDirectory, VenueSession};
use crate::domain::market_data::{Instrument, InstrumentId, MarketDataType, TickKind};
use crate::domain::request::{HistoricalRequest, InstrumentRequest, RequestStatus};
use crate::domain::subscription::{
    ClientId, DataKind, RegistryState, RegistryStats, SubscriptionKey,
};
use crate::infrastructure::bus::SharedMessageBus;
use crate::infrastructure::metrics;

use super::paginator::{HistoricalPaginator, PaginatorConfig};
use super::publisher::ResultPublisher;

// =============================================================================
// Options
// =============================================================================

/// Bridge behavior options, normally derived from `BridgeConfig`.
#[derive(Debug, Clone)]
pub struct BridgeOptions {
    /// The bridge's own logical client id on the shared session.
    pub client_id: ClientId,
    /// Market data type pushed to the session on connect.
    pub market_data_type: MarketDataType,
    /// Restrict streams and fetches to regular trading hours.
    pub use_regular_trading_hours: bool,
    /// Forward revisions on the polling historical bar stream.
    pub handle_revised_bars: bool,
    /// Suppress quote ticks that only change size, not price.
    pub ignore_quote_tick_size_updates: bool,
    /// Bound on the connect-time readiness wait.
    pub connection_timeout: Duration,
    /// Default per-call timeout for historical fetches.
    pub request_timeout: Duration,
    /// Default record cap for unbounded tick requests.
    pub tick_cache_capacity: usize,
    /// Hard cap on page fetches per historical request.
    pub max_pages_per_request: usize,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            client_id: "GATEWAY-001".to_string(),
            market_data_type: MarketDataType::RealTime,
            use_regular_trading_hours: true,
            handle_revised_bars: false,
            ignore_quote_tick_size_updates: false,
            connection_timeout: Duration::from_secs(300),
            request_timeout: Duration::from_secs(60),
            tick_cache_capacity: 10_000,
            max_pages_per_request: 1_000,
        }
    }
}

// =============================================================================
// Data Bridge
// =============================================================================

/// Bridges multiple logical clients onto one venue gateway session.
pub struct DataBridge {
    session: Arc<dyn VenueSession>,
    directory: Arc<dyn InstrumentDirectory>,
    publisher: ResultPublisher,
    paginator: HistoricalPaginator,
    registry: Mutex<RegistryState>,
    options: BridgeOptions,
}

impl DataBridge {
    /// Create a bridge over the shared session and directory.
    #[must_use]
    pub fn new(
        session: Arc<dyn VenueSession>,
        directory: Arc<dyn InstrumentDirectory>,
        bus: SharedMessageBus,
        options: BridgeOptions,
        cancel: CancellationToken,
    ) -> Self {
        let paginator = HistoricalPaginator::new(
            Arc::clone(&session),
            PaginatorConfig {
                use_regular_hours: options.use_regular_trading_hours,
                request_timeout: options.request_timeout,
                tick_cache_capacity: options.tick_cache_capacity,
                max_pages_per_request: options.max_pages_per_request,
            },
            cancel,
        );

        Self {
            session,
            directory,
            publisher: ResultPublisher::new(bus),
            paginator,
            registry: Mutex::new(RegistryState::new()),
            options,
        }
    }

    // =========================================================================
    // Session Lifecycle
    // =========================================================================

    /// Connect the bridge to the shared session.
    ///
    /// Waits for session readiness, attaches the bridge's client id,
    /// pushes the configured market data type, initializes the directory,
    /// and publishes every known instrument.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::SessionNotReady`] when the session does not
    /// come up within the connection timeout, or the underlying port
    /// error for the remaining handshake steps.
    pub async fn connect(&self) -> Result<(), BridgeError> {
        self.session
            .await_ready(self.options.connection_timeout)
            .await
            .map_err(|_| BridgeError::SessionNotReady(self.options.connection_timeout))?;

        self.attach_client(self.options.client_id.clone()).await;

        self.session
            .set_market_data_type(self.options.market_data_type)
            .await?;

        self.directory.initialize().await?;
        let instruments = self.directory.list_all();
        let loaded = instruments.len();
        for instrument in instruments {
            self.publisher.publish_loaded_instrument(instrument);
        }

        tracing::info!(
            client_id = %self.options.client_id,
            market_data_type = self.options.market_data_type.as_str(),
            loaded,
            "bridge connected"
        );
        Ok(())
    }

    /// Disconnect the bridge from the shared session.
    ///
    /// Detaches the bridge's client id; the session is stopped only when
    /// no logical clients remain attached.
    pub async fn disconnect(&self) {
        self.detach_client(&self.options.client_id).await;
        tracing::info!(client_id = %self.options.client_id, "bridge disconnected");
    }

    /// Attach a logical client to the shared session. Idempotent.
    pub async fn attach_client(&self, client: ClientId) {
        let mut registry = self.registry.lock().await;
        if registry.attach(client.clone()) {
            tracing::debug!(client = %client, "client attached");
        }
        metrics::set_clients_attached(registry.stats().client_count as f64);
    }

    /// Detach a logical client.
    ///
    /// Detaching the last attached client stops the underlying session if
    /// it is still running. Detaching an unknown client is a no-op.
    pub async fn detach_client(&self, client: &ClientId) {
        let mut registry = self.registry.lock().await;
        let last_client_left = registry.detach(client);
        metrics::set_clients_attached(registry.stats().client_count as f64);

        if last_client_left && self.session.is_running() {
            tracing::info!(client = %client, "last client detached, stopping session");
            self.session.stop().await;
        }
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Subscribe a (instrument, data-kind) key.
    ///
    /// A no-op success when the key is already active: the registry keeps
    /// at most one underlying venue subscription per key regardless of
    /// how many logical clients requested it.
    ///
    /// # Errors
    ///
    /// Fails before any venue call with [`BridgeError::InstrumentNotFound`]
    /// when the instrument does not resolve, or
    /// [`BridgeError::UnsupportedInstrument`] for trade subscriptions on
    /// currency-pair-like instruments.
    pub async fn subscribe(&self, key: SubscriptionKey) -> Result<(), BridgeError> {
        let mut registry = self.registry.lock().await;
        if registry.is_active(&key) {
            tracing::debug!(instrument_id = %key.instrument_id, kind = key.kind.as_str(),
                "already subscribed");
            return Ok(());
        }

        let instrument = self.resolve_instrument(&key.instrument_id, "subscribe")?;

        match key.kind {
            DataKind::Quote => {
                self.session
                    .subscribe_ticks(
                        &instrument,
                        TickKind::BidAsk,
                        self.options.ignore_quote_tick_size_updates,
                    )
                    .await?;
            }
            DataKind::Trade => {
                self.reject_currency_pair_trades(&instrument)?;
                self.session
                    .subscribe_ticks(
                        &instrument,
                        TickKind::AllLast,
                        self.options.ignore_quote_tick_size_updates,
                    )
                    .await?;
            }
            DataKind::Bar(spec) => {
                if spec.is_realtime_interval() {
                    self.session
                        .subscribe_realtime_bars(
                            &spec,
                            &instrument,
                            self.options.use_regular_trading_hours,
                        )
                        .await?;
                } else {
                    self.session
                        .subscribe_historical_bars(
                            &spec,
                            &instrument,
                            self.options.use_regular_trading_hours,
                            self.options.handle_revised_bars,
                        )
                        .await?;
                }
            }
        }

        registry.activate(key.clone());
        metrics::set_subscriptions_active(registry.stats().subscription_count as f64);
        tracing::info!(instrument_id = %key.instrument_id, kind = key.kind.as_str(),
            "subscribed");
        Ok(())
    }

    /// Unsubscribe a key. A no-op when the key is not active.
    ///
    /// # Errors
    ///
    /// Returns the venue error when the matching unsubscribe call fails;
    /// the key stays registered in that case.
    pub async fn unsubscribe(&self, key: &SubscriptionKey) -> Result<(), BridgeError> {
        let mut registry = self.registry.lock().await;
        if !registry.is_active(key) {
            tracing::debug!(instrument_id = %key.instrument_id, kind = key.kind.as_str(),
                "not subscribed");
            return Ok(());
        }

        match key.kind {
            DataKind::Quote => {
                self.session
                    .unsubscribe_ticks(&key.instrument_id, TickKind::BidAsk)
                    .await?;
            }
            DataKind::Trade => {
                self.session
                    .unsubscribe_ticks(&key.instrument_id, TickKind::AllLast)
                    .await?;
            }
            DataKind::Bar(spec) => {
                if spec.is_realtime_interval() {
                    self.session
                        .unsubscribe_realtime_bars(&spec, &key.instrument_id)
                        .await?;
                } else {
                    self.session
                        .unsubscribe_historical_bars(&spec, &key.instrument_id)
                        .await?;
                }
            }
        }

        registry.deactivate(key);
        metrics::set_subscriptions_active(registry.stats().subscription_count as f64);
        tracing::info!(instrument_id = %key.instrument_id, kind = key.kind.as_str(),
            "unsubscribed");
        Ok(())
    }

    // =========================================================================
    // Historical Requests
    // =========================================================================

    /// Run a historical request to completion.
    ///
    /// Always publishes exactly one terminal status event for the request,
    /// whatever the outcome. Hard failures are logged with their root
    /// cause; a legitimately empty result only warns.
    pub async fn request_historical(&self, request: HistoricalRequest) -> RequestStatus {
        let status = match self.run_historical(&request).await {
            Ok(status) => status,
            Err(e) => {
                tracing::error!(
                    request_id = %request.request_id,
                    instrument_id = %request.instrument_id,
                    error = %e,
                    "historical request aborted"
                );
                RequestStatus::Failed
            }
        };

        metrics::record_request_completed(request.kind, status);
        self.publisher.publish_status(request.request_id, status);
        status
    }

    async fn run_historical(
        &self,
        request: &HistoricalRequest,
    ) -> Result<RequestStatus, BridgeError> {
        let instrument = self.resolve_instrument(&request.instrument_id, "request")?;

        match request.kind {
            DataKind::Quote => {
                let ticks = self
                    .paginator
                    .fetch_ticks(&instrument, TickKind::BidAsk, request)
                    .await;
                if ticks.is_empty() {
                    tracing::warn!(instrument_id = %request.instrument_id,
                        "no quote tick data received");
                    return Ok(RequestStatus::Failed);
                }
                self.publisher.publish_ticks(request, ticks);
            }
            DataKind::Trade => {
                self.reject_currency_pair_trades(&instrument)?;
                let ticks = self
                    .paginator
                    .fetch_ticks(&instrument, TickKind::AllLast, request)
                    .await;
                if ticks.is_empty() {
                    tracing::warn!(instrument_id = %request.instrument_id,
                        "no trade data received");
                    return Ok(RequestStatus::Failed);
                }
                self.publisher.publish_ticks(request, ticks);
            }
            DataKind::Bar(spec) => {
                if !spec.is_time_aggregated() {
                    return Err(BridgeError::UnsupportedAggregation(spec));
                }
                let bars = self.paginator.fetch_bars(&instrument, &spec, request).await;
                if bars.is_empty() {
                    tracing::warn!(instrument_id = %request.instrument_id, spec = %spec,
                        "no bar data received");
                    return Ok(RequestStatus::Failed);
                }
                self.publisher.publish_bars(request, bars);
            }
        }

        Ok(RequestStatus::Success)
    }

    /// Run a single-instrument metadata request.
    ///
    /// Metadata lookups are not time-windowed; supplied start/end fields
    /// are ignored with a warning. Publishes exactly one terminal status
    /// event.
    pub async fn request_instrument(&self, request: &InstrumentRequest) -> RequestStatus {
        if request.start.is_some() {
            tracing::warn!(instrument_id = %request.instrument_id,
                "metadata request specified `start` which has no effect");
        }
        if request.end.is_some() {
            tracing::warn!(instrument_id = %request.instrument_id,
                "metadata request specified `end` which has no effect");
        }

        let status = match self.directory.load(&request.instrument_id).await {
            Ok(()) => {
                if let Some(instrument) = self.directory.resolve(&request.instrument_id) {
                    self.publisher
                        .publish_instrument(request.request_id, instrument);
                    RequestStatus::Success
                } else {
                    tracing::warn!(instrument_id = %request.instrument_id,
                        "instrument not available");
                    RequestStatus::Failed
                }
            }
            Err(e) => {
                tracing::error!(
                    instrument_id = %request.instrument_id,
                    error = %e,
                    "instrument load failed"
                );
                RequestStatus::Failed
            }
        };

        self.publisher.publish_status(request.request_id, status);
        status
    }

    // =========================================================================
    // Shared Checks
    // =========================================================================

    fn resolve_instrument(
        &self,
        instrument_id: &InstrumentId,
        operation: &str,
    ) -> Result<Instrument, BridgeError> {
        self.directory.resolve(instrument_id).map_or_else(
            || {
                tracing::error!(instrument_id = %instrument_id, operation,
                    "instrument not found");
                Err(BridgeError::InstrumentNotFound(instrument_id.clone()))
            },
            Ok,
        )
    }

    fn reject_currency_pair_trades(&self, instrument: &Instrument) -> Result<(), BridgeError> {
        if instrument.is_currency_pair() {
            tracing::error!(instrument_id = %instrument.id,
                "venue does not report trade prints for currency-pair instruments");
            return Err(BridgeError::UnsupportedInstrument(instrument.id.clone()));
        }
        Ok(())
    }

    /// Current registry statistics.
    pub async fn stats(&self) -> RegistryStats {
        self.registry.lock().await.stats()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::broadcast::error::TryRecvError;

    use crate::application::ports::{MockInstrumentDirectory, MockVenueSession};
    use crate::domain::market_data::{AssetClass, BarSpec, Contract};
    use crate::infrastructure::bus::{BusPayload, MessageBus};

    use super::*;

    fn fx_instrument() -> Instrument {
        Instrument {
            id: "EURUSD.IDEALPRO".to_string(),
            asset_class: AssetClass::CurrencyPair,
            contract: Contract::default(),
        }
    }

    fn equity_instrument() -> Instrument {
        Instrument {
            id: "AAPL.NASDAQ".to_string(),
            asset_class: AssetClass::Equity,
            contract: Contract::default(),
        }
    }

    fn make_bridge(
        session: MockVenueSession,
        directory: MockInstrumentDirectory,
        options: BridgeOptions,
    ) -> (DataBridge, SharedMessageBus) {
        let bus = Arc::new(MessageBus::with_defaults());
        let bridge = DataBridge::new(
            Arc::new(session),
            Arc::new(directory),
            Arc::clone(&bus),
            options,
            CancellationToken::new(),
        );
        (bridge, bus)
    }

    fn resolving_directory(instrument: Instrument) -> MockInstrumentDirectory {
        let mut directory = MockInstrumentDirectory::new();
        directory
            .expect_resolve()
            .returning(move |_| Some(instrument.clone()));
        directory
    }

    #[tokio::test]
    async fn subscribe_is_idempotent() {
        let mut session = MockVenueSession::new();
        session
            .expect_subscribe_ticks()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let (bridge, _bus) = make_bridge(
            session,
            resolving_directory(equity_instrument()),
            BridgeOptions::default(),
        );

        let key = SubscriptionKey::new("AAPL.NASDAQ".to_string(), DataKind::Quote);
        bridge.subscribe(key.clone()).await.unwrap();
        // Second subscribe is a no-op success; the mock would panic on a
        // second venue call.
        bridge.subscribe(key).await.unwrap();
        assert_eq!(bridge.stats().await.subscription_count, 1);
    }

    #[tokio::test]
    async fn subscribe_unknown_instrument_makes_no_venue_call() {
        let session = MockVenueSession::new();
        let mut directory = MockInstrumentDirectory::new();
        directory.expect_resolve().returning(|_| None);

        let (bridge, _bus) = make_bridge(session, directory, BridgeOptions::default());

        let key = SubscriptionKey::new("UNKNOWN".to_string(), DataKind::Quote);
        let err = bridge.subscribe(key).await.unwrap_err();
        assert!(matches!(err, BridgeError::InstrumentNotFound(_)));
        assert_eq!(bridge.stats().await.subscription_count, 0);
    }

    #[tokio::test]
    async fn trade_subscription_rejected_for_currency_pair() {
        let session = MockVenueSession::new();
        let (bridge, _bus) = make_bridge(
            session,
            resolving_directory(fx_instrument()),
            BridgeOptions::default(),
        );

        let key = SubscriptionKey::new("EURUSD.IDEALPRO".to_string(), DataKind::Trade);
        let err = bridge.subscribe(key).await.unwrap_err();
        assert!(matches!(err, BridgeError::UnsupportedInstrument(_)));
    }

    #[tokio::test]
    async fn five_second_bars_use_realtime_stream() {
        let mut session = MockVenueSession::new();
        session
            .expect_subscribe_realtime_bars()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let (bridge, _bus) = make_bridge(
            session,
            resolving_directory(equity_instrument()),
            BridgeOptions::default(),
        );

        let key = SubscriptionKey::new(
            "AAPL.NASDAQ".to_string(),
            DataKind::Bar(BarSpec::time(Duration::from_secs(5))),
        );
        bridge.subscribe(key).await.unwrap();
    }

    #[tokio::test]
    async fn other_intervals_use_historical_stream_with_revision_flag() {
        let mut session = MockVenueSession::new();
        session
            .expect_subscribe_historical_bars()
            .times(1)
            .withf(|_, _, use_rth, handle_revisions| *use_rth && *handle_revisions)
            .returning(|_, _, _, _| Ok(()));

        let options = BridgeOptions {
            handle_revised_bars: true,
            ..BridgeOptions::default()
        };
        let (bridge, _bus) =
            make_bridge(session, resolving_directory(equity_instrument()), options);

        let key = SubscriptionKey::new(
            "AAPL.NASDAQ".to_string(),
            DataKind::Bar(BarSpec::time(Duration::from_secs(60))),
        );
        bridge.subscribe(key).await.unwrap();
    }

    #[tokio::test]
    async fn unsubscribe_inactive_key_is_noop() {
        let session = MockVenueSession::new();
        let (bridge, _bus) = make_bridge(
            session,
            MockInstrumentDirectory::new(),
            BridgeOptions::default(),
        );

        let key = SubscriptionKey::new("AAPL.NASDAQ".to_string(), DataKind::Quote);
        bridge.unsubscribe(&key).await.unwrap();
    }

    #[tokio::test]
    async fn unsubscribe_uses_matching_primitive() {
        let mut session = MockVenueSession::new();
        session
            .expect_subscribe_ticks()
            .times(1)
            .returning(|_, _, _| Ok(()));
        session
            .expect_unsubscribe_ticks()
            .times(1)
            .withf(|_, tick_kind| *tick_kind == TickKind::BidAsk)
            .returning(|_, _| Ok(()));

        let (bridge, _bus) = make_bridge(
            session,
            resolving_directory(equity_instrument()),
            BridgeOptions::default(),
        );

        let key = SubscriptionKey::new("AAPL.NASDAQ".to_string(), DataKind::Quote);
        bridge.subscribe(key.clone()).await.unwrap();
        bridge.unsubscribe(&key).await.unwrap();
        assert_eq!(bridge.stats().await.subscription_count, 0);
    }

    #[tokio::test]
    async fn detach_last_client_stops_running_session() {
        let mut session = MockVenueSession::new();
        session.expect_is_running().return_const(true);
        session.expect_stop().times(1).returning(|| ());

        let (bridge, _bus) = make_bridge(
            session,
            MockInstrumentDirectory::new(),
            BridgeOptions::default(),
        );

        bridge.attach_client("desk-a".to_string()).await;
        bridge.attach_client("desk-b".to_string()).await;

        bridge.detach_client(&"desk-a".to_string()).await;
        // Session still has desk-b attached; stop only fires below.
        bridge.detach_client(&"desk-b".to_string()).await;
    }

    #[tokio::test]
    async fn detach_is_idempotent_and_never_double_stops() {
        let mut session = MockVenueSession::new();
        session.expect_is_running().return_const(true);
        session.expect_stop().times(1).returning(|| ());

        let (bridge, _bus) = make_bridge(
            session,
            MockInstrumentDirectory::new(),
            BridgeOptions::default(),
        );

        bridge.attach_client("desk-a".to_string()).await;
        bridge.detach_client(&"desk-a".to_string()).await;
        // Already detached; must not stop the session a second time.
        bridge.detach_client(&"desk-a".to_string()).await;
    }

    #[tokio::test]
    async fn trade_request_on_currency_pair_never_fetches() {
        let session = MockVenueSession::new();
        let (bridge, bus) = make_bridge(
            session,
            resolving_directory(fx_instrument()),
            BridgeOptions::default(),
        );
        let mut rx = bus.subscribe();

        let request =
            HistoricalRequest::new("EURUSD.IDEALPRO".to_string(), DataKind::Trade);
        let request_id = request.request_id;

        let status = bridge.request_historical(request).await;
        assert_eq!(status, RequestStatus::Failed);

        // Exactly one event reaches the bus: the terminal status.
        let event = rx.recv().await.unwrap();
        assert_eq!(event.topic, format!("requests.{request_id}"));
        assert!(matches!(event.payload, BusPayload::Status(_)));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn non_time_bar_request_fails_without_fetching() {
        let session = MockVenueSession::new();
        let (bridge, bus) = make_bridge(
            session,
            resolving_directory(equity_instrument()),
            BridgeOptions::default(),
        );
        let mut rx = bus.subscribe();

        let spec = BarSpec {
            interval: Duration::from_secs(100),
            aggregation: crate::domain::market_data::BarAggregation::Tick,
        };
        let request =
            HistoricalRequest::new("AAPL.NASDAQ".to_string(), DataKind::Bar(spec));

        let status = bridge.request_historical(request).await;
        assert_eq!(status, RequestStatus::Failed);
        assert!(matches!(rx.recv().await.unwrap().payload, BusPayload::Status(_)));
    }

    #[tokio::test]
    async fn instrument_request_ignores_window_and_publishes_once() {
        let session = MockVenueSession::new();
        let mut directory = MockInstrumentDirectory::new();
        directory.expect_load().times(1).returning(|_| Ok(()));
        directory
            .expect_resolve()
            .returning(|_| Some(equity_instrument()));

        let (bridge, bus) = make_bridge(session, directory, BridgeOptions::default());
        let mut rx = bus.subscribe();

        let mut request = InstrumentRequest::new("AAPL.NASDAQ".to_string());
        request.start = Some(chrono::Utc::now());
        request.end = Some(chrono::Utc::now());

        let status = bridge.request_instrument(&request).await;
        assert_eq!(status, RequestStatus::Success);

        let first = rx.recv().await.unwrap();
        assert!(matches!(first.payload, BusPayload::Instrument(_)));
        let second = rx.recv().await.unwrap();
        assert!(matches!(second.payload, BusPayload::Status(_)));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn connect_runs_handshake_and_publishes_instruments() {
        let mut session = MockVenueSession::new();
        session
            .expect_await_ready()
            .times(1)
            .returning(|_| Ok(()));
        session
            .expect_set_market_data_type()
            .times(1)
            .withf(|kind| *kind == MarketDataType::Delayed)
            .returning(|_| Ok(()));

        let mut directory = MockInstrumentDirectory::new();
        directory.expect_initialize().times(1).returning(|| Ok(()));
        directory
            .expect_list_all()
            .returning(|| vec![equity_instrument(), fx_instrument()]);

        let options = BridgeOptions {
            market_data_type: MarketDataType::Delayed,
            ..BridgeOptions::default()
        };
        let (bridge, bus) = make_bridge(session, directory, options);
        let mut rx = bus.subscribe();

        bridge.connect().await.unwrap();

        assert!(matches!(rx.recv().await.unwrap().payload, BusPayload::Instrument(_)));
        assert!(matches!(rx.recv().await.unwrap().payload, BusPayload::Instrument(_)));
        assert_eq!(bridge.stats().await.client_count, 1);
    }

    #[tokio::test]
    async fn connect_fails_when_session_never_ready() {
        let mut session = MockVenueSession::new();
        session.expect_await_ready().returning(|timeout| {
            Err(crate::application::ports::VenueError::ReadyTimeout(timeout))
        });

        let (bridge, _bus) = make_bridge(
            session,
            MockInstrumentDirectory::new(),
            BridgeOptions::default(),
        );

        let err = bridge.connect().await.unwrap_err();
        assert!(matches!(err, BridgeError::SessionNotReady(_)));
        assert_eq!(bridge.stats().await.client_count, 0);
    }
}
