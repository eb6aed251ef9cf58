//! Historical Backfill Paginator
//!
//! Assembles a complete, deduplicated, time-ordered result set for a
//! bounded historical request, using only the session's page-sized fetch
//! primitive.
//!
//! # Algorithm
//!
//! Pagination walks *backward* in time regardless of data kind: each page
//! ends at the current window end, and the window end then steps back to
//! the oldest timestamp seen, so the next page covers the adjacent
//! earlier slice. The upstream may return empty or partial pages without
//! signalling "no more data"; an empty page terminates the walk. Because
//! pages can overlap at their boundaries, accumulation and ordering are
//! separate phases: the accumulated set is deduplicated structurally and
//! then re-sorted ascending as a final pass.
//!
//! Ticks narrow the window with the minimum *ingestion* timestamp of the
//! just-fetched page; bars narrow with the minimum *event* timestamp
//! across everything accumulated, and a bar request with an explicit
//! start issues exactly one duration-bounded call ("I know my window,
//! give me exactly it") instead of walking.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio_util::sync::CancellationToken;

use crate::application::ports::VenueSession;
use crate::domain::market_data::{Bar, BarSpec, Instrument, Tick, TickKind};
use crate::domain::request::HistoricalRequest;
use crate::infrastructure::metrics;

/// Default record cap for bar requests with no start and no limit.
pub const DEFAULT_BAR_LIMIT: usize = 1_000;

const SECS_PER_DAY: i64 = 86_400;

// =============================================================================
// Configuration
// =============================================================================

/// Paginator tuning, shared by every request the bridge runs.
#[derive(Debug, Clone, Copy)]
pub struct PaginatorConfig {
    /// Restrict fetches to regular trading hours.
    pub use_regular_hours: bool,
    /// Default per-call fetch timeout.
    pub request_timeout: Duration,
    /// Default record cap for unbounded tick requests.
    pub tick_cache_capacity: usize,
    /// Hard cap on page fetches per request.
    pub max_pages_per_request: usize,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            use_regular_hours: true,
            request_timeout: Duration::from_secs(60),
            tick_cache_capacity: 10_000,
            max_pages_per_request: 1_000,
        }
    }
}

// =============================================================================
// Page Cursor
// =============================================================================

/// Transient state of one pagination walk.
///
/// Owned exclusively by the paginator invocation that created it and
/// dropped when the request completes.
#[derive(Debug)]
struct PageCursor<T> {
    /// Current window end; each fetched page ends here.
    end: DateTime<Utc>,
    /// Records accumulated so far, in descending-chunked arrival order.
    records: Vec<T>,
    /// Pages fetched so far.
    pages_fetched: usize,
}

impl<T> PageCursor<T> {
    fn new(end: DateTime<Utc>) -> Self {
        Self {
            end,
            records: Vec::new(),
            pages_fetched: 0,
        }
    }
}

/// Loop condition of the backward walk: the window is still open, or a
/// nonzero record limit is not yet satisfied. A limit of 0 with an
/// explicit start means "unbounded by count, bounded only by the window".
fn keep_walking(
    start: Option<DateTime<Utc>>,
    end: DateTime<Utc>,
    accumulated: usize,
    limit: usize,
) -> bool {
    start.is_some_and(|s| end > s) || (limit > 0 && accumulated < limit)
}

// =============================================================================
// Paginator
// =============================================================================

/// Drives repeated page fetches to satisfy one historical request.
pub struct HistoricalPaginator {
    session: Arc<dyn VenueSession>,
    config: PaginatorConfig,
    cancel: CancellationToken,
}

impl HistoricalPaginator {
    /// Create a paginator over the shared session.
    #[must_use]
    pub fn new(
        session: Arc<dyn VenueSession>,
        config: PaginatorConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            session,
            config,
            cancel,
        }
    }

    /// Backfill ticks for a request.
    ///
    /// Mid-walk failures (readiness timeout, fetch errors) are absorbed:
    /// the walk stops and whatever accumulated is returned, possibly
    /// empty. The result is deduplicated and ascending by ingestion time.
    pub async fn fetch_ticks(
        &self,
        instrument: &Instrument,
        tick_kind: TickKind,
        request: &HistoricalRequest,
    ) -> Vec<Tick> {
        let limit = request.effective_limit(self.config.tick_cache_capacity);
        let timeout = request.timeout.unwrap_or(self.config.request_timeout);
        let mut cursor = PageCursor::new(request.effective_end(Utc::now()));

        while keep_walking(request.start, cursor.end, cursor.records.len(), limit) {
            if !self.may_fetch(&cursor, request) {
                break;
            }
            if !self.wait_ready(timeout).await {
                break;
            }

            let page = match self
                .session
                .fetch_historical_ticks(
                    instrument,
                    tick_kind,
                    cursor.end,
                    self.config.use_regular_hours,
                    timeout,
                )
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(
                        request_id = %request.request_id,
                        error = %e,
                        "tick page fetch failed, returning accumulated records"
                    );
                    break;
                }
            };
            cursor.pages_fetched += 1;
            metrics::record_page_fetched(request.kind);

            if page.is_empty() {
                break;
            }

            // Next slice ends at the oldest receipt time in this page;
            // pages are assumed non-overlapping in the common case, and
            // the final dedup pass corrects for when they are not.
            if let Some(oldest) = page.iter().map(Tick::ts_init).min() {
                cursor.end = oldest;
            }
            cursor.records.extend(page);
        }

        dedup_and_sort_ticks(cursor.records)
    }

    /// Backfill bars for a request.
    ///
    /// Same absorption policy as ticks; the result is deduplicated and
    /// ascending by event time.
    pub async fn fetch_bars(
        &self,
        instrument: &Instrument,
        spec: &BarSpec,
        request: &HistoricalRequest,
    ) -> Vec<Bar> {
        let limit = request.effective_limit(DEFAULT_BAR_LIMIT);
        let timeout = request.timeout.unwrap_or(self.config.request_timeout);
        let mut cursor = PageCursor::new(request.effective_end(Utc::now()));

        let duration = request.start.map_or_else(
            || default_bar_duration(spec).to_string(),
            |start| window_duration_str(cursor.end - start),
        );

        while keep_walking(request.start, cursor.end, cursor.records.len(), limit) {
            if !self.may_fetch(&cursor, request) {
                break;
            }
            if !self.wait_ready(timeout).await {
                break;
            }

            let page = match self
                .session
                .fetch_historical_bars(
                    spec,
                    instrument,
                    self.config.use_regular_hours,
                    cursor.end,
                    &duration,
                    timeout,
                )
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(
                        request_id = %request.request_id,
                        error = %e,
                        "bar page fetch failed, returning accumulated records"
                    );
                    break;
                }
            };
            cursor.pages_fetched += 1;
            metrics::record_page_fetched(request.kind);

            let page_empty = page.is_empty();
            cursor.records.extend(page);

            // With an explicit start the single duration-bounded call
            // covers the whole window; never walk a second time.
            if page_empty || request.start.is_some() {
                break;
            }

            if let Some(oldest) = cursor.records.iter().map(Bar::ordering_key).min() {
                cursor.end = oldest;
            }
        }

        dedup_and_sort_bars(cursor.records)
    }

    /// Pre-fetch gate: cooperative cancellation and the page-fetch cap.
    fn may_fetch<T>(&self, cursor: &PageCursor<T>, request: &HistoricalRequest) -> bool {
        if self.cancel.is_cancelled() {
            tracing::debug!(
                request_id = %request.request_id,
                "request cancelled, returning accumulated records"
            );
            return false;
        }
        if cursor.pages_fetched >= self.config.max_pages_per_request {
            tracing::warn!(
                request_id = %request.request_id,
                pages = cursor.pages_fetched,
                "page fetch cap reached, returning accumulated records"
            );
            return false;
        }
        true
    }

    /// Wait for session readiness, bounded by the request timeout.
    ///
    /// Returns `false` when the session never became ready or the request
    /// was cancelled; the caller stops and keeps what it has.
    async fn wait_ready(&self, timeout: Duration) -> bool {
        tokio::select! {
            () = self.cancel.cancelled() => false,
            result = self.session.await_ready(timeout) => match result {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "session readiness wait failed, returning accumulated records"
                    );
                    false
                }
            },
        }
    }
}

// =============================================================================
// Window Durations
// =============================================================================

/// Default venue duration string when no start was given: one page of
/// recent history sized to the bar interval.
fn default_bar_duration(spec: &BarSpec) -> &'static str {
    if spec.interval >= Duration::from_secs(60) {
        "7 D"
    } else {
        "1 D"
    }
}

/// Format an explicit window as a venue duration string, rounding up so
/// the queried slice always covers the requested span.
fn window_duration_str(window: TimeDelta) -> String {
    let secs = window.num_seconds().max(1);
    if secs < SECS_PER_DAY {
        return format!("{secs} S");
    }
    let days = (secs + SECS_PER_DAY - 1) / SECS_PER_DAY;
    if days < 7 {
        format!("{days} D")
    } else if days < 365 {
        format!("{} W", (days + 6) / 7)
    } else {
        format!("{} Y", (days + 364) / 365)
    }
}

// =============================================================================
// Final Ordering Pass
// =============================================================================

fn dedup<T: Eq + Hash>(records: Vec<T>) -> Vec<T> {
    let unique: HashSet<T> = records.into_iter().collect();
    unique.into_iter().collect()
}

/// Deduplicate structurally, then sort ascending by ingestion time.
fn dedup_and_sort_ticks(records: Vec<Tick>) -> Vec<Tick> {
    let mut ticks = dedup(records);
    ticks.sort_by_key(Tick::ordering_key);
    ticks
}

/// Deduplicate structurally, then sort ascending by event time.
fn dedup_and_sort_bars(records: Vec<Bar>) -> Vec<Bar> {
    let mut bars = dedup(records);
    bars.sort_by_key(Bar::ordering_key);
    bars
}

// =============================================================================
// Tests
// =============================================================================
