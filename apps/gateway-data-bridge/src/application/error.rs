//! Bridge Error Taxonomy
//!
//! Precondition failures abort before any venue call; session failures
//! mid-pagination are absorbed into the best-effort result and never
//! reach callers directly.

use std::time::Duration;

use crate::domain::market_data::{BarSpec, InstrumentId};

use super::ports::{DirectoryError, VenueError};

/// Errors raised by bridge operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BridgeError {
    /// The requested instrument is absent from the directory.
    #[error("instrument not found: {0}")]
    InstrumentNotFound(InstrumentId),

    /// The operation is not valid for the instrument's asset class.
    #[error("venue does not report trade prints for currency-pair instrument {0}")]
    UnsupportedInstrument(InstrumentId),

    /// The bar specification is not time-aggregated.
    #[error("only time-aggregated bars are supported, got {0}")]
    UnsupportedAggregation(BarSpec),

    /// The session readiness wait exceeded its bound.
    #[error("session not ready within {0:?}")]
    SessionNotReady(Duration),

    /// A venue session call failed.
    #[error(transparent)]
    Venue(#[from] VenueError),

    /// An instrument directory call failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
