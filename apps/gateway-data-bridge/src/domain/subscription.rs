//! Subscription Keys and Registry Membership
//!
//! Pure membership state for the subscription registry: which
//! (instrument, data-kind) pairs are actively streamed, and which logical
//! clients are attached to the shared venue session.
//!
//! # Design
//!
//! The registry is the single source of truth; the venue session is always
//! driven from it, never the reverse. Membership mutations here are pure
//! set operations; the async orchestration (and the venue calls that must
//! precede activation) lives in the application layer.
//!
//! Attached clients are a *set* of identifiers, not a reference count, so
//! re-attaching the same client id and re-detaching a departed one are
//! both no-ops.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::market_data::{BarSpec, InstrumentId};

// =============================================================================
// Types
// =============================================================================

/// Identifier of a logical client sharing the venue session.
pub type ClientId = String;

/// Kind of market data addressed by a subscription or request.
///
/// A closed tagged variant; the registry resolves it to the matching venue
/// primitive exactly once, at the subscription boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataKind {
    /// Top-of-book quotes.
    Quote,
    /// Trade prints.
    Trade,
    /// Aggregated bars with the given specification.
    Bar(BarSpec),
}

impl DataKind {
    /// Topic segment for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quote => "quotes",
            Self::Trade => "trades",
            Self::Bar(_) => "bars",
        }
    }
}

/// Unique key of an active subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionKey {
    /// Target instrument.
    pub instrument_id: InstrumentId,
    /// Subscribed data kind.
    pub kind: DataKind,
}

impl SubscriptionKey {
    /// Create a subscription key.
    #[must_use]
    pub const fn new(instrument_id: InstrumentId, kind: DataKind) -> Self {
        Self {
            instrument_id,
            kind,
        }
    }
}

// =============================================================================
// Registry State
// =============================================================================

/// Membership state of the subscription registry.
///
/// Tracks the active subscription keys (at most one underlying venue
/// subscription per key, however many logical clients asked for it) and
/// the set of attached client identifiers.
#[derive(Debug, Default)]
pub struct RegistryState {
    active: HashSet<SubscriptionKey>,
    clients: HashSet<ClientId>,
}

impl RegistryState {
    /// Create an empty registry state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a key is actively subscribed.
    #[must_use]
    pub fn is_active(&self, key: &SubscriptionKey) -> bool {
        self.active.contains(key)
    }

    /// Record a key as active.
    ///
    /// Returns `false` if the key was already active (idempotent no-op).
    pub fn activate(&mut self, key: SubscriptionKey) -> bool {
        self.active.insert(key)
    }

    /// Remove a key.
    ///
    /// Returns `false` if the key was not active (idempotent no-op).
    pub fn deactivate(&mut self, key: &SubscriptionKey) -> bool {
        self.active.remove(key)
    }

    /// All active subscription keys.
    #[must_use]
    pub fn active_keys(&self) -> Vec<SubscriptionKey> {
        self.active.iter().cloned().collect()
    }

    /// Attach a logical client to the shared session.
    ///
    /// Returns `false` if the client id was already attached.
    pub fn attach(&mut self, client: ClientId) -> bool {
        self.clients.insert(client)
    }

    /// Detach a logical client.
    ///
    /// Returns `true` when this detach removed the *last* client, i.e.
    /// the underlying session should be torn down. Detaching an unknown
    /// client never triggers teardown.
    pub fn detach(&mut self, client: &ClientId) -> bool {
        self.clients.remove(client) && self.clients.is_empty()
    }

    /// Whether any logical clients remain attached.
    #[must_use]
    pub fn has_clients(&self) -> bool {
        !self.clients.is_empty()
    }

    /// Registry statistics.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            subscription_count: self.active.len(),
            client_count: self.clients.len(),
        }
    }
}

/// Registry statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryStats {
    /// Number of active subscription keys.
    pub subscription_count: usize,
    /// Number of attached logical clients.
    pub client_count: usize,
}

// =============================================================================
// Tests
// =============================================================================
