//! Infrastructure Layer - Adapters and external integrations.
//!
//! Concrete implementations of the concerns the application layer relies
//! on: the internal message bus, environment configuration, metrics
//! instrumentation, and tracing setup.

/// Broadcast-channel message bus for result distribution.
pub mod bus;

/// Configuration loading.
pub mod config;

/// Prometheus metrics instrumentation.
pub mod metrics;

/// Tracing subscriber integration.
pub mod telemetry;
