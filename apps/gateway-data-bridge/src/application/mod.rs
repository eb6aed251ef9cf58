//! Application Layer - Use cases and port definitions.
//!
//! This layer contains the bridge services and the port interfaces that
//! define how the domain interacts with the external venue session and
//! instrument directory.

/// Bridge error taxonomy.
pub mod error;

/// Port interfaces for the venue session and instrument directory.
pub mod ports;

/// Bridge services: lifecycle, subscriptions, backfill, publishing.
pub mod services;
