//! Configuration Module
//!
//! Environment-variable configuration for the bridge.

mod settings;

pub use settings::{BridgeConfig, BusSettings};
