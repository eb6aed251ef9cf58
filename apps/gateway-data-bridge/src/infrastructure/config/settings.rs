//! Bridge Configuration Settings
//!
//! Configuration types for the gateway bridge, loaded from environment
//! variables. Every field has a default; malformed values fall back to
//! the default rather than failing startup.

use std::time::Duration;

use crate::application::services::bridge::BridgeOptions;
use crate::domain::market_data::MarketDataType;
use crate::domain::subscription::ClientId;
use crate::infrastructure::bus::BusConfig;

/// Message bus settings.
#[derive(Debug, Clone)]
pub struct BusSettings {
    /// Broadcast channel capacity.
    pub capacity: usize,
}

impl Default for BusSettings {
    fn default() -> Self {
        Self { capacity: 1_024 }
    }
}

/// Complete bridge configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Numeric gateway client id used on the shared session.
    pub gateway_client_id: u32,
    /// Custom logical client name; when unset the name is derived from
    /// the gateway client id.
    pub client_name: Option<String>,
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
    /// Message bus settings.
    pub bus: BusSettings,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            gateway_client_id: 1,
            client_name: None,
            market_data_type: MarketDataType::RealTime,
            use_regular_trading_hours: true,
            handle_revised_bars: false,
            ignore_quote_tick_size_updates: false,
            connection_timeout: Duration::from_secs(300),
            request_timeout: Duration::from_secs(60),
            tick_cache_capacity: 10_000,
            max_pages_per_request: 1_000,
            bus: BusSettings::default(),
        }
    }
}

impl BridgeConfig {
    /// Create configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let client_name = std::env::var("GATEWAY_BRIDGE_CLIENT_NAME")
            .ok()
            .filter(|v| !v.is_empty());

        let market_data_type = std::env::var("GATEWAY_BRIDGE_MARKET_DATA_TYPE")
            .map(|s| MarketDataType::from_str_case_insensitive(&s))
            .unwrap_or_default();

        Self {
            gateway_client_id: parse_env_u32(
                "GATEWAY_BRIDGE_CLIENT_ID",
                defaults.gateway_client_id,
            ),
            client_name,
            market_data_type,
            use_regular_trading_hours: parse_env_bool(
                "GATEWAY_BRIDGE_USE_RTH",
                defaults.use_regular_trading_hours,
            ),
            handle_revised_bars: parse_env_bool(
                "GATEWAY_BRIDGE_HANDLE_REVISED_BARS",
                defaults.handle_revised_bars,
            ),
            ignore_quote_tick_size_updates: parse_env_bool(
                "GATEWAY_BRIDGE_IGNORE_QUOTE_SIZE_UPDATES",
                defaults.ignore_quote_tick_size_updates,
            ),
            connection_timeout: parse_env_duration_secs(
                "GATEWAY_BRIDGE_CONNECTION_TIMEOUT_SECS",
                defaults.connection_timeout,
            ),
            request_timeout: parse_env_duration_secs(
                "GATEWAY_BRIDGE_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout,
            ),
            tick_cache_capacity: parse_env_usize(
                "GATEWAY_BRIDGE_TICK_CACHE_CAPACITY",
                defaults.tick_cache_capacity,
            ),
            max_pages_per_request: parse_env_usize(
                "GATEWAY_BRIDGE_MAX_PAGES_PER_REQUEST",
                defaults.max_pages_per_request,
            ),
            bus: BusSettings {
                capacity: parse_env_usize(
                    "GATEWAY_BRIDGE_BUS_CAPACITY",
                    BusSettings::default().capacity,
                ),
            },
        }
    }

    /// The bridge's own logical client id on the shared session.
    #[must_use]
    pub fn client_id(&self) -> ClientId {
        self.client_name
            .clone()
            .unwrap_or_else(|| format!("GATEWAY-{:03}", self.gateway_client_id))
    }
}

impl From<&BridgeConfig> for BridgeOptions {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            client_id: config.client_id(),
            market_data_type: config.market_data_type,
            use_regular_trading_hours: config.use_regular_trading_hours,
            handle_revised_bars: config.handle_revised_bars,
            ignore_quote_tick_size_updates: config.ignore_quote_tick_size_updates,
            connection_timeout: config.connection_timeout,
            request_timeout: config.request_timeout,
            tick_cache_capacity: config.tick_cache_capacity,
            max_pages_per_request: config.max_pages_per_request,
        }
    }
}

impl From<&BusSettings> for BusConfig {
    fn from(settings: &BusSettings) -> Self {
        Self {
            capacity: settings.capacity,
        }
    }
}

fn parse_env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_bool(key: &str, default: bool) -> bool {
    std::env::var(key).map_or(default, |v| match v.to_lowercase().as_str() {
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        _ => default,
    })
}

fn parse_env_duration_secs(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_venue_expectations() {
        let config = BridgeConfig::default();
        assert_eq!(config.gateway_client_id, 1);
        assert_eq!(config.connection_timeout, Duration::from_secs(300));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.tick_cache_capacity, 10_000);
        assert_eq!(config.max_pages_per_request, 1_000);
        assert_eq!(config.market_data_type, MarketDataType::RealTime);
        assert!(config.use_regular_trading_hours);
        assert!(!config.handle_revised_bars);
        assert!(!config.ignore_quote_tick_size_updates);
    }

    #[test]
    fn client_id_derived_from_gateway_id() {
        let config = BridgeConfig {
            gateway_client_id: 7,
            ..BridgeConfig::default()
        };
        assert_eq!(config.client_id(), "GATEWAY-007");
    }

    #[test]
    fn client_id_prefers_custom_name() {
        let config = BridgeConfig {
            client_name: Some("research-desk".to_string()),
            ..BridgeConfig::default()
        };
        assert_eq!(config.client_id(), "research-desk");
    }

    #[test]
    fn bridge_options_carry_all_flags() {
        let config = BridgeConfig {
            handle_revised_bars: true,
            ignore_quote_tick_size_updates: true,
            ..BridgeConfig::default()
        };

        let options = BridgeOptions::from(&config);
        assert!(options.handle_revised_bars);
        assert!(options.ignore_quote_tick_size_updates);
        assert_eq!(options.client_id, "GATEWAY-001");
        assert_eq!(options.tick_cache_capacity, 10_000);
    }

    #[test]
    fn bus_config_from_settings() {
        let settings = BusSettings { capacity: 64 };
        assert_eq!(BusConfig::from(&settings).capacity, 64);
    }
}
