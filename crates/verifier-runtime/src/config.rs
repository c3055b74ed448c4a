//! Runtime configuration, read from the environment.

use std::env;
use std::time::Duration;

/// Default trusted reference endpoint (public BSC dataseed).
pub const DEFAULT_TRUSTED_RPC: &str = "https://bsc-dataseed1.binance.org";

/// Service configuration.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Operator-trusted reference node used as the adjudication oracle.
    pub trusted_rpc_endpoint: String,
    /// How often abandoned challenges are swept from the pending map.
    pub cleanup_interval: Duration,
    /// Cadence of the exposed-RPC verification sweep; per-node frequency is
    /// still bounded by the tier's challenge frequency.
    pub verification_interval: Duration,
    /// Cadence of the heartbeat and uptime-accrual sweep.
    pub heartbeat_interval: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            trusted_rpc_endpoint: DEFAULT_TRUSTED_RPC.to_string(),
            cleanup_interval: Duration::from_secs(60),
            verification_interval: Duration::from_secs(60),
            heartbeat_interval: Duration::from_secs(300),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// - `TRUSTED_RPC`: reference node endpoint
    /// - `NW_CLEANUP_INTERVAL_SECS`, `NW_VERIFICATION_INTERVAL_SECS`,
    ///   `NW_HEARTBEAT_INTERVAL_SECS`: sweep cadences
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            trusted_rpc_endpoint: env::var("TRUSTED_RPC")
                .unwrap_or(defaults.trusted_rpc_endpoint),
            cleanup_interval: secs_from_env("NW_CLEANUP_INTERVAL_SECS", defaults.cleanup_interval),
            verification_interval: secs_from_env(
                "NW_VERIFICATION_INTERVAL_SECS",
                defaults.verification_interval,
            ),
            heartbeat_interval: secs_from_env(
                "NW_HEARTBEAT_INTERVAL_SECS",
                defaults.heartbeat_interval,
            ),
        }
    }
}

fn secs_from_env(key: &str, fallback: Duration) -> Duration {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::default();
        assert_eq!(config.trusted_rpc_endpoint, DEFAULT_TRUSTED_RPC);
        assert_eq!(config.cleanup_interval, Duration::from_secs(60));
        assert_eq!(config.heartbeat_interval, Duration::from_secs(300));
    }
}
