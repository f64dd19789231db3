use crate::error::ConfigError;
use crate::kernel::smoother::DEFAULT_MAJORITY_THRESHOLD;
use crate::services::map::client::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use std::time::Duration;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_MAP_NAME: &str = "map";
pub const DEFAULT_VARIABLE: &str = "room_type";
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_secs(5);

/// Window spans about six samples at steady cadence.
pub const WINDOW_INTERVALS: u32 = 6;
/// A label must hold for about three samples before it is confirmed.
pub const STABLE_INTERVALS: u32 = 3;

const MAX_ENV_SECS: f64 = 86_400.0 * 365.0;

pub const ENV_ENDPOINT: &str = "ROOMCAST_ENDPOINT";
pub const ENV_TIMEOUT_SECS: &str = "ROOMCAST_TIMEOUT_SECS";
pub const ENV_INTERVAL_SECS: &str = "ROOMCAST_INTERVAL_SECS";
pub const ENV_MAP_NAME: &str = "ROOMCAST_MAP_NAME";
pub const ENV_VARIABLE: &str = "ROOMCAST_VARIABLE";
pub const ENV_WINDOW_SECS: &str = "ROOMCAST_WINDOW_SECS";
pub const ENV_MIN_STABLE_SECS: &str = "ROOMCAST_MIN_STABLE_SECS";
pub const ENV_MAJORITY_THRESHOLD: &str = "ROOMCAST_MAJORITY_THRESHOLD";
pub const ENV_STOP_GRACE_SECS: &str = "ROOMCAST_STOP_GRACE_SECS";

/// Construction-time parameters of the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// POST target. Empty means "not configured"; `start` refuses to run.
    pub endpoint: String,
    pub request_timeout: Duration,
    pub interval: Duration,
    pub map_name: String,
    pub variable_name: String,
    pub window_horizon: Duration,
    pub min_stable: Duration,
    pub majority_threshold: f64,
    /// How long `stop` waits for the loop to exit.
    pub stop_grace: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::for_interval(DEFAULT_INTERVAL)
    }
}

impl ProviderConfig {
    /// Defaults with horizon and stability derived from `interval`.
    pub fn for_interval(interval: Duration) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            interval,
            map_name: DEFAULT_MAP_NAME.to_string(),
            variable_name: DEFAULT_VARIABLE.to_string(),
            window_horizon: interval * WINDOW_INTERVALS,
            min_stable: interval * STABLE_INTERVALS,
            majority_threshold: DEFAULT_MAJORITY_THRESHOLD,
            stop_grace: DEFAULT_STOP_GRACE,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_map_name(mut self, map_name: impl Into<String>) -> Self {
        self.map_name = map_name.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_window_horizon(mut self, horizon: Duration) -> Self {
        self.window_horizon = horizon;
        self
    }

    pub fn with_min_stable(mut self, min_stable: Duration) -> Self {
        self.min_stable = min_stable;
        self
    }

    pub fn with_majority_threshold(mut self, threshold: f64) -> Self {
        self.majority_threshold = threshold;
        self
    }

    pub fn with_stop_grace(mut self, grace: Duration) -> Self {
        self.stop_grace = grace;
        self
    }

    pub fn has_endpoint(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }

    /// Reads `ROOMCAST_*` variables from the process environment.
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let secs = |name: &str| {
            text(name)
                .and_then(|raw| raw.parse::<f64>().ok())
                .filter(|value| value.is_finite() && (0.0..=MAX_ENV_SECS).contains(value))
                .map(Duration::from_secs_f64)
        };

        let interval = secs(ENV_INTERVAL_SECS).unwrap_or(DEFAULT_INTERVAL);
        let mut config = Self::for_interval(interval);

        // An explicitly empty endpoint disables reporting, so read it raw.
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            config.endpoint = endpoint.trim().to_string();
        }
        if let Some(timeout) = secs(ENV_TIMEOUT_SECS) {
            config.request_timeout = timeout;
        }
        if let Some(map_name) = text(ENV_MAP_NAME) {
            config.map_name = map_name;
        }
        if let Some(variable) = text(ENV_VARIABLE) {
            config.variable_name = variable;
        }
        if let Some(horizon) = secs(ENV_WINDOW_SECS) {
            config.window_horizon = horizon;
        }
        if let Some(min_stable) = secs(ENV_MIN_STABLE_SECS) {
            config.min_stable = min_stable;
        }
        if let Some(threshold) = text(ENV_MAJORITY_THRESHOLD).and_then(|raw| raw.parse::<f64>().ok()) {
            config.majority_threshold = threshold;
        }
        if let Some(grace) = secs(ENV_STOP_GRACE_SECS) {
            config.stop_grace = grace;
        }

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.window_horizon.is_zero() {
            return Err(ConfigError::ZeroWindow);
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        let threshold = self.majority_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        Ok(())
    }
}
