use roomcast::config::*;
use roomcast::error::ConfigError;
use roomcast::services::map::client::DEFAULT_ENDPOINT;
use std::collections::HashMap;
use std::time::Duration;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| env.get(name).cloned()
}

#[test]
fn test_defaults_derive_from_interval() {
    let config = ProviderConfig::default();
    assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.interval, Duration::from_secs(5));
    assert_eq!(config.window_horizon, Duration::from_secs(30));
    assert_eq!(config.min_stable, Duration::from_secs(15));
    assert_eq!(config.majority_threshold, 0.7);
    assert_eq!(config.request_timeout, Duration::from_secs(5));
    assert_eq!(config.map_name, "map");
    assert_eq!(config.variable_name, "room_type");
    assert!(config.validate().is_ok());

    let fast = ProviderConfig::for_interval(Duration::from_millis(250));
    assert_eq!(fast.window_horizon, Duration::from_millis(1500));
    assert_eq!(fast.min_stable, Duration::from_millis(750));
}

#[test]
fn test_overrides_are_independent_of_interval() {
    let config = ProviderConfig::for_interval(Duration::from_secs(5))
        .with_window_horizon(Duration::from_secs(60))
        .with_min_stable(Duration::from_secs(1))
        .with_majority_threshold(0.9);
    assert_eq!(config.interval, Duration::from_secs(5));
    assert_eq!(config.window_horizon, Duration::from_secs(60));
    assert_eq!(config.min_stable, Duration::from_secs(1));
    assert_eq!(config.majority_threshold, 0.9);
}

#[test]
fn test_from_lookup_reads_every_variable() {
    let config = ProviderConfig::from_lookup(lookup(&[
        (ENV_ENDPOINT, " http://robot:5000/maps/locations/add/slam "),
        (ENV_TIMEOUT_SECS, "2.5"),
        (ENV_INTERVAL_SECS, "2"),
        (ENV_MAP_NAME, "office"),
        (ENV_VARIABLE, "detected_room"),
        (ENV_MIN_STABLE_SECS, "4"),
        (ENV_MAJORITY_THRESHOLD, "0.6"),
        (ENV_STOP_GRACE_SECS, "1"),
    ]));

    assert_eq!(config.endpoint, "http://robot:5000/maps/locations/add/slam");
    assert_eq!(config.request_timeout, Duration::from_millis(2500));
    assert_eq!(config.interval, Duration::from_secs(2));
    assert_eq!(config.window_horizon, Duration::from_secs(12), "Derived from the overridden interval");
    assert_eq!(config.min_stable, Duration::from_secs(4));
    assert_eq!(config.majority_threshold, 0.6);
    assert_eq!(config.map_name, "office");
    assert_eq!(config.variable_name, "detected_room");
    assert_eq!(config.stop_grace, Duration::from_secs(1));
}

#[test]
fn test_unparseable_values_fall_back_to_defaults() {
    let config = ProviderConfig::from_lookup(lookup(&[
        (ENV_INTERVAL_SECS, "soon"),
        (ENV_WINDOW_SECS, "-3"),
        (ENV_MAJORITY_THRESHOLD, "most"),
        (ENV_MAP_NAME, "   "),
    ]));
    assert_eq!(config, ProviderConfig::default());
}

#[test]
fn test_empty_endpoint_disables_reporting() {
    let config = ProviderConfig::from_lookup(lookup(&[(ENV_ENDPOINT, "")]));
    assert!(!config.has_endpoint());
    assert!(config.validate().is_ok(), "Missing endpoint is reported by start, not validate");
}

#[test]
fn test_validate_rejects_degenerate_settings() {
    let base = ProviderConfig::default();

    let mut zero_interval = base.clone();
    zero_interval.interval = Duration::ZERO;
    assert_eq!(zero_interval.validate(), Err(ConfigError::ZeroInterval));

    let zero_window = base.clone().with_window_horizon(Duration::ZERO);
    assert_eq!(zero_window.validate(), Err(ConfigError::ZeroWindow));

    let zero_timeout = base.clone().with_request_timeout(Duration::ZERO);
    assert_eq!(zero_timeout.validate(), Err(ConfigError::ZeroTimeout));

    for bad in [0.0, -0.1, 1.01, f64::NAN] {
        let config = base.clone().with_majority_threshold(bad);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidThreshold(_))), "{} accepted", bad);
    }
    assert!(base.with_majority_threshold(1.0).validate().is_ok());
}
