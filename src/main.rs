use anyhow::Context;
use roomcast::services::map::client::MapLocationClient;
use roomcast::source::InMemoryVariableSource;
use roomcast::{ProviderConfig, RoomTypeLocationProvider, StartOutcome};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// One stdin line applied to the variable store.
///
/// `kitchen`            sets the watched variable
/// `name=value`         sets any variable
/// `-name`              unsets a variable
fn apply_line(store: &InMemoryVariableSource, watched: &str, line: &str) {
    if let Some(name) = line.strip_prefix('-') {
        store.unset(name.trim());
    } else if let Some((name, value)) = line.split_once('=') {
        store.set(name.trim(), value.trim());
    } else {
        store.set(watched, line);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    // 2. Config
    let config = ProviderConfig::from_env();
    config.validate().context("invalid ROOMCAST_* configuration")?;
    tracing::info!(
        "roomcast booting (map '{}', variable '{}', window {:?}, min stable {:?}, threshold {})",
        config.map_name,
        config.variable_name,
        config.window_horizon,
        config.min_stable,
        config.majority_threshold
    );

    // 3. Collaborators
    let store = Arc::new(InMemoryVariableSource::new());
    let client = Arc::new(MapLocationClient::new(config.endpoint.clone(), config.request_timeout));
    let watched = config.variable_name.clone();
    let provider = RoomTypeLocationProvider::new(config, Arc::clone(&store), client);

    match provider.start() {
        StartOutcome::Started => {}
        other => anyhow::bail!("provider did not start: {:?}", other),
    }

    // 4. Feed the store from stdin until EOF or Ctrl+C
    println!("Type a room type (e.g. 'kitchen'), 'name=value', or '-name'. Ctrl+C to stop.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() { continue; }
                    apply_line(&store, &watched, line);
                    tracing::debug!("Variable store updated: '{}'", line);
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Failed to read stdin: {}", e);
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    // 5. Shutdown
    let outcome = provider.stop().await;
    let delivered = provider.delivery_gate().delivered();
    let stats = provider.telemetry();
    tracing::info!(
        "roomcast stopped ({:?}); delivered {:?} over {} cycles ({} failed deliveries)",
        outcome,
        delivered,
        stats.cycle_stats.total,
        stats.delivery_stats.failed
    );
    Ok(())
}
