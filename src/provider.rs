use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::ProviderConfig;
use crate::error::ConfigError;
use crate::kernel::gate::DeliveryGate;
use crate::kernel::reactor::Reactor;
use crate::kernel::telemetry::event::{LifecycleEvent, TelemetryEvent};
use crate::kernel::telemetry::metrics::TelemetrySnapshot;
use crate::kernel::telemetry::recorder::TelemetryRecorder;
use crate::services::map::client::LocationReporter;
use crate::source::VariableSource;

#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    Started,
    /// A background task is already live; nothing was spawned.
    AlreadyRunning,
    /// No endpoint configured; the provider refuses to run.
    MissingEndpoint,
    InvalidConfig(ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    NotRunning,
    /// The loop did not exit within the grace period. It has been cancelled
    /// and will exit at its next wait boundary.
    TimedOut,
}

struct RunHandle {
    cancel: CancellationToken,
    /// Cancelled by the loop itself on exit.
    finished: CancellationToken,
    task: JoinHandle<()>,
}

/// Watches the room-type variable in the background and reports each newly
/// confirmed room to the map location service.
///
/// An explicit owned instance: build it once at startup and hand references
/// to whatever needs to start or stop it. Must be started from within a
/// tokio runtime.
pub struct RoomTypeLocationProvider<S, R> {
    config: ProviderConfig,
    source: Arc<S>,
    reporter: Arc<R>,
    gate: DeliveryGate,
    telemetry: Arc<Mutex<TelemetryRecorder>>,
    running: Mutex<Option<RunHandle>>,
}

impl<S, R> RoomTypeLocationProvider<S, R>
where
    S: VariableSource + 'static,
    R: LocationReporter + 'static,
{
    pub fn new(config: ProviderConfig, source: Arc<S>, reporter: Arc<R>) -> Self {
        Self {
            config,
            source,
            reporter,
            gate: DeliveryGate::new(),
            telemetry: Arc::new(Mutex::new(TelemetryRecorder::new())),
            running: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Shared handle to the delivery record. Survives stop/start.
    pub fn delivery_gate(&self) -> DeliveryGate {
        self.gate.clone()
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.lock_telemetry().snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.lock_running()
            .as_ref()
            .map(|handle| !handle.task.is_finished())
            .unwrap_or(false)
    }

    /// Builds the per-run cycle state. Exposed so a caller can drive cycles
    /// by hand against the same gate and telemetry.
    pub fn reactor(&self) -> Reactor<S, R> {
        Reactor::new(
            &self.config,
            Arc::clone(&self.source),
            Arc::clone(&self.reporter),
            self.gate.clone(),
            Arc::clone(&self.telemetry),
        )
    }

    pub fn start(&self) -> StartOutcome {
        let mut running = self.lock_running();

        if let Some(handle) = running.as_ref() {
            if !handle.task.is_finished() {
                warn!("RoomTypeLocationProvider already running");
                return StartOutcome::AlreadyRunning;
            }
        }

        if !self.config.has_endpoint() {
            error!("RoomTypeLocationProvider missing endpoint; provider will not start");
            return StartOutcome::MissingEndpoint;
        }

        if let Err(e) = self.config.validate() {
            error!("RoomTypeLocationProvider config rejected: {}", e);
            return StartOutcome::InvalidConfig(e);
        }

        let cancel = CancellationToken::new();
        let finished = CancellationToken::new();
        let reactor = Arc::new(AsyncMutex::new(self.reactor()));
        let task = tokio::spawn(run_loop(
            reactor,
            self.config.interval,
            cancel.clone(),
            finished.clone(),
            Arc::clone(&self.telemetry),
        ));
        *running = Some(RunHandle { cancel, finished, task });
        drop(running);

        self.lock_telemetry().record(TelemetryEvent::Lifecycle(LifecycleEvent::Started));
        info!(
            "RoomTypeLocationProvider background task started (endpoint: {}, interval: {:?})",
            self.config.endpoint, self.config.interval
        );
        StartOutcome::Started
    }

    /// Signals the loop and waits up to `stop_grace` for it to exit.
    /// An in-flight POST is not interrupted, only awaited.
    ///
    /// On `TimedOut` the handle stays in place: the provider keeps reporting
    /// itself as running, and `start` refuses, until the old loop has exited.
    pub async fn stop(&self) -> StopOutcome {
        let (cancel, finished) = {
            let running = self.lock_running();
            match running.as_ref() {
                Some(handle) => (handle.cancel.clone(), handle.finished.clone()),
                None => return StopOutcome::NotRunning,
            }
        };

        cancel.cancel();
        if tokio::time::timeout(self.config.stop_grace, finished.cancelled())
            .await
            .is_err()
        {
            warn!(
                "RoomTypeLocationProvider did not stop within {:?}; leaving it to exit on its own",
                self.config.stop_grace
            );
            return StopOutcome::TimedOut;
        }

        // Only a handle whose loop was cancelled belongs to this stop.
        let handle = {
            let mut running = self.lock_running();
            if running.as_ref().is_some_and(|handle| handle.cancel.is_cancelled()) {
                running.take()
            } else {
                None
            }
        };
        let Some(RunHandle { task, .. }) = handle else {
            return StopOutcome::NotRunning;
        };

        if let Err(e) = task.await {
            error!("RoomTypeLocationProvider background task failed: {}", e);
        }
        self.lock_telemetry().record(TelemetryEvent::Lifecycle(LifecycleEvent::Stopped));
        info!("RoomTypeLocationProvider background task stopped");
        StopOutcome::Stopped
    }

    fn lock_running(&self) -> MutexGuard<'_, Option<RunHandle>> {
        self.running.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_telemetry(&self) -> MutexGuard<'_, TelemetryRecorder> {
        self.telemetry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Background driver: one cycle, then wait for `interval` or cancellation.
///
/// Each cycle runs as its own task so a panic inside it is contained and
/// logged; the loop itself never dies from a single cycle.
async fn run_loop<S, R>(
    reactor: Arc<AsyncMutex<Reactor<S, R>>>,
    interval: Duration,
    cancel: CancellationToken,
    finished: CancellationToken,
    telemetry: Arc<Mutex<TelemetryRecorder>>,
) where
    S: VariableSource + 'static,
    R: LocationReporter + 'static,
{
    let _finished = finished.drop_guard();
    loop {
        let cycle_reactor = Arc::clone(&reactor);
        let cycle = tokio::spawn(async move {
            let mut reactor = cycle_reactor.lock().await;
            reactor.run_cycle(Instant::now()).await;
        });

        if let Err(e) = cycle.await {
            error!("Error in RoomTypeLocationProvider cycle: {}", e);
            telemetry
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .record(TelemetryEvent::Lifecycle(LifecycleEvent::CycleAborted));
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
}
