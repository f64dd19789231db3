use std::sync::{Arc, Mutex};
use tokio::time::Instant;
use tracing::{debug, error, info};

use super::gate::DeliveryGate;
use super::sampler::Sampler;
use super::smoother::{Confirmation, Decision, MajoritySmoother};
use super::telemetry::event::{CycleKind, DeliveryEventKind, TelemetryEvent};
use super::telemetry::recorder::TelemetryRecorder;
use super::window::HistoryWindow;
use crate::config::ProviderConfig;
use crate::error::ReportError;
use crate::services::map::client::{LocationPayload, LocationReporter};
use crate::source::VariableSource;

/// What one sample → window → vote → deliver pass ended with.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Nothing usable was read this cycle.
    NoSample,
    /// A sample was recorded but no label was confirmed.
    Undecided(Decision),
    /// Confirmed, but already delivered earlier.
    Suppressed(Confirmation),
    Delivered(Confirmation),
    /// Confirmed and attempted; the label stays eligible for a later cycle.
    DeliveryFailed {
        confirmation: Confirmation,
        error: ReportError,
    },
}

/// Per-run cycle state: owns the history window, shares the delivery gate
/// and telemetry with the provider that created it.
pub struct Reactor<S, R> {
    source: Arc<S>,
    reporter: Arc<R>,
    sampler: Sampler,
    window: HistoryWindow,
    smoother: MajoritySmoother,
    gate: DeliveryGate,
    telemetry: Arc<Mutex<TelemetryRecorder>>,
    map_name: String,
}

impl<S, R> Reactor<S, R>
where
    S: VariableSource,
    R: LocationReporter,
{
    pub fn new(
        config: &ProviderConfig,
        source: Arc<S>,
        reporter: Arc<R>,
        gate: DeliveryGate,
        telemetry: Arc<Mutex<TelemetryRecorder>>,
    ) -> Self {
        Self {
            source,
            reporter,
            sampler: Sampler::new(config.variable_name.clone()),
            window: HistoryWindow::new(config.window_horizon),
            smoother: MajoritySmoother::new(config.majority_threshold, config.min_stable),
            gate,
            telemetry,
            map_name: config.map_name.clone(),
        }
    }

    pub fn window(&self) -> &HistoryWindow {
        &self.window
    }

    pub fn gate(&self) -> &DeliveryGate {
        &self.gate
    }

    /// One full cycle at `now`. Never fails: every error path is logged and
    /// folded into the returned outcome.
    pub async fn run_cycle(&mut self, now: Instant) -> CycleOutcome {
        let outcome = self.step(now).await;
        self.record(&outcome);
        outcome
    }

    async fn step(&mut self, now: Instant) -> CycleOutcome {
        // 1. Sample
        let Some(sample) = self.sampler.sample(self.source.as_ref(), now) else {
            // Keep the window fresh even on silent cycles.
            self.window.prune(now);
            return CycleOutcome::NoSample;
        };

        // 2. Window
        self.window.record(sample, now);

        // 3. Vote
        let decision = self.smoother.evaluate(&self.window, now);
        let confirmation = match decision {
            Decision::Confirmed(confirmation) => confirmation,
            other => {
                debug!("No room type decision this cycle: {:?}", other);
                return CycleOutcome::Undecided(other);
            }
        };

        // 4. Gate
        if !self.gate.should_report(confirmation.label) {
            return CycleOutcome::Suppressed(confirmation);
        }

        // 5. Deliver
        let payload = LocationPayload::from_confirmation(&self.map_name, &confirmation);
        match self.reporter.report(&payload).await {
            Ok(receipt) => {
                info!(
                    "Room type location stored '{}' -> {} {}",
                    confirmation.label, receipt.status, receipt.body
                );
                self.gate.mark_delivered(confirmation.label);
                CycleOutcome::Delivered(confirmation)
            }
            Err(e) => {
                error!("Room type location delivery for '{}' failed: {}", confirmation.label, e);
                CycleOutcome::DeliveryFailed {
                    confirmation,
                    error: e,
                }
            }
        }
    }

    fn record(&self, outcome: &CycleOutcome) {
        let (cycle, delivery) = match outcome {
            CycleOutcome::NoSample => (CycleKind::NoSample, None),
            CycleOutcome::Undecided(decision) => (CycleKind::from(decision), None),
            CycleOutcome::Suppressed(c) => (CycleKind::from(c), Some((c.label, DeliveryEventKind::Suppressed))),
            CycleOutcome::Delivered(c) => (CycleKind::from(c), Some((c.label, DeliveryEventKind::Delivered))),
            CycleOutcome::DeliveryFailed { confirmation: c, .. } => {
                (CycleKind::from(c), Some((c.label, DeliveryEventKind::Failed)))
            }
        };

        let mut telemetry = self.telemetry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        telemetry.record(TelemetryEvent::Cycle(cycle));
        if let Some((label, kind)) = delivery {
            telemetry.record(TelemetryEvent::Delivery { label, kind });
        }
    }
}
