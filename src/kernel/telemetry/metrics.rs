use super::event::{TelemetryEvent, CycleKind, DeliveryEventKind, LifecycleEvent};

#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub cycle_stats: CycleStats,
    pub delivery_stats: DeliveryStats,
    pub lifecycle_stats: LifecycleStats,
}

#[derive(Debug, Clone, Default)]
pub struct CycleStats {
    pub total: u64,
    pub no_sample: u64,
    pub empty_window: u64,
    pub no_majority: u64,
    pub unstable: u64,
    pub confirmed: u64,
    pub total_confirmed_stable_ms: u64,
    pub avg_confirmed_stable_ms: f64,
}

#[derive(Debug, Clone, Default)]
pub struct DeliveryStats {
    pub suppressed: u64,
    pub delivered: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, Default)]
pub struct LifecycleStats {
    pub starts: u64,
    pub stops: u64,
    pub aborted_cycles: u64,
}

impl TelemetrySnapshot {
    /// Folds one event into the running counts.
    pub fn apply(&mut self, event: &TelemetryEvent) {
        match event {
            TelemetryEvent::Cycle(kind) => {
                self.cycle_stats.total += 1;
                match kind {
                    CycleKind::NoSample => self.cycle_stats.no_sample += 1,
                    CycleKind::EmptyWindow => self.cycle_stats.empty_window += 1,
                    CycleKind::NoMajority => self.cycle_stats.no_majority += 1,
                    CycleKind::Unstable => self.cycle_stats.unstable += 1,
                    CycleKind::Confirmed { stable_ms } => {
                        self.cycle_stats.confirmed += 1;
                        self.cycle_stats.total_confirmed_stable_ms += stable_ms;
                        let stats = &mut self.cycle_stats;
                        stats.avg_confirmed_stable_ms =
                            stats.total_confirmed_stable_ms as f64 / stats.confirmed as f64;
                    }
                }
            }
            TelemetryEvent::Delivery { kind, .. } => match kind {
                DeliveryEventKind::Suppressed => self.delivery_stats.suppressed += 1,
                DeliveryEventKind::Delivered => self.delivery_stats.delivered += 1,
                DeliveryEventKind::Failed => self.delivery_stats.failed += 1,
            },
            TelemetryEvent::Lifecycle(event) => match event {
                LifecycleEvent::Started => self.lifecycle_stats.starts += 1,
                LifecycleEvent::Stopped => self.lifecycle_stats.stops += 1,
                LifecycleEvent::CycleAborted => self.lifecycle_stats.aborted_cycles += 1,
            },
        }
    }
}

pub fn compute_snapshot<'a>(events: impl IntoIterator<Item = &'a TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();
    for event in events {
        snap.apply(event);
    }
    snap
}
