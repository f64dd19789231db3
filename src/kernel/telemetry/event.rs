use serde::{Serialize, Deserialize};
use crate::kernel::label::RoomLabel;
use crate::kernel::smoother::{Confirmation, Decision};

// Allowed: labels, counts, durations, enums
// Forbidden: raw variable values, response bodies, endpoint URLs

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    Cycle(CycleKind),

    Delivery {
        label: RoomLabel,
        kind: DeliveryEventKind,
    },

    Lifecycle(LifecycleEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CycleKind {
    /// Variable unset, unreadable, or not in the whitelist.
    NoSample,
    EmptyWindow,
    NoMajority,
    Unstable,
    Confirmed { stable_ms: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryEventKind {
    Suppressed,
    Delivered,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    Started,
    Stopped,
    CycleAborted,
}

impl From<&Decision> for CycleKind {
    fn from(decision: &Decision) -> Self {
        match decision {
            Decision::Empty => CycleKind::EmptyWindow,
            Decision::NoMajority { .. } => CycleKind::NoMajority,
            Decision::Unstable { .. } => CycleKind::Unstable,
            Decision::Confirmed(c) => CycleKind::from(c),
        }
    }
}

impl From<&Confirmation> for CycleKind {
    fn from(confirmation: &Confirmation) -> Self {
        CycleKind::Confirmed {
            stable_ms: confirmation.stable_for.as_millis() as u64,
        }
    }
}
