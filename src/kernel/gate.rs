use super::label::RoomLabel;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// At-most-once delivery record, shared between the background loop and any
/// caller that wants to inspect it.
///
/// Grows up to the size of the label whitelist and never shrinks: once a label
/// has been delivered it stays suppressed for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct DeliveryGate {
    delivered: Arc<Mutex<HashSet<RoomLabel>>>,
}

impl DeliveryGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<RoomLabel>> {
        // The set is only ever inserted into, so a poisoned guard is still consistent.
        self.delivered.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_delivered(&self, label: RoomLabel) -> bool {
        self.lock().contains(&label)
    }

    /// `true` if the label has not been delivered yet.
    pub fn should_report(&self, label: RoomLabel) -> bool {
        let pending = !self.is_delivered(label);
        if !pending {
            debug!("Room type '{}' already delivered; suppressing", label);
        }
        pending
    }

    /// Call only after a verified-successful delivery.
    /// Returns `true` if the label was newly recorded.
    pub fn mark_delivered(&self, label: RoomLabel) -> bool {
        self.lock().insert(label)
    }

    /// Sorted snapshot of every delivered label.
    pub fn delivered(&self) -> Vec<RoomLabel> {
        let mut labels: Vec<RoomLabel> = self.lock().iter().copied().collect();
        labels.sort();
        labels
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
