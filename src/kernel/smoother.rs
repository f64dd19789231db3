use super::label::RoomLabel;
use super::window::HistoryWindow;
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_MAJORITY_THRESHOLD: f64 = 0.7;

/// Occurrences of one label inside the current window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelCount {
    pub label: RoomLabel,
    pub count: usize,
    /// Timestamp of the earliest in-window sample carrying this label.
    pub first_seen: Instant,
}

/// Per-cycle vote tally. Entries are kept in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    pub counts: Vec<LabelCount>,
    pub total: usize,
}

impl Tally {
    /// Highest count wins. On a tie the label seen first in the window wins,
    /// so the result never depends on hash ordering.
    pub fn leader(&self) -> Option<&LabelCount> {
        let mut best: Option<&LabelCount> = None;
        for entry in &self.counts {
            match best {
                Some(current) if entry.count <= current.count => {}
                _ => best = Some(entry),
            }
        }
        best
    }

    pub fn count_of(&self, label: RoomLabel) -> usize {
        self.counts
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}

/// A label that passed both the majority and the stability check this cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Confirmation {
    pub label: RoomLabel,
    pub majority_fraction: f64,
    pub stable_for: Duration,
    pub window_size: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Nothing left in the window after pruning.
    Empty,
    /// The leading label holds less than the threshold share.
    NoMajority { leader: RoomLabel, fraction: f64 },
    /// Majority held, but not for long enough.
    Unstable {
        leader: RoomLabel,
        fraction: f64,
        stable_for: Duration,
    },
    Confirmed(Confirmation),
}

impl Decision {
    pub fn confirmed(&self) -> Option<&Confirmation> {
        match self {
            Decision::Confirmed(c) => Some(c),
            _ => None,
        }
    }
}

/// Majority vote over the window plus a minimum stability duration.
///
/// The stability check is measured against the earliest occurrence of the
/// winner still inside the window, so it can never exceed the horizon.
#[derive(Debug, Clone)]
pub struct MajoritySmoother {
    majority_threshold: f64,
    min_stable: Duration,
}

impl MajoritySmoother {
    pub fn new(majority_threshold: f64, min_stable: Duration) -> Self {
        Self {
            majority_threshold,
            min_stable,
        }
    }

    pub fn majority_threshold(&self) -> f64 {
        self.majority_threshold
    }

    pub fn min_stable(&self) -> Duration {
        self.min_stable
    }

    pub fn tally(&self, window: &HistoryWindow) -> Tally {
        let mut tally = Tally::default();
        for sample in window.iter() {
            tally.total += 1;
            match tally.counts.iter_mut().find(|entry| entry.label == sample.label) {
                Some(entry) => entry.count += 1,
                None => tally.counts.push(LabelCount {
                    label: sample.label,
                    count: 1,
                    first_seen: sample.at,
                }),
            }
        }
        tally
    }

    /// Pure decision over the current window contents at `now`.
    pub fn evaluate(&self, window: &HistoryWindow, now: Instant) -> Decision {
        let tally = self.tally(window);
        let Some(leader) = tally.leader() else {
            return Decision::Empty;
        };

        let fraction = leader.count as f64 / tally.total as f64;
        if fraction < self.majority_threshold {
            return Decision::NoMajority {
                leader: leader.label,
                fraction,
            };
        }

        let stable_for = now.saturating_duration_since(leader.first_seen);
        if stable_for < self.min_stable {
            return Decision::Unstable {
                leader: leader.label,
                fraction,
                stable_for,
            };
        }

        Decision::Confirmed(Confirmation {
            label: leader.label,
            majority_fraction: fraction,
            stable_for,
            window_size: tally.total,
        })
    }
}
