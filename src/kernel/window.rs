use super::time::Sample;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Time-bounded history of samples, oldest first.
///
/// Bounded by age, not by count: at steady cadence it holds roughly
/// `horizon / interval` samples, and it adapts on its own when sampling jitters.
#[derive(Debug)]
pub struct HistoryWindow {
    samples: VecDeque<Sample>,
    horizon: Duration,
}

impl HistoryWindow {
    pub fn new(horizon: Duration) -> Self {
        Self {
            samples: VecDeque::new(),
            horizon,
        }
    }

    /// Append at the tail, then drop everything older than the horizon.
    pub fn record(&mut self, sample: Sample, now: Instant) {
        self.samples.push_back(sample);
        self.prune(now);
    }

    /// Removes the oldest-first prefix with `at < now - horizon`.
    /// Returns how many samples were dropped.
    pub fn prune(&mut self, now: Instant) -> usize {
        // Horizon reaches back past the clock origin: nothing can be stale yet.
        let Some(cutoff) = now.checked_sub(self.horizon) else {
            return 0;
        };

        let mut removed = 0;
        while let Some(front) = self.samples.front() {
            if front.at >= cutoff {
                break;
            }
            self.samples.pop_front();
            removed += 1;
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }
}
