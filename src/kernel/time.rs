use super::label::RoomLabel;
use tokio::time::Instant;

/// One validated observation of the room type.
/// Timestamps are monotonic so wall-clock jumps never reorder the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub at: Instant,
    pub label: RoomLabel,
}

impl Sample {
    pub fn new(at: Instant, label: RoomLabel) -> Self {
        Sample { at, label }
    }
}
