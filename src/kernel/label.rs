use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed whitelist of room types the map service understands.
/// Anything the detector produces outside this set never enters the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomLabel {
    LivingRoom,
    Bedroom,
    Study,
    Kitchen,
    Outdoor,
}

impl RoomLabel {
    pub const ALL: [RoomLabel; 5] = [
        RoomLabel::LivingRoom,
        RoomLabel::Bedroom,
        RoomLabel::Study,
        RoomLabel::Kitchen,
        RoomLabel::Outdoor,
    ];

    /// Wire form, as sent in the `label` field of the payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomLabel::LivingRoom => "living_room",
            RoomLabel::Bedroom => "bedroom",
            RoomLabel::Study => "study",
            RoomLabel::Kitchen => "kitchen",
            RoomLabel::Outdoor => "outdoor",
        }
    }
}

impl fmt::Display for RoomLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRoomLabel(pub String);

impl fmt::Display for UnknownRoomLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not an allowed room type", self.0)
    }
}

impl std::error::Error for UnknownRoomLabel {}

impl FromStr for RoomLabel {
    type Err = UnknownRoomLabel;

    /// Exact match on the wire form. Normalization (trim/lowercase) is the
    /// sampler's job, not the parser's.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomLabel::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| UnknownRoomLabel(s.to_string()))
    }
}
