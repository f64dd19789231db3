pub mod config;
pub mod error;
pub mod kernel;
pub mod provider;
pub mod services;
pub mod source;

pub use config::ProviderConfig;
pub use kernel::label::RoomLabel;
pub use provider::{RoomTypeLocationProvider, StartOutcome, StopOutcome};
