//! Cycle telemetry for the room-type provider.
//!
//! Telemetry is a read-only side-effect layer: it records what each cycle
//! decided and never feeds back into the decision itself.
//! Events carry labels and counts only, never raw variable values or
//! response bodies.

pub mod event;
pub mod metrics;
pub mod recorder;
