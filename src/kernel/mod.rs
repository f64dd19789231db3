pub mod gate;
pub mod label;
pub mod reactor;
pub mod sampler;
pub mod smoother;
pub mod telemetry;
pub mod time;
pub mod window;
