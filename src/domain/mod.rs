// Domain layer - Mission telemetry value types and wire messages
pub mod dataset;
pub mod playback;
pub mod protocol;
pub mod snapshot;
pub mod telemetry;
