/// Engine configuration.
pub mod config;
/// Job state machine and engine entry points.
pub mod orchestrator;
