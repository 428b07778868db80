//! Error types for algoscope-trace.

use thiserror::Error;

/// Result type for algoscope-trace operations.
pub type Result<T> = std::result::Result<T, TraceError>;

/// Errors raised by the trace model and the animation scheduler.
///
/// Generators never surface these: a bad input still yields a renderable
/// trace. They only guard direct construction and the single-flight
/// animation gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    /// A trace must contain at least one step.
    #[error("a trace must contain at least one step")]
    Empty,

    /// Another animation is still running.
    #[error("animation in progress: {remaining} frame(s) left")]
    AnimationInProgress { remaining: usize },
}
