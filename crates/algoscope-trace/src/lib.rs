//! Algoscope Trace Model
//!
//! The common vocabulary for algorithm visualization: immutable steps, the
//! traces that hold them, and a VCR-style controller that plays them back.
//!
//! # Architecture
//!
//! - **Step / Trace**: one generator run produces one ordered, non-empty trace
//! - **Replay**: rebuilds the visible state at any index, either from the
//!   snapshot stored in the step or by folding every step up to it
//! - **Playback**: cursor, seek, step forward/back, auto-play on a virtual clock
//! - **Animation**: single-flight frame scheduler for animated operations
//!
//! # Usage
//!
//! ```ignore
//! let trace = algoscope_algorithms::bubble_sort(&[5, 1, 4], &BubbleOptions::default());
//! let mut playback = Playback::new(trace);
//! playback.go_to(3);
//! let view = playback.visible_state();
//! ```

mod animation;
mod error;
mod playback;
mod replay;
mod step;

pub use animation::{Animation, Animator, Frame};
pub use error::{Result, TraceError};
pub use playback::{Playback, PlaybackStatus, DEFAULT_SPEED_MS};
pub use replay::{fold_to, snapshot_at, Fold, Reconstruction, Replay, Snapshot};
pub use step::{Step, Trace, Tracer};
