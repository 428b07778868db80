//! Algoscope Playback Server
//!
//! Serves algorithm traces to a browser with VCR-style controls.
//!
//! # Architecture
//!
//! - **Request**: JSON `TraceRequest` picks a generator and its input
//! - **Session**: type-erased playback over whichever trace is loaded
//! - **Auto-play**: a tokio task that advances the playback clock
//! - **REST API**: navigation, seek, speed, trace replacement
//! - **WebSocket**: the same commands, plus a status push on every move
//!
//! # Usage
//!
//! ```ignore
//! let config = VisConfig::from_args(std::env::args().skip(1));
//! let server = VisServer::new(&config)?;
//! server.serve(config.port).await?;
//! ```

mod autoplay;
mod command;
mod config;
mod error;
mod request;
mod server;
mod session;

pub use command::{execute, Command, Reply};
pub use config::VisConfig;
pub use error::{Error, Result};
pub use request::{HeapAction, TraceRequest};
pub use server::{AppState, VisServer};
pub use session::{session, FrameView, PlaybackSession};
