//! Type-erased playback so one server can host any generator.

use std::time::Duration;

use algoscope_trace::{Playback, PlaybackStatus, Replay, Trace};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The current step as the frontend draws it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameView {
    pub index: usize,
    pub total_steps: usize,
    pub description: String,
    /// The step's own payload.
    pub payload: serde_json::Value,
    /// State derived for this step by snapshot or fold.
    pub state: serde_json::Value,
}

/// A [`Playback`] with its payload type erased.
pub trait PlaybackSession: Send + Sync {
    fn status(&self) -> PlaybackStatus;

    fn frame(&self) -> Result<FrameView>;

    fn is_playing(&self) -> bool;

    fn speed(&self) -> Duration;

    fn next_step(&mut self);

    fn prev_step(&mut self);

    fn go_to(&mut self, index: usize) -> bool;

    fn reset(&mut self);

    fn set_playing(&mut self, playing: bool);

    fn set_speed(&mut self, ms: u64);

    fn advance(&mut self, elapsed: Duration) -> usize;
}

impl<P> PlaybackSession for Playback<P>
where
    P: Replay + Serialize + Send + Sync,
    P::State: Serialize + Send + Sync,
{
    fn status(&self) -> PlaybackStatus {
        Playback::status(self)
    }

    fn frame(&self) -> Result<FrameView> {
        let step = self.current_step();
        Ok(FrameView {
            index: step.index,
            total_steps: self.len(),
            description: step.description.clone(),
            payload: serde_json::to_value(&step.payload)?,
            state: serde_json::to_value(self.visible_state())?,
        })
    }

    fn is_playing(&self) -> bool {
        Playback::is_playing(self)
    }

    fn speed(&self) -> Duration {
        Playback::speed(self)
    }

    fn next_step(&mut self) {
        Playback::next_step(self);
    }

    fn prev_step(&mut self) {
        Playback::prev_step(self);
    }

    fn go_to(&mut self, index: usize) -> bool {
        Playback::go_to(self, index)
    }

    fn reset(&mut self) {
        Playback::reset(self)
    }

    fn set_playing(&mut self, playing: bool) {
        Playback::set_playing(self, playing)
    }

    fn set_speed(&mut self, ms: u64) {
        Playback::set_speed(self, ms)
    }

    fn advance(&mut self, elapsed: Duration) -> usize {
        Playback::advance(self, elapsed)
    }
}

/// Start a paused session on the first step of `trace`.
pub fn session<P>(trace: Trace<P>) -> Box<dyn PlaybackSession>
where
    P: Replay + Serialize + Send + Sync + 'static,
    P::State: Serialize + Send + Sync,
{
    Box::new(Playback::new(trace))
}
