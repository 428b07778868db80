//! Single-flight animation scheduler driven by a virtual clock.
//!
//! An animated operation (a heap push shown node by node, a union with its
//! root highlights) is a queue of frames separated by delays. Only one
//! animation may run at a time; a second request is rejected, never queued.
//! Time only moves when the caller calls [`Animator::advance`], so tests can
//! step through an animation without sleeping.

use std::collections::VecDeque;
use std::time::Duration;

use crate::error::{Result, TraceError};
use crate::step::{Step, Trace};

/// A value released after waiting `delay` from the previous frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<T> {
    pub delay: Duration,
    pub value: T,
}

/// An ordered list of frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation<T> {
    frames: VecDeque<Frame<T>>,
}

impl<T> Default for Animation<T> {
    fn default() -> Self {
        Self {
            frames: VecDeque::new(),
        }
    }
}

impl<T> Animation<T> {
    /// Create an empty animation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame released `delay` after the previous one.
    pub fn then(mut self, delay: Duration, value: T) -> Self {
        self.frames.push_back(Frame { delay, value });
        self
    }

    /// Number of frames not yet released.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether every frame has been released.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl<P: Clone> Animation<Step<P>> {
    /// Animate a trace: the first step shows immediately, each later step
    /// after `delay`.
    pub fn from_trace(trace: &Trace<P>, delay: Duration) -> Self {
        let frames = trace
            .iter()
            .enumerate()
            .map(|(i, step)| Frame {
                delay: if i == 0 { Duration::ZERO } else { delay },
                value: step.clone(),
            })
            .collect();
        Self { frames }
    }
}

/// Runs at most one animation at a time.
#[derive(Debug)]
pub struct Animator<T> {
    active: Option<Animation<T>>,
    waited: Duration,
}

impl<T> Default for Animator<T> {
    fn default() -> Self {
        Self {
            active: None,
            waited: Duration::ZERO,
        }
    }
}

impl<T> Animator<T> {
    /// Create an idle animator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an animation is in flight.
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Frames still pending in the running animation.
    pub fn remaining(&self) -> usize {
        self.active.as_ref().map_or(0, Animation::len)
    }

    /// Begin an animation. Rejected while another one is running.
    pub fn start(&mut self, animation: Animation<T>) -> Result<()> {
        if let Some(active) = &self.active {
            tracing::warn!(remaining = active.len(), "animation rejected: another is in flight");
            return Err(TraceError::AnimationInProgress {
                remaining: active.len(),
            });
        }
        if !animation.is_empty() {
            self.active = Some(animation);
            self.waited = Duration::ZERO;
        }
        Ok(())
    }

    /// Let `elapsed` pass and release every frame that became due, in order.
    ///
    /// Frames with a zero delay are released immediately, so starting an
    /// animation and calling `advance(Duration::ZERO)` yields its first frame.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<T> {
        let mut released = Vec::new();
        let Some(active) = self.active.as_mut() else {
            return released;
        };
        self.waited += elapsed;
        while let Some(frame) = active.frames.front() {
            if frame.delay > self.waited {
                break;
            }
            self.waited -= frame.delay;
            if let Some(frame) = active.frames.pop_front() {
                released.push(frame.value);
            }
        }
        if active.is_empty() {
            self.active = None;
            self.waited = Duration::ZERO;
        }
        released
    }
}
