//! Playback controls for algorithm traces.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::replay::{Reconstruction, Replay};
use crate::step::{Step, Trace};

/// Default delay between auto-advanced steps.
pub const DEFAULT_SPEED_MS: u64 = 500;

/// Playback controller: a cursor over one trace.
///
/// The visible state is recomputed whenever the cursor moves, using the
/// payload's reconstruction strategy. Auto-play is driven by [`advance`],
/// a virtual clock the caller feeds with elapsed time.
///
/// [`advance`]: Playback::advance
pub struct Playback<P: Replay> {
    trace: Trace<P>,
    current: usize,
    playing: bool,
    speed: Duration,
    elapsed: Duration,
    visible: P::State,
}

impl<P: Replay> Playback<P> {
    /// Create a playback controller positioned on the first step.
    pub fn new(trace: Trace<P>) -> Self {
        let visible = P::replay(trace.steps(), 0);
        Self {
            trace,
            current: 0,
            playing: false,
            speed: Duration::from_millis(DEFAULT_SPEED_MS),
            elapsed: Duration::ZERO,
            visible,
        }
    }

    /// The trace being played.
    pub fn trace(&self) -> &Trace<P> {
        &self.trace
    }

    /// Get the current step index.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Get the step under the cursor.
    pub fn current_step(&self) -> &Step<P> {
        &self.trace.steps()[self.current]
    }

    /// Get the total number of steps.
    pub fn len(&self) -> usize {
        self.trace.len()
    }

    /// Always false: traces are never empty.
    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    /// Whether the cursor sits on the final step.
    pub fn is_complete(&self) -> bool {
        self.current == self.trace.last_index()
    }

    /// Whether auto-play is running.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Delay between auto-advanced steps.
    pub fn speed(&self) -> Duration {
        self.speed
    }

    /// Strategy used to rebuild the visible state.
    pub fn reconstruction(&self) -> Reconstruction {
        P::RECONSTRUCTION
    }

    /// State derived for the current step.
    pub fn visible_state(&self) -> &P::State {
        &self.visible
    }

    /// Seek to a specific step.
    ///
    /// Out-of-range indices are ignored and leave the cursor untouched.
    /// Returns whether the seek was accepted.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.trace.len() {
            tracing::debug!(index, len = self.trace.len(), "seek out of range ignored");
            return false;
        }
        self.move_to(index);
        true
    }

    /// Step forward one step. Stops auto-play on reaching the end.
    pub fn next_step(&mut self) -> &Step<P> {
        if self.current < self.trace.last_index() {
            self.move_to(self.current + 1);
        }
        if self.is_complete() {
            self.playing = false;
        }
        self.current_step()
    }

    /// Step backward one step.
    pub fn prev_step(&mut self) -> &Step<P> {
        if self.current > 0 {
            self.move_to(self.current - 1);
        }
        self.current_step()
    }

    /// Return to the first step and stop auto-play.
    pub fn reset(&mut self) {
        self.playing = false;
        self.elapsed = Duration::ZERO;
        self.move_to(0);
    }

    /// Start or stop auto-play.
    ///
    /// Starting while on the final step rewinds to the beginning first.
    pub fn set_playing(&mut self, playing: bool) {
        if playing && self.is_complete() {
            self.move_to(0);
        }
        self.playing = playing;
        self.elapsed = Duration::ZERO;
    }

    /// Set the delay between auto-advanced steps.
    pub fn set_speed(&mut self, ms: u64) {
        self.speed = Duration::from_millis(ms);
    }

    /// Replace the trace. Always implies [`reset`](Playback::reset).
    pub fn regenerate(&mut self, trace: Trace<P>) {
        self.trace = trace;
        self.reset();
    }

    /// Feed elapsed time to the auto-play clock.
    ///
    /// Every full `speed` interval advances one step. Returns the number of
    /// steps taken. Does nothing while paused.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        if !self.playing {
            return 0;
        }
        self.elapsed += elapsed;
        let mut taken = 0;
        while self.playing && self.elapsed >= self.speed {
            self.elapsed -= self.speed;
            self.next_step();
            taken += 1;
        }
        if !self.playing {
            self.elapsed = Duration::ZERO;
        }
        taken
    }

    /// Calculate progress as a fraction (0.0 - 1.0).
    pub fn progress(&self) -> f64 {
        let last = self.trace.last_index();
        if last == 0 {
            1.0
        } else {
            self.current as f64 / last as f64
        }
    }

    /// Serializable summary of the controller.
    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus::from(self)
    }

    fn move_to(&mut self, index: usize) {
        self.visible = P::replay(self.trace.steps(), index);
        self.current = index;
    }
}

/// Playback status for sending to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub algorithm: String,
    pub current_index: usize,
    pub total_steps: usize,
    pub is_playing: bool,
    pub is_complete: bool,
    pub speed_ms: u64,
    pub progress: f64,
    pub reconstruction: Reconstruction,
}

impl<P: Replay> From<&Playback<P>> for PlaybackStatus {
    fn from(playback: &Playback<P>) -> Self {
        Self {
            algorithm: playback.trace.algorithm().to_string(),
            current_index: playback.current,
            total_steps: playback.len(),
            is_playing: playback.playing,
            is_complete: playback.is_complete(),
            speed_ms: playback.speed.as_millis() as u64,
            progress: playback.progress(),
            reconstruction: P::RECONSTRUCTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::Fold;
    use crate::step::Tracer;

    /// Running-sum payload replayed by folding.
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Add(i64);

    impl Fold for Add {
        type State = i64;

        fn apply(&self, state: &mut i64) {
            *state += self.0;
        }
    }

    crate::replay_by_fold!(Add);

    fn make_trace(count: usize) -> Trace<Add> {
        let mut tracer = Tracer::new("adder");
        for i in 0..count {
            tracer.record(format!("add {}", i + 1), Add(i as i64 + 1));
        }
        tracer.finish()
    }

    #[test]
    fn playback_starts_at_zero() {
        let playback = Playback::new(make_trace(10));
        assert_eq!(playback.current_index(), 0);
        assert!(!playback.is_playing());
        assert_eq!(*playback.visible_state(), 1);
    }

    #[test]
    fn go_to_ignores_out_of_range() {
        let mut playback = Playback::new(make_trace(10));

        assert!(playback.go_to(5));
        assert_eq!(playback.current_index(), 5);

        assert!(!playback.go_to(10));
        assert!(!playback.go_to(100));
        assert_eq!(playback.current_index(), 5);

        assert!(playback.go_to(0));
        assert_eq!(playback.current_index(), 0);
    }

    #[test]
    fn go_to_is_idempotent() {
        let mut playback = Playback::new(make_trace(10));
        playback.go_to(6);
        let once = playback.visible_state().clone();
        playback.go_to(6);
        assert_eq!(*playback.visible_state(), once);
        assert_eq!(once, 1 + 2 + 3 + 4 + 5 + 6 + 7);
    }

    #[test]
    fn next_step_advances() {
        let mut playback = Playback::new(make_trace(5));

        let step = playback.next_step();
        assert_eq!(step.index, 1);
        assert_eq!(playback.current_index(), 1);

        playback.next_step();
        playback.next_step();
        assert_eq!(playback.current_index(), 3);
        assert_eq!(*playback.visible_state(), 10);
    }

    #[test]
    fn navigation_clamps_at_ends() {
        let mut playback = Playback::new(make_trace(3));

        playback.prev_step();
        assert_eq!(playback.current_index(), 0);

        for _ in 0..10 {
            playback.next_step();
        }
        assert_eq!(playback.current_index(), 2);
        assert!(playback.is_complete());
    }

    #[test]
    fn next_step_at_end_stops_playing() {
        let mut playback = Playback::new(make_trace(3));
        playback.go_to(1);
        playback.set_playing(true);

        playback.next_step();
        assert!(playback.is_complete());
        assert!(!playback.is_playing());
    }

    #[test]
    fn reset_rewinds_and_stops() {
        let mut playback = Playback::new(make_trace(4));
        playback.set_playing(true);
        playback.go_to(3);

        playback.reset();
        assert_eq!(playback.current_index(), 0);
        assert!(!playback.is_playing());
        assert_eq!(*playback.visible_state(), 1);
    }

    #[test]
    fn advance_follows_the_virtual_clock() {
        let mut playback = Playback::new(make_trace(10));
        playback.set_speed(100);

        // Paused: time passes, nothing moves.
        assert_eq!(playback.advance(Duration::from_millis(500)), 0);

        playback.set_playing(true);
        assert_eq!(playback.advance(Duration::from_millis(50)), 0);
        assert_eq!(playback.advance(Duration::from_millis(50)), 1);
        assert_eq!(playback.advance(Duration::from_millis(350)), 3);
        assert_eq!(playback.current_index(), 4);
    }

    #[test]
    fn advance_stops_itself_at_the_end() {
        let mut playback = Playback::new(make_trace(4));
        playback.set_speed(10);
        playback.set_playing(true);

        let taken = playback.advance(Duration::from_secs(10));
        assert_eq!(taken, 3);
        assert!(playback.is_complete());
        assert!(!playback.is_playing());
    }

    #[test]
    fn play_from_the_end_rewinds() {
        let mut playback = Playback::new(make_trace(4));
        playback.go_to(3);
        playback.set_playing(true);
        assert_eq!(playback.current_index(), 0);
        assert!(playback.is_playing());
    }

    #[test]
    fn regenerate_resets_cursor() {
        let mut playback = Playback::new(make_trace(10));
        playback.go_to(7);
        playback.set_playing(true);

        playback.regenerate(make_trace(3));
        assert_eq!(playback.current_index(), 0);
        assert_eq!(playback.len(), 3);
        assert!(!playback.is_playing());
    }

    #[test]
    fn progress_calculation() {
        let mut playback = Playback::new(make_trace(11));

        assert_eq!(playback.progress(), 0.0);

        playback.go_to(5);
        assert_eq!(playback.progress(), 0.5);

        playback.go_to(10);
        assert_eq!(playback.progress(), 1.0);
    }

    #[test]
    fn status_conversion() {
        let mut playback = Playback::new(make_trace(10));
        playback.go_to(3);
        playback.set_speed(250);

        let status = playback.status();
        assert_eq!(status.algorithm, "adder");
        assert_eq!(status.current_index, 3);
        assert_eq!(status.total_steps, 10);
        assert_eq!(status.speed_ms, 250);
        assert_eq!(status.reconstruction, Reconstruction::Fold);
        assert!(!status.is_complete);
    }
}
