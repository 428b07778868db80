//! Steps and traces: the recorded timeline of one algorithm run.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TraceError};

/// One immutable moment in an algorithm's execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step<P> {
    /// Position of this step within its trace.
    pub index: usize,
    /// Human-readable narration of what happened.
    pub description: String,
    /// Algorithm-specific data needed to render this moment.
    pub payload: P,
}

impl<P> Step<P> {
    /// Create a step at the given position.
    pub fn new(index: usize, description: impl Into<String>, payload: P) -> Self {
        Self {
            index,
            description: description.into(),
            payload,
        }
    }
}

/// The ordered, non-empty sequence of steps produced by one generator run.
///
/// A trace is never edited after it is built. Regenerating with new input
/// produces a fresh trace. It serializes but does not deserialize, so the
/// non-empty invariant cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trace<P> {
    algorithm: String,
    steps: Vec<Step<P>>,
}

impl<P> Trace<P> {
    /// Build a trace from already-indexed steps.
    ///
    /// Steps are re-indexed in order so `steps[i].index == i` always holds.
    pub fn new(algorithm: impl Into<String>, steps: Vec<Step<P>>) -> Result<Self> {
        if steps.is_empty() {
            return Err(TraceError::Empty);
        }
        let steps = steps
            .into_iter()
            .enumerate()
            .map(|(index, step)| Step { index, ..step })
            .collect();
        Ok(Self {
            algorithm: algorithm.into(),
            steps,
        })
    }

    /// Name of the algorithm that produced this trace.
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a constructed trace.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Step<P>> {
        self.steps.get(index)
    }

    /// The first step (the initialization, or the sole terminal step).
    pub fn first(&self) -> &Step<P> {
        &self.steps[0]
    }

    /// The terminal step.
    pub fn last(&self) -> &Step<P> {
        &self.steps[self.steps.len() - 1]
    }

    /// All steps in order.
    pub fn steps(&self) -> &[Step<P>] {
        &self.steps
    }

    /// Iterate over steps in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Step<P>> {
        self.steps.iter()
    }

    /// Last valid step index.
    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }
}

impl<'a, P> IntoIterator for &'a Trace<P> {
    type Item = &'a Step<P>;
    type IntoIter = std::slice::Iter<'a, Step<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Records steps while a generator runs.
///
/// Generators record an initialization (or a single terminal) step before
/// anything else, so [`Tracer::finish`] always has at least one step to
/// hand out. Finishing an empty recorder yields a placeholder step built from
/// `P::default()` rather than panicking.
#[derive(Debug)]
pub struct Tracer<P> {
    algorithm: &'static str,
    steps: Vec<Step<P>>,
}

impl<P> Tracer<P> {
    /// Start recording for the named algorithm.
    pub fn new(algorithm: &'static str) -> Self {
        Self {
            algorithm,
            steps: Vec::new(),
        }
    }

    /// Append a step.
    pub fn record(&mut self, description: impl Into<String>, payload: P) {
        let index = self.steps.len();
        self.steps.push(Step::new(index, description, payload));
    }

    /// Steps recorded so far.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The most recently recorded step.
    pub fn last(&self) -> Option<&Step<P>> {
        self.steps.last()
    }
}

impl<P: Default> Tracer<P> {
    /// Finish recording and hand out the trace.
    pub fn finish(mut self) -> Trace<P> {
        if self.steps.is_empty() {
            self.steps
                .push(Step::new(0, format!("{}: nothing to do", self.algorithm), P::default()));
        }
        tracing::trace!(algorithm = self.algorithm, steps = self.steps.len(), "trace finished");
        Trace {
            algorithm: self.algorithm.to_string(),
            steps: self.steps,
        }
    }
}
