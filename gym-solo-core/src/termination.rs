//! Conditions ending an episode.

/// A stateful predicate deciding whether an episode has ended.
pub trait TerminationCondition {
    /// Resets the internal state at the start of an episode.
    fn reset(&mut self);

    /// Advances the condition by one step and returns whether the episode ended.
    fn is_terminated(&mut self) -> bool;
}

/// Terminates an episode after a number of steps.
///
/// `is_terminated()` returns `false` for the first `max_step_delta` calls and
/// `true` from call `max_step_delta + 1` onwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBasedTermination {
    max_step_delta: usize,
    step_delta: usize,
}

impl TimeBasedTermination {
    /// Creates a condition allowing `max_step_delta` steps.
    pub fn new(max_step_delta: usize) -> Self {
        Self {
            max_step_delta,
            step_delta: 0,
        }
    }

    /// The number of allowed steps.
    pub fn max_step_delta(&self) -> usize {
        self.max_step_delta
    }

    /// Steps taken since the last reset.
    pub fn step_delta(&self) -> usize {
        self.step_delta
    }
}

impl TerminationCondition for TimeBasedTermination {
    fn reset(&mut self) {
        self.step_delta = 0;
    }

    fn is_terminated(&mut self) -> bool {
        self.step_delta += 1;
        self.step_delta > self.max_step_delta
    }
}

/// Never terminates an episode, for tasks bounded by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerpetualTermination;

impl PerpetualTermination {
    /// Creates the condition.
    pub fn new() -> Self {
        Self
    }
}

impl TerminationCondition for PerpetualTermination {
    fn reset(&mut self) {}

    fn is_terminated(&mut self) -> bool {
        false
    }
}
