//! Environment step.
use super::Env;

/// Additional information to the observation and reward of a step.
pub trait Info {}

impl Info for () {}

/// Represents an action, observation and reward tuple `(a_t, o_t+1, r_t)`
/// with some additional information.
///
/// An environment emits a [`Step`] object at every interaction step.
pub struct Step<E: Env> {
    /// Action.
    pub act: E::Act,

    /// Observation after applying the action.
    pub obs: E::Obs,

    /// Reward.
    pub reward: f64,

    /// Flag denoting if the episode is terminated.
    pub is_terminated: bool,

    /// Information defined by the environment.
    pub info: E::Info,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(obs: E::Obs, act: E::Act, reward: f64, is_terminated: bool, info: E::Info) -> Self {
        Step {
            act,
            obs,
            reward,
            is_terminated,
            info,
        }
    }

    #[inline]
    /// Terminated.
    pub fn is_done(&self) -> bool {
        self.is_terminated
    }
}
