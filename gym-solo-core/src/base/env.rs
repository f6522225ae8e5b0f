//! Environment.
use super::{Info, Step};
use crate::record::Record;
use anyhow::Result;

/// Represents an environment driven by a training loop.
///
/// The lifecycle is `build -> reset -> step* -> close`.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs;

    /// Action of the environment.
    type Act: Clone;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: u64) -> Result<Self>
    where
        Self: Sized;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Performs an environment step.
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;

    /// Reseeds every random source of the environment.
    fn seed(&mut self, seed: u64);

    /// Releases the resources of the environment.
    ///
    /// Calling this method more than once is a no-op.
    fn close(&mut self) -> Result<()>;
}
