#![warn(missing_docs)]
//! Observation/reward composition and environment lifecycle for legged-robot
//! reinforcement learning.
//!
//! The crate defines the pieces an environment is assembled from:
//!
//! * [`Observation`] and [`ObservationFactory`] - labeled vectors extracted from
//!   a physics session, concatenated into the observation seen by an agent.
//! * [`Reward`] and [`RewardFactory`] - scalars combined linearly with weights.
//! * [`TerminationCondition`] - stateful predicates ending an episode.
//! * [`SoloBaseEnv`] - owner of the physics session, driven through [`Env`]
//!   with a robot-specific [`RobotModel`].
//!
//! The physics backend is consumed through [`PhysicsClient`] and is not part of
//! this crate.
pub mod client;
pub mod error;
pub mod record;

mod base;
pub use base::{Env, Info, Step};

mod base_env;
pub use base_env::{LifecycleState, RobotModel, SoloBaseEnv, SoloEnvConfig, SoloInfo};

mod config;
pub use config::{SoloConfig, TimestepPolicy};

mod obs;
pub use obs::{Observation, ObservationFactory};

mod rewards;
pub use rewards::{Reward, RewardFactory};

mod seeding;
pub use seeding::Seeder;

mod space;
pub use space::BoxSpace;

mod termination;
pub use termination::{PerpetualTermination, TerminationCondition, TimeBasedTermination};

pub use client::PhysicsClient;
pub use error::SoloError;
