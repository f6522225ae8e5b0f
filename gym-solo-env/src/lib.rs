//! Solo 8 environments for [`gym_solo_core`].
//!
//! This crate provides the concrete collaborators of the core: the Solo 8 v2
//! vanilla [`RobotModel`], observations ([`TorsoImu`], [`MotorEncoder`]),
//! rewards ([`UprightReward`], [`HomePositionReward`]) and
//! [`KinematicClient`], a headless backend that needs no physics engine.
//!
//! ```
//! # use anyhow::Result;
//! use gym_solo_core::{Env, SoloConfig, TimeBasedTermination};
//! use gym_solo_env::{make, KinematicClient, MotorEncoder, TorsoImu, SOLO8_VANILLA};
//!
//! # fn main() -> Result<()> {
//! let mut env = make::<KinematicClient>(SOLO8_VANILLA, SoloConfig::default(), false)?;
//! let robot = env.robot().unwrap();
//! env.register_observation(TorsoImu::new(robot))?;
//! env.register_observation(MotorEncoder::new(robot))?;
//! env.register_termination(TimeBasedTermination::new(100));
//!
//! let obs = env.reset()?;
//! assert_eq!(obs.len(), 17);
//!
//! let act = env.sample_action()?;
//! let (step, _record) = env.step(&act)?;
//! assert_eq!(step.info.labels.len(), 17);
//! env.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! [`RobotModel`]: gym_solo_core::RobotModel
mod kinematic;
mod obs;
mod registry;
mod rewards;
pub mod solo8v2vanilla;

pub use kinematic::{KinematicClient, DEFAULT_TIME_STEP, MAX_JOINT_SPEED};
pub use obs::{MotorEncoder, TorsoImu};
pub use registry::{make, ENV_IDS, SOLO8_VANILLA, SOLO8_VANILLA_REALTIME};
pub use rewards::{HomePositionReward, UprightReward};
pub use solo8v2vanilla::{Solo8VanillaEnv, Solo8VanillaModel};
