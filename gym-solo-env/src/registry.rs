//! Environments registered under string ids.
use crate::{solo8v2vanilla::Solo8VanillaEnv, Solo8VanillaModel, UprightReward};
use anyhow::Result;
use gym_solo_core::{
    PerpetualTermination, PhysicsClient, SoloConfig, SoloError, TimestepPolicy,
};
use log::info;

/// Solo 8 v2 vanilla stepped with a fixed timestep.
pub const SOLO8_VANILLA: &str = "solo8vanilla-v0";

/// Solo 8 v2 vanilla advancing in real time. Every step only sends new joint
/// setpoints, like commanding the controllers of a real robot.
pub const SOLO8_VANILLA_REALTIME: &str = "solo8vanilla-realtime-v0";

/// Ids of the registered environments.
pub const ENV_IDS: [&str; 2] = [SOLO8_VANILLA, SOLO8_VANILLA_REALTIME];

/// Builds the environment registered under `id`.
///
/// Both environments reward standing upright with [`UprightReward`]; further
/// observations, rewards and termination conditions are registered by the caller.
/// The realtime variant uses [`TimestepPolicy::RealTime`] regardless of `config`
/// and never terminates.
pub fn make<C: PhysicsClient>(id: &str, config: SoloConfig, use_gui: bool) -> Result<Solo8VanillaEnv<C>> {
    info!("Make environment {}", id);

    match id {
        SOLO8_VANILLA => {
            let mut env = Solo8VanillaEnv::<C>::new(Solo8VanillaModel::default(), config, use_gui)?;
            register_defaults(&mut env)?;
            Ok(env)
        }
        SOLO8_VANILLA_REALTIME => {
            let config = config.timestep(TimestepPolicy::RealTime);
            let mut env = Solo8VanillaEnv::<C>::new(Solo8VanillaModel::default(), config, use_gui)?;
            register_defaults(&mut env)?;
            env.register_termination(PerpetualTermination::new());
            Ok(env)
        }
        _ => Err(SoloError::UnknownEnv(id.to_string()).into()),
    }
}

fn register_defaults<C: PhysicsClient>(env: &mut Solo8VanillaEnv<C>) -> Result<()> {
    let robot = env
        .robot()
        .ok_or_else(|| SoloError::Backend("the robot has not been loaded".to_string()))?;
    env.register_reward(1.0, UprightReward::new(robot));
    Ok(())
}
