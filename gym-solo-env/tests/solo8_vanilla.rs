use anyhow::Result;
use gym_solo_core::{
    Env, LifecycleState, SoloConfig, SoloEnvConfig, SoloError, TimeBasedTermination,
};
use gym_solo_env::{
    make, solo8v2vanilla::JOINT_NAMES, ENV_IDS, HomePositionReward, KinematicClient, MotorEncoder,
    Solo8VanillaEnv, Solo8VanillaModel, TorsoImu, UprightReward, SOLO8_VANILLA,
    SOLO8_VANILLA_REALTIME,
};
use ndarray::Array1;
use std::f64::consts::{FRAC_PI_4, PI};
use test_log::test;

fn solo_error(err: &anyhow::Error) -> Option<&SoloError> {
    err.downcast_ref::<SoloError>()
}

fn env_with_obs(id: &str) -> Result<Solo8VanillaEnv> {
    let mut env = make::<KinematicClient>(id, SoloConfig::default(), false)?;
    let robot = env.robot().unwrap();
    env.register_observation(TorsoImu::new(robot))?;
    env.register_observation(MotorEncoder::new(robot))?;
    Ok(env)
}

#[test]
fn test_unknown_env() {
    let err = make::<KinematicClient>("solo12-v0", SoloConfig::default(), false)
        .err()
        .unwrap();
    assert_eq!(
        solo_error(&err),
        Some(&SoloError::UnknownEnv("solo12-v0".to_string()))
    );
}

#[test]
fn test_registered_envs_are_ready() -> Result<()> {
    for id in ENV_IDS {
        let mut env = make::<KinematicClient>(id, SoloConfig::default(), false)?;
        assert_eq!(env.state(), LifecycleState::Ready);
        assert_eq!(env.client()?.num_bodies(), 2);
        assert_eq!(env.get_reward()?, 0.0);
    }
    Ok(())
}

#[test]
fn test_observation_layout() -> Result<()> {
    let mut env = env_with_obs(SOLO8_VANILLA)?;
    let obs = env.reset()?;
    let (_, labels) = env.get_obs()?;

    let expected: Vec<String> = TorsoImu::LABELS
        .iter()
        .chain(JOINT_NAMES.iter())
        .map(|s| s.to_string())
        .collect();
    assert_eq!(labels, expected);
    assert_eq!(obs, Array1::<f64>::zeros(17));

    let space = env.get_observation_space(false)?;
    assert_eq!(space.len(), 17);
    assert_eq!(space.low()[0], -PI);
    assert_eq!(space.high()[3], f64::INFINITY);
    assert_eq!(space.low()[9], -PI);
    assert!(space.contains(obs.as_slice().unwrap()));

    Ok(())
}

#[test]
fn test_degrees() -> Result<()> {
    let mut env = make::<KinematicClient>(SOLO8_VANILLA, SoloConfig::default(), false)?;
    let robot = env.robot().unwrap();
    env.register_observation(TorsoImu::new(robot).degrees(true))?;
    env.register_observation(MotorEncoder::new(robot).degrees(true))?;

    let space = env.get_observation_space(false)?;
    assert_eq!(space.low()[0], -180.0);
    assert_eq!(space.high()[2], 180.0);
    assert!((space.high()[9] - 180.0).abs() < 1e-9);

    Ok(())
}

#[test]
fn test_fixed_step_holds_setpoint() -> Result<()> {
    let mut env = env_with_obs(SOLO8_VANILLA)?;
    env.reset()?;

    let act = Array1::from_elem(8, 0.5);
    let (step, record) = env.step(&act)?;
    assert_eq!(env.state(), LifecycleState::Stepping);
    assert_eq!(env.client()?.n_steps(), 10);

    // Joints move at most 0.01 rad per physics step.
    for v in step.obs.iter().skip(9) {
        assert!((v - 0.1).abs() < 1e-9, "{}", v);
    }
    assert_eq!(record.get_array1("obs")?, step.obs.to_vec());
    assert_eq!(record.get_labels("labels")?, step.info.labels);

    for _ in 0..300 {
        env.step(&act)?;
    }
    let (obs, _) = env.get_obs()?;
    for v in obs.iter().skip(9) {
        assert!((v - 0.5).abs() < 1e-6, "{}", v);
    }

    // Reset brings the joints back to zero.
    let obs = env.reset()?;
    assert_eq!(obs, Array1::<f64>::zeros(17));

    Ok(())
}

#[test]
fn test_realtime() -> Result<()> {
    let mut env = env_with_obs(SOLO8_VANILLA_REALTIME)?;
    env.reset()?;
    assert!(env.client()?.is_real_time());

    let act = Array1::from_elem(8, -0.25);
    for _ in 0..50 {
        let (step, _) = env.step(&act)?;
        assert!(!step.is_done());
        for v in step.obs.iter().skip(9) {
            assert_eq!(*v, -0.25);
        }
    }
    assert_eq!(env.client()?.n_steps(), 0);

    Ok(())
}

#[test]
fn test_time_based_episode() -> Result<()> {
    let mut env = env_with_obs(SOLO8_VANILLA)?;
    env.register_termination(TimeBasedTermination::new(3));
    let act = Array1::zeros(8);

    for _ in 0..2 {
        env.reset()?;
        let done: Vec<bool> = (0..4)
            .map(|_| -> Result<bool> { Ok(env.step(&act)?.0.is_done()) })
            .collect::<Result<_>>()?;
        assert_eq!(done, vec![false, false, false, true]);
    }

    Ok(())
}

#[test]
fn test_invalid_action() -> Result<()> {
    let mut env = env_with_obs(SOLO8_VANILLA)?;
    env.reset()?;
    let err = env.step(&Array1::zeros(3)).err().unwrap();
    assert!(matches!(solo_error(&err), Some(SoloError::Validation(_))));
    Ok(())
}

#[test]
fn test_rewards() -> Result<()> {
    let model = Solo8VanillaModel::default()
        .start_position([0.0, 0.0, HomePositionReward::QUAD_STANDING_HEIGHT])
        .start_orientation([0.0, -FRAC_PI_4, 0.0]);
    let mut env = Solo8VanillaEnv::<KinematicClient>::new(model, SoloConfig::default(), false)?;
    let robot = env.robot().unwrap();

    env.register_reward(1.0, UprightReward::new(robot));
    assert!((env.get_reward()? - 0.5).abs() < 1e-9);

    // Level at standing height, both terms of the home position reward are 1.
    let mut env = Solo8VanillaEnv::<KinematicClient>::new(
        Solo8VanillaModel::default().start_position([0.0, 0.0, 0.3]),
        SoloConfig::default(),
        false,
    )?;
    let robot = env.robot().unwrap();
    env.register_reward(2.0, HomePositionReward::new(robot));
    env.register_reward(-1.0, UprightReward::new(robot));
    assert!((env.get_reward()? - 2.0).abs() < 1e-9);

    Ok(())
}

#[test]
fn test_build_and_seed() -> Result<()> {
    let config = SoloEnvConfig::new(SoloConfig::default(), Solo8VanillaModel::default());
    let mut env1 = Solo8VanillaEnv::<KinematicClient>::build(&config, 7)?;
    let mut env2 = Solo8VanillaEnv::<KinematicClient>::build(&config, 7)?;

    for _ in 0..5 {
        assert_eq!(env1.sample_action()?, env2.sample_action()?);
        assert_eq!(env1.seeder().random(), env2.seeder().random());
    }

    env2.seed(8);
    assert_ne!(env1.sample_action()?, env2.sample_action()?);

    // Nothing is observed yet.
    let err = env1.reset().err().unwrap();
    assert!(matches!(solo_error(&err), Some(SoloError::EmptyRegistry(_))));

    Ok(())
}

#[test]
fn test_close() -> Result<()> {
    let mut env = env_with_obs(SOLO8_VANILLA)?;
    env.close()?;
    env.close()?;

    assert_eq!(env.state(), LifecycleState::Closed);
    let err = env.client().err().unwrap();
    assert!(matches!(solo_error(&err), Some(SoloError::SessionClosed(_))));
    assert!(env.reset().is_err());

    Ok(())
}
