//! Base environment of a legged robot in a physics session.
//!
//! [`SoloBaseEnv`] owns the physics session and wires the observation, reward
//! and termination collaborators to it. Robot-specific behavior is supplied by
//! a [`RobotModel`]; the base type cannot be built without one:
//!
//! ```compile_fail
//! use anyhow::Result;
//! use gym_solo_core::{
//!     client::{BodyId, BodySpec, ConnectionMode, JointInfo, JointState},
//!     PhysicsClient, SoloBaseEnv, SoloConfig,
//! };
//! use std::path::Path;
//!
//! struct Headless;
//!
//! impl PhysicsClient for Headless {
//!     fn connect(_mode: ConnectionMode) -> Result<Self> { Ok(Self) }
//!     fn disconnect(&mut self) -> Result<()> { Ok(()) }
//!     fn set_gravity(&mut self, _gravity: [f64; 3]) -> Result<()> { Ok(()) }
//!     fn set_additional_search_path(&mut self, _path: &Path) -> Result<()> { Ok(()) }
//!     fn set_time_step(&mut self, _dt: f64) -> Result<()> { Ok(()) }
//!     fn set_real_time_simulation(&mut self, _enable: bool) -> Result<()> { Ok(()) }
//!     fn step_simulation(&mut self) -> Result<()> { Ok(()) }
//!     fn load_body(&mut self, _spec: &BodySpec) -> Result<BodyId> { Ok(BodyId(0)) }
//!     fn reset_base_position_and_orientation(
//!         &mut self, _body: BodyId, _position: [f64; 3], _orientation: [f64; 4],
//!     ) -> Result<()> { Ok(()) }
//!     fn base_position_and_orientation(&self, _body: BodyId) -> Result<([f64; 3], [f64; 4])> {
//!         Ok(([0.0; 3], [0.0, 0.0, 0.0, 1.0]))
//!     }
//!     fn base_velocity(&self, _body: BodyId) -> Result<([f64; 3], [f64; 3])> { Ok(([0.0; 3], [0.0; 3])) }
//!     fn num_joints(&self, _body: BodyId) -> Result<usize> { Ok(0) }
//!     fn joint_info(&self, _body: BodyId, _joint: usize) -> Result<JointInfo> { unimplemented!() }
//!     fn joint_state(&self, _body: BodyId, _joint: usize) -> Result<JointState> { unimplemented!() }
//!     fn reset_joint_state(&mut self, _body: BodyId, _joint: usize, _position: f64) -> Result<()> { Ok(()) }
//!     fn set_joint_position_targets(
//!         &mut self, _body: BodyId, _targets: &[f64], _max_force: f64, _position_gain: f64,
//!     ) -> Result<()> { Ok(()) }
//! }
//!
//! // The session is valid, but `()` supplies no `load_bodies`/`reset`.
//! let env = SoloBaseEnv::<Headless, ()>::new((), SoloConfig::default(), false);
//! ```
use crate::{
    base::{Env, Info, Step},
    client::{BodyId, ConnectionMode, PhysicsClient},
    config::{SoloConfig, TimestepPolicy},
    error::SoloError,
    obs::{Observation, ObservationFactory},
    record::{Record, RecordValue},
    rewards::{Reward, RewardFactory},
    seeding::Seeder,
    space::BoxSpace,
    termination::TerminationCondition,
};
use anyhow::Result;
use log::{debug, info, trace, warn};
use ndarray::Array1;
use std::rc::Rc;

/// Robot-specific part of an environment.
pub trait RobotModel<C: PhysicsClient> {
    /// Populates the session with the robot and any fixtures.
    ///
    /// Called exactly once, at construction of the environment.
    fn load_bodies(&mut self, client: &mut C, config: &SoloConfig) -> Result<()>;

    /// Resets the pose and state of the robot.
    ///
    /// `from_init` is `true` for the call made at construction.
    fn reset(&mut self, client: &mut C, config: &SoloConfig, from_init: bool) -> Result<()>;

    /// Sends an action to the low-level controllers of the robot.
    ///
    /// The action is a setpoint held until the next call.
    fn apply_action(&mut self, client: &mut C, config: &SoloConfig, action: &[f64]) -> Result<()>;

    /// The space of valid actions.
    fn action_space(&self) -> Result<BoxSpace>;

    /// Body id of the robot, once loaded.
    fn robot(&self) -> Option<BodyId>;
}

/// Lifecycle state of [`SoloBaseEnv`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// The session is open and the robot hooks have not run yet.
    ///
    /// A successfully constructed environment is already [`LifecycleState::Ready`].
    Constructed,

    /// An episode has been reset and no step was taken yet.
    Ready,

    /// At least one step was taken in the current episode.
    Stepping,

    /// The session has been released.
    Closed,
}

/// Information returned with every step.
#[derive(Debug, Clone, PartialEq)]
pub struct SoloInfo {
    /// Labels of the observation, `labels[i]` names `obs[i]`.
    pub labels: Vec<String>,
}

impl Info for SoloInfo {}

/// Configuration of [`SoloBaseEnv`] used by [`Env::build`].
#[derive(Debug, Clone)]
pub struct SoloEnvConfig<M> {
    /// Simulation parameters.
    pub sim: SoloConfig,

    /// Robot model, cloned for every built environment.
    pub model: M,

    /// Opens an interactive session if `true`.
    pub use_gui: bool,
}

impl<M> SoloEnvConfig<M> {
    /// Creates a headless configuration.
    pub fn new(sim: SoloConfig, model: M) -> Self {
        Self {
            sim,
            model,
            use_gui: false,
        }
    }

    /// Sets the GUI flag.
    pub fn use_gui(mut self, v: bool) -> Self {
        self.use_gui = v;
        self
    }
}

fn session<C>(client: &Option<C>) -> Result<&C> {
    client
        .as_ref()
        .ok_or_else(|| SoloError::SessionClosed("the environment has been closed".to_string()).into())
}

fn session_mut<C>(client: &mut Option<C>) -> Result<&mut C> {
    client
        .as_mut()
        .ok_or_else(|| SoloError::SessionClosed("the environment has been closed".to_string()).into())
}

/// An environment of a legged robot simulated in a physics session `C`.
pub struct SoloBaseEnv<C: PhysicsClient, M: RobotModel<C>> {
    client: Option<C>,
    config: SoloConfig,
    model: M,
    obs_factory: ObservationFactory<C>,
    reward_factory: RewardFactory<C>,
    terminations: Vec<Box<dyn TerminationCondition>>,
    seeder: Seeder,
    state: LifecycleState,
}

impl<C, M> SoloBaseEnv<C, M>
where
    C: PhysicsClient,
    M: RobotModel<C>,
{
    /// Opens a physics session, applies `config` and loads the robot.
    ///
    /// `model.load_bodies()` and then `model.reset(true)` are called once each.
    pub fn new(model: M, config: SoloConfig, use_gui: bool) -> Result<Self> {
        config.validate()?;

        let mode = ConnectionMode::from_gui(use_gui);
        info!("Connect physics session in {:?} mode", mode);
        let mut client = C::connect(mode)?;

        client.set_gravity(config.gravity)?;
        for path in config.search_paths.iter() {
            client.set_additional_search_path(path)?;
        }
        match config.timestep {
            TimestepPolicy::Fixed { dt, substeps } => {
                debug!("Fixed timestep dt = {}, {} substeps", dt, substeps);
                client.set_real_time_simulation(false)?;
                client.set_time_step(dt)?;
            }
            TimestepPolicy::RealTime => {
                debug!("Real-time simulation");
                client.set_real_time_simulation(true)?;
            }
        }

        let mut env = Self {
            client: Some(client),
            config,
            model,
            obs_factory: ObservationFactory::new(),
            reward_factory: RewardFactory::new(),
            terminations: Vec::new(),
            seeder: Seeder::from_entropy(),
            state: LifecycleState::Constructed,
        };

        // On failure the session is released when `env` is dropped.
        let client = session_mut(&mut env.client)?;
        env.model.load_bodies(client, &env.config)?;
        env.model.reset(client, &env.config, true)?;
        env.state = LifecycleState::Ready;
        info!("Loaded bodies, robot = {:?}", env.model.robot());

        Ok(env)
    }

    /// The physics session.
    ///
    /// Fails with [`SoloError::SessionClosed`] after [`SoloBaseEnv::close`].
    pub fn client(&self) -> Result<&C> {
        session(&self.client)
    }

    /// The physics session, mutably.
    pub fn client_mut(&mut self) -> Result<&mut C> {
        session_mut(&mut self.client)
    }

    /// Simulation parameters.
    pub fn config(&self) -> &SoloConfig {
        &self.config
    }

    /// The robot model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Body id of the robot.
    pub fn robot(&self) -> Option<BodyId> {
        self.model.robot()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The space of valid actions.
    pub fn action_space(&self) -> Result<BoxSpace> {
        self.model.action_space()
    }

    /// Draws a random action from the action space with the array generator.
    pub fn sample_action(&mut self) -> Result<Array1<f64>> {
        Ok(self.model.action_space()?.sample(self.seeder.array_rng()))
    }

    /// The random sources of the environment.
    pub fn seeder(&mut self) -> &mut Seeder {
        &mut self.seeder
    }

    /// Registers an observation, validating it against the live session.
    pub fn register_observation<O>(&mut self, obs: O) -> Result<()>
    where
        O: Observation<C> + 'static,
    {
        let client = session(&self.client)?;
        self.obs_factory.register_observation(obs, client)
    }

    /// Registers a reward with a weight.
    pub fn register_reward<R>(&mut self, weight: f64, reward: R)
    where
        R: Reward<C> + 'static,
    {
        self.reward_factory.register_reward(weight, reward);
    }

    /// Adds a termination condition.
    pub fn register_termination<T>(&mut self, condition: T)
    where
        T: TerminationCondition + 'static,
    {
        self.terminations.push(Box::new(condition));
    }

    /// Computes the observation and its labels for the current state.
    pub fn get_obs(&mut self) -> Result<(Array1<f64>, Vec<String>)> {
        let client = session(&self.client)?;
        self.obs_factory.get_obs(client)
    }

    /// Computes the combined reward for the current state.
    pub fn get_reward(&mut self) -> Result<f64> {
        let client = session(&self.client)?;
        self.reward_factory.get_reward(client)
    }

    /// The combined observation space, see
    /// [`ObservationFactory::get_observation_space`].
    pub fn get_observation_space(&mut self, regenerate: bool) -> Result<Rc<BoxSpace>> {
        let client = session(&self.client)?;
        self.obs_factory.get_observation_space(client, regenerate)
    }

    /// Advances every termination condition by one step.
    ///
    /// Returns `true` if any of them ends the episode. Without conditions the
    /// episode never ends.
    pub fn is_terminated(&mut self) -> bool {
        self.terminations
            .iter_mut()
            .fold(false, |done, cond| cond.is_terminated() || done)
    }

    /// Applies an action and advances the session by one control update.
    ///
    /// Under [`TimestepPolicy::Fixed`] the setpoint is held for `substeps`
    /// physics steps; under [`TimestepPolicy::RealTime`] the backend advances
    /// on its own and only the setpoint is replaced.
    pub fn apply_action(&mut self, action: &[f64]) -> Result<()> {
        let client = session_mut(&mut self.client)?;
        self.model.apply_action(client, &self.config, action)?;

        if let TimestepPolicy::Fixed { substeps, .. } = self.config.timestep {
            for _ in 0..substeps {
                client.step_simulation()?;
            }
        }
        self.state = LifecycleState::Stepping;

        Ok(())
    }

    /// Resets the robot and every termination condition.
    pub fn reset_episode(&mut self) -> Result<()> {
        let client = session_mut(&mut self.client)?;
        self.model.reset(client, &self.config, false)?;
        self.terminations.iter_mut().for_each(|cond| cond.reset());
        self.state = LifecycleState::Ready;

        Ok(())
    }

    /// Releases the physics session. Does nothing if it is already released.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut client) = self.client.take() {
            info!("Disconnect physics session");
            client.disconnect()?;
        }
        self.state = LifecycleState::Closed;

        Ok(())
    }
}

impl<C, M> Drop for SoloBaseEnv<C, M>
where
    C: PhysicsClient,
    M: RobotModel<C>,
{
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close physics session: {}", e);
        }
    }
}

impl<C, M> Env for SoloBaseEnv<C, M>
where
    C: PhysicsClient,
    M: RobotModel<C> + Clone,
{
    type Config = SoloEnvConfig<M>;
    type Obs = Array1<f64>;
    type Act = Array1<f64>;
    type Info = SoloInfo;

    fn build(config: &Self::Config, seed: u64) -> Result<Self> {
        let mut env = Self::new(config.model.clone(), config.sim.clone(), config.use_gui)?;
        env.seed(seed);
        Ok(env)
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        trace!("SoloBaseEnv::reset()");
        self.reset_episode()?;
        let (obs, _) = self.get_obs()?;
        Ok(obs)
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        trace!("SoloBaseEnv::step()");
        let action = a.to_vec();
        self.apply_action(&action)?;

        let (obs, labels) = self.get_obs()?;
        let reward = self.get_reward()?;
        let is_terminated = self.is_terminated();

        let mut record = Record::from_scalar("reward", reward);
        record.insert("obs", RecordValue::Array1(obs.to_vec()));
        record.insert("labels", RecordValue::Labels(labels.clone()));

        let step = Step::new(obs, a.clone(), reward, is_terminated, SoloInfo { labels });
        Ok((step, record))
    }

    fn seed(&mut self, seed: u64) {
        debug!("Seed random sources with {}", seed);
        self.seeder.seed(seed);
    }

    fn close(&mut self) -> Result<()> {
        SoloBaseEnv::close(self)
    }
}
