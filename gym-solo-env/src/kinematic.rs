//! A headless in-process backend tracking joint setpoints kinematically.
//!
//! [`KinematicClient`] does not integrate rigid-body dynamics. Bases stay at the
//! pose they were loaded or reset to, and every joint approaches its position
//! setpoint at a bounded rate on each call of `step_simulation`. This is enough
//! to drive an environment end to end without a physics engine.
use anyhow::Result;
use gym_solo_core::{
    client::{BodyId, BodySpec, ConnectionMode, JointInfo, JointState},
    PhysicsClient, SoloError,
};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Maximum joint speed in rad/s.
pub const MAX_JOINT_SPEED: f64 = 10.0;

/// Duration of a physics step unless set otherwise.
pub const DEFAULT_TIME_STEP: f64 = 1.0 / 240.0;

#[derive(Debug, Clone)]
struct Joint {
    name: String,
    lower: f64,
    upper: f64,
    position: f64,
    velocity: f64,
    torque: f64,
    target: Option<f64>,
    max_force: f64,
    gain: f64,
}

impl Joint {
    fn step(&mut self, dt: f64) {
        let target = match self.target {
            Some(t) => t.clamp(self.lower, self.upper),
            None => {
                self.velocity = 0.0;
                self.torque = 0.0;
                return;
            }
        };

        let err = target - self.position;
        let max_delta = MAX_JOINT_SPEED * dt;
        let delta = (self.gain * err).clamp(-max_delta, max_delta);

        self.position = (self.position + delta).clamp(self.lower, self.upper);
        self.velocity = delta / dt;
        self.torque = (self.gain * err * self.max_force).clamp(-self.max_force, self.max_force);
    }

    fn settle(&mut self) {
        if let Some(t) = self.target {
            self.position = t.clamp(self.lower, self.upper);
        }
        self.velocity = 0.0;
        self.torque = 0.0;
    }
}

#[derive(Debug, Clone)]
struct Body {
    urdf: PathBuf,
    position: [f64; 3],
    orientation: [f64; 4],
    joints: Vec<Joint>,
}

/// A kinematic physics session.
#[derive(Debug)]
pub struct KinematicClient {
    mode: ConnectionMode,
    connected: bool,
    gravity: [f64; 3],
    dt: f64,
    real_time: bool,
    search_paths: Vec<PathBuf>,
    bodies: Vec<Body>,
    n_steps: usize,
}

impl KinematicClient {
    /// The mode the session was opened in.
    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    /// Returns `true` until the session is disconnected.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// The gravity vector.
    pub fn gravity(&self) -> [f64; 3] {
        self.gravity
    }

    /// Duration of a physics step.
    pub fn time_step(&self) -> f64 {
        self.dt
    }

    /// Returns `true` if the session runs in real time.
    pub fn is_real_time(&self) -> bool {
        self.real_time
    }

    /// Search paths for asset files.
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// The number of physics steps taken since connection.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// The number of loaded bodies.
    pub fn num_bodies(&self) -> usize {
        self.bodies.len()
    }

    /// The asset file a body was loaded from.
    pub fn urdf(&self, body: BodyId) -> Result<&Path> {
        Ok(self.body(body)?.urdf.as_path())
    }

    fn check_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(SoloError::Backend("not connected to a physics session".to_string()).into())
        }
    }

    fn body(&self, body: BodyId) -> Result<&Body> {
        self.check_connected()?;
        self.bodies
            .get(body.0)
            .ok_or_else(|| SoloError::Backend(format!("unknown body {:?}", body)).into())
    }

    fn body_mut(&mut self, body: BodyId) -> Result<&mut Body> {
        self.check_connected()?;
        self.bodies
            .get_mut(body.0)
            .ok_or_else(|| SoloError::Backend(format!("unknown body {:?}", body)).into())
    }

    fn joint(&self, body: BodyId, joint: usize) -> Result<&Joint> {
        self.body(body)?
            .joints
            .get(joint)
            .ok_or_else(|| SoloError::Backend(format!("unknown joint {} of body {:?}", joint, body)).into())
    }
}

impl PhysicsClient for KinematicClient {
    fn connect(mode: ConnectionMode) -> Result<Self> {
        if mode == ConnectionMode::Gui {
            info!("KinematicClient has no visualiser, running headless");
        }

        Ok(Self {
            mode,
            connected: true,
            gravity: [0.0; 3],
            dt: DEFAULT_TIME_STEP,
            real_time: false,
            search_paths: vec![],
            bodies: vec![],
            n_steps: 0,
        })
    }

    fn disconnect(&mut self) -> Result<()> {
        self.check_connected()?;
        self.connected = false;
        self.bodies.clear();
        Ok(())
    }

    fn set_gravity(&mut self, gravity: [f64; 3]) -> Result<()> {
        self.check_connected()?;
        self.gravity = gravity;
        Ok(())
    }

    fn set_additional_search_path(&mut self, path: &Path) -> Result<()> {
        self.check_connected()?;
        self.search_paths.push(path.to_path_buf());
        Ok(())
    }

    fn set_time_step(&mut self, dt: f64) -> Result<()> {
        self.check_connected()?;
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SoloError::Backend(format!("invalid time step {}", dt)).into());
        }
        self.dt = dt;
        Ok(())
    }

    fn set_real_time_simulation(&mut self, enable: bool) -> Result<()> {
        self.check_connected()?;
        self.real_time = enable;
        Ok(())
    }

    fn step_simulation(&mut self) -> Result<()> {
        self.check_connected()?;
        let dt = self.dt;
        for joint in self.bodies.iter_mut().flat_map(|b| b.joints.iter_mut()) {
            joint.step(dt);
        }
        self.n_steps += 1;
        Ok(())
    }

    fn load_body(&mut self, spec: &BodySpec) -> Result<BodyId> {
        self.check_connected()?;

        let joints = spec
            .joints
            .iter()
            .map(|j| {
                if j.lower_limit.is_nan() || j.upper_limit.is_nan() || j.lower_limit > j.upper_limit {
                    return Err(SoloError::Backend(format!(
                        "joint {} has limits [{}, {}]",
                        j.name, j.lower_limit, j.upper_limit
                    )));
                }
                Ok(Joint {
                    name: j.name.clone(),
                    lower: j.lower_limit,
                    upper: j.upper_limit,
                    position: 0.0_f64.clamp(j.lower_limit, j.upper_limit),
                    velocity: 0.0,
                    torque: 0.0,
                    target: None,
                    max_force: 0.0,
                    gain: 0.0,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let id = BodyId(self.bodies.len());
        debug!("Load {:?} as {:?} with {} joints", spec.urdf, id, joints.len());
        self.bodies.push(Body {
            urdf: spec.urdf.clone(),
            position: spec.base_position,
            orientation: spec.base_orientation,
            joints,
        });

        Ok(id)
    }

    fn reset_base_position_and_orientation(
        &mut self,
        body: BodyId,
        position: [f64; 3],
        orientation: [f64; 4],
    ) -> Result<()> {
        let body = self.body_mut(body)?;
        body.position = position;
        body.orientation = orientation;
        Ok(())
    }

    fn base_position_and_orientation(&self, body: BodyId) -> Result<([f64; 3], [f64; 4])> {
        let body = self.body(body)?;
        Ok((body.position, body.orientation))
    }

    fn base_velocity(&self, body: BodyId) -> Result<([f64; 3], [f64; 3])> {
        self.body(body)?;
        Ok(([0.0; 3], [0.0; 3]))
    }

    fn num_joints(&self, body: BodyId) -> Result<usize> {
        Ok(self.body(body)?.joints.len())
    }

    fn joint_info(&self, body: BodyId, joint: usize) -> Result<JointInfo> {
        let j = self.joint(body, joint)?;
        Ok(JointInfo {
            index: joint,
            name: j.name.clone(),
            lower_limit: j.lower,
            upper_limit: j.upper,
        })
    }

    fn joint_state(&self, body: BodyId, joint: usize) -> Result<JointState> {
        let j = self.joint(body, joint)?;
        Ok(JointState {
            position: j.position,
            velocity: j.velocity,
            applied_torque: j.torque,
        })
    }

    fn reset_joint_state(&mut self, body: BodyId, joint: usize, position: f64) -> Result<()> {
        let j = self
            .body_mut(body)?
            .joints
            .get_mut(joint)
            .ok_or_else(|| SoloError::Backend(format!("unknown joint {}", joint)))?;
        j.position = position.clamp(j.lower, j.upper);
        j.velocity = 0.0;
        j.torque = 0.0;
        Ok(())
    }

    /// In real-time mode the client has no clock of its own, so the setpoints
    /// are treated as reached by the time the joints are queried again.
    fn set_joint_position_targets(
        &mut self,
        body: BodyId,
        targets: &[f64],
        max_force: f64,
        position_gain: f64,
    ) -> Result<()> {
        let real_time = self.real_time;
        let body = self.body_mut(body)?;
        if targets.len() != body.joints.len() {
            return Err(SoloError::Backend(format!(
                "{} targets for {} joints",
                targets.len(),
                body.joints.len()
            ))
            .into());
        }

        for (joint, &target) in body.joints.iter_mut().zip(targets.iter()) {
            joint.target = Some(target);
            joint.max_force = max_force;
            joint.gain = position_gain.min(1.0);
            if real_time {
                joint.settle();
            }
        }

        Ok(())
    }
}
