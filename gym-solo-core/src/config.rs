//! Simulation parameters of [`SoloBaseEnv`](crate::SoloBaseEnv).
use crate::error::SoloError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

/// How the physics session advances in time.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Copy)]
pub enum TimestepPolicy {
    /// Every environment step runs `substeps` physics steps of `dt` seconds
    /// while the action setpoint is held.
    Fixed {
        /// Duration of a physics step in seconds.
        dt: f64,

        /// Physics steps per environment step.
        substeps: usize,
    },

    /// The backend advances on its own wall clock. An environment step only
    /// replaces the setpoint.
    RealTime,
}

/// Simulation parameters, fixed at construction of an environment.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SoloConfig {
    /// Gravity vector in m/s^2.
    pub gravity: [f64; 3],

    /// Timestep policy of the session.
    pub timestep: TimestepPolicy,

    /// Additional search paths for asset files.
    pub search_paths: Vec<PathBuf>,

    /// Asset file of the robot.
    pub robot_urdf: PathBuf,

    /// Maximum force of the joint controllers.
    pub motor_max_force: f64,

    /// Position gain of the joint controllers.
    pub position_gain: f64,
}

impl Default for SoloConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, 0.0, -9.81],
            timestep: TimestepPolicy::Fixed {
                dt: 1e-3,
                substeps: 10,
            },
            search_paths: vec![],
            robot_urdf: PathBuf::from("solo8v2/solo.urdf"),
            motor_max_force: 3.0,
            position_gain: 0.1,
        }
    }
}

impl SoloConfig {
    /// Sets the gravity vector.
    pub fn gravity(mut self, gravity: [f64; 3]) -> Self {
        self.gravity = gravity;
        self
    }

    /// Sets the timestep policy.
    pub fn timestep(mut self, timestep: TimestepPolicy) -> Self {
        self.timestep = timestep;
        self
    }

    /// Adds a search path for asset files.
    pub fn search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    /// Sets the asset file of the robot.
    pub fn robot_urdf(mut self, path: impl Into<PathBuf>) -> Self {
        self.robot_urdf = path.into();
        self
    }

    /// Sets the maximum force of the joint controllers.
    pub fn motor_max_force(mut self, v: f64) -> Self {
        self.motor_max_force = v;
        self
    }

    /// Sets the position gain of the joint controllers.
    pub fn position_gain(mut self, v: f64) -> Self {
        self.position_gain = v;
        self
    }

    /// Checks the parameters.
    pub fn validate(&self) -> Result<()> {
        let err = |msg: String| -> Result<()> { Err(SoloError::Configuration(msg).into()) };

        if !self.gravity.iter().all(|g| g.is_finite()) {
            return err(format!("Gravity must be finite, got {:?}", self.gravity));
        }
        if let TimestepPolicy::Fixed { dt, substeps } = self.timestep {
            if !(dt.is_finite() && dt > 0.0) {
                return err(format!("Timestep must be positive, got {}", dt));
            }
            if substeps == 0 {
                return err("At least one physics step per environment step is required".to_string());
            }
        }
        if !(self.motor_max_force.is_finite() && self.motor_max_force > 0.0) {
            return err(format!(
                "Motor max force must be positive, got {}",
                self.motor_max_force
            ));
        }
        if !(self.position_gain.is_finite() && self.position_gain > 0.0) {
            return err(format!(
                "Position gain must be positive, got {}",
                self.position_gain
            ));
        }

        Ok(())
    }

    /// Constructs [`SoloConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SoloConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
