//! Contract of the physics backend session.
//!
//! The environment drives a backend only through [`PhysicsClient`]. The library
//! never inspects the backend's internal formats; it only consumes the numbers
//! returned by these queries.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Identifier of a body in a physics session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub usize);

/// How the session is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionMode {
    /// Interactive session with a visualiser.
    Gui,

    /// Headless session.
    Direct,
}

impl ConnectionMode {
    /// Chooses the mode from a GUI flag.
    pub fn from_gui(use_gui: bool) -> Self {
        if use_gui {
            Self::Gui
        } else {
            Self::Direct
        }
    }
}

/// Description of a joint of a body to be loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointSpec {
    /// Joint name.
    pub name: String,

    /// Lower position limit.
    pub lower_limit: f64,

    /// Upper position limit.
    pub upper_limit: f64,
}

/// Description of a body to be loaded into a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    /// Asset file of the body, resolved by the backend against its search paths.
    pub urdf: PathBuf,

    /// Initial base position.
    pub base_position: [f64; 3],

    /// Initial base orientation as a quaternion `(x, y, z, w)`.
    pub base_orientation: [f64; 4],

    /// Whether the base is fixed in the world.
    pub fixed_base: bool,

    /// Actuated joints of the body, in joint index order.
    pub joints: Vec<JointSpec>,
}

/// Static information of a joint.
#[derive(Debug, Clone, PartialEq)]
pub struct JointInfo {
    /// Joint index.
    pub index: usize,

    /// Joint name.
    pub name: String,

    /// Lower position limit.
    pub lower_limit: f64,

    /// Upper position limit.
    pub upper_limit: f64,
}

/// Dynamic state of a joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointState {
    /// Joint position.
    pub position: f64,

    /// Joint velocity.
    pub velocity: f64,

    /// Applied motor torque.
    pub applied_torque: f64,
}

/// A physics backend session.
///
/// A session is exclusively owned by one environment. Failures of the backend are
/// returned as errors and propagate to the caller unchanged.
pub trait PhysicsClient {
    /// Opens a session.
    fn connect(mode: ConnectionMode) -> Result<Self>
    where
        Self: Sized;

    /// Releases the session.
    fn disconnect(&mut self) -> Result<()>;

    /// Sets the gravity vector.
    fn set_gravity(&mut self, gravity: [f64; 3]) -> Result<()>;

    /// Adds a search path for asset files.
    fn set_additional_search_path(&mut self, path: &Path) -> Result<()>;

    /// Sets the duration of one call of [`PhysicsClient::step_simulation`].
    fn set_time_step(&mut self, dt: f64) -> Result<()>;

    /// Lets the backend advance on its own wall clock.
    fn set_real_time_simulation(&mut self, enable: bool) -> Result<()>;

    /// Advances the simulation by one physics step.
    fn step_simulation(&mut self) -> Result<()>;

    /// Loads a body and returns its id.
    fn load_body(&mut self, spec: &BodySpec) -> Result<BodyId>;

    /// Moves the base of a body and clears its velocity.
    fn reset_base_position_and_orientation(
        &mut self,
        body: BodyId,
        position: [f64; 3],
        orientation: [f64; 4],
    ) -> Result<()>;

    /// Position and quaternion `(x, y, z, w)` of the base.
    fn base_position_and_orientation(&self, body: BodyId) -> Result<([f64; 3], [f64; 4])>;

    /// Linear and angular velocity of the base.
    fn base_velocity(&self, body: BodyId) -> Result<([f64; 3], [f64; 3])>;

    /// The number of joints of a body.
    fn num_joints(&self, body: BodyId) -> Result<usize>;

    /// Static information of a joint.
    fn joint_info(&self, body: BodyId, joint: usize) -> Result<JointInfo>;

    /// Dynamic state of a joint.
    fn joint_state(&self, body: BodyId, joint: usize) -> Result<JointState>;

    /// Teleports a joint to a position with zero velocity.
    fn reset_joint_state(&mut self, body: BodyId, joint: usize, position: f64) -> Result<()>;

    /// Sets position setpoints of the joint controllers of a body.
    ///
    /// The setpoints are held by the controllers until they are replaced.
    /// `targets[i]` is the target of joint `i`.
    fn set_joint_position_targets(
        &mut self,
        body: BodyId,
        targets: &[f64],
        max_force: f64,
        position_gain: f64,
    ) -> Result<()>;
}

/// Converts a quaternion `(x, y, z, w)` into euler angles `(roll, pitch, yaw)`,
/// i.e. rotations about the x, y and z axes.
pub fn euler_from_quaternion(q: [f64; 4]) -> [f64; 3] {
    let [x, y, z, w] = q;

    let roll = (2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y));
    let sin_pitch = (2.0 * (w * y - z * x)).clamp(-1.0, 1.0);
    let pitch = sin_pitch.asin();
    let yaw = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z));

    [roll, pitch, yaw]
}

/// Converts euler angles `(roll, pitch, yaw)` into a quaternion `(x, y, z, w)`.
pub fn quaternion_from_euler(e: [f64; 3]) -> [f64; 4] {
    let (sr, cr) = (e[0] / 2.0).sin_cos();
    let (sp, cp) = (e[1] / 2.0).sin_cos();
    let (sy, cy) = (e[2] / 2.0).sin_cos();

    [
        sr * cp * cy - cr * sp * sy,
        cr * sp * cy + sr * cp * sy,
        cr * cp * sy - sr * sp * cy,
        cr * cp * cy + sr * sp * sy,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity_quaternion() {
        assert_eq!(euler_from_quaternion([0.0, 0.0, 0.0, 1.0]), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_euler_quaternion_inverse() {
        let e = [0.3, -0.7, 1.2];
        let back = euler_from_quaternion(quaternion_from_euler(e));
        for i in 0..3 {
            assert!((e[i] - back[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_pitch_about_y() {
        let q = quaternion_from_euler([0.0, -FRAC_PI_2 / 2.0, 0.0]);
        let e = euler_from_quaternion(q);
        assert!((e[1] + FRAC_PI_2 / 2.0).abs() < 1e-9);
    }
}
