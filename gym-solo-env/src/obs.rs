//! Observations of the Solo 8 robot.
use anyhow::Result;
use gym_solo_core::{
    client::{euler_from_quaternion, BodyId},
    BoxSpace, Observation, PhysicsClient,
};
use ndarray::{concatenate, Array1, Axis};
use std::f64::consts::PI;

/// Orientation and velocities of the torso, as read by an IMU mounted on it.
///
/// The observation is `(θx, θy, θz, vx, vy, vz, wx, wy, wz)`: euler angles,
/// linear velocity and angular velocity of the base.
// TODO: Add angular acceleration to support production IMUs.
#[derive(Debug, Clone)]
pub struct TorsoImu {
    robot: BodyId,
    degrees: bool,
}

impl TorsoImu {
    /// Labels of the observation.
    pub const LABELS: [&'static str; 9] = ["θx", "θy", "θz", "vx", "vy", "vz", "wx", "wy", "wz"];

    /// Creates the observation for the robot, with angles in radians.
    pub fn new(robot: BodyId) -> Self {
        Self {
            robot,
            degrees: false,
        }
    }

    /// Reports angles and angular velocities in degrees if `true`.
    pub fn degrees(mut self, v: bool) -> Self {
        self.degrees = v;
        self
    }
}

impl<C: PhysicsClient> Observation<C> for TorsoImu {
    /// Angles lie in `[-π, π]` (`[-180, 180]` in degrees), velocities are unbounded.
    fn observation_space(&self, _client: &C) -> Result<BoxSpace> {
        let angle_max = if self.degrees { 180.0 } else { PI };
        let inf = f64::INFINITY;

        let lower = vec![
            -angle_max, -angle_max, -angle_max, // Orientation
            -inf, -inf, -inf, // Linear velocity
            -inf, -inf, -inf, // Angular velocity
        ];
        let upper = lower.iter().map(|v| -v).collect::<Vec<_>>();

        BoxSpace::new(lower, upper)
    }

    fn labels(&self, _client: &C) -> Result<Vec<String>> {
        Ok(Self::LABELS.iter().map(|s| s.to_string()).collect())
    }

    fn compute(&mut self, client: &C) -> Result<Array1<f64>> {
        let (_, orien_quat) = client.base_position_and_orientation(self.robot)?;
        let mut orien = Array1::from(euler_from_quaternion(orien_quat).to_vec());

        let (v_lin, v_ang) = client.base_velocity(self.robot)?;
        let v_lin = Array1::from(v_lin.to_vec());
        let mut v_ang = Array1::from(v_ang.to_vec());

        if self.degrees {
            orien.mapv_inplace(f64::to_degrees);
            v_ang.mapv_inplace(f64::to_degrees);
        }

        Ok(concatenate(Axis(0), &[orien.view(), v_lin.view(), v_ang.view()])?)
    }
}

/// Positions of all of the joints of the robot.
#[derive(Debug, Clone)]
pub struct MotorEncoder {
    robot: BodyId,
    degrees: bool,
}

impl MotorEncoder {
    /// Creates the observation for the robot, with positions in radians.
    pub fn new(robot: BodyId) -> Self {
        Self {
            robot,
            degrees: false,
        }
    }

    /// Reports positions in degrees if `true`.
    pub fn degrees(mut self, v: bool) -> Self {
        self.degrees = v;
        self
    }

    fn convert(&self, v: f64) -> f64 {
        if self.degrees {
            v.to_degrees()
        } else {
            v
        }
    }
}

impl<C: PhysicsClient> Observation<C> for MotorEncoder {
    /// Bounds are the position limits of the joints.
    fn observation_space(&self, client: &C) -> Result<BoxSpace> {
        let n = client.num_joints(self.robot)?;
        let mut lower = Vec::with_capacity(n);
        let mut upper = Vec::with_capacity(n);

        for joint in 0..n {
            let info = client.joint_info(self.robot, joint)?;
            lower.push(self.convert(info.lower_limit));
            upper.push(self.convert(info.upper_limit));
        }

        BoxSpace::new(lower, upper)
    }

    /// Joint names, in joint index order.
    fn labels(&self, client: &C) -> Result<Vec<String>> {
        (0..client.num_joints(self.robot)?)
            .map(|joint| Ok(client.joint_info(self.robot, joint)?.name))
            .collect()
    }

    fn compute(&mut self, client: &C) -> Result<Array1<f64>> {
        (0..client.num_joints(self.robot)?)
            .map(|joint| Ok(self.convert(client.joint_state(self.robot, joint)?.position)))
            .collect()
    }
}
