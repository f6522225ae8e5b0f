//! Rewards of the Solo 8 robot.
use anyhow::Result;
use gym_solo_core::{
    client::{euler_from_quaternion, BodyId},
    PhysicsClient, Reward,
};
use std::f64::consts::{FRAC_PI_2, PI};

/// Rewards the torso for being fully upright.
///
/// The Solo 8 v2 vanilla model is upright when rotated `-π/2` about the y axis.
/// The reward lies in `[-1, 1]`: `1` when upright and `-1` when upside down.
#[derive(Debug, Clone)]
pub struct UprightReward {
    robot: BodyId,
}

impl UprightReward {
    const FULLY_UPRIGHT: f64 = -FRAC_PI_2;

    /// Creates the reward for the robot.
    pub fn new(robot: BodyId) -> Self {
        Self { robot }
    }
}

impl<C: PhysicsClient> Reward<C> for UprightReward {
    fn compute(&mut self, client: &C) -> Result<f64> {
        let (_, quat) = client.base_position_and_orientation(self.robot)?;
        let [_, theta_y, _] = euler_from_quaternion(quat);
        Ok(theta_y / Self::FULLY_UPRIGHT)
    }
}

/// Rewards the robot for standing in its home position: level and as tall as
/// possible.
///
/// The reward is `0.25 * orientation + 0.75 * height`, where the orientation
/// term is `1` when level and the height term is `1` at standing height.
#[derive(Debug, Clone)]
pub struct HomePositionReward {
    robot: BodyId,
}

impl HomePositionReward {
    /// Base height of the standing robot, in meters.
    pub const QUAD_STANDING_HEIGHT: f64 = 0.3;

    const MAX_ANGLE: f64 = PI;

    /// Creates the reward for the robot.
    pub fn new(robot: BodyId) -> Self {
        Self { robot }
    }
}

impl<C: PhysicsClient> Reward<C> for HomePositionReward {
    fn compute(&mut self, client: &C) -> Result<f64> {
        let ([_, _, z], quat) = client.base_position_and_orientation(self.robot)?;
        let [theta_x, theta_y, _] = euler_from_quaternion(quat);

        let x_reward = Self::MAX_ANGLE - theta_x.abs();
        let y_reward = Self::MAX_ANGLE - theta_y.abs();

        let orientation_reward = (x_reward + y_reward) / (2.0 * Self::MAX_ANGLE);
        let height_reward = z / Self::QUAD_STANDING_HEIGHT;

        Ok(0.25 * orientation_reward + 0.75 * height_reward)
    }
}
