//! The Solo 8 v2 vanilla robot.
use anyhow::Result;
use gym_solo_core::{
    client::{quaternion_from_euler, BodyId, BodySpec, JointSpec},
    BoxSpace, PhysicsClient, RobotModel, SoloBaseEnv, SoloConfig, SoloError,
};
use log::{debug, trace};
use std::{f64::consts::PI, path::PathBuf};

use crate::KinematicClient;

/// Names of the actuated joints, in joint index order.
pub const JOINT_NAMES: [&str; 8] = [
    "FL_HFE", "FL_KFE", "FR_HFE", "FR_KFE", "HL_HFE", "HL_KFE", "HR_HFE", "HR_KFE",
];

/// The Solo 8 v2 vanilla model: four legs with a hip and a knee joint each,
/// standing on a plane.
#[derive(Debug, Clone)]
pub struct Solo8VanillaModel {
    start_position: [f64; 3],
    start_orientation: [f64; 4],
    plane_urdf: PathBuf,
    plane: Option<BodyId>,
    robot: Option<BodyId>,
}

impl Default for Solo8VanillaModel {
    fn default() -> Self {
        Self {
            start_position: [0.0, 0.0, 0.5],
            start_orientation: quaternion_from_euler([0.0, 0.0, 0.0]),
            plane_urdf: PathBuf::from("plane.urdf"),
            plane: None,
            robot: None,
        }
    }
}

impl Solo8VanillaModel {
    /// Sets the initial base position.
    pub fn start_position(mut self, v: [f64; 3]) -> Self {
        self.start_position = v;
        self
    }

    /// Sets the initial base orientation from euler angles.
    pub fn start_orientation(mut self, euler: [f64; 3]) -> Self {
        self.start_orientation = quaternion_from_euler(euler);
        self
    }

    /// Body id of the ground plane, once loaded.
    pub fn plane(&self) -> Option<BodyId> {
        self.plane
    }

    fn loaded_robot(&self) -> Result<BodyId> {
        self.robot
            .ok_or_else(|| SoloError::Backend("the robot has not been loaded".to_string()).into())
    }
}

impl<C: PhysicsClient> RobotModel<C> for Solo8VanillaModel {
    fn load_bodies(&mut self, client: &mut C, config: &SoloConfig) -> Result<()> {
        let plane = BodySpec {
            urdf: self.plane_urdf.clone(),
            base_position: [0.0; 3],
            base_orientation: [0.0, 0.0, 0.0, 1.0],
            fixed_base: true,
            joints: vec![],
        };
        let robot = BodySpec {
            urdf: config.robot_urdf.clone(),
            base_position: self.start_position,
            base_orientation: self.start_orientation,
            fixed_base: false,
            joints: JOINT_NAMES
                .iter()
                .map(|name| JointSpec {
                    name: name.to_string(),
                    lower_limit: -PI,
                    upper_limit: PI,
                })
                .collect(),
        };

        self.plane = Some(client.load_body(&plane)?);
        self.robot = Some(client.load_body(&robot)?);
        debug!("Solo 8 loaded as {:?}", self.robot);

        Ok(())
    }

    /// Puts the base back to its initial pose and holds every joint at zero.
    fn reset(&mut self, client: &mut C, config: &SoloConfig, from_init: bool) -> Result<()> {
        trace!("Solo8VanillaModel::reset(from_init = {})", from_init);
        let robot = self.loaded_robot()?;

        client.reset_base_position_and_orientation(robot, self.start_position, self.start_orientation)?;
        let n_joints = client.num_joints(robot)?;
        for joint in 0..n_joints {
            client.reset_joint_state(robot, joint, 0.0)?;
        }
        client.set_joint_position_targets(
            robot,
            &vec![0.0; n_joints],
            config.motor_max_force,
            config.position_gain,
        )
    }

    fn apply_action(&mut self, client: &mut C, config: &SoloConfig, action: &[f64]) -> Result<()> {
        let robot = self.loaded_robot()?;
        if action.len() != JOINT_NAMES.len() {
            return Err(SoloError::Validation(format!(
                "Action has length {} != {} joints",
                action.len(),
                JOINT_NAMES.len()
            ))
            .into());
        }

        client.set_joint_position_targets(robot, action, config.motor_max_force, config.position_gain)
    }

    /// Position setpoints in `[-π, π]` for each joint.
    fn action_space(&self) -> Result<BoxSpace> {
        BoxSpace::uniform(JOINT_NAMES.len(), -PI, PI)
    }

    fn robot(&self) -> Option<BodyId> {
        self.robot
    }
}

/// The Solo 8 v2 vanilla environment on the kinematic backend.
pub type Solo8VanillaEnv<C = KinematicClient> = SoloBaseEnv<C, Solo8VanillaModel>;
