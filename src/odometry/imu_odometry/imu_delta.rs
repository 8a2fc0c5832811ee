extern crate nalgebra as na;

use na::{Vector3,Matrix3,Isometry3,Translation3,Rotation3,UnitQuaternion};
use crate::Float;

/**
 * Relative motion between the start and the end of a preintegration window,
 * expressed in the body frame at the start of the window. Gravity is not removed.
 */
#[derive(Debug,Copy,Clone)]
pub struct ImuDelta {
    pub delta_position: Vector3<Float>,
    pub delta_velocity: Vector3<Float>,
    pub delta_rotation: Matrix3<Float>,
    pub delta_t: Float
}

impl ImuDelta {
    pub fn get_isometry(&self) -> Isometry3<Float> {
        let rotation = UnitQuaternion::<Float>::from_rotation_matrix(&Rotation3::from_matrix(&self.delta_rotation));
        Isometry3::<Float>::from_parts(Translation3::from(self.delta_position), rotation)
    }
}
