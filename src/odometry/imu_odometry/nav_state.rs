extern crate nalgebra as na;

use na::{Vector3,Matrix3};
use crate::Float;

/**
 * Navigation state in the world frame: body orientation, position and velocity.
 */
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct NavState {
    pub orientation: Matrix3<Float>,
    pub position: Vector3<Float>,
    pub velocity: Vector3<Float>
}

impl NavState {
    pub fn new(orientation: Matrix3<Float>, position: Vector3<Float>, velocity: Vector3<Float>) -> NavState {
        NavState {orientation, position, velocity}
    }

    pub fn identity() -> NavState {
        NavState {
            orientation: Matrix3::<Float>::identity(),
            position: Vector3::<Float>::zeros(),
            velocity: Vector3::<Float>::zeros()
        }
    }
}
