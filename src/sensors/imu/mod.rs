use nalgebra as na;

use na::Vector3;
use crate::{Float,Timestamp,to_seconds};

/**
 * One raw inertial sample. Acceleration is in m/s^2, angular velocity in rad/s.
 */
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct ImuMeasurement {
    pub timestamp: Timestamp,
    pub a: Vector3<Float>,
    pub w: Vector3<Float>
}

impl ImuMeasurement {
    pub fn new(timestamp: Timestamp, a: Vector3<Float>, w: Vector3<Float>) -> ImuMeasurement {
        ImuMeasurement {timestamp, a, w}
    }

    pub fn from_arrays(timestamp: Timestamp, accelerometer: &[Float; 3], gyro: &[Float; 3]) -> ImuMeasurement {
        ImuMeasurement {
            timestamp,
            a: Vector3::<Float>::from_column_slice(accelerometer),
            w: Vector3::<Float>::from_column_slice(gyro)
        }
    }

    pub fn seconds(&self) -> Float {
        to_seconds(self.timestamp)
    }
}
