use std::fmt;

use crate::Timestamp;
use crate::sensors::{camera::{StereoDataFrame,ApsDataFrame}, imu::ImuMeasurement};

pub mod camera;
pub mod imu;
pub mod data_provider;

/**
 * Sensor streams known to the data provider. The declaration order is the
 * delivery priority when two streams share a timestamp.
 */
#[derive(Debug,Copy,Clone,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub enum Modality {
    Imu,
    Aps,
    Stereo
}

impl Modality {
    pub const ALL: [Modality; 3] = [Modality::Imu, Modality::Aps, Modality::Stereo];

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Modality::Imu => write!(f, "IMU"),
            Modality::Aps => write!(f, "APS"),
            Modality::Stereo => write!(f, "STEREO")
        }
    }
}

#[derive(Debug,Clone,PartialEq)]
pub enum SensorRecord {
    Imu(ImuMeasurement),
    Aps(ApsDataFrame),
    Stereo(StereoDataFrame)
}

impl SensorRecord {
    pub fn timestamp(&self) -> Timestamp {
        match self {
            SensorRecord::Imu(imu) => imu.timestamp,
            SensorRecord::Aps(aps) => aps.timestamp,
            SensorRecord::Stereo(stereo) => stereo.timestamp
        }
    }

    pub fn modality(&self) -> Modality {
        match self {
            SensorRecord::Imu(_) => Modality::Imu,
            SensorRecord::Aps(_) => Modality::Aps,
            SensorRecord::Stereo(_) => Modality::Stereo
        }
    }
}

pub type SensorCallback = Box<dyn FnMut(&SensorRecord) + Send>;
