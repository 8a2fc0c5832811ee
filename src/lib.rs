use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;

use self::odometry::imu_odometry::parameters::ImuManagerParameters;
use self::io::loading_parameters::LoadingParameters;

pub mod numerics;
pub mod sensors;
pub mod io;
pub mod odometry;
pub mod sync;

macro_rules! define_float {
    ($f:tt) => {
        pub use std::$f as float;
        pub type Float = $f;
    }
}

define_float!(f64);

/**
 * Sensor time in nanoseconds. Seconds are only used for numerical work.
 */
pub type Timestamp = u64;

pub const NANOSECONDS_PER_SECOND: Float = 1e9;

/** Sentinel for an unbounded window start. */
pub const MIN_SECONDS: Float = float::MIN;
/** Sentinel for an unbounded window end. */
pub const MAX_SECONDS: Float = float::MAX;

pub fn to_seconds(timestamp: Timestamp) -> Float {
    (timestamp as Float) / NANOSECONDS_PER_SECOND
}

pub fn from_seconds(seconds: Float) -> Timestamp {
    match seconds {
        s if s <= 0.0 => 0,
        s => (s*NANOSECONDS_PER_SECOND).round() as Timestamp
    }
}

#[derive(Debug,Clone,Deserialize)]
#[serde(default)]
pub struct RuntimeConf {
    pub dataset_path: String,
    pub playback_speed: Float,
    pub verbose: bool,
    pub loading: LoadingParameters,
    pub imu: ImuManagerParameters
}

impl Default for RuntimeConf {
    fn default() -> RuntimeConf {
        RuntimeConf {
            dataset_path: String::from("."),
            playback_speed: -1.0,
            verbose: false,
            loading: LoadingParameters::default(),
            imu: ImuManagerParameters::default()
        }
    }
}

impl fmt::Display for RuntimeConf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "dataset_{}_speed_{}_{}", self.dataset_path, self.playback_speed, self.imu)
    }
}

pub fn load_runtime_conf(file_path: &Path) -> Result<RuntimeConf> {
    let file = File::open(file_path).wrap_err_with(|| format!("could not open runtime conf {}", file_path.display()))?;
    let conf: RuntimeConf = serde_yaml::from_reader(BufReader::new(file)).wrap_err("runtime conf is malformed")?;
    conf.imu.validate()?;
    Ok(conf)
}
