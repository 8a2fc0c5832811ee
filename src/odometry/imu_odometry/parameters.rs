extern crate nalgebra as na;

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use color_eyre::eyre::{Result,WrapErr,ensure};
use na::Vector3;
use serde::{Serialize,Deserialize};
use crate::Float;

/**
 * Construction time settings of the ImuManager. Immutable once the manager exists.
 * Sigmas are continuous-time densities, the two *_cov entries are used as given.
 */
#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct ImuManagerParameters {
    pub max_queue_size: usize,
    pub allowed_misalignment_sec: Float,
    pub accel_noise_sigma: Float,
    pub gyro_noise_sigma: Float,
    pub accel_bias_rw_sigma: Float,
    pub gyro_bias_rw_sigma: Float,
    pub integration_error_cov: Float,
    pub bias_acc_omega_int: Float,
    pub n_gravity: Vector3<Float>
}

impl Default for ImuManagerParameters {
    fn default() -> ImuManagerParameters {
        ImuManagerParameters {
            max_queue_size: 1000,
            allowed_misalignment_sec: 1e-2,
            accel_noise_sigma: 0.0003924,
            gyro_noise_sigma: 0.000205689024915,
            accel_bias_rw_sigma: 0.004905,
            gyro_bias_rw_sigma: 0.000001454441043,
            integration_error_cov: 1e-8,
            bias_acc_omega_int: 1e-5,
            n_gravity: Vector3::<Float>::new(0.0,0.0,-9.81)
        }
    }
}

impl ImuManagerParameters {

    pub fn load(file_path: &Path) -> Result<ImuManagerParameters> {
        let file = File::open(file_path).wrap_err_with(|| format!("could not open imu parameters {}", file_path.display()))?;
        let params: ImuManagerParameters = serde_yaml::from_reader(BufReader::new(file)).wrap_err("imu parameters are malformed")?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.max_queue_size > 0, "max_queue_size must be at least 1");
        ensure!(self.allowed_misalignment_sec.is_finite() && self.allowed_misalignment_sec >= 0.0, "allowed_misalignment_sec must be a non-negative number, got {}", self.allowed_misalignment_sec);

        let sigmas = [
            ("accel_noise_sigma", self.accel_noise_sigma),
            ("gyro_noise_sigma", self.gyro_noise_sigma),
            ("accel_bias_rw_sigma", self.accel_bias_rw_sigma),
            ("gyro_bias_rw_sigma", self.gyro_bias_rw_sigma),
            ("integration_error_cov", self.integration_error_cov),
            ("bias_acc_omega_int", self.bias_acc_omega_int)
        ];
        for (name, value) in sigmas.iter() {
            ensure!(value.is_finite() && *value >= 0.0, "{} must be a non-negative number, got {}", name, value);
        }
        ensure!(self.n_gravity.iter().all(|g| g.is_finite()), "n_gravity must be finite");
        Ok(())
    }
}

impl fmt::Display for ImuManagerParameters {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "queue_{}_misalign_{:+e}_acc_{:+e}_gyro_{:+e}_acc_rw_{:+e}_gyro_rw_{:+e}_g_{}_{}_{}",
            self.max_queue_size, self.allowed_misalignment_sec,
            self.accel_noise_sigma, self.gyro_noise_sigma,
            self.accel_bias_rw_sigma, self.gyro_bias_rw_sigma,
            self.n_gravity[0], self.n_gravity[1], self.n_gravity[2])
    }
}
