extern crate nalgebra as na;

use na::{Vector3,Matrix3,Matrix6,SMatrix};
use log::debug;

use crate::Float;
use crate::numerics::lie::{exp_r,right_jacobian,skew_symmetric};
use crate::odometry::imu_odometry::{bias::ImuBias, imu_delta::ImuDelta, nav_state::NavState, parameters::ImuManagerParameters};

/** Error state ordering: rotation, velocity, position, accelerometer bias, gyroscope bias. */
pub type ImuCovariance = SMatrix<Float,15,15>;
/** Sensitivity of [rotation; velocity; position] to [accelerometer bias; gyroscope bias]. */
pub type BiasJacobian = SMatrix<Float,9,6>;

type StateTransition = SMatrix<Float,15,15>;
type NoiseInput = SMatrix<Float,15,12>;
type NoiseCovariance = SMatrix<Float,12,12>;

#[derive(Debug,Clone)]
pub struct ImuNoiseModel {
    pub measured_acc_cov: Matrix3<Float>,
    pub measured_omega_cov: Matrix3<Float>,
    pub integration_error_cov: Matrix3<Float>,
    pub bias_acc_cov: Matrix3<Float>,
    pub bias_omega_cov: Matrix3<Float>,
    pub bias_acc_omega_int: Matrix6<Float>,
    pub n_gravity: Vector3<Float>
}

impl ImuNoiseModel {
    pub fn from_parameters(params: &ImuManagerParameters) -> ImuNoiseModel {
        let identity = Matrix3::<Float>::identity();
        ImuNoiseModel {
            measured_acc_cov: identity*params.accel_noise_sigma.powi(2),
            measured_omega_cov: identity*params.gyro_noise_sigma.powi(2),
            integration_error_cov: identity*params.integration_error_cov,
            bias_acc_cov: identity*params.accel_bias_rw_sigma.powi(2),
            bias_omega_cov: identity*params.gyro_bias_rw_sigma.powi(2),
            bias_acc_omega_int: Matrix6::<Float>::identity()*params.bias_acc_omega_int,
            n_gravity: params.n_gravity
        }
    }
}

/**
 * Running preintegration of IMU measurements since the last reset.
 *
 * Measurements are treated as constant over each integration step. Besides the deltas this
 * keeps the covariance of the deltas and the biases (bias random walk included) and the
 * first order bias Jacobians, so that a revised bias can be applied without re-integrating.
 */
#[derive(Debug,Clone)]
pub struct PreintegratedImuMeasurements {
    noise_model: ImuNoiseModel,
    bias: ImuBias,
    delta_rotation: Matrix3<Float>,
    delta_velocity: Vector3<Float>,
    delta_position: Vector3<Float>,
    delta_t: Float,
    covariance: ImuCovariance,
    bias_jacobian: BiasJacobian
}

impl PreintegratedImuMeasurements {

    pub fn new(noise_model: ImuNoiseModel, bias: ImuBias) -> PreintegratedImuMeasurements {
        let covariance = PreintegratedImuMeasurements::initial_covariance(&noise_model);
        PreintegratedImuMeasurements {
            noise_model,
            bias,
            delta_rotation: Matrix3::<Float>::identity(),
            delta_velocity: Vector3::<Float>::zeros(),
            delta_position: Vector3::<Float>::zeros(),
            delta_t: 0.0,
            covariance,
            bias_jacobian: BiasJacobian::zeros()
        }
    }

    fn initial_covariance(noise_model: &ImuNoiseModel) -> ImuCovariance {
        let mut covariance = ImuCovariance::zeros();
        covariance.fixed_view_mut::<6,6>(9,9).copy_from(&noise_model.bias_acc_omega_int);
        covariance
    }

    pub fn reset_integration(&mut self) -> () {
        self.delta_rotation = Matrix3::<Float>::identity();
        self.delta_velocity = Vector3::<Float>::zeros();
        self.delta_position = Vector3::<Float>::zeros();
        self.delta_t = 0.0;
        self.covariance = PreintegratedImuMeasurements::initial_covariance(&self.noise_model);
        self.bias_jacobian = BiasJacobian::zeros();
    }

    pub fn reset_integration_and_set_bias(&mut self, bias: &ImuBias) -> () {
        self.bias = *bias;
        self.reset_integration();
    }

    /**
     * Folds one measurement held constant over dt seconds into the deltas.
     * Non-positive or non-finite dt is ignored.
     */
    #[allow(non_snake_case)]
    pub fn integrate_measurement(&mut self, measured_acc: &Vector3<Float>, measured_omega: &Vector3<Float>, dt: Float) -> () {
        if !(dt > 0.0) || !dt.is_finite() {
            debug!("skipping integration step with dt {}", dt);
            return;
        }

        let acc = self.bias.correct_accelerometer(measured_acc);
        let omega = self.bias.correct_gyroscope(measured_omega);
        let theta = omega*dt;
        let dt_sqr = dt.powi(2);

        let R = self.delta_rotation;
        let dR = exp_r(&theta);
        let J_r = right_jacobian(&theta);
        let acc_x = skew_symmetric(&acc);
        let I = Matrix3::<Float>::identity();

        let mut A = StateTransition::identity();
        A.fixed_view_mut::<3,3>(0,0).copy_from(&dR.transpose());
        A.fixed_view_mut::<3,3>(0,12).copy_from(&(-J_r*dt));
        A.fixed_view_mut::<3,3>(3,0).copy_from(&(-R*acc_x*dt));
        A.fixed_view_mut::<3,3>(3,9).copy_from(&(-R*dt));
        A.fixed_view_mut::<3,3>(6,0).copy_from(&(-0.5*R*acc_x*dt_sqr));
        A.fixed_view_mut::<3,3>(6,3).copy_from(&(I*dt));
        A.fixed_view_mut::<3,3>(6,9).copy_from(&(-0.5*R*dt_sqr));

        let mut G = NoiseInput::zeros();
        G.fixed_view_mut::<3,3>(0,3).copy_from(&(J_r*dt));
        G.fixed_view_mut::<3,3>(3,0).copy_from(&(R*dt));
        G.fixed_view_mut::<3,3>(6,0).copy_from(&(0.5*R*dt_sqr));
        G.fixed_view_mut::<3,3>(9,6).copy_from(&I);
        G.fixed_view_mut::<3,3>(12,9).copy_from(&I);

        let mut Q = NoiseCovariance::zeros();
        Q.fixed_view_mut::<3,3>(0,0).copy_from(&(self.noise_model.measured_acc_cov/dt));
        Q.fixed_view_mut::<3,3>(3,3).copy_from(&(self.noise_model.measured_omega_cov/dt));
        Q.fixed_view_mut::<3,3>(6,6).copy_from(&(self.noise_model.bias_acc_cov*dt));
        Q.fixed_view_mut::<3,3>(9,9).copy_from(&(self.noise_model.bias_omega_cov*dt));

        self.covariance = A*self.covariance*A.transpose() + G*Q*G.transpose();
        let integration_noise = self.noise_model.integration_error_cov*dt;
        let mut position_block = self.covariance.fixed_view_mut::<3,3>(6,6);
        position_block += integration_noise;

        let A_delta = A.fixed_view::<9,9>(0,0).into_owned();
        let A_bias = A.fixed_view::<9,6>(0,9).into_owned();
        self.bias_jacobian = A_delta*self.bias_jacobian + A_bias;

        self.delta_position += self.delta_velocity*dt + 0.5*R*acc*dt_sqr;
        self.delta_velocity += R*acc*dt;
        self.delta_rotation = R*dR;
        self.delta_t += dt;
    }

    pub fn delta_rotation(&self) -> &Matrix3<Float> {
        &self.delta_rotation
    }

    pub fn delta_velocity(&self) -> &Vector3<Float> {
        &self.delta_velocity
    }

    pub fn delta_position(&self) -> &Vector3<Float> {
        &self.delta_position
    }

    pub fn delta_t(&self) -> Float {
        self.delta_t
    }

    pub fn covariance(&self) -> &ImuCovariance {
        &self.covariance
    }

    pub fn preintegrated_covariance(&self) -> SMatrix<Float,9,9> {
        self.covariance.fixed_view::<9,9>(0,0).into_owned()
    }

    pub fn bias_jacobian(&self) -> &BiasJacobian {
        &self.bias_jacobian
    }

    pub fn bias(&self) -> &ImuBias {
        &self.bias
    }

    pub fn noise_model(&self) -> &ImuNoiseModel {
        &self.noise_model
    }

    pub fn is_empty(&self) -> bool {
        self.delta_t == 0.0
    }

    pub fn delta(&self) -> ImuDelta {
        ImuDelta {
            delta_position: self.delta_position,
            delta_velocity: self.delta_velocity,
            delta_rotation: self.delta_rotation,
            delta_t: self.delta_t
        }
    }

    /**
     * First order correction of the deltas for a bias other than the linearization bias.
     */
    #[allow(non_snake_case)]
    pub fn bias_corrected_delta(&self, bias: &ImuBias) -> ImuDelta {
        let bias_delta = bias.difference(&self.bias);
        let J = &self.bias_jacobian;

        let J_R_bg = J.fixed_view::<3,3>(0,3);
        let J_v_ba = J.fixed_view::<3,3>(3,0);
        let J_v_bg = J.fixed_view::<3,3>(3,3);
        let J_p_ba = J.fixed_view::<3,3>(6,0);
        let J_p_bg = J.fixed_view::<3,3>(6,3);

        ImuDelta {
            delta_rotation: self.delta_rotation*exp_r(&(J_R_bg*bias_delta.bias_g)),
            delta_velocity: self.delta_velocity + J_v_ba*bias_delta.bias_a + J_v_bg*bias_delta.bias_g,
            delta_position: self.delta_position + J_p_ba*bias_delta.bias_a + J_p_bg*bias_delta.bias_g,
            delta_t: self.delta_t
        }
    }

    /**
     * Propagates a world frame state across the window, adding gravity back in.
     */
    pub fn predict(&self, state: &NavState, bias: &ImuBias) -> NavState {
        let delta = self.bias_corrected_delta(bias);
        let dt = delta.delta_t;
        let gravity = self.noise_model.n_gravity;
        let rotation = state.orientation;

        NavState {
            orientation: rotation*delta.delta_rotation,
            position: state.position + state.velocity*dt + 0.5*gravity*dt.powi(2) + rotation*delta.delta_position,
            velocity: state.velocity + gravity*dt + rotation*delta.delta_velocity
        }
    }
}
