pub mod bias;
pub mod imu_delta;
pub mod imu_manager;
pub mod nav_state;
pub mod parameters;
pub mod preintegration;

pub use bias::ImuBias;
pub use imu_delta::ImuDelta;
pub use imu_manager::{ImuManager,ImuProducer,PimResult};
pub use nav_state::NavState;
pub use parameters::ImuManagerParameters;
pub use preintegration::{ImuNoiseModel,PreintegratedImuMeasurements,ImuCovariance};
