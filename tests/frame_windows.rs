extern crate nalgebra as na;

use na::Vector3;

use vio_sync::{Float,Timestamp};
use vio_sync::sensors::data_provider::DataProvider;
use vio_sync::sensors::imu::ImuMeasurement;
use vio_sync::sensors::camera::StereoDataFrame;
use vio_sync::odometry::imu_odometry::{ImuManager,ImuManagerParameters};
use vio_sync::sync::preintegrate_between_frames;

const IMU_PERIOD_NS: Timestamp = 5_000_000;
const FRAME_PERIOD_NS: Timestamp = 50_000_000;

fn recording(seconds: Timestamp) -> DataProvider {
    let imu_count = seconds*1_000_000_000/IMU_PERIOD_NS + 1;
    let frame_count = seconds*1_000_000_000/FRAME_PERIOD_NS + 1;

    let imu_data = (0..imu_count).map(|i| {
        ImuMeasurement::new(i*IMU_PERIOD_NS, Vector3::<Float>::new(0.0,0.0,9.8), Vector3::<Float>::zeros())
    }).collect::<Vec<ImuMeasurement>>();
    let stereo_data = (0..frame_count).map(|i| {
        StereoDataFrame::new(i*FRAME_PERIOD_NS, "left.png", "right.png")
    }).collect::<Vec<StereoDataFrame>>();

    DataProvider::from_data(imu_data, Vec::new(), stereo_data)
}

#[test]
fn unthrottled_playback_keeps_up_with_default_queue() {
    let mut manager = ImuManager::new(ImuManagerParameters::default()).unwrap();
    let mut velocity = Vector3::<Float>::zeros();
    let mut integrated_time = 0.0;

    let summary = preintegrate_between_frames(recording(10), &mut manager, -1.0, false, |result| {
        if result.valid {
            velocity += result.pim.delta_velocity();
            integrated_time += result.pim.delta_t();
        }
    }).unwrap();

    assert_eq!(summary.frames, 201);
    assert_eq!(summary.valid_windows, 200);
    assert_eq!(summary.failed_windows, 0);
    assert_eq!(summary.dropped_measurements, 0);
    assert!((integrated_time - 10.0).abs() < 1e-6);
    assert!((velocity[2] - 98.0).abs() < 1e-6);
}

#[test]
fn playback_errors_are_returned() {
    let mut manager = ImuManager::new(ImuManagerParameters::default()).unwrap();
    let mut windows = 0;

    let result = preintegrate_between_frames(recording(1), &mut manager, 0.0, false, |_| windows += 1);

    assert!(result.is_err());
    assert_eq!(windows, 0);
}
