pub mod imu_odometry;
