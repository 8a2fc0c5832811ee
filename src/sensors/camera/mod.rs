pub mod camera_data_frame;

pub use camera_data_frame::{StereoDataFrame,ApsDataFrame,StereoImage};
