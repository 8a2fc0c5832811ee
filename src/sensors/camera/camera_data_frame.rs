extern crate image as image_rs;

use image_rs::GrayImage;
use crate::{Float,Timestamp,to_seconds};

/**
 * A recorded stereo pair. The paths are resolved by whoever loads the images.
 */
#[derive(Debug,Clone,PartialEq)]
pub struct StereoDataFrame {
    pub timestamp: Timestamp,
    pub path_left: String,
    pub path_right: String
}

impl StereoDataFrame {
    pub fn new(timestamp: Timestamp, path_left: &str, path_right: &str) -> StereoDataFrame {
        StereoDataFrame {
            timestamp,
            path_left: String::from(path_left),
            path_right: String::from(path_right)
        }
    }

    pub fn seconds(&self) -> Float {
        to_seconds(self.timestamp)
    }
}

/**
 * A recorded frame of the auxiliary mono (APS) camera.
 */
#[derive(Debug,Clone,PartialEq)]
pub struct ApsDataFrame {
    pub timestamp: Timestamp,
    pub path: String
}

impl ApsDataFrame {
    pub fn new(timestamp: Timestamp, path: &str) -> ApsDataFrame {
        ApsDataFrame {timestamp, path: String::from(path)}
    }
}

// Decoded pair, as delivered by a live camera driver.
#[derive(Clone)]
pub struct StereoImage {
    pub timestamp: Timestamp,
    pub left: GrayImage,
    pub right: GrayImage
}

impl StereoImage {
    pub fn seconds(&self) -> Float {
        to_seconds(self.timestamp)
    }
}
