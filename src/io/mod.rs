extern crate image as image_rs;

use std::path::Path;
use std::fs::File;
use std::io::{BufReader,BufRead};

use color_eyre::eyre::{Result,WrapErr,eyre};
use image_rs::GrayImage;

use crate::{Float,Timestamp};
use crate::sensors::camera::{StereoDataFrame,StereoImage};

pub mod dataset_loader;
pub mod loading_parameters;


pub fn parse_to_float(string: &str) -> Result<Float> {
    string.trim().parse::<Float>().wrap_err_with(|| format!("string malformed for parsing to float: {}", string))
}

pub fn parse_to_timestamp(string: &str) -> Result<Timestamp> {
    string.trim().parse::<Timestamp>().wrap_err_with(|| format!("string malformed for parsing to timestamp: {}", string))
}

/**
 * Reads a comma separated file. Empty lines and lines starting with '#' are skipped.
 * Every record carries its 1-based line number for error reporting.
 */
pub fn load_csv_records(file_path: &Path, expected_columns: usize) -> Result<Vec<(usize,Vec<String>)>> {
    let file = File::open(file_path).wrap_err_with(|| format!("could not open {}", file_path.display()))?;
    let reader = BufReader::new(file);
    let mut records = Vec::<(usize,Vec<String>)>::new();

    for (idx,line) in reader.lines().enumerate() {
        let contents = line.wrap_err_with(|| format!("could not read {}", file_path.display()))?;
        let trimmed = contents.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let values = trimmed.split(',').map(|x| String::from(x.trim())).collect::<Vec<String>>();
        if values.len() != expected_columns {
            return Err(eyre!("{}:{} expected {} columns, found {}", file_path.display(), idx+1, expected_columns, values.len()));
        }
        records.push((idx+1,values));
    }

    Ok(records)
}

pub fn load_image_as_gray(file_path: &Path) -> Result<GrayImage> {
    let image = image_rs::open(file_path).wrap_err_with(|| format!("load_image failed for {}", file_path.display()))?;
    Ok(image.to_luma8())
}

pub fn load_stereo_image(stereo_data: &StereoDataFrame) -> Result<StereoImage> {
    let left = load_image_as_gray(Path::new(&stereo_data.path_left))?;
    let right = load_image_as_gray(Path::new(&stereo_data.path_right))?;
    if left.dimensions() != right.dimensions() {
        return Err(eyre!("stereo pair at {} has mismatching sizes {:?} and {:?}", stereo_data.timestamp, left.dimensions(), right.dimensions()));
    }

    Ok(StereoImage {
        timestamp: stereo_data.timestamp,
        left,
        right
    })
}
