use std::path::Path;

use color_eyre::eyre::{Result,WrapErr,ensure};
use log::{info,warn};

use crate::{Float,Timestamp};
use crate::io::{loading_parameters::LoadingParameters, load_csv_records, parse_to_float, parse_to_timestamp};
use crate::sensors::{data_provider::DataProvider, imu::ImuMeasurement, camera::{StereoDataFrame,ApsDataFrame}};

/**
 * Loads a recording into a DataProvider.
 *
 * <root>/<imu_folder>/data.csv:   timestamp_ns, w_x, w_y, w_z, a_x, a_y, a_z
 * <root>/<camera>/data.csv:       timestamp_ns, filename
 *
 * Left and right frames are paired by timestamp, frames without a partner are skipped.
 * When only a range of stereo frames is selected, IMU and APS data outside of it is dropped.
 */
pub fn load(root_path: &str, parameters: &LoadingParameters) -> Result<DataProvider> {
    let imu_path = format!("{}/{}/data.csv",root_path,parameters.imu_folder);
    let left_folder = format!("{}/{}",root_path,parameters.left_folder);
    let right_folder = format!("{}/{}",root_path,parameters.right_folder);

    let imu_data = load_imu(Path::new(&imu_path))?;
    let left_frames = load_frame_index(&left_folder)?;
    let right_frames = load_frame_index(&right_folder)?;
    let stereo_all = pair_stereo_frames(&left_frames, &right_frames);

    let end_index = match parameters.count {
        Some(count) => (parameters.starting_index+count).min(stereo_all.len()),
        None => stereo_all.len()
    };
    ensure!(parameters.starting_index <= end_index, "starting_index {} is past the {} available stereo frames", parameters.starting_index, stereo_all.len());
    let stereo_data = stereo_all[parameters.starting_index..end_index].to_vec();

    let aps_data = match &parameters.aps_folder {
        Some(folder) => load_frame_index(&format!("{}/{}",root_path,folder))?
            .into_iter()
            .map(|(ts,path)| ApsDataFrame::new(ts,&path))
            .collect::<Vec<ApsDataFrame>>(),
        None => Vec::new()
    };

    let selected_range = match (stereo_data.first(), stereo_data.last()) {
        (Some(first),Some(last)) if parameters.starting_index > 0 || end_index < stereo_all.len() => Some((first.timestamp,last.timestamp)),
        _ => None
    };
    let (imu_data, aps_data) = match selected_range {
        Some((start,end)) => (
            imu_data.into_iter().filter(|x| x.timestamp >= start && x.timestamp <= end).collect::<Vec<ImuMeasurement>>(),
            aps_data.into_iter().filter(|x| x.timestamp >= start && x.timestamp <= end).collect::<Vec<ApsDataFrame>>()
        ),
        None => (imu_data, aps_data)
    };

    info!("loaded {} imu measurements, {} stereo pairs, {} aps frames from {}", imu_data.len(), stereo_data.len(), aps_data.len(), root_path);
    Ok(DataProvider::from_data(imu_data, aps_data, stereo_data))
}

pub fn load_imu(file_path: &Path) -> Result<Vec<ImuMeasurement>> {
    let records = load_csv_records(file_path, 7)?;
    records.iter().map(|(line,values)| {
        let timestamp = parse_to_timestamp(&values[0]).wrap_err_with(|| format!("{}:{}", file_path.display(), line))?;
        let mut numbers = [0.0 as Float; 6];
        for (number,value) in numbers.iter_mut().zip(values[1..].iter()) {
            *number = parse_to_float(value).wrap_err_with(|| format!("{}:{}", file_path.display(), line))?;
        }
        let gyro = [numbers[0],numbers[1],numbers[2]];
        let accelerometer = [numbers[3],numbers[4],numbers[5]];
        Ok(ImuMeasurement::from_arrays(timestamp, &accelerometer, &gyro))
    }).collect()
}

/**
 * Returns (timestamp, full image path) for every entry of <folder>/data.csv.
 */
pub fn load_frame_index(folder: &str) -> Result<Vec<(Timestamp,String)>> {
    let index_path = format!("{}/data.csv",folder);
    let records = load_csv_records(Path::new(&index_path), 2)?;
    records.iter().map(|(line,values)| {
        let timestamp = parse_to_timestamp(&values[0]).wrap_err_with(|| format!("{}:{}", index_path, line))?;
        Ok((timestamp, format!("{}/data/{}",folder,values[1])))
    }).collect()
}

pub fn pair_stereo_frames(left_frames: &Vec<(Timestamp,String)>, right_frames: &Vec<(Timestamp,String)>) -> Vec<StereoDataFrame> {
    let mut stereo_data = Vec::<StereoDataFrame>::with_capacity(left_frames.len().min(right_frames.len()));
    let mut left_idx = 0;
    let mut right_idx = 0;

    while left_idx < left_frames.len() && right_idx < right_frames.len() {
        let (left_ts,left_path) = &left_frames[left_idx];
        let (right_ts,right_path) = &right_frames[right_idx];

        match left_ts.cmp(right_ts) {
            std::cmp::Ordering::Equal => {
                stereo_data.push(StereoDataFrame::new(*left_ts,left_path,right_path));
                left_idx += 1;
                right_idx += 1;
            },
            std::cmp::Ordering::Less => {
                warn!("left frame at {} has no right partner, skipping", left_ts);
                left_idx += 1;
            },
            std::cmp::Ordering::Greater => {
                warn!("right frame at {} has no left partner, skipping", right_ts);
                right_idx += 1;
            }
        }
    }

    for (ts,_) in left_frames[left_idx..].iter() {
        warn!("left frame at {} has no right partner, skipping", ts);
    }
    for (ts,_) in right_frames[right_idx..].iter() {
        warn!("right frame at {} has no left partner, skipping", ts);
    }

    stereo_data
}
