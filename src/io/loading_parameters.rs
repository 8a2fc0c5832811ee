use serde::Deserialize;

/**
 * Layout of a recording: every sensor folder holds a data.csv index.
 * Image files live next to it in <folder>/data/.
 */
#[derive(Debug,Clone,Deserialize)]
#[serde(default)]
pub struct LoadingParameters {
    pub imu_folder: String,
    pub left_folder: String,
    pub right_folder: String,
    pub aps_folder: Option<String>,
    pub starting_index: usize,
    pub count: Option<usize>
}

impl Default for LoadingParameters {
    fn default() -> LoadingParameters {
        LoadingParameters {
            imu_folder: String::from("imu0"),
            left_folder: String::from("cam0"),
            right_folder: String::from("cam1"),
            aps_folder: None,
            starting_index: 0,
            count: None
        }
    }
}
