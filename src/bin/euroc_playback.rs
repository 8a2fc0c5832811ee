extern crate vio_sync;

use std::env;
use std::path::Path;

use color_eyre::eyre::Result;
use log::info;

use vio_sync::{load_runtime_conf,RuntimeConf};
use vio_sync::io::dataset_loader;
use vio_sync::odometry::imu_odometry::{ImuBias,ImuManager,NavState};
use vio_sync::sync::preintegrate_between_frames;

fn main() -> Result<()> {
    color_eyre::install()?;

    let conf = match env::args().nth(1) {
        Some(path) => load_runtime_conf(Path::new(&path))?,
        None => RuntimeConf::default()
    };

    let default_level = match conf.verbose {
        true => "debug",
        false => "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
    info!("runtime conf: {}", conf);

    let data_provider = dataset_loader::load(&conf.dataset_path, &conf.loading)?;
    let mut imu_manager = ImuManager::new(conf.imu.clone())?;
    let bias = ImuBias::zero();
    let mut state = NavState::identity();

    let summary = preintegrate_between_frames(data_provider, &mut imu_manager, conf.playback_speed, conf.verbose, |result| {
        if result.valid {
            state = result.pim.predict(&state, &bias);
            info!("window [{:.6}, {:.6}] dt {:.4} dv {:?} position {:?}",
                result.from_time, result.to_time, result.pim.delta_t(), result.pim.delta_velocity().as_slice(), state.position.as_slice());
        }
    })?;

    info!("done: {} frames, {} windows integrated, {} failed, {} imu measurements dropped",
        summary.frames, summary.valid_windows, summary.failed_windows, summary.dropped_measurements);
    Ok(())
}
