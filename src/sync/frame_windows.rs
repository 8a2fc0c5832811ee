use std::sync::mpsc;
use std::thread;

use color_eyre::eyre::{Result,eyre};
use log::{debug,warn};

use crate::{Float,Timestamp,to_seconds};
use crate::sensors::data_provider::DataProvider;
use crate::odometry::imu_odometry::{ImuManager,PimResult};

#[derive(Debug,Copy,Clone,PartialEq,Eq,Default)]
pub struct FrameWindowSummary {
    pub frames: usize,
    pub valid_windows: usize,
    pub failed_windows: usize,
    pub dropped_measurements: usize
}

/**
 * Plays the provider back on its own thread and preintegrates the IMU measurements between
 * consecutive stereo frames on the calling thread. `on_window` sees every window result.
 *
 * Frames are handed over through a rendezvous channel, so playback cannot run further ahead
 * of the consumer than the measurements of one frame interval. Measurements before the first
 * frame are discarded.
 */
pub fn preintegrate_between_frames<F>(mut data_provider: DataProvider, imu_manager: &mut ImuManager, speed: Float, verbose: bool, mut on_window: F) -> Result<FrameWindowSummary>
    where F: FnMut(&PimResult) -> () {
    let imu_producer = imu_manager.producer();
    data_provider.register_imu_callback(move |imu| imu_producer.push(*imu));

    let (frame_sender, frame_receiver) = mpsc::sync_channel::<Timestamp>(0);
    data_provider.register_stereo_callback(move |frame| {
        if frame_sender.send(frame.timestamp).is_err() {
            debug!("frame consumer is gone, dropping frame at {}", frame.timestamp);
        }
    });

    let playback = thread::spawn(move || data_provider.playback(speed, verbose));

    let mut summary = FrameWindowSummary::default();
    let mut previous_frame = None;
    for frame_timestamp in frame_receiver.iter() {
        let frame_sec = to_seconds(frame_timestamp);
        summary.frames += 1;
        match previous_frame {
            None => imu_manager.discard_before(frame_sec),
            Some(previous_sec) => {
                let result = imu_manager.preintegrate(previous_sec, frame_sec);
                match result.valid {
                    true => summary.valid_windows += 1,
                    false => {
                        summary.failed_windows += 1;
                        warn!("no preintegration between frames at {:.6} and {:.6}", previous_sec, frame_sec);
                    }
                };
                on_window(&result);
            }
        };
        previous_frame = Some(frame_sec);
    }

    match playback.join() {
        Ok(result) => result?,
        Err(_) => return Err(eyre!("playback thread panicked"))
    };

    summary.dropped_measurements = imu_manager.dropped_count();
    Ok(summary)
}
