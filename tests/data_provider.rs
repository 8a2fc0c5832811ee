extern crate nalgebra as na;

use std::sync::Arc;
use std::time::Instant;

use na::Vector3;
use parking_lot::Mutex;

use vio_sync::{Float,Timestamp};
use vio_sync::sensors::{Modality,SensorRecord};
use vio_sync::sensors::data_provider::DataProvider;
use vio_sync::sensors::imu::ImuMeasurement;
use vio_sync::sensors::camera::{ApsDataFrame,StereoDataFrame};

fn imu(timestamp: Timestamp) -> ImuMeasurement {
    ImuMeasurement::new(timestamp, Vector3::<Float>::new(0.0,0.0,9.81), Vector3::<Float>::zeros())
}

fn stereo(timestamp: Timestamp) -> StereoDataFrame {
    StereoDataFrame::new(timestamp, &format!("left/{}.png",timestamp), &format!("right/{}.png",timestamp))
}

fn aps(timestamp: Timestamp) -> ApsDataFrame {
    ApsDataFrame::new(timestamp, &format!("aps/{}.png",timestamp))
}

fn recording_provider(imu_ts: &[Timestamp], aps_ts: &[Timestamp], stereo_ts: &[Timestamp]) -> (DataProvider, Arc<Mutex<Vec<(Modality,Timestamp)>>>) {
    let mut provider = DataProvider::from_data(
        imu_ts.iter().map(|&t| imu(t)).collect(),
        aps_ts.iter().map(|&t| aps(t)).collect(),
        stereo_ts.iter().map(|&t| stereo(t)).collect());
    let log = Arc::new(Mutex::new(Vec::<(Modality,Timestamp)>::new()));

    for &modality in Modality::ALL.iter() {
        let log_handle = log.clone();
        provider.register(modality, Box::new(move |record: &SensorRecord| {
            log_handle.lock().push((record.modality(), record.timestamp()));
        }));
    }

    (provider, log)
}

#[test]
fn merges_streams_in_time_order() {
    let (mut provider, log) = recording_provider(&[0,10,20,30], &[5,20], &[10,25]);

    while provider.step(false) {}

    let expected = vec![
        (Modality::Imu,0), (Modality::Aps,5), (Modality::Imu,10), (Modality::Stereo,10),
        (Modality::Imu,20), (Modality::Aps,20), (Modality::Stereo,25), (Modality::Imu,30)
    ];
    assert_eq!(*log.lock(), expected);
    assert_eq!(provider.last_data_timestamp(), Some(30));
}

#[test]
fn ties_prefer_imu_then_aps_then_stereo() {
    let (mut provider, log) = recording_provider(&[100], &[100], &[100]);

    assert_eq!(provider.next_modality(), Some(Modality::Imu));
    while provider.step(false) {}

    assert_eq!(*log.lock(), vec![(Modality::Imu,100), (Modality::Aps,100), (Modality::Stereo,100)]);
}

#[test]
fn exhausted_provider_delivers_nothing() {
    let (mut provider, log) = recording_provider(&[1,2], &[], &[3]);

    assert_eq!(provider.remaining(), 3);
    assert!(provider.step(false));
    assert!(provider.step(false));
    assert!(provider.step(false));
    assert!(provider.is_exhausted());

    for _ in 0..3 {
        assert!(!provider.step(false));
    }
    assert_eq!(log.lock().len(), 3);
    assert_eq!(provider.remaining(), 0);
}

#[test]
fn empty_provider() {
    let mut provider = DataProvider::new();
    assert!(provider.is_exhausted());
    assert!(!provider.step(true));
    assert_eq!(provider.last_data_timestamp(), None);
    assert!(provider.playback(1.0, false).is_ok());
}

#[test]
fn callbacks_run_in_registration_order() {
    let mut provider = DataProvider::from_data(vec![imu(1)], vec![], vec![]);
    let calls = Arc::new(Mutex::new(Vec::<&'static str>::new()));

    let first = calls.clone();
    provider.register_imu_callback(move |_| first.lock().push("first"));
    let second = calls.clone();
    provider.register_imu_callback(move |_| second.lock().push("second"));

    assert_eq!(provider.callback_count(Modality::Imu), 2);
    assert!(provider.step(false));
    assert_eq!(*calls.lock(), vec!["first","second"]);
}

#[test]
fn unobserved_streams_are_still_consumed() {
    let mut provider = DataProvider::from_data(vec![imu(1), imu(4)], vec![aps(2)], vec![stereo(3)]);
    let frames = Arc::new(Mutex::new(Vec::<StereoDataFrame>::new()));
    let frames_handle = frames.clone();
    provider.register_stereo_callback(move |frame| frames_handle.lock().push(frame.clone()));

    let mut steps = 0;
    while provider.step(false) {
        steps += 1;
    }

    assert_eq!(steps, 4);
    assert_eq!(*frames.lock(), vec![stereo(3)]);
}

#[test]
fn reset_cursors_replays() {
    let (mut provider, log) = recording_provider(&[1,2], &[], &[2]);

    while provider.step(false) {}
    provider.reset_cursors();
    assert_eq!(provider.last_data_timestamp(), None);
    while provider.step(false) {}

    assert_eq!(log.lock().len(), 6);
}

#[test]
fn unsorted_stream_is_rejected() {
    let (mut provider, log) = recording_provider(&[0,20,10], &[], &[]);

    assert!(provider.validate().is_err());
    assert!(provider.playback(-1.0, false).is_err());
    assert!(log.lock().is_empty());
}

#[test]
fn zero_speed_is_rejected() {
    let (mut provider, log) = recording_provider(&[0,1], &[], &[]);

    assert!(provider.playback(0.0, false).is_err());
    assert!(provider.playback(Float::NAN, false).is_err());
    assert!(log.lock().is_empty());
}

#[test]
fn negative_speed_is_unthrottled() {
    let ten_seconds = 10_000_000_000;
    let (mut provider, log) = recording_provider(&[0,ten_seconds], &[], &[ten_seconds]);

    let start = Instant::now();
    provider.playback(-1.0, false).unwrap();

    assert!(start.elapsed().as_secs_f64() < 1.0);
    assert_eq!(log.lock().len(), 3);
    assert!(provider.is_exhausted());
}

#[test]
fn positive_speed_paces_against_wall_clock() {
    let hundred_ms = 100_000_000;
    let (mut provider, log) = recording_provider(&[0,hundred_ms,2*hundred_ms], &[], &[]);

    let start = Instant::now();
    provider.playback(2.0, true).unwrap();
    let elapsed = start.elapsed().as_secs_f64();

    assert!(elapsed >= 0.095, "playback took {}s", elapsed);
    assert!(elapsed < 2.0, "playback took {}s", elapsed);
    assert_eq!(log.lock().len(), 3);
}

#[test]
fn unrepresentable_schedule_is_rejected() {
    let one_second = 1_000_000_000;
    let (mut provider, log) = recording_provider(&[0,one_second], &[], &[]);

    assert!(provider.playback(1e-300, false).is_err());
    assert!(log.lock().is_empty());

    assert!(provider.playback(Float::INFINITY, false).is_ok());
    assert_eq!(log.lock().len(), 2);
}
