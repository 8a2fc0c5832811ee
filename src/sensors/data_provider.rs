use std::thread;
use std::time::{Duration,Instant};

use color_eyre::eyre::{Result,eyre,ensure};
use log::{debug,info};

use crate::{Float,Timestamp,to_seconds};
use crate::sensors::{Modality,SensorRecord,SensorCallback};
use crate::sensors::{camera::{StereoDataFrame,ApsDataFrame}, imu::ImuMeasurement};

/**
 * Replays recorded sensor streams in chronological order.
 *
 * Every call to `step` hands exactly one record to the callbacks registered for its
 * modality. Ties between modalities are broken IMU first, then APS, then STEREO.
 * The streams are expected to be sorted already, `validate` only checks this.
 */
pub struct DataProvider {
    pub imu_data: Vec<ImuMeasurement>,
    pub aps_data: Vec<ApsDataFrame>,
    pub stereo_data: Vec<StereoDataFrame>,
    callbacks: [Vec<SensorCallback>; 3],
    next_indices: [usize; 3],
    last_data_timestamp: Option<Timestamp>
}

impl DataProvider {

    pub fn new() -> DataProvider {
        DataProvider::from_data(Vec::new(), Vec::new(), Vec::new())
    }

    pub fn from_data(imu_data: Vec<ImuMeasurement>, aps_data: Vec<ApsDataFrame>, stereo_data: Vec<StereoDataFrame>) -> DataProvider {
        DataProvider {
            imu_data,
            aps_data,
            stereo_data,
            callbacks: [Vec::new(), Vec::new(), Vec::new()],
            next_indices: [0; 3],
            last_data_timestamp: None
        }
    }

    pub fn register(&mut self, modality: Modality, callback: SensorCallback) -> () {
        self.callbacks[modality.index()].push(callback);
    }

    pub fn register_imu_callback<F>(&mut self, mut callback: F) -> () where F: FnMut(&ImuMeasurement) + Send + 'static {
        self.register(Modality::Imu, Box::new(move |record: &SensorRecord| {
            if let SensorRecord::Imu(imu) = record {
                callback(imu)
            }
        }));
    }

    pub fn register_aps_callback<F>(&mut self, mut callback: F) -> () where F: FnMut(&ApsDataFrame) + Send + 'static {
        self.register(Modality::Aps, Box::new(move |record: &SensorRecord| {
            if let SensorRecord::Aps(aps) = record {
                callback(aps)
            }
        }));
    }

    pub fn register_stereo_callback<F>(&mut self, mut callback: F) -> () where F: FnMut(&StereoDataFrame) + Send + 'static {
        self.register(Modality::Stereo, Box::new(move |record: &SensorRecord| {
            if let SensorRecord::Stereo(stereo) = record {
                callback(stereo)
            }
        }));
    }

    pub fn callback_count(&self, modality: Modality) -> usize {
        self.callbacks[modality.index()].len()
    }

    fn len_of(&self, modality: Modality) -> usize {
        match modality {
            Modality::Imu => self.imu_data.len(),
            Modality::Aps => self.aps_data.len(),
            Modality::Stereo => self.stereo_data.len()
        }
    }

    fn timestamp_at(&self, modality: Modality, idx: usize) -> Option<Timestamp> {
        match modality {
            Modality::Imu => self.imu_data.get(idx).map(|x| x.timestamp),
            Modality::Aps => self.aps_data.get(idx).map(|x| x.timestamp),
            Modality::Stereo => self.stereo_data.get(idx).map(|x| x.timestamp)
        }
    }

    fn record_at(&self, modality: Modality, idx: usize) -> Option<SensorRecord> {
        match modality {
            Modality::Imu => self.imu_data.get(idx).map(|x| SensorRecord::Imu(*x)),
            Modality::Aps => self.aps_data.get(idx).map(|x| SensorRecord::Aps(x.clone())),
            Modality::Stereo => self.stereo_data.get(idx).map(|x| SensorRecord::Stereo(x.clone()))
        }
    }

    pub fn head_timestamp(&self, modality: Modality) -> Option<Timestamp> {
        self.timestamp_at(modality, self.next_indices[modality.index()])
    }

    /**
     * The modality whose next record is due. Strict comparison keeps the earlier
     * entry of Modality::ALL on ties.
     */
    pub fn next_modality(&self) -> Option<Modality> {
        Modality::ALL.iter().fold(None, |best: Option<(Modality,Timestamp)>, &modality| {
            match (best, self.head_timestamp(modality)) {
                (None, Some(ts)) => Some((modality,ts)),
                (Some((_,best_ts)), Some(ts)) if ts < best_ts => Some((modality,ts)),
                (best, _) => best
            }
        }).map(|(modality,_)| modality)
    }

    pub fn next_timestamp(&self) -> Option<Timestamp> {
        self.next_modality().and_then(|m| self.head_timestamp(m))
    }

    pub fn last_data_timestamp(&self) -> Option<Timestamp> {
        self.last_data_timestamp
    }

    pub fn remaining(&self) -> usize {
        Modality::ALL.iter().map(|&m| self.len_of(m).saturating_sub(self.next_indices[m.index()])).sum()
    }

    pub fn is_exhausted(&self) -> bool {
        self.next_modality().is_none()
    }

    pub fn reset_cursors(&mut self) -> () {
        self.next_indices = [0; 3];
        self.last_data_timestamp = None;
    }

    /**
     * Delivers the chronologically next record. Returns false once every stream is exhausted,
     * in which case nothing is delivered.
     */
    pub fn step(&mut self, verbose: bool) -> bool {
        let modality = match self.next_modality() {
            Some(m) => m,
            None => return false
        };

        let idx = self.next_indices[modality.index()];
        let record = match self.record_at(modality, idx) {
            Some(r) => r,
            None => return false
        };

        if verbose {
            info!("{} [{}] t={:.6}", modality, idx, to_seconds(record.timestamp()));
        }

        for callback in self.callbacks[modality.index()].iter_mut() {
            callback(&record);
        }

        self.next_indices[modality.index()] += 1;
        self.last_data_timestamp = Some(record.timestamp());
        true
    }

    fn final_timestamp(&self) -> Option<Timestamp> {
        Modality::ALL.iter()
            .filter_map(|&m| self.len_of(m).checked_sub(1).and_then(|idx| self.timestamp_at(m, idx)))
            .max()
    }

    fn schedule_deadline(wall_start: Instant, first_timestamp: Timestamp, timestamp: Timestamp, speed: Float) -> Result<Instant> {
        let data_elapsed = to_seconds(timestamp.saturating_sub(first_timestamp))/speed;
        Duration::try_from_secs_f64(data_elapsed).ok()
            .and_then(|offset| wall_start.checked_add(offset))
            .ok_or_else(|| eyre!("playback speed {} stretches {:.3}s of data beyond the wall clock range", speed, to_seconds(timestamp.saturating_sub(first_timestamp))))
    }

    /**
     * Plays back everything that is left. A positive speed paces delivery against the wall clock
     * (2.0 is twice as fast as recorded), a negative speed delivers as fast as possible.
     * A speed of zero, or one so slow that the schedule cannot be represented, is rejected
     * before anything is delivered.
     */
    pub fn playback(&mut self, speed: Float, verbose: bool) -> Result<()> {
        ensure!(speed != 0.0 && !speed.is_nan(), "playback speed must be positive (paced) or negative (unthrottled), got {}", speed);
        self.validate()?;

        let first_timestamp = match self.next_timestamp() {
            Some(ts) => ts,
            None => {
                debug!("playback: nothing to deliver");
                return Ok(());
            }
        };
        let wall_start = Instant::now();
        if speed > 0.0 {
            if let Some(final_timestamp) = self.final_timestamp() {
                DataProvider::schedule_deadline(wall_start, first_timestamp, final_timestamp, speed)?;
            }
        }
        let mut delivered = 0usize;

        while let Some(next_timestamp) = self.next_timestamp() {
            if speed > 0.0 {
                let due = DataProvider::schedule_deadline(wall_start, first_timestamp, next_timestamp, speed)?;
                let now = Instant::now();
                if due > now {
                    thread::sleep(due - now);
                }
            }
            self.step(verbose);
            delivered += 1;
        }

        debug!("playback: delivered {} records in {:.3}s", delivered, wall_start.elapsed().as_secs_f64());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for &modality in Modality::ALL.iter() {
            let len = self.len_of(modality);
            for idx in 1..len {
                let previous = self.timestamp_at(modality, idx-1);
                let current = self.timestamp_at(modality, idx);
                if let (Some(p), Some(c)) = (previous, current) {
                    if c < p {
                        return Err(eyre!("{} data is not sorted: timestamp {} at index {} precedes {} at index {}", modality, c, idx, p, idx-1));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for DataProvider {
    fn default() -> DataProvider {
        DataProvider::new()
    }
}
