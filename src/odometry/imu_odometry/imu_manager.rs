use std::sync::Arc;

use color_eyre::eyre::Result;
use log::{debug,info,warn};

use crate::{Float,MIN_SECONDS,MAX_SECONDS,from_seconds};
use crate::sensors::imu::ImuMeasurement;
use crate::sync::ThreadsafeQueue;
use crate::odometry::imu_odometry::{bias::ImuBias, parameters::ImuManagerParameters, preintegration::{ImuNoiseModel,PreintegratedImuMeasurements}};

/**
 * Outcome of one preintegration request. When `valid` is false the window bounds are the
 * MIN_SECONDS/MAX_SECONDS sentinels and `pim` is empty; it must not be fused.
 */
#[derive(Debug,Clone)]
pub struct PimResult {
    pub valid: bool,
    pub from_time: Float,
    pub to_time: Float,
    pub pim: PreintegratedImuMeasurements
}

impl PimResult {
    fn failure(pim: PreintegratedImuMeasurements) -> PimResult {
        PimResult {valid: false, from_time: MIN_SECONDS, to_time: MAX_SECONDS, pim}
    }
}

/**
 * Cloneable handle for the thread that produces IMU measurements.
 */
#[derive(Clone)]
pub struct ImuProducer {
    queue: Arc<ThreadsafeQueue<ImuMeasurement>>
}

impl ImuProducer {
    pub fn push(&self, imu: ImuMeasurement) -> () {
        push_measurement(&self.queue, imu);
    }
}

fn push_measurement(queue: &ThreadsafeQueue<ImuMeasurement>, imu: ImuMeasurement) -> () {
    if let Some(evicted) = queue.push(imu) {
        warn!("imu queue full (capacity {}), dropped measurement at t={:.6}, {} dropped so far",
            queue.capacity(), evicted.seconds(), queue.dropped_count());
    }
}

/**
 * Buffers IMU measurements from a producer and preintegrates them over requested windows.
 *
 * Measurements leave the queue as they are consumed, so consecutive windows must be
 * contiguous: anything between the end of one window and the start of the next is dropped.
 */
pub struct ImuManager {
    params: ImuManagerParameters,
    queue: Arc<ThreadsafeQueue<ImuMeasurement>>,
    pim: PreintegratedImuMeasurements,
    last_window_end: Option<Float>
}

impl ImuManager {

    pub fn new(params: ImuManagerParameters) -> Result<ImuManager> {
        params.validate()?;
        let queue = ThreadsafeQueue::new(params.max_queue_size, true)?;
        let noise_model = ImuNoiseModel::from_parameters(&params);
        info!("imu manager: {}", params);

        Ok(ImuManager {
            pim: PreintegratedImuMeasurements::new(noise_model, ImuBias::zero()),
            params,
            queue: Arc::new(queue),
            last_window_end: None
        })
    }

    pub fn producer(&self) -> ImuProducer {
        ImuProducer {queue: self.queue.clone()}
    }

    pub fn push(&self, imu: ImuMeasurement) -> () {
        push_measurement(&self.queue, imu);
    }

    fn empty_pim(&self) -> PreintegratedImuMeasurements {
        PreintegratedImuMeasurements::new(self.pim.noise_model().clone(), *self.pim.bias())
    }

    fn fail_and_reset(&mut self, reason: &str) -> PimResult {
        debug!("preintegration failed: {}", reason);
        self.pim.reset_integration();
        PimResult::failure(self.empty_pim())
    }

    /**
     * Integrates every queued measurement between from_time and to_time (seconds).
     * Either bound may be MIN_SECONDS/MAX_SECONDS for an open window.
     *
     * The measurement closest before (or, failing that, after) each bound has to be within
     * `allowed_misalignment_sec` of it, compared at nanosecond resolution. The gap between
     * that measurement and the bound is covered by holding the measurement constant.
     * The accumulator is reset on return.
     */
    pub fn preintegrate(&mut self, from_time: Float, to_time: Float) -> PimResult {
        if self.queue.is_empty() {
            debug!("preintegration failed: no imu measurements queued");
            return PimResult::failure(self.empty_pim());
        }

        let from_unbounded = from_time <= MIN_SECONDS;
        let to_unbounded = to_time >= MAX_SECONDS;
        // Boundary offsets are compared in whole nanoseconds.
        let tolerance_ns = from_seconds(self.params.allowed_misalignment_sec);

        if let Some(previous_end) = self.last_window_end {
            if !from_unbounded && from_time < previous_end {
                warn!("window start {:.6} precedes previous window end {:.6}, measurements in between were already consumed", from_time, previous_end);
            }
        }
        if !to_unbounded {
            self.last_window_end = Some(to_time);
        }

        let mut imu = match self.queue.pop() {
            Some(imu) => imu,
            None => return self.fail_and_reset("imu queue drained concurrently")
        };
        while let Some(next) = self.queue.pop_if(|front| front.seconds() <= from_time) {
            imu = next;
        }

        let earliest_imu_sec = imu.seconds();
        let offset_from_ns = match from_unbounded {
            true => 0,
            false => imu.timestamp.abs_diff(from_seconds(from_time))
        };
        if offset_from_ns > tolerance_ns {
            return self.fail_and_reset(&format!("nearest measurement {:.6} is {}ns from window start {:.6}", earliest_imu_sec, offset_from_ns, from_time));
        }

        // Constant measurement from the window start up to the first measurement.
        let mut last_integrated_sec = match from_unbounded {
            false if earliest_imu_sec > from_time => {
                let span = earliest_imu_sec.min(to_time) - from_time;
                self.pim.integrate_measurement(&imu.a, &imu.w, span);
                earliest_imu_sec
            },
            false => from_time,
            true => earliest_imu_sec
        };

        while let Some(next) = self.queue.pop_if(|front| front.seconds() < to_time) {
            let next_sec = next.seconds();
            let dt = next_sec - last_integrated_sec;
            if dt > 0.0 {
                self.pim.integrate_measurement(&next.a, &next.w, dt);
                last_integrated_sec = next_sec;
            }
            imu = next;
        }

        let latest_imu_sec = imu.seconds();
        let offset_to_ns = match to_unbounded {
            true => 0,
            false => imu.timestamp.abs_diff(from_seconds(to_time))
        };
        if offset_to_ns > tolerance_ns {
            return self.fail_and_reset(&format!("nearest measurement {:.6} is {}ns from window end {:.6}", latest_imu_sec, offset_to_ns, to_time));
        }

        // Constant measurement from the last measurement up to the window end.
        if !to_unbounded && to_time > last_integrated_sec {
            self.pim.integrate_measurement(&imu.a, &imu.w, to_time - last_integrated_sec);
        }

        let out = PimResult {
            valid: true,
            from_time: earliest_imu_sec,
            to_time: latest_imu_sec,
            pim: self.pim.clone()
        };
        self.pim.reset_integration();
        if to_unbounded {
            self.last_window_end = Some(latest_imu_sec);
        }

        out
    }

    pub fn reset_and_update_bias(&mut self, bias: &ImuBias) -> () {
        self.pim.reset_integration_and_set_bias(bias);
    }

    /**
     * Drops queued measurements older than time (seconds) without integrating them.
     */
    pub fn discard_before(&self, time: Float) -> () {
        let mut discarded = 0usize;
        while self.queue.pop_if(|front| front.seconds() < time).is_some() {
            discarded += 1;
        }
        if discarded > 0 {
            debug!("discarded {} imu measurements before {:.6}", discarded, time);
        }
    }

    /**
     * End of the last bounded window that consumed measurements, failed or not.
     */
    pub fn last_window_end(&self) -> Option<Float> {
        self.last_window_end
    }

    pub fn bias(&self) -> &ImuBias {
        self.pim.bias()
    }

    pub fn parameters(&self) -> &ImuManagerParameters {
        &self.params
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn dropped_count(&self) -> usize {
        self.queue.dropped_count()
    }
}
