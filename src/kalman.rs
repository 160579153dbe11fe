//! Two-state (angle, gyro bias) Kalman filter for pitch and roll

use nalgebra::Matrix2;

use crate::clock::RateLimiter;
use crate::error::Result;
use crate::imu::AttitudeSensor;
use crate::types::{Angles, KalmanSettings, RateVector, TiltAngle};

/// State of one axis: angle estimate, gyro bias estimate and their error
/// covariance.
///
/// The covariance is neither clamped nor re-symmetrised; it evolves exactly as
/// the update equations dictate, even when the noise settings make it grow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisState {
    pub angle: f32,
    pub bias: f32,
    pub covariance: Matrix2<f32>,
}

impl Default for AxisState {
    fn default() -> Self {
        Self {
            angle: 0.0,
            bias: 0.0,
            covariance: Matrix2::zeros(),
        }
    }
}

impl AxisState {
    /// Fuse one (measured angle, angular rate) pair over `dt` seconds.
    pub fn update(&mut self, settings: &KalmanSettings, measured: f32, rate: f32, dt: f32) {
        let p = &mut self.covariance;

        // Predict
        self.angle += dt * (rate - self.bias);

        p[(0, 0)] += -dt * (p[(1, 0)] + p[(0, 1)]) + settings.q_angle * dt;
        p[(0, 1)] += -dt * p[(1, 1)];
        p[(1, 0)] += -dt * p[(1, 1)];
        p[(1, 1)] += settings.q_gyro * dt;

        // Innovation and gains
        let y = measured - self.angle;
        let s = p[(0, 0)] + settings.r_angle;
        let k0 = p[(0, 0)] / s;
        let k1 = p[(1, 0)] / s;

        // Correct. Row 1 is reduced with the already corrected row 0, so the
        // order of these four lines matters.
        self.angle += k0 * y;
        self.bias += k1 * y;
        p[(0, 0)] -= k0 * p[(0, 0)];
        p[(0, 1)] -= k0 * p[(0, 1)];
        p[(1, 0)] -= k1 * p[(0, 0)];
        p[(1, 1)] -= k1 * p[(0, 1)];
    }
}

/// Pitch and roll estimator fed by an [`AttitudeSensor`].
///
/// Every [`step`](KalmanFilter::step) waits out the minimum interval, reads a
/// tilt angle and a rate vector, and runs the same update independently on the
/// pitch axis (pitch angle, pitch rate) and the roll axis (roll angle, roll
/// rate). Yaw is not estimated and is always reported as zero.
///
/// # Example
/// ```no_run
/// use berry_imu::{Imu, KalmanFilter, KalmanSettings};
///
/// let mut imu = Imu::open(1)?;
/// let mut filter = KalmanFilter::new(&mut imu, KalmanSettings::default());
///
/// for _ in 0..100 {
///     let angles = filter.step()?;
///     println!("{angles}");
/// }
/// # Ok::<(), berry_imu::Error>(())
/// ```
#[derive(Debug)]
pub struct KalmanFilter<S> {
    sensor: S,
    settings: KalmanSettings,
    clock: RateLimiter,
    pitch: AxisState,
    roll: AxisState,
}

impl<S: AttitudeSensor> KalmanFilter<S> {
    /// Create a filter at zero angle and zero bias. The first `step` measures
    /// its interval from this moment.
    pub fn new(sensor: S, settings: KalmanSettings) -> Self {
        Self {
            sensor,
            settings,
            clock: RateLimiter::new(settings.min_dt),
            pitch: AxisState::default(),
            roll: AxisState::default(),
        }
    }

    /// Read the sensor and advance the filter by one sample.
    ///
    /// Blocks when called sooner than `min_dt` after the previous step.
    pub fn step(&mut self) -> Result<Angles> {
        let dt = self.clock.tick();

        let tilt = self.sensor.tilt_angle()?;
        let rate = self.sensor.rate_vector()?;

        Ok(self.update(tilt, rate, dt))
    }

    /// Advance the filter with measurements taken elsewhere.
    pub fn update(&mut self, tilt: TiltAngle, rate: RateVector, dt: f32) -> Angles {
        self.pitch
            .update(&self.settings, tilt.pitch, rate.pitch_rate, dt);
        self.roll
            .update(&self.settings, tilt.roll, rate.roll_rate, dt);
        self.angles()
    }

    /// Current estimate.
    pub fn angles(&self) -> Angles {
        Angles {
            yaw: 0.0,
            pitch: self.pitch.angle,
            roll: self.roll.angle,
        }
    }

    /// Overwrite the pitch and roll estimates, keeping bias and covariance.
    pub fn set_angles(&mut self, tilt: TiltAngle) {
        self.pitch.angle = tilt.pitch;
        self.roll.angle = tilt.roll;
    }

    /// Estimated gyro bias of the pitch and roll axes, in degrees per second.
    pub fn biases(&self) -> (f32, f32) {
        (self.pitch.bias, self.roll.bias)
    }

    /// Full pitch axis state.
    pub fn pitch_state(&self) -> &AxisState {
        &self.pitch
    }

    /// Full roll axis state.
    pub fn roll_state(&self) -> &AxisState {
        &self.roll
    }

    /// Tuning the filter was created with.
    pub fn settings(&self) -> KalmanSettings {
        self.settings
    }

    /// Access the sensor feeding the filter.
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Drop the filter and return its sensor.
    pub fn into_inner(self) -> S {
        self.sensor
    }
}
