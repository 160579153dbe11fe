//! Value types and settings shared by the IMU facade and the filters

use core::fmt;

use nalgebra::Vector3;

/// Board tilt derived from the gravity direction, in degrees.
///
/// Yaw cannot be observed from acceleration alone and is not part of this
/// type.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TiltAngle {
    pub pitch: f32,
    pub roll: f32,
}

impl fmt::Display for TiltAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tilt<pitch={}, roll={}>", self.pitch, self.roll)
    }
}

/// Angular rates in degrees per second.
///
/// The gyroscope axes map to fixed roles: X is pitch, Y is yaw, Z is roll.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RateVector {
    pub pitch_rate: f32,
    pub yaw_rate: f32,
    pub roll_rate: f32,
}

impl From<RateVector> for Vector3<f32> {
    fn from(rate: RateVector) -> Self {
        Vector3::new(rate.pitch_rate, rate.yaw_rate, rate.roll_rate)
    }
}

impl fmt::Display for RateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rate<pitch={}, yaw={}, roll={}>",
            self.pitch_rate, self.yaw_rate, self.roll_rate
        )
    }
}

/// Orientation as yaw, pitch and roll in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Angles {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl fmt::Display for Angles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Angles<yaw={}, pitch={}, roll={}>",
            self.yaw, self.pitch, self.roll
        )
    }
}

/// One scaled reading of every sub-sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    /// Angular rate in degrees per second
    pub gyroscope: Vector3<f32>,
    /// Acceleration in g
    pub accelerometer: Vector3<f32>,
    /// Magnetic field in gauss
    pub magnetometer: Vector3<f32>,
}

/// Kalman filter tuning
///
/// Fixed for the lifetime of a filter; there is no adaptive retuning.
///
/// # Example
/// ```
/// use berry_imu::KalmanSettings;
///
/// let settings = KalmanSettings {
///     min_dt: 0.02, // at most 50 updates per second
///     ..Default::default()
/// };
/// assert_eq!(settings.q_angle, 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KalmanSettings {
    /// Process noise of the angle
    pub q_angle: f32,
    /// Process noise of the gyroscope bias
    pub q_gyro: f32,
    /// Measurement noise of the accelerometer angle
    pub r_angle: f32,
    /// Minimum time between two steps in seconds
    ///
    /// `step` blocks until at least this much time has passed since the
    /// previous one.
    pub min_dt: f32,
}

impl Default for KalmanSettings {
    fn default() -> Self {
        Self {
            q_angle: 0.01,
            q_gyro: 0.0003,
            r_angle: 0.01,
            min_dt: 0.01,
        }
    }
}
