//! IMU facade: raw and derived readings without variant details

use core::fmt;

use embedded_hal::i2c::I2c;
use nalgebra::Vector3;

use crate::bus::Bus;
use crate::driver::Driver;
use crate::error::Result;
use crate::math::RAD_TO_DEG;
use crate::registers::{DeviceVariant, Sensor};
use crate::types::{MotionSample, RateVector, TiltAngle};

/// Gyroscope sensitivity at 2000 dps full scale, degrees per second per LSB.
///
/// Every supported variant is configured for the same range.
pub const GYRO_GAIN: f32 = 0.070;

/// Source of the tilt and rate measurements the Kalman filter consumes.
pub trait AttitudeSensor {
    /// Pitch and roll from the gravity direction, in degrees.
    fn tilt_angle(&mut self) -> Result<TiltAngle>;

    /// Angular rates in degrees per second.
    fn rate_vector(&mut self) -> Result<RateVector>;
}

impl<T: AttitudeSensor + ?Sized> AttitudeSensor for &mut T {
    fn tilt_angle(&mut self) -> Result<TiltAngle> {
        (**self).tilt_angle()
    }

    fn rate_vector(&mut self) -> Result<RateVector> {
        (**self).rate_vector()
    }
}

/// Auto-detected BerryIMU.
///
/// # Example
/// ```no_run
/// use berry_imu::Imu;
///
/// let mut imu = Imu::open(1)?;
/// println!("{imu}");
///
/// let tilt = imu.tilt_angle()?;
/// println!("pitch {:.1}, roll {:.1}", tilt.pitch, tilt.roll);
/// # Ok::<(), berry_imu::Error>(())
/// ```
#[derive(Debug)]
pub struct Imu<I> {
    driver: Driver<I>,
}

#[cfg(target_os = "linux")]
impl Imu<linux_embedded_hal::I2cdev> {
    /// Open `/dev/i2c-<bus_index>` and detect the IMU on it.
    pub fn open(bus_index: u8) -> Result<Self> {
        Self::new(Bus::open(bus_index)?)
    }
}

impl<I: I2c> Imu<I> {
    /// Detect and configure the IMU on an opened bus.
    pub fn new(bus: Bus<I>) -> Result<Self> {
        Ok(Self {
            driver: Driver::detect(bus)?,
        })
    }

    /// Raw accelerometer output.
    pub fn read_acceleration(&mut self) -> Result<Vector3<i16>> {
        self.driver.read_vector(Sensor::Accelerometer)
    }

    /// Raw gyroscope output.
    pub fn read_gyro(&mut self) -> Result<Vector3<i16>> {
        self.driver.read_vector(Sensor::Gyroscope)
    }

    /// Raw magnetometer output.
    pub fn read_magnetic(&mut self) -> Result<Vector3<i16>> {
        self.driver.read_vector(Sensor::Magnetometer)
    }

    /// Pitch and roll from the gravity direction, in degrees.
    pub fn tilt_angle(&mut self) -> Result<TiltAngle> {
        Ok(tilt_from_acceleration(self.read_acceleration()?))
    }

    /// Angular rates in degrees per second, mapped to pitch, yaw and roll.
    pub fn rate_vector(&mut self) -> Result<RateVector> {
        Ok(rate_from_gyro(self.read_gyro()?))
    }

    /// Acceleration in g for the configured full scale.
    pub fn acceleration_g(&mut self) -> Result<Vector3<f32>> {
        let gain = self.driver.register_map().accel_gain;
        Ok(self.read_acceleration()?.cast::<f32>() * gain)
    }

    /// Magnetic field in gauss for the configured full scale.
    pub fn magnetic_field(&mut self) -> Result<Vector3<f32>> {
        let gain = self.driver.register_map().mag_gain;
        Ok(self.read_magnetic()?.cast::<f32>() * gain)
    }

    /// Angular rate in degrees per second, per sensor axis.
    pub fn angular_rate(&mut self) -> Result<Vector3<f32>> {
        Ok(self.read_gyro()?.cast::<f32>() * GYRO_GAIN)
    }

    /// Read every sub-sensor once, scaled to physical units.
    pub fn read_motion(&mut self) -> Result<MotionSample> {
        Ok(MotionSample {
            gyroscope: self.angular_rate()?,
            accelerometer: self.acceleration_g()?,
            magnetometer: self.magnetic_field()?,
        })
    }

    /// Detected hardware generation.
    pub fn variant(&self) -> DeviceVariant {
        self.driver.variant()
    }

    /// Board and chip names of the detected hardware.
    pub fn variant_label(&self) -> &'static str {
        self.driver.variant().label()
    }

    /// Access the underlying driver.
    pub fn driver_mut(&mut self) -> &mut Driver<I> {
        &mut self.driver
    }

    /// Give back the bus transport.
    pub fn release(self) -> I {
        self.driver.release()
    }
}

impl<I: I2c> AttitudeSensor for Imu<I> {
    fn tilt_angle(&mut self) -> Result<TiltAngle> {
        Imu::tilt_angle(self)
    }

    fn rate_vector(&mut self) -> Result<RateVector> {
        Imu::rate_vector(self)
    }
}

impl<I: I2c> fmt::Display for Imu<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = self.variant();
        match self.driver.bus_index() {
            Some(bus) => write!(f, "IMU<bus={bus}, version={variant}>"),
            None => write!(f, "IMU<version={variant}>"),
        }
    }
}

/// Tilt from a raw acceleration sample.
///
/// Seen from the face of the board Z points forward, Y down and X left, so an
/// upright board reads (0, 0).
pub fn tilt_from_acceleration(acc: Vector3<i16>) -> TiltAngle {
    let acc = acc.cast::<f32>();
    TiltAngle {
        pitch: acc.z.atan2(acc.y) * RAD_TO_DEG,
        roll: acc.x.atan2(acc.y) * RAD_TO_DEG,
    }
}

/// Angular rates from a raw gyroscope sample.
pub fn rate_from_gyro(gyr: Vector3<i16>) -> RateVector {
    let rate = gyr.cast::<f32>() * GYRO_GAIN;
    RateVector {
        pitch_rate: rate.x,
        yaw_rate: rate.y,
        roll_rate: rate.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upright_board_is_level() {
        let tilt = tilt_from_acceleration(Vector3::new(0, 1, 0));
        assert!(tilt.pitch.abs() < 1e-6);
        assert!(tilt.roll.abs() < 1e-6);
    }

    #[test]
    fn test_tilt_forward_and_sideways() {
        let tilt = tilt_from_acceleration(Vector3::new(0, 1000, 1000));
        assert!((tilt.pitch - 45.0).abs() < 1e-4);
        assert!(tilt.roll.abs() < 1e-6);

        let tilt = tilt_from_acceleration(Vector3::new(-1000, 1000, 0));
        assert!((tilt.roll + 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_rate_axis_roles() {
        let rate = rate_from_gyro(Vector3::new(100, -200, 300));
        assert!((rate.pitch_rate - 7.0).abs() < 1e-5);
        assert!((rate.yaw_rate + 14.0).abs() < 1e-5);
        assert!((rate.roll_rate - 21.0).abs() < 1e-5);
    }
}
