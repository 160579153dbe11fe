//! berry-imu - BerryIMU driver and orientation filters
//!
//! Reads acceleration, angular rate and magnetic field from a BerryIMU on a
//! two-wire register bus and turns them into an orientation estimate.
//!
//! The board generation is detected at construction by probing the chips'
//! identification registers:
//!
//! - BerryIMUv1 (LSM9DS0)
//! - BerryIMUv2 (LSM9DS1)
//! - BerryIMUv3 (LSM6DSL + LIS3MDL)
//!
//! After detection every read goes through that generation's register map, so
//! callers never see addresses or register offsets.
//!
//! # Features
//!
//! - Auto-detection and configuration of three hardware generations
//! - Raw and scaled accelerometer, gyroscope and magnetometer readings
//! - Per-axis Kalman filter for pitch and roll with gyro bias estimation
//! - Madgwick gradient-descent quaternion filter
//! - Works over any [`embedded_hal::i2c::I2c`] transport; `/dev/i2c-N` on Linux
//!
//! # Quick Start
//!
//! ```no_run
//! use berry_imu::{Imu, KalmanFilter, KalmanSettings};
//!
//! let mut imu = Imu::open(1)?;
//! println!("found {}", imu.variant_label());
//!
//! let mut kalman = KalmanFilter::new(&mut imu, KalmanSettings::default());
//! for _ in 0..1000 {
//!     let angles = kalman.step()?;
//!     println!("pitch {:.1}, roll {:.1}", angles.pitch, angles.roll);
//! }
//! # Ok::<(), berry_imu::Error>(())
//! ```
//!
//! The Madgwick filter is fed explicitly:
//!
//! ```no_run
//! use berry_imu::{Imu, Madgwick, Vector3Ext};
//!
//! let mut imu = Imu::open(1)?;
//! let mut madgwick = Madgwick::default();
//!
//! let sample = imu.read_motion()?;
//! madgwick.update(
//!     sample.gyroscope.deg_to_rad(),
//!     sample.accelerometer,
//!     sample.magnetometer,
//!     0.01,
//! );
//! println!("{}", madgwick.euler());
//! # Ok::<(), berry_imu::Error>(())
//! ```

pub mod bus;
mod clock;
pub mod driver;
mod error;
mod imu;
mod kalman;
mod madgwick;
mod math;
pub mod registers;
mod types;

// Re-export all public types and functions
pub use bus::Bus;
pub use clock::{RateLimiter, Timestamp};
pub use driver::{Driver, combine_axes};
pub use error::{Error, Result};
pub use imu::{AttitudeSensor, GYRO_GAIN, Imu, rate_from_gyro, tilt_from_acceleration};
pub use kalman::{AxisState, KalmanFilter};
pub use madgwick::{DEFAULT_BETA, Madgwick};
pub use math::{DEG_TO_RAD, QuaternionExt, RAD_TO_DEG, Vector3Ext};
pub use registers::{DeviceVariant, RegisterMap, Sensor};
pub use types::*;
