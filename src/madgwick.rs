//! Gradient-descent orientation filter (Madgwick, IMU form)

use nalgebra::{Matrix3x4, Quaternion, Vector3, Vector4};

use crate::math::{QuaternionExt, Vector3Ext};
use crate::types::Angles;

/// Default gradient-descent gain.
pub const DEFAULT_BETA: f32 = 0.1;

/// Quaternion orientation estimator.
///
/// Gyroscope rates are integrated as a quaternion derivative, and one
/// normalised gradient-descent step pulls the predicted gravity direction
/// towards the measured acceleration. The magnetometer argument is accepted
/// but does not contribute a correction, so heading drifts with the gyro.
///
/// # Example
/// ```
/// use berry_imu::Madgwick;
/// use nalgebra::Vector3;
///
/// let mut filter = Madgwick::default();
///
/// let gyro = Vector3::new(0.0, 0.0, 0.1);  // rad/s
/// let accel = Vector3::new(0.0, 0.0, 1.0); // any scale
/// filter.update(gyro, accel, Vector3::zeros(), 0.01);
///
/// let q = filter.quaternion();
/// assert!((q.norm() - 1.0).abs() < 1e-4);
/// let angles = filter.euler();
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Madgwick {
    beta: f32,
    q: Quaternion<f32>,
}

impl Madgwick {
    /// Create a filter with gain `beta` starting at `q`.
    ///
    /// `q` is taken as given; it becomes unit length after the first update.
    pub fn new(beta: f32, q: Quaternion<f32>) -> Self {
        Self { beta, q }
    }

    /// Fuse one sample.
    ///
    /// # Arguments
    /// * `gyro` - angular rate in radians per second
    /// * `accel` - acceleration, any unit (only the direction is used)
    /// * `_mag` - magnetic field, currently unused
    /// * `dt` - time step in seconds
    pub fn update(&mut self, gyro: Vector3<f32>, accel: Vector3<f32>, _mag: Vector3<f32>, dt: f32) {
        let q = self.q;
        let (w, x, y, z) = (q.w, q.i, q.j, q.k);

        // Rate of change from the gyroscope
        let q_dot = q * Quaternion::from_imag(gyro * 0.5);

        let a = accel.safe_normalize();

        // Gravity objective function and its Jacobian
        let f_g = Vector3::new(
            2.0 * (x * z - w * y) - a.x,
            2.0 * (w * x + y * z) - a.y,
            2.0 * (0.5 - x * x - y * y) - a.z,
        );
        #[rustfmt::skip]
        let j_g = Matrix3x4::new(
            -2.0 * y,  2.0 * z, -2.0 * w, 2.0 * x,
             2.0 * x,  2.0 * w,  2.0 * z, 2.0 * y,
             0.0,     -4.0 * x, -4.0 * y, 0.0,
        );

        let gradient: Vector4<f32> = j_g.transpose() * f_g;
        let step =
            Quaternion::new(gradient[0], gradient[1], gradient[2], gradient[3]).safe_normalize();

        let q = q + (q_dot - step * self.beta) * dt;
        self.q = q.safe_normalize();
    }

    /// Current orientation.
    pub fn quaternion(&self) -> Quaternion<f32> {
        self.q
    }

    /// Replace the orientation estimate.
    pub fn set_quaternion(&mut self, q: Quaternion<f32>) {
        self.q = q;
    }

    /// Current orientation as yaw, pitch and roll in degrees.
    pub fn euler(&self) -> Angles {
        self.q.to_euler_degrees()
    }

    /// Gradient-descent gain.
    pub fn beta(&self) -> f32 {
        self.beta
    }
}

impl Default for Madgwick {
    fn default() -> Self {
        Self::new(DEFAULT_BETA, Quaternion::identity())
    }
}
