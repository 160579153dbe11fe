//! Mathematical utilities and nalgebra extensions

use nalgebra::{Quaternion, Vector3};

use crate::types::Angles;

/// Mathematical constants
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Magnitudes below this are treated as zero when normalizing.
pub const NORM_EPSILON: f32 = 1e-9;

/// Extension trait for Vector3 operations
pub trait Vector3Ext {
    /// Normalize the vector, returning zero vector if magnitude is zero
    fn safe_normalize(&self) -> Vector3<f32>;

    /// Convert degrees to radians
    fn deg_to_rad(&self) -> Vector3<f32>;

    /// Convert radians to degrees
    fn rad_to_deg(&self) -> Vector3<f32>;
}

impl Vector3Ext for Vector3<f32> {
    fn safe_normalize(&self) -> Vector3<f32> {
        self.try_normalize(NORM_EPSILON).unwrap_or_else(Vector3::zeros)
    }

    fn deg_to_rad(&self) -> Vector3<f32> {
        *self * DEG_TO_RAD
    }

    fn rad_to_deg(&self) -> Vector3<f32> {
        *self * RAD_TO_DEG
    }
}

/// Extension trait for Quaternion operations
pub trait QuaternionExt {
    /// Normalize, returning the zero quaternion if the norm vanishes
    fn safe_normalize(&self) -> Quaternion<f32>;

    /// Yaw, pitch and roll in degrees
    ///
    /// Uses the aerospace sequence with pitch taken from the X/Z and W/Y
    /// products, matching the gravity model of the Madgwick filter.
    fn to_euler_degrees(&self) -> Angles;
}

impl QuaternionExt for Quaternion<f32> {
    fn safe_normalize(&self) -> Quaternion<f32> {
        let norm = self.norm();
        if norm > NORM_EPSILON {
            *self / norm
        } else {
            Quaternion::new(0.0, 0.0, 0.0, 0.0)
        }
    }

    fn to_euler_degrees(&self) -> Angles {
        let (w, x, y, z) = (self.w, self.i, self.j, self.k);

        let yaw = (2.0 * x * y - 2.0 * w * z).atan2(2.0 * w * w + 2.0 * x * x - 1.0);
        // Clamp so rounding just past +/-1 does not produce NaN at gimbal lock.
        let pitch = -(2.0 * x * z + 2.0 * w * y).clamp(-1.0, 1.0).asin();
        let roll = (2.0 * y * z - 2.0 * w * x).atan2(2.0 * w * w + 2.0 * z * z - 1.0);

        Angles {
            yaw: yaw * RAD_TO_DEG,
            pitch: pitch * RAD_TO_DEG,
            roll: roll * RAD_TO_DEG,
        }
    }
}
