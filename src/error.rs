//! Error taxonomy for bus access and device detection

use embedded_hal::i2c::ErrorKind;
use thiserror::Error;

/// Errors raised by the bus transport, the device driver and the IMU facade.
///
/// None of these are retried internally. Every failure aborts the operation in
/// progress and is handed back to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// The bus device node could not be opened.
    #[error("unable to open I2C bus {bus}: {reason}; check that the IMU is connected to this bus")]
    BusOpen { bus: u8, reason: String },

    /// No valid target address is selected.
    #[error("failed to select I2C device at address {address:#04x}")]
    BusSelect { address: u8 },

    /// A register read failed or returned fewer bytes than requested.
    #[error("failed to read block {command:#04x} from I2C device {address:#04x}: {kind}")]
    BusRead {
        address: u8,
        command: u8,
        kind: ErrorKind,
    },

    /// A register write was not acknowledged.
    #[error("failed to write register {register:#04x} on I2C device {address:#04x}: {kind}")]
    BusWrite {
        address: u8,
        register: u8,
        kind: ErrorKind,
    },

    /// None of the supported variants answered with their identification bytes.
    #[error("no IMU detected")]
    DeviceNotDetected,

    /// A hardware generation number outside the supported set.
    #[error("invalid IMU version {0}")]
    UnsupportedVariant(u8),
}

/// Result alias used across the crate.
pub type Result<T> = core::result::Result<T, Error>;
