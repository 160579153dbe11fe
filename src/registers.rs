//! Register maps for the supported BerryIMU generations
//!
//! Every variant is described by one `'static` [`RegisterMap`]: where each
//! sub-sensor lives on the bus, which command starts its six-byte output
//! block, how to recognise the chips, and the ordered configuration writes
//! that power them up. The driver picks one table at detection time and never
//! branches on the variant again.

use core::fmt;

use crate::error::Error;

/// Auto-increment flag for multi-byte reads on the LSM9DS0.
const LSM9DS0_AUTO_INCREMENT: u8 = 0x80;

/// LSM9DS0 (BerryIMUv1): gyroscope plus combined accelerometer/magnetometer.
pub mod lsm9ds0 {
    pub const GYR_ADDRESS: u8 = 0x6A;
    pub const XM_ADDRESS: u8 = 0x1E;

    pub const WHO_AM_I_G: u8 = 0x0F;
    pub const CTRL_REG1_G: u8 = 0x20;
    pub const CTRL_REG4_G: u8 = 0x23;
    pub const OUT_X_L_G: u8 = 0x28;

    pub const OUT_X_L_M: u8 = 0x08;
    pub const WHO_AM_I_XM: u8 = 0x0F;
    pub const CTRL_REG1_XM: u8 = 0x20;
    pub const CTRL_REG2_XM: u8 = 0x21;
    pub const CTRL_REG5_XM: u8 = 0x24;
    pub const CTRL_REG6_XM: u8 = 0x25;
    pub const CTRL_REG7_XM: u8 = 0x26;
    pub const OUT_X_L_A: u8 = 0x28;

    pub const WHO_AM_I_G_VALUE: u8 = 0xD4;
    pub const WHO_AM_I_XM_VALUE: u8 = 0x49;
}

/// LSM9DS1 (BerryIMUv2): accelerometer/gyroscope die plus magnetometer die.
pub mod lsm9ds1 {
    pub const XG_ADDRESS: u8 = 0x6A;
    pub const MAG_ADDRESS: u8 = 0x1C;

    pub const WHO_AM_I_XG: u8 = 0x0F;
    pub const CTRL_REG1_G: u8 = 0x10;
    pub const ORIENT_CFG_G: u8 = 0x13;
    pub const OUT_X_L_G: u8 = 0x18;
    pub const CTRL_REG4: u8 = 0x1E;
    pub const CTRL_REG5_XL: u8 = 0x1F;
    pub const CTRL_REG6_XL: u8 = 0x20;
    pub const OUT_X_L_XL: u8 = 0x28;

    pub const WHO_AM_I_M: u8 = 0x0F;
    pub const CTRL_REG1_M: u8 = 0x20;
    pub const CTRL_REG2_M: u8 = 0x21;
    pub const CTRL_REG3_M: u8 = 0x22;
    pub const CTRL_REG4_M: u8 = 0x23;
    pub const OUT_X_L_M: u8 = 0x28;

    pub const WHO_AM_I_XG_VALUE: u8 = 0x68;
    pub const WHO_AM_I_M_VALUE: u8 = 0x3D;
}

/// LSM6DSL (BerryIMUv3 accelerometer/gyroscope).
pub mod lsm6dsl {
    pub const ADDRESS: u8 = 0x6A;

    pub const WHO_AM_I: u8 = 0x0F;
    pub const CTRL1_XL: u8 = 0x10;
    pub const CTRL2_G: u8 = 0x11;
    pub const CTRL3_C: u8 = 0x12;
    pub const CTRL8_XL: u8 = 0x17;
    pub const OUTX_L_G: u8 = 0x22;
    pub const OUTX_L_XL: u8 = 0x28;

    pub const WHO_AM_I_VALUE: u8 = 0x6A;
}

/// LIS3MDL (BerryIMUv3 magnetometer).
pub mod lis3mdl {
    pub const ADDRESS: u8 = 0x1C;

    pub const WHO_AM_I: u8 = 0x0F;
    pub const CTRL_REG1: u8 = 0x20;
    pub const CTRL_REG2: u8 = 0x21;
    pub const CTRL_REG3: u8 = 0x22;
    pub const OUT_X_L: u8 = 0x28;

    pub const WHO_AM_I_VALUE: u8 = 0x3D;
}

/// Sub-sensor of the IMU package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    Accelerometer,
    Gyroscope,
    Magnetometer,
}

/// Bus location of one sub-sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorRegisters {
    /// 7-bit bus address
    pub address: u8,
    /// Command byte that starts the X/Y/Z output block (low byte of X first)
    pub output_command: u8,
}

/// One identification probe: the byte found at `register` on `address`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identification {
    /// 7-bit bus address of the chip
    pub address: u8,
    /// Identification register
    pub register: u8,
    /// Byte the chip must answer with
    pub expected: u8,
}

/// One configuration register write issued at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigWrite {
    pub sensor: Sensor,
    pub register: u8,
    pub value: u8,
}

const fn write(sensor: Sensor, register: u8, value: u8) -> ConfigWrite {
    ConfigWrite {
        sensor,
        register,
        value,
    }
}

/// Everything the driver needs to know about one hardware generation.
#[derive(Debug, PartialEq)]
pub struct RegisterMap {
    pub variant: DeviceVariant,
    pub accelerometer: SensorRegisters,
    pub gyroscope: SensorRegisters,
    pub magnetometer: SensorRegisters,
    /// Probed in order; both must match
    pub identification: [Identification; 2],
    /// Written in order: gyroscope, accelerometer, magnetometer
    pub configuration: &'static [ConfigWrite],
    /// Accelerometer sensitivity for the configured full scale, in g per LSB
    pub accel_gain: f32,
    /// Magnetometer sensitivity for the configured full scale, in gauss per LSB
    pub mag_gain: f32,
}

impl RegisterMap {
    /// Registers of the given sub-sensor.
    pub fn sensor(&self, sensor: Sensor) -> &SensorRegisters {
        match sensor {
            Sensor::Accelerometer => &self.accelerometer,
            Sensor::Gyroscope => &self.gyroscope,
            Sensor::Magnetometer => &self.magnetometer,
        }
    }
}

static BERRY_IMU_V1: RegisterMap = {
    use lsm9ds0::*;
    use Sensor::*;

    RegisterMap {
        variant: DeviceVariant::BerryImuV1,
        accelerometer: SensorRegisters {
            address: XM_ADDRESS,
            output_command: LSM9DS0_AUTO_INCREMENT | OUT_X_L_A,
        },
        gyroscope: SensorRegisters {
            address: GYR_ADDRESS,
            output_command: LSM9DS0_AUTO_INCREMENT | OUT_X_L_G,
        },
        magnetometer: SensorRegisters {
            address: XM_ADDRESS,
            output_command: LSM9DS0_AUTO_INCREMENT | OUT_X_L_M,
        },
        identification: [
            Identification {
                address: XM_ADDRESS,
                register: WHO_AM_I_XM,
                expected: WHO_AM_I_XM_VALUE,
            },
            Identification {
                address: GYR_ADDRESS,
                register: WHO_AM_I_G,
                expected: WHO_AM_I_G_VALUE,
            },
        ],
        configuration: &[
            // 95 Hz, all axes on; 2000 dps
            write(Gyroscope, CTRL_REG1_G, 0b0000_1111),
            write(Gyroscope, CTRL_REG4_G, 0b0011_0000),
            // 100 Hz, continuous update, all axes on; +/-16 g
            write(Accelerometer, CTRL_REG1_XM, 0b0110_0111),
            write(Accelerometer, CTRL_REG2_XM, 0b0010_0000),
            // temperature on, high resolution, 50 Hz; +/-12 gauss; continuous
            write(Magnetometer, CTRL_REG5_XM, 0b1111_0000),
            write(Magnetometer, CTRL_REG6_XM, 0b0110_0000),
            write(Magnetometer, CTRL_REG7_XM, 0b0000_0000),
        ],
        accel_gain: 0.000_732,
        mag_gain: 0.000_48,
    }
};

static BERRY_IMU_V2: RegisterMap = {
    use lsm9ds1::*;
    use Sensor::*;

    RegisterMap {
        variant: DeviceVariant::BerryImuV2,
        accelerometer: SensorRegisters {
            address: XG_ADDRESS,
            output_command: OUT_X_L_XL,
        },
        gyroscope: SensorRegisters {
            address: XG_ADDRESS,
            output_command: OUT_X_L_G,
        },
        magnetometer: SensorRegisters {
            address: MAG_ADDRESS,
            output_command: OUT_X_L_M,
        },
        identification: [
            Identification {
                address: MAG_ADDRESS,
                register: WHO_AM_I_M,
                expected: WHO_AM_I_M_VALUE,
            },
            Identification {
                address: XG_ADDRESS,
                register: WHO_AM_I_XG,
                expected: WHO_AM_I_XG_VALUE,
            },
        ],
        configuration: &[
            // all gyro axes on; 952 Hz, 2000 dps; orientation
            write(Gyroscope, CTRL_REG4, 0b0011_1000),
            write(Gyroscope, CTRL_REG1_G, 0b1011_1000),
            write(Gyroscope, ORIENT_CFG_G, 0b1011_1000),
            // all accel axes on; 10 Hz, +/-16 g
            write(Accelerometer, CTRL_REG5_XL, 0b0011_1000),
            write(Accelerometer, CTRL_REG6_XL, 0b0010_1000),
            // temperature compensation, 80 Hz; +/-12 gauss; continuous
            write(Magnetometer, CTRL_REG1_M, 0b1001_1100),
            write(Magnetometer, CTRL_REG2_M, 0b0100_0000),
            write(Magnetometer, CTRL_REG3_M, 0b0000_0000),
            write(Magnetometer, CTRL_REG4_M, 0b0000_0000),
        ],
        accel_gain: 0.000_732,
        mag_gain: 0.000_43,
    }
};

static BERRY_IMU_V3: RegisterMap = {
    use Sensor::*;

    RegisterMap {
        variant: DeviceVariant::BerryImuV3,
        accelerometer: SensorRegisters {
            address: lsm6dsl::ADDRESS,
            output_command: lsm6dsl::OUTX_L_XL,
        },
        gyroscope: SensorRegisters {
            address: lsm6dsl::ADDRESS,
            output_command: lsm6dsl::OUTX_L_G,
        },
        magnetometer: SensorRegisters {
            address: lis3mdl::ADDRESS,
            output_command: lis3mdl::OUT_X_L,
        },
        identification: [
            Identification {
                address: lsm6dsl::ADDRESS,
                register: lsm6dsl::WHO_AM_I,
                expected: lsm6dsl::WHO_AM_I_VALUE,
            },
            Identification {
                address: lis3mdl::ADDRESS,
                register: lis3mdl::WHO_AM_I,
                expected: lis3mdl::WHO_AM_I_VALUE,
            },
        ],
        configuration: &[
            // 3.3 kHz, 2000 dps
            write(Gyroscope, lsm6dsl::CTRL2_G, 0b1001_1100),
            // 3.3 kHz, +/-8 g; low pass filter; block data update, auto increment
            write(Accelerometer, lsm6dsl::CTRL1_XL, 0b1001_1111),
            write(Accelerometer, lsm6dsl::CTRL8_XL, 0b1100_1000),
            write(Accelerometer, lsm6dsl::CTRL3_C, 0b0100_0100),
            // temperature on, ultra-high performance, 80 Hz; +/-8 gauss; continuous
            write(Magnetometer, lis3mdl::CTRL_REG1, 0b1101_1100),
            write(Magnetometer, lis3mdl::CTRL_REG2, 0b0010_0000),
            write(Magnetometer, lis3mdl::CTRL_REG3, 0b0000_0000),
        ],
        accel_gain: 0.000_244,
        mag_gain: 1.0 / 3421.0,
    }
};

/// Supported hardware generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceVariant {
    /// BerryIMUv1, LSM9DS0
    BerryImuV1,
    /// BerryIMUv2, LSM9DS1
    BerryImuV2,
    /// BerryIMUv3, LSM6DSL + LIS3MDL
    BerryImuV3,
}

impl DeviceVariant {
    /// Detection order. Identification bytes are not unique across unrelated
    /// hardware, so the first match wins.
    pub const PROBE_ORDER: [DeviceVariant; 3] = [
        DeviceVariant::BerryImuV1,
        DeviceVariant::BerryImuV2,
        DeviceVariant::BerryImuV3,
    ];

    /// The register table for this variant.
    pub fn register_map(self) -> &'static RegisterMap {
        match self {
            DeviceVariant::BerryImuV1 => &BERRY_IMU_V1,
            DeviceVariant::BerryImuV2 => &BERRY_IMU_V2,
            DeviceVariant::BerryImuV3 => &BERRY_IMU_V3,
        }
    }

    /// Hardware generation number (1, 2 or 3).
    pub fn generation(self) -> u8 {
        match self {
            DeviceVariant::BerryImuV1 => 1,
            DeviceVariant::BerryImuV2 => 2,
            DeviceVariant::BerryImuV3 => 3,
        }
    }

    /// Human readable board and chip names.
    pub fn label(self) -> &'static str {
        match self {
            DeviceVariant::BerryImuV1 => "BerryIMUv1/LSM9DS0",
            DeviceVariant::BerryImuV2 => "BerryIMUv2/LSM9DS1",
            DeviceVariant::BerryImuV3 => "BerryIMUv3/LSM6DSL/LIS3MDL",
        }
    }
}

impl TryFrom<u8> for DeviceVariant {
    type Error = Error;

    fn try_from(generation: u8) -> Result<Self, Self::Error> {
        match generation {
            1 => Ok(DeviceVariant::BerryImuV1),
            2 => Ok(DeviceVariant::BerryImuV2),
            3 => Ok(DeviceVariant::BerryImuV3),
            other => Err(Error::UnsupportedVariant(other)),
        }
    }
}

impl fmt::Display for DeviceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
