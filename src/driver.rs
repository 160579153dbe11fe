//! Variant detection and register access for the IMU package

use embedded_hal::i2c::I2c;
use nalgebra::Vector3;

use crate::bus::Bus;
use crate::error::{Error, Result};
use crate::registers::{DeviceVariant, Identification, RegisterMap, Sensor};

/// Driver locked to one detected hardware variant.
///
/// Construction probes the identification registers of every supported
/// variant in [`DeviceVariant::PROBE_ORDER`], configures the first one whose
/// identification bytes both match, and from then on routes every read and
/// write through that variant's [`RegisterMap`].
#[derive(Debug)]
pub struct Driver<I> {
    bus: Bus<I>,
    map: &'static RegisterMap,
}

impl<I: I2c> Driver<I> {
    /// Detect and configure the IMU on `bus`.
    ///
    /// # Errors
    /// [`Error::DeviceNotDetected`] when no variant answers, or the bus error
    /// of a failed configuration write.
    pub fn detect(mut bus: Bus<I>) -> Result<Self> {
        for variant in DeviceVariant::PROBE_ORDER {
            let map = variant.register_map();
            if identify(&mut bus, map)? {
                log::info!("detected {variant}");
                let mut driver = Self { bus, map };
                driver.configure()?;
                return Ok(driver);
            }
        }

        log::warn!("no supported IMU answered on the bus");
        Err(Error::DeviceNotDetected)
    }

    /// The detected hardware generation.
    pub fn variant(&self) -> DeviceVariant {
        self.map.variant
    }

    /// The register table in use.
    pub fn register_map(&self) -> &'static RegisterMap {
        self.map
    }

    /// Bus number the driver was opened on, if known.
    pub fn bus_index(&self) -> Option<u8> {
        self.bus.index()
    }

    /// Read the X, Y, Z output registers of `sensor`.
    pub fn read_vector(&mut self, sensor: Sensor) -> Result<Vector3<i16>> {
        let registers = self.map.sensor(sensor);
        self.bus.select(registers.address)?;
        let block = self.bus.read_block::<6>(registers.output_command)?;
        Ok(combine_axes(block))
    }

    /// Write one configuration register of `sensor`.
    pub fn write_register(&mut self, sensor: Sensor, register: u8, value: u8) -> Result<()> {
        self.bus.select(self.map.sensor(sensor).address)?;
        self.bus.write_register(register, value)
    }

    /// Give back the bus transport.
    pub fn release(self) -> I {
        self.bus.release()
    }

    fn configure(&mut self) -> Result<()> {
        for write in self.map.configuration {
            log::debug!(
                "{:?} register {:#04x} <- {:#010b}",
                write.sensor,
                write.register,
                write.value
            );
            self.write_register(write.sensor, write.register, write.value)?;
        }
        log::info!("configured {}", self.map.variant);
        Ok(())
    }
}

/// Probe both identification registers of one variant.
///
/// A chip that is not present does not acknowledge, which is a mismatch and
/// not an error.
fn identify<I: I2c>(bus: &mut Bus<I>, map: &RegisterMap) -> Result<bool> {
    let mut matched = true;
    for probe in &map.identification {
        let found = read_identification(bus, probe)?;
        log::debug!(
            "{}: id at {:#04x}/{:#04x} = {:02x?}, expected {:#04x}",
            map.variant,
            probe.address,
            probe.register,
            found,
            probe.expected
        );
        matched &= found == Some(probe.expected);
    }
    Ok(matched)
}

fn read_identification<I: I2c>(bus: &mut Bus<I>, probe: &Identification) -> Result<Option<u8>> {
    bus.select(probe.address)?;
    match bus.read_byte(probe.register) {
        Ok(value) => Ok(Some(value)),
        Err(Error::BusRead { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Combine six output bytes, low byte first, into signed axis values.
pub fn combine_axes(block: [u8; 6]) -> Vector3<i16> {
    Vector3::new(
        i16::from_le_bytes([block[0], block[1]]),
        i16::from_le_bytes([block[2], block[3]]),
        i16::from_le_bytes([block[4], block[5]]),
    )
}
