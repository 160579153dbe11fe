//! Two-wire register bus transport
//!
//! Thin wrapper over an [`embedded_hal::i2c::I2c`] implementation that keeps
//! the currently selected target address, the way a Linux `/dev/i2c-N` handle
//! does after an `I2C_SLAVE` ioctl. It knows nothing about the IMU itself.

use embedded_hal::i2c::{Error as _, I2c};

use crate::error::{Error, Result};

/// Highest valid 7-bit bus address.
const MAX_ADDRESS: u8 = 0x7F;

/// Register bus with a selected target device.
#[derive(Debug)]
pub struct Bus<I> {
    i2c: I,
    index: Option<u8>,
    selected: Option<u8>,
}

#[cfg(target_os = "linux")]
impl Bus<linux_embedded_hal::I2cdev> {
    /// Open `/dev/i2c-<bus_index>` in read/write mode.
    pub fn open(bus_index: u8) -> Result<Self> {
        let path = format!("/dev/i2c-{bus_index}");
        let i2c = linux_embedded_hal::I2cdev::new(&path).map_err(|e| Error::BusOpen {
            bus: bus_index,
            reason: e.to_string(),
        })?;
        log::debug!("opened {path}");

        let mut bus = Self::new(i2c);
        bus.index = Some(bus_index);
        Ok(bus)
    }
}

impl<I: I2c> Bus<I> {
    /// Wrap an already opened transport.
    pub fn new(i2c: I) -> Self {
        Self {
            i2c,
            index: None,
            selected: None,
        }
    }

    /// Bus number this handle was opened from, if it came from [`Bus::open`].
    pub fn index(&self) -> Option<u8> {
        self.index
    }

    /// Currently selected target address.
    pub fn selected(&self) -> Option<u8> {
        self.selected
    }

    /// Select the device that subsequent reads and writes address.
    pub fn select(&mut self, address: u8) -> Result<()> {
        if address > MAX_ADDRESS {
            return Err(Error::BusSelect { address });
        }
        self.selected = Some(address);
        Ok(())
    }

    /// Read `N` consecutive bytes starting at `command`.
    pub fn read_block<const N: usize>(&mut self, command: u8) -> Result<[u8; N]> {
        let address = self.target()?;
        let mut block = [0u8; N];
        self.i2c
            .write_read(address, &[command], &mut block)
            .map_err(|e| Error::BusRead {
                address,
                command,
                kind: e.kind(),
            })?;
        Ok(block)
    }

    /// Read a single register.
    pub fn read_byte(&mut self, register: u8) -> Result<u8> {
        let [value] = self.read_block::<1>(register)?;
        Ok(value)
    }

    /// Write a single register.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<()> {
        let address = self.target()?;
        self.i2c
            .write(address, &[register, value])
            .map_err(|e| Error::BusWrite {
                address,
                register,
                kind: e.kind(),
            })
    }

    /// Give back the underlying transport.
    pub fn release(self) -> I {
        self.i2c
    }

    fn target(&self) -> Result<u8> {
        // Address 0 stands in for "nothing selected".
        self.selected.ok_or(Error::BusSelect { address: 0 })
    }
}
