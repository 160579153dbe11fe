//! In-memory register device standing in for the I2C bus

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use berry_imu::{Bus, DeviceVariant};
use embedded_hal::i2c::{self, ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

/// Error returned by [`FakeBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeError(pub ErrorKind);

impl i2c::Error for FakeError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// A bus transaction as seen by the devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    /// Register write: address, register, value
    Write(u8, u8, u8),
    /// Block read: address, command, length
    Read(u8, u8, usize),
}

/// Register files of the devices present on the bus.
///
/// The first written byte of a transaction sets the register pointer, further
/// written bytes are stored, and reads return consecutive registers. The top
/// bit of the pointer (LSM9DS0 auto-increment flag) is ignored.
#[derive(Debug, Default)]
pub struct FakeBus {
    present: HashSet<u8>,
    registers: HashMap<(u8, u8), u8>,
    pub log: Vec<Transfer>,
    fail_reads_at: Option<u8>,
    fail_writes_at: Option<u8>,
    read_budget: Option<usize>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put the chips of one board generation on the bus.
    pub fn with_board(variant: DeviceVariant) -> Self {
        let mut bus = Self::new();
        match variant {
            DeviceVariant::BerryImuV1 => {
                bus.set(0x1E, 0x0F, 0x49);
                bus.set(0x6A, 0x0F, 0xD4);
            }
            DeviceVariant::BerryImuV2 => {
                bus.set(0x1C, 0x0F, 0x3D);
                bus.set(0x6A, 0x0F, 0x68);
            }
            DeviceVariant::BerryImuV3 => {
                bus.set(0x6A, 0x0F, 0x6A);
                bus.set(0x1C, 0x0F, 0x3D);
            }
        }
        bus
    }

    /// Store a register value, making the device present.
    pub fn set(&mut self, address: u8, register: u8, value: u8) {
        self.present.insert(address);
        self.registers.insert((address, register), value);
    }

    /// Store consecutive register values.
    pub fn set_block(&mut self, address: u8, start: u8, values: &[u8]) {
        for (offset, value) in values.iter().enumerate() {
            self.set(address, start + offset as u8, *value);
        }
    }

    pub fn get(&self, address: u8, register: u8) -> Option<u8> {
        self.registers.get(&(address, register)).copied()
    }

    /// Make every read from `address` fail.
    pub fn fail_reads_at(&mut self, address: u8) {
        self.fail_reads_at = Some(address);
    }

    /// Let the first `count` reads through and fail every one after.
    pub fn fail_reads_after(&mut self, count: usize) {
        self.read_budget = Some(count);
    }

    /// Make every write to `address` fail.
    pub fn fail_writes_at(&mut self, address: u8) {
        self.fail_writes_at = Some(address);
    }

    /// Register writes in the order they happened.
    pub fn writes(&self) -> Vec<(u8, u8, u8)> {
        self.log
            .iter()
            .filter_map(|t| match *t {
                Transfer::Write(a, r, v) => Some((a, r, v)),
                Transfer::Read(..) => None,
            })
            .collect()
    }

    /// Block reads in the order they happened.
    pub fn reads(&self) -> Vec<(u8, u8, usize)> {
        self.log
            .iter()
            .filter_map(|t| match *t {
                Transfer::Read(a, c, n) => Some((a, c, n)),
                Transfer::Write(..) => None,
            })
            .collect()
    }
}

impl ErrorType for FakeBus {
    type Error = FakeError;
}

impl I2c for FakeBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if !self.present.contains(&address) {
            return Err(FakeError(ErrorKind::NoAcknowledge(
                NoAcknowledgeSource::Address,
            )));
        }

        let mut pointer: Option<u8> = None;
        let mut command = 0;
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    let Some((first, rest)) = bytes.split_first() else {
                        continue;
                    };
                    if rest.is_empty() {
                        pointer = Some(*first & 0x7F);
                        command = *first;
                        continue;
                    }
                    if self.fail_writes_at == Some(address) {
                        return Err(FakeError(ErrorKind::NoAcknowledge(
                            NoAcknowledgeSource::Data,
                        )));
                    }
                    for (offset, value) in rest.iter().enumerate() {
                        let register = first + offset as u8;
                        self.log.push(Transfer::Write(address, register, *value));
                        self.registers.insert((address, register), *value);
                    }
                }
                Operation::Read(buffer) => {
                    let exhausted = self
                        .read_budget
                        .is_some_and(|budget| self.reads().len() >= budget);
                    if exhausted || self.fail_reads_at == Some(address) {
                        return Err(FakeError(ErrorKind::Bus));
                    }
                    let start = pointer.unwrap_or(0);
                    self.log.push(Transfer::Read(address, command, buffer.len()));
                    for (offset, byte) in buffer.iter_mut().enumerate() {
                        *byte = self.get(address, start + offset as u8).unwrap_or(0);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Wrap a fake in the crate's bus transport.
pub fn bus(fake: FakeBus) -> Bus<FakeBus> {
    Bus::new(fake)
}
