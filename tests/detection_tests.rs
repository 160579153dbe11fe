mod common;

use berry_imu::{Bus, DeviceVariant, Driver, Error, Imu, Sensor};
use common::{FakeBus, bus};

/// Each board is recognised as itself and nothing else
#[test]
fn test_each_board_detected() {
    for variant in DeviceVariant::PROBE_ORDER {
        let imu = Imu::new(bus(FakeBus::with_board(variant))).unwrap();
        assert_eq!(imu.variant(), variant);
        assert_eq!(imu.variant_label(), variant.label());
    }
}

/// An empty bus is fatal
#[test]
fn test_empty_bus_not_detected() {
    let result = Imu::new(bus(FakeBus::new()));
    assert!(matches!(result, Err(Error::DeviceNotDetected)));
}

/// Only one of the two identification bytes matching is not enough
#[test]
fn test_half_match_not_detected() {
    // LSM9DS0 gyro present, accel/mag die answers with the LSM9DS1 magnetometer id
    let mut fake = FakeBus::new();
    fake.set(0x6A, 0x0F, 0xD4);
    fake.set(0x1E, 0x0F, 0x3D);

    let result = Driver::detect(bus(fake));
    assert!(matches!(result, Err(Error::DeviceNotDetected)));
}

/// Identification bytes of different boards mixed together match nothing
#[test]
fn test_mixed_identification_not_detected() {
    // LSM6DSL id with the LSM9DS0 accel/mag id
    let mut fake = FakeBus::new();
    fake.set(0x6A, 0x0F, 0x6A);
    fake.set(0x1E, 0x0F, 0x49);

    assert!(matches!(
        Driver::detect(bus(fake)),
        Err(Error::DeviceNotDetected)
    ));
}

/// The first generation in probe order wins when several would match
#[test]
fn test_probe_order_first_match_wins() {
    // V1 chips plus a LIS3MDL on 0x1C
    let mut fake = FakeBus::with_board(DeviceVariant::BerryImuV1);
    fake.set(0x1C, 0x0F, 0x3D);

    let driver = Driver::detect(bus(fake)).unwrap();
    assert_eq!(driver.variant(), DeviceVariant::BerryImuV1);
}

/// Probing reads identification registers of V1, then V2, then V3
#[test]
fn test_probe_sequence() {
    let driver = Driver::detect(bus(FakeBus::with_board(DeviceVariant::BerryImuV3))).unwrap();
    let fake = driver.release();

    // Absent devices never acknowledge, so only reads that reached a chip are logged
    let reads = fake.reads();
    assert_eq!(
        reads,
        vec![
            (0x6A, 0x0F, 1), // V1 gyro, answers 0x6A which is not 0xD4
            (0x1C, 0x0F, 1), // V2 magnetometer, answers 0x3D
            (0x6A, 0x0F, 1), // V2 accel/gyro, answers 0x6A which is not 0x68
            (0x6A, 0x0F, 1), // V3 LSM6DSL
            (0x1C, 0x0F, 1), // V3 LIS3MDL
        ]
    );
}

#[test]
fn test_v1_configuration_sequence() {
    let driver = Driver::detect(bus(FakeBus::with_board(DeviceVariant::BerryImuV1))).unwrap();
    assert_eq!(
        driver.release().writes(),
        vec![
            (0x6A, 0x20, 0b0000_1111),
            (0x6A, 0x23, 0b0011_0000),
            (0x1E, 0x20, 0b0110_0111),
            (0x1E, 0x21, 0b0010_0000),
            (0x1E, 0x24, 0b1111_0000),
            (0x1E, 0x25, 0b0110_0000),
            (0x1E, 0x26, 0b0000_0000),
        ]
    );
}

#[test]
fn test_v2_configuration_sequence() {
    let driver = Driver::detect(bus(FakeBus::with_board(DeviceVariant::BerryImuV2))).unwrap();
    assert_eq!(
        driver.release().writes(),
        vec![
            (0x6A, 0x1E, 0b0011_1000),
            (0x6A, 0x10, 0b1011_1000),
            (0x6A, 0x13, 0b1011_1000),
            (0x6A, 0x1F, 0b0011_1000),
            (0x6A, 0x20, 0b0010_1000),
            (0x1C, 0x20, 0b1001_1100),
            (0x1C, 0x21, 0b0100_0000),
            (0x1C, 0x22, 0b0000_0000),
            (0x1C, 0x23, 0b0000_0000),
        ]
    );
}

#[test]
fn test_v3_configuration_sequence() {
    let driver = Driver::detect(bus(FakeBus::with_board(DeviceVariant::BerryImuV3))).unwrap();
    assert_eq!(
        driver.release().writes(),
        vec![
            (0x6A, 0x11, 0b1001_1100),
            (0x6A, 0x10, 0b1001_1111),
            (0x6A, 0x17, 0b1100_1000),
            (0x6A, 0x12, 0b0100_0100),
            (0x1C, 0x20, 0b1101_1100),
            (0x1C, 0x21, 0b0010_0000),
            (0x1C, 0x22, 0b0000_0000),
        ]
    );
}

/// A configuration write that is not acknowledged aborts construction
#[test]
fn test_configuration_write_failure() {
    let mut fake = FakeBus::with_board(DeviceVariant::BerryImuV3);
    fake.fail_writes_at(0x1C);

    let result = Imu::new(bus(fake));
    assert!(matches!(
        result,
        Err(Error::BusWrite {
            address: 0x1C,
            register: 0x20,
            ..
        })
    ));
}

/// Writes after construction still go to the locked-in sub-sensor address
#[test]
fn test_register_write_routing() {
    let mut driver = Driver::detect(bus(FakeBus::with_board(DeviceVariant::BerryImuV2))).unwrap();
    driver
        .write_register(Sensor::Magnetometer, 0x22, 0x03)
        .unwrap();

    let fake = driver.release();
    assert_eq!(fake.writes().last(), Some(&(0x1C, 0x22, 0x03)));
}

#[test]
fn test_bus_select_rejects_ten_bit_address() {
    let mut bus = Bus::new(FakeBus::new());
    assert!(matches!(
        bus.select(0x80),
        Err(Error::BusSelect { address: 0x80 })
    ));
    assert_eq!(bus.selected(), None);
}

#[test]
fn test_bus_read_without_select() {
    let mut bus = Bus::new(FakeBus::new());
    assert!(matches!(bus.read_byte(0x0F), Err(Error::BusSelect { .. })));
}

#[cfg(target_os = "linux")]
#[test]
fn test_open_missing_bus() {
    // Bus 250 does not exist on any real system
    match Imu::open(250) {
        Err(Error::BusOpen { bus, .. }) => assert_eq!(bus, 250),
        Err(e) => panic!("expected BusOpen, got {e}"),
        Ok(_) => panic!("bus 250 opened"),
    }
}
